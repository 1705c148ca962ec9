//! # Protocol Constants
//!
//! Tree depths, padding budgets and the MRZ attribute table. All three
//! consumers (this engine, the circuits, the on-chain verifier) hardcode
//! these values independently; they must never drift.

/// Depth of the frozen CSCA indexed Merkle tree.
pub const CSCA_TREE_DEPTH: usize = 12;

/// Maximum depth the DSC tree proofs are padded to. The live tree is
/// shallower; the circuit consumes a fixed-size sibling array.
pub const DSC_TREE_DEPTH: usize = 21;

/// Maximum depth the identity-commitment tree proofs are padded to.
pub const COMMITMENT_TREE_DEPTH: usize = 33;

/// Depth of the OFAC sparse Merkle trees. Watchlist keys are reduced
/// modulo `2^OFAC_TREE_LEVELS` before insertion.
pub const OFAC_TREE_LEVELS: usize = 64;

/// Padding target for DSC TBS certificates (SHA message padding).
pub const MAX_DSC_TBS_BYTES: usize = 1792;

/// Padding target for CSCA TBS certificates (zero padding).
pub const MAX_CSCA_TBS_BYTES: usize = 1665;

/// Public keys above this bit length are skipped at ingestion time.
pub const MAX_PUBKEY_BITS: usize = 4096;

/// Number of entries in the packed forbidden-countries list. Shorter lists
/// are padded with null entries; longer lists are rejected.
pub const MAX_FORBIDDEN_COUNTRIES_LIST_LENGTH: usize = 40;

/// Bytes packed into a single field element. 31 bytes stay below the BN254
/// scalar modulus for any byte content.
pub const MAX_BYTES_IN_FIELD: usize = 31;

/// Length of the TD3 machine-readable zone in characters.
pub const MRZ_LENGTH: usize = 88;

/// Length of the DG1 frame: a 5-byte ASN.1 prefix followed by the MRZ.
pub const DG1_FRAME_LENGTH: usize = 93;

/// Attestation identifier bound into every identity commitment.
/// `poseidon("E-PASSPORT")`.
pub const PASSPORT_ATTESTATION_ID: &str =
    "8518753152044246090169372947057357973469996808638122125210848696986717482788";

/// A disclosable passport attribute, addressed by its byte range in the
/// 88-character MRZ (plus the appended older-than and OFAC result slots in
/// the revealed output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Issuing state code, MRZ positions 2..=4.
    IssuingState,
    /// Name field (`LAST<<FIRST`), MRZ positions 5..=43.
    Name,
    /// Passport number, MRZ positions 44..=52.
    PassportNumber,
    /// Nationality code, MRZ positions 54..=56.
    Nationality,
    /// Date of birth (`YYMMDD`), MRZ positions 57..=62.
    DateOfBirth,
    /// Gender, MRZ position 64.
    Gender,
    /// Expiry date (`YYMMDD`), MRZ positions 65..=70.
    ExpiryDate,
    /// Older-than digits appended after the MRZ, positions 88..=89.
    OlderThan,
    /// OFAC result flags appended after the MRZ, positions 90..=92.
    OfacResults,
}

impl Attribute {
    /// Inclusive byte range of this attribute in the revealed-data layout
    /// (88 MRZ characters followed by older-than and OFAC slots).
    pub const fn position(self) -> (usize, usize) {
        match self {
            Attribute::IssuingState => (2, 4),
            Attribute::Name => (5, 43),
            Attribute::PassportNumber => (44, 52),
            Attribute::Nationality => (54, 56),
            Attribute::DateOfBirth => (57, 62),
            Attribute::Gender => (64, 64),
            Attribute::ExpiryDate => (65, 70),
            Attribute::OlderThan => (88, 89),
            Attribute::OfacResults => (90, 92),
        }
    }

    /// Attributes that live inside the MRZ itself and are therefore
    /// selectable through `selector_dg1`.
    pub const MRZ_ATTRIBUTES: [Attribute; 7] = [
        Attribute::IssuingState,
        Attribute::Name,
        Attribute::PassportNumber,
        Attribute::Nationality,
        Attribute::DateOfBirth,
        Attribute::Gender,
        Attribute::ExpiryDate,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_ranges_stay_within_revealed_layout() {
        for attr in [
            Attribute::IssuingState,
            Attribute::Name,
            Attribute::PassportNumber,
            Attribute::Nationality,
            Attribute::DateOfBirth,
            Attribute::Gender,
            Attribute::ExpiryDate,
            Attribute::OlderThan,
            Attribute::OfacResults,
        ] {
            let (start, end) = attr.position();
            assert!(start <= end);
            assert!(end < DG1_FRAME_LENGTH);
        }
    }

    #[test]
    fn mrz_attributes_fit_in_selector() {
        for attr in Attribute::MRZ_ATTRIBUTES {
            let (_, end) = attr.position();
            assert!(end < MRZ_LENGTH);
        }
    }

    #[test]
    fn dg1_frame_is_prefix_plus_mrz() {
        assert_eq!(DG1_FRAME_LENGTH, MRZ_LENGTH + 5);
    }
}
