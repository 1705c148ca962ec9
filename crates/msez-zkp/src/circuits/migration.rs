//! # Migration Evidence Circuits
//!
//! Circuit definitions for proving properties of cross-jurisdiction asset
//! migration without revealing sensitive migration details.
//!
//! ## Circuit Types
//!
//! - [`MigrationEvidenceCircuit`]: Proves that a migration saga completed
//!   all required phases with valid evidence at each transition.
//! - [`OwnershipChainCircuit`]: Proves valid chain of title across
//!   jurisdictional boundaries.
//! - [`CompensationValidityCircuit`]: Proves that compensation actions
//!   in a failed migration were correctly executed.
//!
//! ## Phase 1 Status
//!
//! Data model only — no real constraint system.
//!
//! ## Spec Reference
//!
//! Migration saga phases are defined in the spec's migration chapter.
//! Python equivalent: `tools/phoenix/migration.py` state machine.

use serde::{Deserialize, Serialize};

/// Circuit proving a migration saga completed all required phases.
///
/// Public inputs:
/// - `source_jurisdiction`: Source jurisdiction identifier hash.
/// - `target_jurisdiction`: Target jurisdiction identifier hash.
/// - `migration_id`: Unique migration identifier hash.
/// - `final_state_commitment`: Commitment to the final saga state.
///
/// Witness (private):
/// - `phase_evidence`: Evidence hashes for each completed phase.
/// - `transition_timestamps`: UTC timestamps of each phase transition.
/// - `approval_signatures`: Regulatory approval signature data.
///
/// Approximate constraint count: 4096 (multi-phase verification chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationEvidenceCircuit {
    // -- Public inputs --
    /// SHA-256 hash of the source jurisdiction identifier.
    pub source_jurisdiction: [u8; 32],
    /// SHA-256 hash of the target jurisdiction identifier.
    pub target_jurisdiction: [u8; 32],
    /// SHA-256 hash of the migration identifier.
    pub migration_id: [u8; 32],
    /// Commitment to the final saga state after all phases.
    pub final_state_commitment: [u8; 32],

    // -- Witness (private inputs) --
    /// Evidence hash for each completed migration phase.
    /// Ordered: INITIATED, VALIDATED, APPROVED, LOCKED, IN_TRANSIT,
    /// RECEIVED, VERIFIED, COMPLETED.
    pub phase_evidence: Vec<[u8; 32]>,
    /// UTC epoch seconds for each phase transition.
    pub transition_timestamps: Vec<u64>,
    /// Regulatory approval signature bytes for each required approval.
    pub approval_signatures: Vec<Vec<u8>>,
}

/// Circuit proving valid chain of title across jurisdictional boundaries.
///
/// Public inputs:
/// - `asset_digest`: Content-addressed digest of the asset.
/// - `current_owner_commitment`: Commitment to the current owner.
/// - `chain_root`: Merkle root of the ownership chain.
///
/// Witness (private):
/// - `ownership_entries`: Sequence of (owner_hash, timestamp, evidence_hash).
/// - `transfer_proofs`: Merkle proofs for each ownership transfer.
///
/// Approximate constraint count: 2048 per chain link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipChainCircuit {
    // -- Public inputs --
    /// Content-addressed digest of the asset being tracked.
    pub asset_digest: [u8; 32],
    /// Commitment to the current owner identity.
    pub current_owner_commitment: [u8; 32],
    /// Merkle root of the complete ownership chain.
    pub chain_root: [u8; 32],

    // -- Witness (private inputs) --
    /// Ownership chain entries: (owner_hash, timestamp_epoch, evidence_hash).
    pub ownership_entries: Vec<OwnershipEntry>,
    /// Merkle inclusion proofs for each transfer in the chain.
    pub transfer_proofs: Vec<Vec<[u8; 32]>>,
}

/// A single entry in the ownership chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEntry {
    /// SHA-256 hash of the owner identity.
    pub owner_hash: [u8; 32],
    /// UTC epoch seconds when ownership was acquired.
    pub timestamp: u64,
    /// SHA-256 hash of the transfer evidence.
    pub evidence_hash: [u8; 32],
}

/// Circuit proving compensation actions in a failed migration were valid.
///
/// Public inputs:
/// - `migration_id`: Hash of the failed migration.
/// - `compensation_commitment`: Commitment to all compensation records.
///
/// Witness (private):
/// - `compensation_records`: Details of each compensation action.
/// - `failure_evidence`: Evidence of the migration failure trigger.
///
/// Approximate constraint count: 1024 per compensation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationValidityCircuit {
    // -- Public inputs --
    /// SHA-256 hash of the failed migration identifier.
    pub migration_id: [u8; 32],
    /// Commitment to all compensation records.
    pub compensation_commitment: [u8; 32],

    // -- Witness (private inputs) --
    /// Compensation action records.
    pub compensation_records: Vec<CompensationRecord>,
    /// Evidence hash of the failure that triggered compensation.
    pub failure_evidence: [u8; 32],
}

/// A single compensation action record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRecord {
    /// Type of compensation action (e.g., "unlock_source", "refund_fees").
    pub action_type: String,
    /// Whether the compensation action succeeded.
    pub success: bool,
    /// SHA-256 hash of the compensation evidence.
    pub evidence_hash: [u8; 32],
    /// UTC epoch seconds when the action was executed.
    pub timestamp: u64,
}
