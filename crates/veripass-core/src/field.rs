//! # Field-Element Bridge
//!
//! The circuits' native data unit is an integer modulo the BN254 scalar
//! prime. Off-chain artifacts (snapshots, circuit inputs) carry these as
//! decimal strings; this module is the single conversion point.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::CoreError;

/// An integer modulo the BN254 scalar prime.
pub type FieldElement = ark_bn254::Fr;

/// Convert a field element to its canonical decimal-string form.
pub fn field_to_dec(value: &FieldElement) -> String {
    field_to_biguint(value).to_string()
}

/// Parse a decimal string into a field element.
///
/// Values at or above the modulus are rejected rather than silently
/// reduced; a snapshot carrying such a value is corrupt.
pub fn field_from_dec(s: &str) -> Result<FieldElement, CoreError> {
    let n = s
        .parse::<BigUint>()
        .map_err(|_| CoreError::InvalidFieldElement(s.to_string()))?;
    if n >= modulus() {
        return Err(CoreError::InvalidFieldElement(s.to_string()));
    }
    Ok(FieldElement::from(n))
}

/// Convert a field element to an unsigned big integer.
pub fn field_to_biguint(value: &FieldElement) -> BigUint {
    BigUint::from_bytes_be(&value.into_bigint().to_bytes_be())
}

/// Reduce an unsigned big integer into the field.
pub fn biguint_to_field(value: &BigUint) -> FieldElement {
    FieldElement::from(value.clone())
}

/// The BN254 scalar modulus as a big integer.
pub fn modulus() -> BigUint {
    BigUint::from_bytes_be(&FieldElement::MODULUS.to_bytes_be())
}

/// Format a tree root as a `0x`-prefixed hex string with even length,
/// the form the registry contract accepts.
pub fn format_root(root: &FieldElement) -> String {
    let hex = field_to_biguint(root).to_str_radix(16);
    if hex.len() % 2 == 0 {
        format!("0x{hex}")
    } else {
        format!("0x0{hex}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_roundtrip() {
        let f = FieldElement::from(123456789u64);
        assert_eq!(field_to_dec(&f), "123456789");
        assert_eq!(field_from_dec("123456789").unwrap(), f);
    }

    #[test]
    fn zero_and_one() {
        assert_eq!(field_to_dec(&FieldElement::from(0u64)), "0");
        assert_eq!(field_to_dec(&FieldElement::from(1u64)), "1");
    }

    #[test]
    fn rejects_modulus_and_above() {
        let m = modulus().to_string();
        assert!(field_from_dec(&m).is_err());
        let above = (modulus() + BigUint::from(1u8)).to_string();
        assert!(field_from_dec(&above).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(field_from_dec("").is_err());
        assert!(field_from_dec("12ab").is_err());
        assert!(field_from_dec("-5").is_err());
    }

    #[test]
    fn accepts_modulus_minus_one() {
        let max = (modulus() - BigUint::from(1u8)).to_string();
        let f = field_from_dec(&max).unwrap();
        assert_eq!(field_to_dec(&f), max);
    }

    #[test]
    fn format_root_pads_to_even_length() {
        // 256 = 0x100, odd hex length, must gain a leading zero.
        let f = FieldElement::from(256u64);
        assert_eq!(format_root(&f), "0x0100");
        let g = FieldElement::from(255u64);
        assert_eq!(format_root(&g), "0xff");
    }

    #[test]
    fn modulus_matches_bn254_scalar_prime() {
        assert_eq!(
            modulus().to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
    }
}
