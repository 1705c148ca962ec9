//! # Byte Packing and Word Splitting
//!
//! The canonical byte-level transforms shared by the proof engine, the
//! circuits and the on-chain verifier:
//!
//! - **Limb packing**: byte arrays become field elements in 31-byte
//!   little-endian chunks (`byte[j]` carries weight `256^j` within its
//!   chunk).
//! - **Word splitting**: big integers (RSA moduli, signatures, ECDSA
//!   coordinates) become fixed-width little-endian limb vectors matching
//!   the circuits' big-integer gadgets.
//! - **Byte-order reversal**: the per-chunk reversal applied when packed
//!   data is compared against on-chain words. The reversal is part of the
//!   wire contract, not an implementation detail.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::constants::MAX_BYTES_IN_FIELD;
use crate::error::CoreError;
use crate::field::{biguint_to_field, FieldElement};

/// Number of 31-byte chunks needed to pack `byte_length` bytes.
pub fn int_chunk_length(byte_length: usize) -> usize {
    byte_length.div_ceil(MAX_BYTES_IN_FIELD)
}

/// Pack a byte array into field elements, 31 bytes per element,
/// little-endian within each chunk.
pub fn pack_bytes(unpacked: &[u8]) -> Vec<FieldElement> {
    let chunks = int_chunk_length(unpacked.len());
    let mut out = Vec::with_capacity(chunks);
    for i in 0..chunks {
        let mut sum = BigUint::zero();
        for j in 0..MAX_BYTES_IN_FIELD {
            let idx = MAX_BYTES_IN_FIELD * i + j;
            if idx >= unpacked.len() {
                continue;
            }
            sum += BigUint::from(unpacked[idx]) << (8 * j);
        }
        out.push(biguint_to_field(&sum));
    }
    out
}

/// Split a big integer into `word_count` little-endian words of
/// `word_bits` bits each, as decimal strings.
///
/// Returns [`CoreError::WordOverflow`] when the value does not fit,
/// which would otherwise truncate silently and fail only inside the
/// circuit's constraints.
pub fn split_to_words(
    value: &BigUint,
    word_bits: usize,
    word_count: usize,
) -> Result<Vec<String>, CoreError> {
    let mask = (BigUint::from(1u8) << word_bits) - BigUint::from(1u8);
    let mut t = value.clone();
    let mut words = Vec::with_capacity(word_count);
    for _ in 0..word_count {
        words.push((&t & &mask).to_string());
        t >>= word_bits;
    }
    if !t.is_zero() {
        return Err(CoreError::WordOverflow {
            word_bits,
            word_count,
        });
    }
    Ok(words)
}

/// Interpret a byte slice as a big-endian unsigned integer.
pub fn bytes_to_biguint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Parse a hex string (with or without `0x` prefix) into a big integer.
pub fn hex_to_biguint(hex: &str) -> Result<BigUint, CoreError> {
    let cleaned = hex.strip_prefix("0x").unwrap_or(hex);
    if cleaned.is_empty() {
        return Err(CoreError::InvalidHex(hex.to_string()));
    }
    BigUint::parse_bytes(cleaned.as_bytes(), 16)
        .ok_or_else(|| CoreError::InvalidHex(hex.to_string()))
}

/// Reverse the byte order of a `0x`-prefixed even-length hex string.
///
/// This is the transformation the on-chain verifier applies to packed
/// country lists before word comparison. It is an involution:
/// `reverse_bytes(reverse_bytes(x)) == x`.
pub fn reverse_bytes(input: &str) -> Result<String, CoreError> {
    let hex = input.strip_prefix("0x").unwrap_or(input);
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoreError::InvalidHex(input.to_string()));
    }
    let mut out = String::with_capacity(hex.len() + 2);
    out.push_str("0x");
    for i in (0..hex.len()).step_by(2).rev() {
        out.push_str(&hex[i..i + 2]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field_to_dec;
    use proptest::prelude::*;

    #[test]
    fn chunk_length_boundaries() {
        assert_eq!(int_chunk_length(0), 0);
        assert_eq!(int_chunk_length(1), 1);
        assert_eq!(int_chunk_length(31), 1);
        assert_eq!(int_chunk_length(32), 2);
        assert_eq!(int_chunk_length(93), 3);
    }

    #[test]
    fn pack_single_byte() {
        let packed = pack_bytes(&[7]);
        assert_eq!(packed.len(), 1);
        assert_eq!(field_to_dec(&packed[0]), "7");
    }

    #[test]
    fn pack_second_byte_has_weight_256() {
        let packed = pack_bytes(&[1, 1]);
        assert_eq!(field_to_dec(&packed[0]), "257");
    }

    #[test]
    fn pack_crosses_chunk_boundary() {
        // Byte 31 starts a new chunk with weight 256^0 again.
        let mut bytes = vec![0u8; 32];
        bytes[31] = 9;
        let packed = pack_bytes(&bytes);
        assert_eq!(packed.len(), 2);
        assert_eq!(field_to_dec(&packed[0]), "0");
        assert_eq!(field_to_dec(&packed[1]), "9");
    }

    #[test]
    fn split_2048_bit_value_into_32_words() {
        let value = (BigUint::from(1u8) << 2047u32) + BigUint::from(5u8);
        let words = split_to_words(&value, 64, 32).unwrap();
        assert_eq!(words.len(), 32);
        assert_eq!(words[0], "5");
        // Top word carries the 2047th bit: 2^63.
        assert_eq!(words[31], "9223372036854775808");
    }

    #[test]
    fn split_detects_overflow() {
        let value = BigUint::from(1u8) << 2048u32;
        assert!(matches!(
            split_to_words(&value, 64, 32),
            Err(CoreError::WordOverflow { .. })
        ));
    }

    #[test]
    fn split_zero_gives_zero_words() {
        let words = split_to_words(&BigUint::zero(), 64, 4).unwrap();
        assert_eq!(words, vec!["0"; 4]);
    }

    #[test]
    fn reverse_bytes_known_vector() {
        assert_eq!(reverse_bytes("0x0102ff").unwrap(), "0xff0201");
    }

    #[test]
    fn reverse_bytes_rejects_odd_length() {
        assert!(reverse_bytes("0x123").is_err());
    }

    #[test]
    fn reverse_bytes_rejects_non_hex() {
        assert!(reverse_bytes("0xzz").is_err());
    }

    #[test]
    fn hex_to_biguint_accepts_prefixed_and_bare() {
        assert_eq!(hex_to_biguint("0xff").unwrap(), BigUint::from(255u8));
        assert_eq!(hex_to_biguint("ff").unwrap(), BigUint::from(255u8));
        assert!(hex_to_biguint("0x").is_err());
        assert!(hex_to_biguint("xyz").is_err());
    }

    proptest! {
        #[test]
        fn reverse_bytes_is_an_involution(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let hex = format!("0x{}", hex::encode(&bytes));
            let twice = reverse_bytes(&reverse_bytes(&hex).unwrap()).unwrap();
            prop_assert_eq!(twice, hex);
        }

        #[test]
        fn split_roundtrips_through_recombination(words in proptest::collection::vec(any::<u64>(), 1..16)) {
            let mut value = BigUint::zero();
            for (i, w) in words.iter().enumerate() {
                value += BigUint::from(*w) << (64 * i);
            }
            let split = split_to_words(&value, 64, words.len()).unwrap();
            let mut recombined = BigUint::zero();
            for (i, w) in split.iter().enumerate() {
                recombined += w.parse::<BigUint>().unwrap() << (64 * i);
            }
            prop_assert_eq!(recombined, value);
        }
    }
}
