//! # Core Error Types
//!
//! Structured errors for the foundational transforms. Uses `thiserror` for
//! ergonomic error definitions with diagnostic context.

use thiserror::Error;

/// Errors from the foundational byte/field/identifier transforms.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A decimal string did not parse as a field element.
    #[error("invalid field element: \"{0}\"")]
    InvalidFieldElement(String),

    /// A hex string was malformed (odd length or non-hex characters).
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// A value did not fit into the requested word layout.
    #[error("value does not fit in {word_count} words of {word_bits} bits")]
    WordOverflow {
        /// Bits per word in the requested layout.
        word_bits: usize,
        /// Number of words in the requested layout.
        word_count: usize,
    },

    /// A scope string exceeded the 25-character circuit limit.
    #[error("scope must not exceed 25 characters, got {0}")]
    ScopeTooLong(usize),

    /// A scope encoding did not decode back to ASCII.
    #[error("scope encoding is not valid ASCII")]
    ScopeNotAscii,

    /// A user identifier failed validation for its declared kind.
    #[error("user identifier is not valid {kind}: \"{value}\"")]
    InvalidUserId {
        /// The declared identifier kind.
        kind: &'static str,
        /// The offending value.
        value: String,
    },

    /// A UUID string was malformed.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// A date string was not a valid `YYMMDD` digit sequence.
    #[error("invalid YYMMDD date: \"{0}\"")]
    InvalidDate(String),

    /// A country name could not be resolved to an ISO3 code, even through
    /// the alias table.
    #[error("unknown country name: \"{0}\"")]
    UnknownCountry(String),
}
