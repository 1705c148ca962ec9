//! # Scope and User-Identifier Casts
//!
//! Application scopes and user identifiers enter the circuits as single
//! field elements. The encodings here are shared with the verifier side,
//! which decodes them back out of public signals.
//!
//! A scope string is encoded as the decimal number `1` followed by each
//! character's ASCII code zero-padded to three digits. The leading `1`
//! preserves leading-zero codes through the round trip.

use num_bigint::BigUint;
use uuid::Uuid;

use crate::error::CoreError;

/// Maximum scope length accepted by the circuit encoding.
pub const MAX_SCOPE_LENGTH: usize = 25;

/// Encode a scope string (at most 25 characters) as a decimal field
/// element string.
pub fn cast_from_scope(scope: &str) -> Result<String, CoreError> {
    if scope.len() > MAX_SCOPE_LENGTH {
        return Err(CoreError::ScopeTooLong(scope.len()));
    }
    let mut digits = String::with_capacity(1 + scope.len() * 3);
    digits.push('1');
    for ch in scope.chars() {
        let code = ch as u32;
        if code > 0xff {
            return Err(CoreError::ScopeNotAscii);
        }
        digits.push_str(&format!("{code:03}"));
    }
    Ok(digits)
}

/// Decode a scope encoding produced by [`cast_from_scope`].
pub fn cast_to_scope(value: &BigUint) -> Result<String, CoreError> {
    let s = value.to_string();
    let body = s.strip_prefix('1').ok_or(CoreError::ScopeNotAscii)?;
    if body.len() % 3 != 0 {
        return Err(CoreError::ScopeNotAscii);
    }
    let mut out = String::with_capacity(body.len() / 3);
    for chunk in body.as_bytes().chunks(3) {
        let code: u32 = std::str::from_utf8(chunk)
            .ok()
            .and_then(|c| c.parse().ok())
            .ok_or(CoreError::ScopeNotAscii)?;
        out.push(char::from_u32(code).ok_or(CoreError::ScopeNotAscii)?);
    }
    Ok(out)
}

/// Encode a UUID as a decimal field element string (its 128-bit value).
pub fn cast_from_uuid(uuid: &str) -> Result<String, CoreError> {
    let parsed = Uuid::parse_str(uuid).map_err(|_| CoreError::InvalidUuid(uuid.to_string()))?;
    Ok(BigUint::from(parsed.as_u128()).to_string())
}

/// Decode a field element back into hyphenated UUID form.
pub fn cast_to_uuid(value: &BigUint) -> Result<String, CoreError> {
    let hex = format!("{value:032x}");
    if hex.len() != 32 {
        return Err(CoreError::InvalidUuid(value.to_string()));
    }
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}

/// The accepted user-identifier encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIdKind {
    /// Plain ASCII string, at most 25 characters, scope-encoded.
    Ascii,
    /// Hex string, at most 63 characters.
    Hex,
    /// Hyphenated UUID.
    Uuid,
}

/// Encode a user identifier of the given kind as a decimal field element
/// string.
pub fn cast_user_identifier(id: &str, kind: UserIdKind) -> Result<String, CoreError> {
    match kind {
        UserIdKind::Ascii => {
            if id.is_empty() || !id.chars().all(|c| (c as u32) <= 0xff) {
                return Err(CoreError::InvalidUserId {
                    kind: "ascii",
                    value: id.to_string(),
                });
            }
            cast_from_scope(id)
        }
        UserIdKind::Hex => {
            if id.is_empty() || id.len() > 63 || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(CoreError::InvalidUserId {
                    kind: "hex",
                    value: id.to_string(),
                });
            }
            Ok(BigUint::parse_bytes(id.as_bytes(), 16)
                .ok_or(CoreError::InvalidUserId {
                    kind: "hex",
                    value: id.to_string(),
                })?
                .to_string())
        }
        UserIdKind::Uuid => cast_from_uuid(id),
    }
}
