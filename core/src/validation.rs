//! Pure input validators run before a request is built.
//!
//! # Design
//! Neither validator touches the network or any shared state. Business ID
//! validation maps every input to a `bool`. Enumeration membership has a
//! typed form, where the type system guarantees a mapping, and a JSON form
//! for untyped data that reports a non-object enumeration as
//! `ApiError::InvalidArgument`.

use serde_json::Value;

use crate::codes::Enumeration;
use crate::error::ApiError;

const WEIGHTS: [u32; 7] = [7, 9, 10, 5, 8, 4, 2];

/// Compute the check digit for the seven-digit body of a business ID.
///
/// Returns `None` if `body` is not exactly seven ASCII digits, or if the
/// weighted sum leaves remainder 1, for which no check digit exists.
pub fn business_id_check_digit(body: &str) -> Option<u8> {
    let digits = body.as_bytes();
    if digits.len() != WEIGHTS.len() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS)
        .map(|(d, w)| u32::from(d - b'0') * w)
        .sum();

    match sum % 11 {
        0 => Some(0),
        1 => None,
        r => Some((11 - r) as u8),
    }
}

/// Validate a Finnish business ID of the form `DDDDDDD-D`.
pub fn validate_business_id(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 9 || bytes[7] != b'-' || !bytes[8].is_ascii_digit() {
        return false;
    }
    // Length and hyphen position are checked, so both halves are ASCII-safe.
    let (body, check) = (&value[..7], bytes[8] - b'0');
    business_id_check_digit(body) == Some(check)
}

/// True if `value` is one of the codes of `enumeration`.
pub fn validate_enumeration(enumeration: &Enumeration, value: &str) -> bool {
    enumeration.contains(value)
}

/// Membership check for enumerations that arrive as untyped JSON.
///
/// `enumeration` must be a JSON object; its values are the codes. Any
/// `value` not equal to one of them, `null` included, yields `Ok(false)`.
pub fn validate_enumeration_value(enumeration: &Value, value: &Value) -> Result<bool, ApiError> {
    let Some(map) = enumeration.as_object() else {
        return Err(ApiError::InvalidArgument(
            "argument \"enumeration\" is not an object".to_string(),
        ));
    };
    Ok(map.values().any(|code| code == value))
}
