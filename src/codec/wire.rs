//! Helpers for the `{type, value}` wire object shared by both codecs

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use num_bigint::BigInt;
use serde_json::{json, Map, Value};
use std::str::FromStr;

use crate::errors::{CodecError, CodecResult};

pub const TYPE_FIELD: &str = "type";
pub const VALUE_FIELD: &str = "value";
pub const KEY_FIELD: &str = "key";

/// Build a wire object
pub fn wire(type_name: &str, value: Value) -> Value {
    json!({ TYPE_FIELD: type_name, VALUE_FIELD: value })
}

pub fn as_object(value: &Value) -> CodecResult<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CodecError::shape_mismatch("object", value))
}

/// Look up a field by case-insensitive name
///
/// Two fields that differ only in case are ambiguous and rejected.
pub fn field<'a>(object: &'a Map<String, Value>, name: &str) -> CodecResult<Option<&'a Value>> {
    let mut matches = object
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value);

    let first = matches.next();
    if matches.next().is_some() {
        return Err(CodecError::ShapeMismatch {
            expected: format!("a single '{}' field", name),
            found: "duplicate fields".to_string(),
        });
    }
    Ok(first)
}

/// The `type` field as text, `None` if absent
pub fn type_name(object: &Map<String, Value>) -> CodecResult<Option<&str>> {
    match field(object, TYPE_FIELD)? {
        None => Ok(None),
        Some(Value::String(name)) => Ok(Some(name.as_str())),
        Some(other) => Err(CodecError::UnrecognizedType {
            name: other.to_string(),
        }),
    }
}

pub fn expect_bool(value: &Value) -> CodecResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| CodecError::type_mismatch("boolean", value))
}

pub fn expect_str(value: &Value) -> CodecResult<&str> {
    value
        .as_str()
        .ok_or_else(|| CodecError::type_mismatch("string", value))
}

/// Decimal-string integer of arbitrary precision
///
/// JSON numbers are refused so that no value is ever routed through `f64`.
pub fn parse_integer(value: &Value) -> CodecResult<BigInt> {
    let text = expect_str(value)?;
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);
    // from_str alone would also take '_' separators
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::NumberFormat {
            input: text.to_string(),
            reason: "not a decimal integer".to_string(),
        });
    }
    BigInt::from_str(trimmed).map_err(|e| CodecError::NumberFormat {
        input: text.to_string(),
        reason: e.to_string(),
    })
}

pub fn decode_base64(value: &Value) -> CodecResult<Vec<u8>> {
    let text = expect_str(value)?;
    BASE64
        .decode(text)
        .map_err(|e| CodecError::encoding("base64", e))
}

pub fn encode_base64(bytes: &[u8]) -> Value {
    Value::String(BASE64.encode(bytes))
}
