//! Error types for the wire codecs
//!
//! Every failure the codecs can report is a variant of [`CodecError`]. Errors are
//! returned at the point of detection and never carry a partially decoded value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error variants that can occur while encoding or decoding wire values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// A required field is absent from a wire object
    #[error("Missing field: {field}")]
    MissingField { field: String },

    /// The `type` field is absent or names no known kind
    #[error("Unrecognized type: {name}")]
    UnrecognizedType { name: String },

    /// A scalar `value` has the wrong JSON type for its kind
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A structured `value` (object, array, pair) has the wrong shape
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// An integer string could not be parsed, or a number is out of range
    #[error("Invalid number '{input}': {reason}")]
    NumberFormat { input: String, reason: String },

    /// Base64, hex or base58 content could not be decoded
    #[error("Invalid {encoding} encoding: {reason}")]
    InvalidEncoding { encoding: String, reason: String },

    /// A fixed-width hash decoded to the wrong number of bytes
    #[error("Invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    /// A public key is malformed or not a point on the configured curve
    #[error("Invalid public key: {reason}")]
    InvalidPublicKey { reason: String },

    /// A map key decoded to a non-primitive kind
    #[error("Invalid map key: {kind} cannot be used as a map key")]
    InvalidMapKey { kind: String },

    /// A compound value contains itself
    #[error("Cyclic value: {kind} references one of its own ancestors")]
    CyclicValue { kind: String },

    /// The requested operation is not available for this value domain
    #[error("Not supported: {operation}")]
    NotSupported { operation: String },

    /// An address string could not be converted to a script hash
    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    /// Compound values are nested deeper than the configured bound
    #[error("Maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// Input text is not valid JSON
    #[error("JSON error: {0}")]
    Json(String),
}

impl CodecError {
    /// Stable numeric code reported in [`ErrorModel`]
    pub fn code(&self) -> u32 {
        match self {
            CodecError::MissingField { .. } => 1001,
            CodecError::UnrecognizedType { .. } => 1002,
            CodecError::TypeMismatch { .. } => 1003,
            CodecError::ShapeMismatch { .. } => 1004,
            CodecError::NumberFormat { .. } => 1005,
            CodecError::InvalidEncoding { .. } => 1006,
            CodecError::InvalidHashLength { .. } => 1007,
            CodecError::InvalidPublicKey { .. } => 1008,
            CodecError::InvalidMapKey { .. } => 1009,
            CodecError::CyclicValue { .. } => 1010,
            CodecError::NotSupported { .. } => 1011,
            CodecError::InvalidAddress { .. } => 1012,
            CodecError::DepthExceeded { .. } => 1013,
            CodecError::Json(_) => 1014,
        }
    }

    /// Variant name reported in [`ErrorModel`]
    pub fn name(&self) -> &'static str {
        match self {
            CodecError::MissingField { .. } => "MissingFieldError",
            CodecError::UnrecognizedType { .. } => "UnrecognizedTypeError",
            CodecError::TypeMismatch { .. } => "TypeMismatchError",
            CodecError::ShapeMismatch { .. } => "ShapeMismatchError",
            CodecError::NumberFormat { .. } => "NumberFormatError",
            CodecError::InvalidEncoding { .. } => "InvalidEncodingError",
            CodecError::InvalidHashLength { .. } => "InvalidHashLengthError",
            CodecError::InvalidPublicKey { .. } => "InvalidPublicKeyError",
            CodecError::InvalidMapKey { .. } => "InvalidMapKeyError",
            CodecError::CyclicValue { .. } => "CyclicValueError",
            CodecError::NotSupported { .. } => "NotSupportedError",
            CodecError::InvalidAddress { .. } => "InvalidAddressError",
            CodecError::DepthExceeded { .. } => "DepthExceededError",
            CodecError::Json(_) => "JsonError",
        }
    }

    /// Convert into the serializable error body handed to the transport layer
    pub fn to_model(&self) -> ErrorModel {
        ErrorModel {
            code: self.code(),
            name: self.name().to_string(),
            message: self.to_string(),
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        CodecError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn type_mismatch(expected: &str, found: &serde_json::Value) -> Self {
        CodecError::TypeMismatch {
            expected: expected.to_string(),
            found: json_kind(found).to_string(),
        }
    }

    pub(crate) fn shape_mismatch(expected: &str, found: &serde_json::Value) -> Self {
        CodecError::ShapeMismatch {
            expected: expected.to_string(),
            found: json_kind(found).to_string(),
        }
    }

    pub(crate) fn encoding(encoding: &str, reason: impl ToString) -> Self {
        CodecError::InvalidEncoding {
            encoding: encoding.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn address(reason: impl ToString) -> Self {
        CodecError::InvalidAddress {
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err.to_string())
    }
}

/// Name of a JSON value's type, used in mismatch messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Error body exchanged with clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorModel {
    pub code: u32,
    pub name: String,
    pub message: String,
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self {
            code: 1000,
            name: "GeneralException".to_string(),
            message: "An error occurred.".to_string(),
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
