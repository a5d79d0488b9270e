use crate::value::ValueType;
use thiserror::Error;

/// Errors raised while coercing client input into contract values
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Error: {0} is not a valid encoder type.")]
    UnknownType(String),

    #[error("Error encoding {value} to {type_name}")]
    Invalid { type_name: String, value: String },

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl EncodeError {
    pub(crate) fn invalid(type_name: &str, value: &serde_json::Value) -> Self {
        EncodeError::Invalid {
            type_name: type_name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Errors raised while reading wire values back
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("Invalid {marker} payload: {reason}")]
    InvalidMarker { marker: &'static str, reason: String },
}

/// Errors raised by the hashed contract state
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("{field} should be of type {}", .expected.checked_name())]
    TypeMismatch {
        field: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Driver error: {0}")]
    Driver(String),
}
