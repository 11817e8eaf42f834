//! Decoding errors for Clarity values and contract-call responses
//!
//! Each variant carries where decoding stopped and what was expected so a
//! malformed node response can be diagnosed from the log line alone.

use market_amm::PricingError;
use thiserror::Error;

/// Clarity decoding errors with diagnostic context
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Buffer ended before the declared value did
    #[error("Truncated value: need {need} bytes at offset {offset}, buffer has {got} (context: {context})")]
    Truncated {
        need: usize,
        got: usize,
        offset: usize,
        context: String,
    },

    /// First byte of a value is not a known Clarity type id
    #[error("Unknown Clarity type prefix {prefix:#04x} at offset {offset}")]
    UnknownTypePrefix { prefix: u8, offset: usize },

    /// A complete value was decoded but bytes remain
    #[error("Trailing bytes: value ended at offset {consumed}, buffer has {total}")]
    TrailingBytes { consumed: usize, total: usize },

    /// String or tuple key is not valid UTF-8 / ASCII
    #[error("Invalid text at offset {offset}: {reason}")]
    InvalidText { offset: usize, reason: String },

    /// Hex payload could not be decoded
    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),

    /// Name, key or body too long for its length prefix
    #[error("{context} of {len} bytes exceeds maximum {max}")]
    ValueTooLarge {
        context: String,
        len: usize,
        max: usize,
    },

    /// Value nests deeper than the Clarity limit
    #[error("Nesting depth {depth} exceeds maximum {max}")]
    NestingTooDeep { depth: usize, max: usize },

    /// Expected tuple field is absent
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Value has a different Clarity type than required
    #[error("Unexpected type for {context}: expected {expected}, got {got}")]
    UnexpectedType {
        context: String,
        expected: String,
        got: String,
    },

    /// Contract returned `(err ...)`
    #[error("Contract returned error: {value}")]
    ErrResponse { value: String },

    /// Read-only call did not succeed at the node
    #[error("Read-only call failed: {cause}")]
    CallFailed { cause: String },

    /// Response envelope is not valid JSON
    #[error("Invalid response JSON: {0}")]
    Json(String),

    /// Decoded reserves do not form a valid pool
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl CodecError {
    pub fn truncated(need: usize, got: usize, offset: usize, context: impl Into<String>) -> Self {
        Self::Truncated {
            need,
            got,
            offset,
            context: context.into(),
        }
    }

    pub fn too_large(context: impl Into<String>, len: usize, max: usize) -> Self {
        Self::ValueTooLarge {
            context: context.into(),
            len,
            max,
        }
    }

    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn unexpected_type(
        context: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self::UnexpectedType {
            context: context.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidHex(err.to_string())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
