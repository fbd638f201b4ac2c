//! Error types for deepstate operations.

use crate::Value;
use thiserror::Error;

/// Result type alias for deepstate operations.
pub type DeepStateResult<T> = Result<T, DeepStateError>;

/// Errors that can occur during deepstate operations.
///
/// Type mismatches between the current tree and an update are never errors:
/// they are resolved by the merge-or-replace policy. Only inputs that cannot
/// address a location at all are rejected.
#[derive(Debug, Error)]
pub enum DeepStateError {
    /// A path segment is not representable as a plain string key.
    #[error("invalid key at segment {index}: {found}")]
    InvalidKey {
        /// Position of the offending segment.
        index: usize,
        /// Description of what was found instead of a key.
        found: String,
    },

    /// Malformed dot-path syntax.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The path as supplied by the caller.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// An update descriptor could not be decoded.
    #[error("invalid update: {message}")]
    InvalidUpdate {
        /// Description of what went wrong.
        message: String,
    },

    /// The value cell's lock was poisoned by a panicking writer.
    #[error("state cell mutex poisoned")]
    CellPoisoned,

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeepStateError {
    /// Create an invalid key error.
    #[inline]
    pub fn invalid_key(index: usize, found: impl Into<String>) -> Self {
        DeepStateError::InvalidKey {
            index,
            found: found.into(),
        }
    }

    /// Create an invalid path error.
    #[inline]
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        DeepStateError::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    /// Create an invalid update error.
    #[inline]
    pub fn invalid_update(message: impl Into<String>) -> Self {
        DeepStateError::InvalidUpdate {
            message: message.into(),
        }
    }

    /// Returns true if this error was caused by the path argument.
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            DeepStateError::InvalidKey { .. } | DeepStateError::InvalidPath { .. }
        )
    }
}

/// Get the type name of a state value.
#[inline]
pub fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Undefined => "undefined",
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Record(_) => "record",
    }
}

/// Get the type name of a JSON value.
#[inline]
pub(crate) fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
