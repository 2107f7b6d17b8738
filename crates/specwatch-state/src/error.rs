//! Error types for specwatch-state

use thiserror::Error;

/// Errors raised by snapshot stores and document sinks.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Nothing is stored under the key
    #[error("not found: {key}")]
    NotFound { key: String },

    /// Key component is empty or unsafe to use as a path segment
    #[error("invalid key {value:?}: {reason}")]
    InvalidKey { value: String, reason: &'static str },

    /// Filesystem or backend I/O failure
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
