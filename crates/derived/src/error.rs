//! Derived store error types.

use thiserror::Error;

/// Derived store operation errors.
#[derive(Debug, Error)]
pub enum DerivedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("corrupt document {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DerivedError {
    /// Whether the store itself could not be reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Result type for derived store operations.
pub type DerivedResult<T> = std::result::Result<T, DerivedError>;
