//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid task: '{0}'")]
    InvalidTask(String),

    #[error("invalid lookback: {0} (must be a positive number of days)")]
    InvalidLookback(i64),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
