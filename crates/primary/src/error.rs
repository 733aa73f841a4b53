//! Primary store error types.

use thiserror::Error;

/// Primary store operation errors.
#[derive(Debug, Error)]
pub enum PrimaryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PrimaryError {
    /// Whether the failure means the store could not be reached at all, as
    /// opposed to a statement that reached it and failed.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db)) => is_sqlite_cant_open(db.code().as_deref()),
            Self::Database(err) => matches!(
                err,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
            Self::Io(_) => true,
            Self::Config(_) | Self::Internal(_) => false,
        }
    }
}

/// SQLITE_CANTOPEN, including its extended variants.
fn is_sqlite_cant_open(code: Option<&str>) -> bool {
    code.and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| code & 0xff == 14)
}

/// Result type for primary store operations.
pub type PrimaryResult<T> = std::result::Result<T, PrimaryError>;
