//! Reconciliation error types.

use relink_derived::DerivedError;
use relink_primary::PrimaryError;
use std::fmt;
use thiserror::Error;

/// Which side of the reconciliation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Primary,
    Derived,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Derived => f.write_str("derived"),
        }
    }
}

/// Errors that abort a reconciliation run.
///
/// There is no local recovery: every variant is fatal for the run, and a
/// failed run is simply re-invoked later.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Invalid configuration, flags or task names. Raised before store I/O.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{store} store unreachable")]
    Connectivity {
        store: StoreKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{store} store query failed")]
    Query {
        store: StoreKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ReconcileError {
    pub fn store(&self) -> Option<StoreKind> {
        match self {
            Self::Config(_) => None,
            Self::Connectivity { store, .. } | Self::Query { store, .. } => Some(*store),
        }
    }
}

impl From<PrimaryError> for ReconcileError {
    fn from(err: PrimaryError) -> Self {
        match err {
            PrimaryError::Config(msg) => Self::Config(msg),
            err if err.is_connectivity() => Self::Connectivity {
                store: StoreKind::Primary,
                source: Box::new(err),
            },
            err => Self::Query {
                store: StoreKind::Primary,
                source: Box::new(err),
            },
        }
    }
}

impl From<DerivedError> for ReconcileError {
    fn from(err: DerivedError) -> Self {
        match err {
            DerivedError::Config(msg) => Self::Config(msg),
            err if err.is_connectivity() => Self::Connectivity {
                store: StoreKind::Derived,
                source: Box::new(err),
            },
            err => Self::Query {
                store: StoreKind::Derived,
                source: Box::new(err),
            },
        }
    }
}

impl From<relink_core::Error> for ReconcileError {
    fn from(err: relink_core::Error) -> Self {
        match err {
            relink_core::Error::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;
