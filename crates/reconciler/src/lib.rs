//! Cross-store short link reconciliation.
//!
//! Keeps the derived document store consistent with the primary resource
//! store. A run has two passes:
//! - Per-record: scan records changed within the lookback window, correct
//!   their short URL in the primary store, then sync their link document.
//! - Active flags: copy every resource's active flag onto its resource and
//!   link documents, ignoring the window.
//!
//! All store access goes through [`StorageGateway`].

pub mod active_flag;
pub mod config;
pub mod context;
pub mod corrector;
pub mod diff_sync;
pub mod error;
pub mod gateway;
pub mod lock;
pub mod runner;
pub mod scanner;

pub use context::ReconcileContext;
pub use error::{ReconcileError, ReconcileResult, StoreKind};
pub use gateway::{StorageGateway, StoreGateway};
pub use lock::RunLock;
pub use runner::{ReconcileStats, ReconciliationRunner, ShortLinkStats};
