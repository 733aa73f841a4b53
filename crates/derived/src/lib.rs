//! Derived document store for relink.
//!
//! This crate provides:
//! - The links collection keyed by short path
//! - The resources collection keyed by resource id
//! - Backends: local filesystem (JSON documents) and in-memory

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{filesystem::FilesystemBackend, memory::MemoryBackend};
pub use error::{DerivedError, DerivedResult};
pub use traits::{DocumentStore, LinkCollection, ResourceCollection};

use relink_core::config::DerivedConfig;
use std::sync::Arc;

/// Create a document store from configuration.
pub async fn from_config(config: &DerivedConfig) -> DerivedResult<Arc<dyn DocumentStore>> {
    match config {
        DerivedConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
        DerivedConfig::Memory => {
            tracing::warn!("Using in-memory derived store; documents are discarded on exit");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}
