//! Common test utilities for derived store backends.

use relink_derived::{DocumentStore, FilesystemBackend, MemoryBackend};
use std::sync::Arc;
use tempfile::TempDir;

/// A filesystem store wrapper that cleans up on drop.
#[allow(dead_code)]
pub struct TestFilesystem {
    pub backend: Arc<dyn DocumentStore>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestFilesystem {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let backend = FilesystemBackend::new(temp_dir.path())
            .await
            .expect("Failed to create filesystem backend");
        Self {
            backend: Arc::new(backend),
            _temp_dir: temp_dir,
        }
    }
}

/// Run a test against every backend.
#[allow(dead_code)]
pub async fn run_backend_test_all<F, Fut>(test_fn: F)
where
    F: Fn(Arc<dyn DocumentStore>) -> Fut + Clone,
    Fut: std::future::Future<Output = ()>,
{
    test_fn.clone()(Arc::new(MemoryBackend::new())).await;

    let fs = TestFilesystem::new().await;
    test_fn(fs.backend.clone()).await;
}
