//! Single-instance run lock.

use crate::error::{ReconcileError, ReconcileResult};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Lock file held for the duration of a run. Removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Create the lock file, failing if another run already holds it.
    ///
    /// A lock left behind by a crashed run must be removed by hand.
    pub fn acquire(path: impl AsRef<Path>) -> ReconcileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = std::fs::read_to_string(&path).unwrap_or_default();
                let holder = match holder.trim() {
                    "" => "an unknown process",
                    holder => holder,
                };
                return Err(ReconcileError::Config(format!(
                    "run lock {} is held by {holder}; remove it if that run is gone",
                    path.display(),
                )));
            }
            Err(e) => {
                return Err(ReconcileError::Config(format!(
                    "cannot create run lock {}: {e}",
                    path.display()
                )));
            }
        };

        writeln!(
            file,
            "pid {} since {}",
            std::process::id(),
            OffsetDateTime::now_utc()
        )
        .map_err(|e| {
            ReconcileError::Config(format!("cannot write run lock {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), "Acquired run lock");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove run lock");
        }
    }
}
