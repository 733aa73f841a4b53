//! Primary store trait and the SQLite implementation.

use crate::error::PrimaryResult;
use crate::repos::ResourceRepo;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined primary store trait.
#[async_trait]
pub trait PrimaryStore: ResourceRepo + Send + Sync {
    /// Create the resources table if it does not exist.
    ///
    /// The primary store is owned by the administrative system; this is only
    /// run when explicitly configured.
    async fn migrate(&self) -> PrimaryResult<()>;

    /// Check database connectivity.
    async fn health_check(&self) -> PrimaryResult<()>;
}

/// SQLite-based primary store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open an existing SQLite database.
    ///
    /// The database belongs to the administrative system, so a missing file
    /// is reported as unreachable instead of being created.
    pub async fn open(path: impl AsRef<Path>, busy_timeout_secs: u64) -> PrimaryResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("primary database not found: {}", path.display()),
            )
            .into());
        }
        Self::connect(path, "rw", busy_timeout_secs).await
    }

    /// Open a SQLite database, creating the file and its parent directories
    /// when absent.
    pub async fn create(path: impl AsRef<Path>, busy_timeout_secs: u64) -> PrimaryResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        Self::connect(path, "rwc", busy_timeout_secs).await
    }

    async fn connect(path: &Path, mode: &str, busy_timeout_secs: u64) -> PrimaryResult<Self> {
        let url = format!("sqlite:{}?mode={mode}", path.display());
        let opts = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(mode == "rwc")
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        tracing::debug!(path = %path.display(), "Opened SQLite primary store");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl PrimaryStore for SqliteStore {
    async fn migrate(&self) -> PrimaryResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> PrimaryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

mod sqlite_impl {
    use super::*;
    use crate::models::ResourceRow;
    use relink_core::ResourceId;
    use time::OffsetDateTime;

    #[async_trait]
    impl ResourceRepo for SqliteStore {
        async fn scan_candidates(
            &self,
            updated_since: OffsetDateTime,
        ) -> PrimaryResult<Vec<ResourceRow>> {
            // julianday() compares instants regardless of how the timestamp
            // text was formatted by the writer.
            let rows = sqlx::query_as::<_, ResourceRow>(
                "SELECT id, title, resource_url, short_url, active, is_primary, updated_at
                 FROM resources
                 WHERE active = 1 AND is_primary = 1 AND resource_url LIKE 'http%'
                   AND julianday(updated_at) >= julianday(?)
                 ORDER BY id",
            )
            .bind(updated_since)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn set_short_url(
            &self,
            id: ResourceId,
            short_url: &str,
            updated_at: OffsetDateTime,
        ) -> PrimaryResult<u64> {
            let result =
                sqlx::query("UPDATE resources SET short_url = ?, updated_at = ? WHERE id = ?")
                    .bind(short_url)
                    .bind(updated_at)
                    .bind(id)
                    .execute(&self.pool)
                    .await?;
            Ok(result.rows_affected())
        }

        async fn resource_ids(&self, active: bool) -> PrimaryResult<Vec<ResourceId>> {
            let ids = sqlx::query_scalar::<_, ResourceId>(
                "SELECT id FROM resources WHERE resource_url LIKE 'http%' AND active = ? ORDER BY id",
            )
            .bind(active)
            .fetch_all(&self.pool)
            .await?;
            Ok(ids)
        }

        async fn get_resource(&self, id: ResourceId) -> PrimaryResult<Option<ResourceRow>> {
            let row = sqlx::query_as::<_, ResourceRow>(
                "SELECT id, title, resource_url, short_url, active, is_primary, updated_at
                 FROM resources WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    resource_url TEXT NOT NULL,
    short_url TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    is_primary INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_resources_updated_at ON resources(updated_at);
CREATE INDEX IF NOT EXISTS idx_resources_active ON resources(active);
"#;
