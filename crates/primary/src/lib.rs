//! Primary (authoritative) resource store for relink.
//!
//! The primary store is a relational `resources` table owned by the
//! administrative system. This crate exposes only what reconciliation needs:
//! the change scan, the short URL correction, and the id partition by active
//! flag. SQLite and PostgreSQL are supported through sqlx.

pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{PrimaryError, PrimaryResult};
pub use postgres::PostgresStore;
pub use repos::ResourceRepo;
pub use store::{PrimaryStore, SqliteStore};

use relink_core::config::PrimaryConfig;
use std::sync::Arc;

/// Create a primary store from configuration.
pub async fn from_config(config: &PrimaryConfig) -> PrimaryResult<Arc<dyn PrimaryStore>> {
    config.validate().map_err(PrimaryError::Config)?;

    let store: Arc<dyn PrimaryStore> = match config {
        PrimaryConfig::Sqlite {
            path,
            busy_timeout_secs,
            create_schema,
        } => {
            let store = if *create_schema {
                SqliteStore::create(path, *busy_timeout_secs).await?
            } else {
                SqliteStore::open(path, *busy_timeout_secs).await?
            };
            Arc::new(store)
        }
        PrimaryConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
            ..
        } => {
            let store = if let Some(url) = url {
                tracing::info!("Connecting to PostgreSQL primary store using connection URL");
                PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(PrimaryError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Arc::new(store)
        }
    };

    if config.create_schema() {
        tracing::info!("Ensuring primary resources table exists");
        store.migrate().await?;
    }

    Ok(store)
}
