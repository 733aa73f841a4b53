//! PostgreSQL-based primary store implementation.

use crate::error::PrimaryResult;
use crate::models::ResourceRow;
use crate::repos::ResourceRepo;
use crate::store::PrimaryStore;
use async_trait::async_trait;
use relink_core::ResourceId;
use relink_core::config::PgSslMode;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use time::OffsetDateTime;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based primary store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> PrimaryResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> PrimaryResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL primary store"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> PrimaryResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::debug!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl PrimaryStore for PostgresStore {
    async fn migrate(&self) -> PrimaryResult<()> {
        // Prepared statements cannot hold more than one command.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> PrimaryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceRepo for PostgresStore {
    async fn scan_candidates(
        &self,
        updated_since: OffsetDateTime,
    ) -> PrimaryResult<Vec<ResourceRow>> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            "SELECT id, title, resource_url, short_url, active, is_primary, updated_at
             FROM resources
             WHERE active AND is_primary AND resource_url LIKE 'http%'
               AND updated_at >= $1
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
        let result = sqlx::query("UPDATE resources SET short_url = $1, updated_at = $2 WHERE id = $3")
            .bind(short_url)
            .bind(updated_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn resource_ids(&self, active: bool) -> PrimaryResult<Vec<ResourceId>> {
        let ids = sqlx::query_scalar::<_, ResourceId>(
            "SELECT id FROM resources WHERE resource_url LIKE 'http%' AND active = $1 ORDER BY id",
        )
        .bind(active)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn get_resource(&self, id: ResourceId) -> PrimaryResult<Option<ResourceRow>> {
        let row = sqlx::query_as::<_, ResourceRow>(
            "SELECT id, title, resource_url, short_url, active, is_primary, updated_at
             FROM resources WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
