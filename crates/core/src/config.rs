//! Configuration types shared across crates.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum length of a short link prefix.
pub const MAX_PREFIX_LEN: usize = 16;

/// Short link derivation settings.
///
/// Usually supplied through `SHORT_LINK_BASE_URL` and `SHORT_LINK_PREFIX`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortLinkConfig {
    /// Base URL of the short link redirector, without a trailing slash.
    pub base_url: String,
    /// Prefix prepended to resource ids, e.g. "r".
    pub prefix: String,
}

impl ShortLinkConfig {
    /// Validate short link settings.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err("short link base URL is empty (set SHORT_LINK_BASE_URL)".to_string());
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!(
                "short link base URL must be an absolute http(s) URL, got '{}'",
                self.base_url
            ));
        }
        if base_url.ends_with('/') {
            return Err(format!(
                "short link base URL must not end with '/', got '{}'",
                self.base_url
            ));
        }
        if base_url != self.base_url {
            return Err("short link base URL must not contain surrounding whitespace".to_string());
        }

        if self.prefix.is_empty() {
            return Err("short link prefix is empty (set SHORT_LINK_PREFIX)".to_string());
        }
        if self.prefix.len() > MAX_PREFIX_LEN {
            return Err(format!(
                "short link prefix '{}' is longer than {} characters",
                self.prefix, MAX_PREFIX_LEN
            ));
        }
        if let Some(c) = self
            .prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(format!(
                "short link prefix '{}' contains invalid character '{c}'",
                self.prefix
            ));
        }
        Ok(())
    }
}

/// PostgreSQL SSL mode configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    /// Disable SSL/TLS entirely.
    Disable,
    /// Prefer SSL/TLS but allow unencrypted connections (default).
    #[default]
    Prefer,
    /// Require SSL/TLS for all connections.
    Require,
}

/// Primary (authoritative, relational) store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimaryConfig {
    /// SQLite database (development and tests).
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Busy timeout in seconds while another writer holds the database.
        #[serde(default = "default_sqlite_busy_timeout_secs")]
        busy_timeout_secs: u64,
        /// Create the resources table when it is missing.
        #[serde(default)]
        create_schema: bool,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL (optional if using individual fields).
        /// Takes precedence over individual fields if both are provided.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// Prefer RELINK_PRIMARY__PASSWORD over storing it in a config file.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// SSL mode for connections.
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Statement timeout in milliseconds.
        #[serde(default = "default_statement_timeout_ms")]
        statement_timeout_ms: Option<u64>,
        /// Create the resources table when it is missing.
        #[serde(default)]
        create_schema: bool,
    },
}

fn default_sqlite_busy_timeout_secs() -> u64 {
    5
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

fn default_max_connections() -> u32 {
    // The reconciler issues one query at a time.
    2
}

fn default_statement_timeout_ms() -> Option<u64> {
    Some(300_000) // 5 minutes
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/primary.db"),
            busy_timeout_secs: default_sqlite_busy_timeout_secs(),
            create_schema: false,
        }
    }
}

impl PrimaryConfig {
    /// Validate primary store configuration invariants.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            PrimaryConfig::Sqlite { .. } => Ok(()),
            PrimaryConfig::Postgres {
                url,
                host,
                database,
                max_connections,
                ..
            } => {
                if *max_connections == 0 {
                    return Err("primary.max_connections must be at least 1".to_string());
                }
                match (url.as_ref(), host.as_ref(), database.as_ref()) {
                    (Some(_), _, _) => Ok(()),
                    (None, Some(_), Some(_)) => Ok(()),
                    (None, None, _) => Err(
                        "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                    ),
                    (None, Some(_), None) => Err(
                        "postgres config requires 'database' when using individual fields"
                            .to_string(),
                    ),
                }
            }
        }
    }

    pub fn create_schema(&self) -> bool {
        match self {
            PrimaryConfig::Sqlite { create_schema, .. }
            | PrimaryConfig::Postgres { create_schema, .. } => *create_schema,
        }
    }
}

/// Derived document store configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DerivedConfig {
    /// JSON documents on the local filesystem.
    Filesystem {
        /// Root directory holding the `links/` and `resources/` collections.
        path: PathBuf,
    },
    /// Process-local documents, lost on exit.
    Memory,
}

impl Default for DerivedConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/derived"),
        }
    }
}

/// Reconciliation run settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Report what would change without writing to either store.
    #[serde(default)]
    pub dry_run: bool,
    /// Lock file guarding against concurrent runs against the same stores.
    #[serde(default)]
    pub lock_path: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Short link derivation (required).
    pub short_link: ShortLinkConfig,
    /// Primary store.
    #[serde(default)]
    pub primary: PrimaryConfig,
    /// Derived store.
    #[serde(default)]
    pub derived: DerivedConfig,
    /// Run settings.
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses SQLite and filesystem defaults.
    pub fn for_testing() -> Self {
        Self {
            short_link: ShortLinkConfig {
                base_url: "https://s.example.com".to_string(),
                prefix: "r".to_string(),
            },
            primary: PrimaryConfig::default(),
            derived: DerivedConfig::default(),
            reconcile: ReconcileConfig::default(),
        }
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<()> {
        self.short_link.validate().map_err(Error::Config)?;
        self.primary.validate().map_err(Error::Config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_link(base_url: &str, prefix: &str) -> ShortLinkConfig {
        ShortLinkConfig {
            base_url: base_url.to_string(),
            prefix: prefix.to_string(),
        }
    }

    #[test]
    fn test_short_link_valid() {
        assert!(short_link("https://s.example.com", "r").validate().is_ok());
        assert!(short_link("http://localhost:8080/go", "res_1").validate().is_ok());
    }

    #[test]
    fn test_short_link_rejects_trailing_slash() {
        let err = short_link("https://s.example.com/", "r")
            .validate()
            .unwrap_err();
        assert!(err.contains("must not end with '/'"));
    }

    #[test]
    fn test_short_link_rejects_relative_base() {
        assert!(short_link("s.example.com", "r").validate().is_err());
        assert!(short_link("", "r").validate().is_err());
    }

    #[test]
    fn test_short_link_rejects_bad_prefix() {
        assert!(short_link("https://s.example.com", "").validate().is_err());
        assert!(short_link("https://s.example.com", "a/b").validate().is_err());
        assert!(
            short_link("https://s.example.com", "abcdefghijklmnopq")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_postgres_config_requires_target() {
        let json = r#"{"type":"postgres"}"#;
        let config: PrimaryConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());

        let json = r#"{"type":"postgres","host":"db","database":"resources"}"#;
        let config: PrimaryConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.create_schema());
    }

    #[test]
    fn test_sqlite_config_defaults() {
        let json = r#"{"type":"sqlite","path":"/tmp/p.db","create_schema":true}"#;
        let config: PrimaryConfig = serde_json::from_str(json).unwrap();
        match config {
            PrimaryConfig::Sqlite {
                busy_timeout_secs,
                create_schema,
                ..
            } => {
                assert_eq!(busy_timeout_secs, 5);
                assert!(create_schema);
            }
            _ => panic!("expected sqlite config"),
        }
    }

    #[test]
    fn test_derived_config_memory() {
        let config: DerivedConfig = serde_json::from_str(r#"{"type":"memory"}"#).unwrap();
        assert_eq!(config, DerivedConfig::Memory);
    }

    #[test]
    fn test_app_config_requires_short_link() {
        let json = r#"{"primary":{"type":"sqlite","path":"/tmp/p.db"}}"#;
        assert!(serde_json::from_str::<AppConfig>(json).is_err());
    }

    #[test]
    fn test_app_config_defaults_and_validate() {
        let json = r#"{"short_link":{"base_url":"https://s.example.com","prefix":"r"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert!(!config.reconcile.dry_run);
        assert!(config.reconcile.lock_path.is_none());
        assert!(config.validate().is_ok());

        let mut bad = AppConfig::for_testing();
        bad.short_link.base_url = "https://s.example.com/".to_string();
        assert!(matches!(bad.validate(), Err(Error::Config(_))));
    }
}
