//! Configuration loading.
//!
//! Layers, lowest precedence first: the optional TOML file, `RELINK_`
//! environment variables (`__` separates nesting levels), then the bare
//! `SHORT_LINK_BASE_URL` / `SHORT_LINK_PREFIX` variables.

use crate::error::{ReconcileError, ReconcileResult};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use relink_core::config::AppConfig;
use std::path::Path;

/// Environment variables carrying the short link settings.
pub const SHORT_LINK_ENV: &[&str] = &["SHORT_LINK_BASE_URL", "SHORT_LINK_PREFIX"];

/// Build the layered figment for `config_path`. The file may be absent.
pub fn figment(config_path: &Path) -> Figment {
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %config_path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::debug!("No config file found at {}", config_path.display());
    }

    figment
        .merge(Env::prefixed("RELINK_").split("__"))
        .merge(Env::raw().only(SHORT_LINK_ENV).map(|key| {
            if key == "SHORT_LINK_BASE_URL" {
                "short_link.base_url".into()
            } else {
                "short_link.prefix".into()
            }
        }))
}

/// Load and validate the application configuration.
pub fn load_config(config_path: &Path) -> ReconcileResult<AppConfig> {
    let config: AppConfig = figment(config_path).extract().map_err(|e| {
        ReconcileError::Config(format!(
            "failed to load configuration (SHORT_LINK_BASE_URL and SHORT_LINK_PREFIX are required): {e}"
        ))
    })?;
    config.validate()?;
    Ok(config)
}
