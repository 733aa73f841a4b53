//! Immutable per-run settings.

use relink_core::config::AppConfig;
use relink_core::{LinkDeriver, LookbackDays};

/// Everything a pass needs to know about the run, built once at startup.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    pub deriver: LinkDeriver,
    pub lookback: LookbackDays,
    /// Read and decide, but write nothing.
    pub dry_run: bool,
}

impl ReconcileContext {
    pub fn new(deriver: LinkDeriver, lookback: LookbackDays) -> Self {
        Self {
            deriver,
            lookback,
            dry_run: false,
        }
    }

    /// Build from validated configuration. `dry_run` is on when either the
    /// configuration or the caller asks for it.
    pub fn from_config(config: &AppConfig, lookback: LookbackDays, dry_run: bool) -> Self {
        Self {
            deriver: LinkDeriver::from_config(&config.short_link),
            lookback,
            dry_run: dry_run || config.reconcile.dry_run,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
