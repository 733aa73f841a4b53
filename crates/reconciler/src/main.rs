//! relink binary.

use anyhow::{Context, Result};
use clap::Parser;
use relink_core::{LookbackDays, parse_tasks};
use relink_reconciler::config::load_config;
use relink_reconciler::{
    ReconcileContext, ReconcileError, ReconciliationRunner, RunLock, StoreGateway,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// relink - keep short links in the derived store consistent with the primary store
#[derive(Parser, Debug)]
#[command(name = "relink")]
#[command(version, about, long_about = None)]
struct Args {
    /// Look back this many days for changed resources (default: 1)
    #[arg(short = 'b', long = "backdays", allow_negative_numbers = true)]
    backdays: Option<i64>,

    /// Comma-separated tasks to run (available: fixResources)
    #[arg(short = 't', long = "tasks", default_value = "")]
    tasks: String,

    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "RELINK_CONFIG",
        default_value = "config/relink.toml"
    )]
    config: PathBuf,

    /// Report what would change without writing to either store
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => return Err(e.into()),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("relink v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    let lookback = match args.backdays {
        Some(days) => {
            let lookback = LookbackDays::new(days)?;
            tracing::info!(
                "Checking resources updated in the last {} days",
                lookback.days()
            );
            lookback
        }
        None => {
            tracing::warn!("Number of days to look back not specified with -b, defaulting to 1");
            LookbackDays::DEFAULT
        }
    };

    let tasks = parse_tasks(&args.tasks)?;
    if tasks.is_empty() {
        tracing::info!("No tasks specified, nothing to do");
        return Ok(());
    }

    let _lock = match &config.reconcile.lock_path {
        Some(path) => {
            let lock = RunLock::acquire(path)?;
            tracing::info!(path = %lock.path().display(), "Holding run lock");
            Some(lock)
        }
        None => {
            tracing::warn!(
                "No reconcile.lock_path configured; make sure only one relink runs at a time"
            );
            None
        }
    };

    let primary = relink_primary::from_config(&config.primary)
        .await
        .map_err(ReconcileError::from)
        .context("failed to initialize primary store")?;
    let derived = relink_derived::from_config(&config.derived)
        .await
        .map_err(ReconcileError::from)
        .context("failed to initialize derived store")?;
    let gateway = StoreGateway::new(primary, derived);
    gateway
        .health_check()
        .await
        .context("store health check failed")?;

    let ctx = ReconcileContext::from_config(&config, lookback, args.dry_run);
    tracing::info!(
        base_url = ctx.deriver.base_url(),
        prefix = ctx.deriver.prefix(),
        "Deriving short links"
    );
    if ctx.dry_run {
        tracing::info!("Dry run: no store will be written");
    }
    let runner = ReconciliationRunner::new(&gateway, &ctx);

    for task in tasks {
        tracing::info!(task = %task, "Running task");
        let stats = runner
            .run_task(task)
            .await
            .with_context(|| format!("task {task} failed"))?;
        tracing::info!(
            task = %task,
            stats = %serde_json::to_string(&stats)?,
            "Task complete"
        );
    }

    tracing::info!("Done");
    Ok(())
}
