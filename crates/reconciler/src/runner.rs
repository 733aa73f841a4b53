//! Task orchestration.

use crate::active_flag::{ActiveFlagStats, reconcile_active_flags};
use crate::context::ReconcileContext;
use crate::corrector::correct_short_url;
use crate::diff_sync::{SyncOutcome, sync_link};
use crate::error::ReconcileResult;
use crate::gateway::StorageGateway;
use crate::scanner::scan_candidates;
use relink_core::Task;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Counts for the per-record short link pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLinkStats {
    pub records_scanned: u64,
    pub short_urls_corrected: u64,
    pub links_created: u64,
    pub links_updated: u64,
    pub links_unchanged: u64,
}

impl ShortLinkStats {
    /// Link document writes issued (or, in a dry run, that would have been).
    pub fn links_written(&self) -> u64 {
        self.links_created + self.links_updated
    }
}

/// Counts for one `fixResources` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub short_links: ShortLinkStats,
    pub active_flags: ActiveFlagStats,
    pub dry_run: bool,
}

/// Runs reconciliation passes against one gateway.
///
/// Passes run sequentially and the first error aborts the run. Writes that
/// already landed stay committed; the next run converges the rest.
pub struct ReconciliationRunner<'a> {
    gateway: &'a dyn StorageGateway,
    ctx: &'a ReconcileContext,
}

impl<'a> ReconciliationRunner<'a> {
    pub fn new(gateway: &'a dyn StorageGateway, ctx: &'a ReconcileContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn run_task(&self, task: Task) -> ReconcileResult<ReconcileStats> {
        match task {
            Task::FixResources => self.fix_resources().await,
        }
    }

    /// Short link pass over the lookback window, then the active flag pass
    /// over every resource.
    pub async fn fix_resources(&self) -> ReconcileResult<ReconcileStats> {
        let short_links = self.reconcile_short_links().await?;
        tracing::info!(
            scanned = short_links.records_scanned,
            corrected = short_links.short_urls_corrected,
            created = short_links.links_created,
            updated = short_links.links_updated,
            unchanged = short_links.links_unchanged,
            "Short link pass complete"
        );

        let active_flags = reconcile_active_flags(self.gateway, self.ctx).await?;
        tracing::info!(
            inactive = active_flags.inactive.ids,
            active = active_flags.active.ids,
            "Active flag pass complete"
        );

        Ok(ReconcileStats {
            short_links,
            active_flags,
            dry_run: self.ctx.dry_run,
        })
    }

    /// Correct primary short URLs and sync link documents for every record
    /// in the lookback window, one record at a time.
    pub async fn reconcile_short_links(&self) -> ReconcileResult<ShortLinkStats> {
        let mut stats = ShortLinkStats::default();
        let records = scan_candidates(self.gateway, self.ctx, OffsetDateTime::now_utc()).await?;
        stats.records_scanned = records.len() as u64;

        for mut record in records {
            let now = OffsetDateTime::now_utc();
            if correct_short_url(self.gateway, self.ctx, &mut record, now)
                .await?
                .is_corrected()
            {
                stats.short_urls_corrected += 1;
            }

            match sync_link(self.gateway, self.ctx, &record, now).await? {
                SyncOutcome::Created => stats.links_created += 1,
                SyncOutcome::Updated => stats.links_updated += 1,
                SyncOutcome::Unchanged => stats.links_unchanged += 1,
            }
        }

        Ok(stats)
    }
}
