//! Full-table active flag reconciliation.
//!
//! Unlike the per-record pass this ignores the lookback window: every http
//! resource id in the primary store is read, split by its active flag, and
//! pushed onto both derived collections. The primary store always wins.

use crate::context::ReconcileContext;
use crate::error::ReconcileResult;
use crate::gateway::StorageGateway;
use relink_core::ResourceId;
use serde::{Deserialize, Serialize};

/// Counts for one partition of the id space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    pub ids: u64,
    pub resources_touched: u64,
    pub links_touched: u64,
}

/// Counts for a whole active flag pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFlagStats {
    pub inactive: PartitionStats,
    pub active: PartitionStats,
}

/// Push the primary store's active flags onto resource and link documents.
///
/// The inactive partition is applied first, then the active one.
pub async fn reconcile_active_flags(
    gateway: &dyn StorageGateway,
    ctx: &ReconcileContext,
) -> ReconcileResult<ActiveFlagStats> {
    let inactive_ids = gateway.resource_ids(false).await?;
    tracing::info!(count = inactive_ids.len(), "Found inactive resources");
    let inactive = apply_partition(gateway, ctx, &inactive_ids, false).await?;

    let active_ids = gateway.resource_ids(true).await?;
    tracing::info!(count = active_ids.len(), "Found active resources");
    let active = apply_partition(gateway, ctx, &active_ids, true).await?;

    Ok(ActiveFlagStats { inactive, active })
}

/// Set `active` on the resource and link documents of every id in `ids`.
///
/// An empty id set issues no store call.
pub async fn apply_partition(
    gateway: &dyn StorageGateway,
    ctx: &ReconcileContext,
    ids: &[ResourceId],
    active: bool,
) -> ReconcileResult<PartitionStats> {
    let mut stats = PartitionStats {
        ids: ids.len() as u64,
        ..Default::default()
    };

    if ids.is_empty() {
        tracing::debug!(active, "Partition is empty, nothing to update");
        return Ok(stats);
    }

    if ctx.dry_run {
        tracing::info!(
            active,
            count = ids.len(),
            "Dry run: would set active flag on resource and link documents"
        );
        return Ok(stats);
    }

    stats.resources_touched = gateway.set_resources_active(ids, active).await?;
    tracing::info!(
        active,
        touched = stats.resources_touched,
        "Updated resource documents"
    );

    let short_paths: Vec<String> = ids.iter().map(|id| ctx.deriver.short_path(*id)).collect();
    stats.links_touched = gateway.set_links_active(&short_paths, active).await?;
    tracing::info!(
        active,
        touched = stats.links_touched,
        "Updated link documents"
    );

    Ok(stats)
}
