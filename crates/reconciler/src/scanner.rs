//! Change scan over the primary store.

use crate::context::ReconcileContext;
use crate::error::ReconcileResult;
use crate::gateway::StorageGateway;
use relink_core::PrimaryResourceRecord;
use time::OffsetDateTime;

/// Records changed within the lookback window ending at `now`.
///
/// Any store error aborts the scan; there is no per-row retry.
pub async fn scan_candidates(
    gateway: &dyn StorageGateway,
    ctx: &ReconcileContext,
    now: OffsetDateTime,
) -> ReconcileResult<Vec<PrimaryResourceRecord>> {
    let cutoff = ctx.lookback.cutoff(now);
    let records = gateway.scan_candidates(cutoff).await?;

    tracing::info!(
        lookback_days = ctx.lookback.days(),
        cutoff = %cutoff,
        candidates = records.len(),
        "Scanned primary store for changed resources"
    );

    Ok(records)
}
