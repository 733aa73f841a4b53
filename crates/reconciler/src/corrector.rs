//! Rewrites stale short URLs on primary records.

use crate::context::ReconcileContext;
use crate::error::ReconcileResult;
use crate::gateway::StorageGateway;
use relink_core::PrimaryResourceRecord;
use time::OffsetDateTime;

/// What the corrector did to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    Unchanged,
    /// The short URL was rewritten; `previous` is what was stored before.
    Corrected { previous: Option<String> },
}

impl Correction {
    pub fn is_corrected(&self) -> bool {
        matches!(self, Self::Corrected { .. })
    }
}

/// Make the record's short URL match the derived one.
///
/// The correction writes the short URL and `updated_at = now` in a single
/// row update, so a record whose derived sync later fails is picked up by the
/// next scan. `record` is updated in place to mirror what was written.
pub async fn correct_short_url(
    gateway: &dyn StorageGateway,
    ctx: &ReconcileContext,
    record: &mut PrimaryResourceRecord,
    now: OffsetDateTime,
) -> ReconcileResult<Correction> {
    let expected = ctx.deriver.short_url(record.id);
    if record.has_short_url(&expected) {
        tracing::debug!(id = record.id, "Short URL already correct");
        return Ok(Correction::Unchanged);
    }

    if ctx.dry_run {
        tracing::info!(
            id = record.id,
            current = ?record.short_url,
            expected = %expected,
            "Dry run: would correct short URL"
        );
    } else {
        tracing::info!(
            id = record.id,
            current = ?record.short_url,
            expected = %expected,
            "Correcting short URL"
        );
        let rows = gateway.set_short_url(record.id, &expected, now).await?;
        if rows == 0 {
            tracing::warn!(
                id = record.id,
                "Resource disappeared before its short URL could be corrected"
            );
        }
        record.updated_at = now;
    }

    let previous = record.short_url.replace(expected);
    Ok(Correction::Corrected { previous })
}
