//! Per-record link document sync.
//!
//! The decision is made by [`plan_link_sync`], which is pure: the stored
//! document (or its absence) and the authoritative record go in, and an
//! optional patch comes out. [`sync_link`] does the I/O around it.

use crate::context::ReconcileContext;
use crate::error::ReconcileResult;
use crate::gateway::StorageGateway;
use relink_core::{DerivedLinkDocument, LinkDocumentPatch, Lookup, PrimaryResourceRecord};
use std::fmt;
use time::OffsetDateTime;

/// Why a link document needs a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    CreatedAtUnset,
    UpdatedAtUnset,
    TitleChanged,
    LongUrlChanged,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreatedAtUnset => "created_at unset",
            Self::UpdatedAtUnset => "updated_at unset",
            Self::TitleChanged => "title changed",
            Self::LongUrlChanged => "long URL changed",
        })
    }
}

/// A write the syncer has decided to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSyncPlan {
    pub patch: LinkDocumentPatch,
    /// Checks that tripped, in evaluation order.
    pub drift: Vec<Drift>,
}

/// Result of syncing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Created,
    Updated,
}

/// Decide whether the link document for `record` needs a write.
///
/// A missing document is treated as an empty one carrying only its key.
/// Returns `None` when the stored document already matches.
pub fn plan_link_sync(
    record: &PrimaryResourceRecord,
    short_path: &str,
    existing: Lookup<DerivedLinkDocument>,
    now: OffsetDateTime,
) -> Option<LinkSyncPlan> {
    let doc = existing
        .found()
        .unwrap_or_else(|| DerivedLinkDocument::empty(short_path));
    let mut drift = Vec::new();

    let created_at = doc.created_at.unwrap_or_else(|| {
        drift.push(Drift::CreatedAtUnset);
        now
    });
    let mut updated_at = doc.updated_at.unwrap_or_else(|| {
        drift.push(Drift::UpdatedAtUnset);
        now
    });
    if doc.title != record.title {
        drift.push(Drift::TitleChanged);
        updated_at = now;
    }
    if doc.long_url != record.resource_url {
        drift.push(Drift::LongUrlChanged);
        updated_at = now;
    }

    if drift.is_empty() {
        return None;
    }

    Some(LinkSyncPlan {
        patch: LinkDocumentPatch {
            short_path: short_path.to_string(),
            long_url: record.resource_url.clone(),
            title: record.title.clone(),
            created_at,
            updated_at,
            active_on_insert: record.active,
        },
        drift,
    })
}

/// Bring the link document for `record` in line with it.
///
/// Issues at most one upsert, and none when nothing differs.
pub async fn sync_link(
    gateway: &dyn StorageGateway,
    ctx: &ReconcileContext,
    record: &PrimaryResourceRecord,
    now: OffsetDateTime,
) -> ReconcileResult<SyncOutcome> {
    let short_path = ctx.deriver.short_path(record.id);
    let existing = gateway.find_link(&short_path).await?;
    let creating = !existing.is_found();
    if creating {
        tracing::info!(
            id = record.id,
            short_path = %short_path,
            "No link document found, creating it"
        );
    }

    let Some(plan) = plan_link_sync(record, &short_path, existing, now) else {
        tracing::debug!(id = record.id, short_path = %short_path, "Link document in sync");
        return Ok(SyncOutcome::Unchanged);
    };

    let drift = plan
        .drift
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if ctx.dry_run {
        tracing::info!(
            id = record.id,
            short_path = %short_path,
            drift = %drift,
            "Dry run: would upsert link document"
        );
    } else {
        tracing::debug!(
            id = record.id,
            short_path = %short_path,
            drift = %drift,
            "Upserting link document"
        );
        gateway.upsert_link(&plan.patch).await?;
    }

    Ok(if creating {
        SyncOutcome::Created
    } else {
        SyncOutcome::Updated
    })
}
