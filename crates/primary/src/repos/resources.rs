//! Resource repository.

use crate::error::PrimaryResult;
use crate::models::ResourceRow;
use async_trait::async_trait;
use relink_core::ResourceId;
use time::OffsetDateTime;

/// Repository for resource records.
///
/// Only records whose `resource_url` starts with `http` take part in
/// reconciliation; relative URLs are left alone.
#[async_trait]
pub trait ResourceRepo: Send + Sync {
    /// Active, primary records with an absolute URL updated at or after
    /// `updated_since`, ordered by id.
    async fn scan_candidates(&self, updated_since: OffsetDateTime)
    -> PrimaryResult<Vec<ResourceRow>>;

    /// Set `short_url` and `updated_at` of one record in a single statement.
    /// Returns the number of rows changed (0 if the id no longer exists).
    async fn set_short_url(
        &self,
        id: ResourceId,
        short_url: &str,
        updated_at: OffsetDateTime,
    ) -> PrimaryResult<u64>;

    /// All ids with an absolute URL and the given active flag, ordered.
    async fn resource_ids(&self, active: bool) -> PrimaryResult<Vec<ResourceId>>;

    /// Get a record by id.
    async fn get_resource(&self, id: ResourceId) -> PrimaryResult<Option<ResourceRow>>;
}
