//! The storage operations reconciliation is allowed to perform.

use crate::error::ReconcileResult;
use async_trait::async_trait;
use relink_core::{
    DerivedLinkDocument, LinkDocumentPatch, Lookup, PrimaryResourceRecord, ResourceId,
};
use relink_derived::DocumentStore;
use relink_primary::PrimaryStore;
use std::sync::Arc;
use time::OffsetDateTime;

/// Both stores, seen through the narrow interface the passes need.
///
/// Every method returns a store-classified error; a derived miss is
/// [`Lookup::NotFound`], never an error.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Active, primary, http records updated at or after `updated_since`.
    async fn scan_candidates(
        &self,
        updated_since: OffsetDateTime,
    ) -> ReconcileResult<Vec<PrimaryResourceRecord>>;

    /// Write the short URL and `updated_at` of one primary record.
    /// Returns the number of rows changed.
    async fn set_short_url(
        &self,
        id: ResourceId,
        short_url: &str,
        updated_at: OffsetDateTime,
    ) -> ReconcileResult<u64>;

    /// Every http resource id with the given active flag.
    async fn resource_ids(&self, active: bool) -> ReconcileResult<Vec<ResourceId>>;

    async fn find_link(&self, short_path: &str) -> ReconcileResult<Lookup<DerivedLinkDocument>>;

    async fn upsert_link(&self, patch: &LinkDocumentPatch)
    -> ReconcileResult<DerivedLinkDocument>;

    /// Set `active` on every resource document in `ids`. Returns matched count.
    async fn set_resources_active(&self, ids: &[ResourceId], active: bool)
    -> ReconcileResult<u64>;

    /// Set `active` on every link document in `short_paths`. Returns matched count.
    async fn set_links_active(&self, short_paths: &[String], active: bool)
    -> ReconcileResult<u64>;
}

/// Gateway over a configured primary store and derived document store.
#[derive(Clone)]
pub struct StoreGateway {
    primary: Arc<dyn PrimaryStore>,
    derived: Arc<dyn DocumentStore>,
}

impl StoreGateway {
    pub fn new(primary: Arc<dyn PrimaryStore>, derived: Arc<dyn DocumentStore>) -> Self {
        Self { primary, derived }
    }

    /// Verify both stores are reachable before any pass starts.
    pub async fn health_check(&self) -> ReconcileResult<()> {
        self.primary.health_check().await?;
        self.derived.health_check().await?;
        Ok(())
    }
}

#[async_trait]
impl StorageGateway for StoreGateway {
    async fn scan_candidates(
        &self,
        updated_since: OffsetDateTime,
    ) -> ReconcileResult<Vec<PrimaryResourceRecord>> {
        let rows = self.primary.scan_candidates(updated_since).await?;
        Ok(rows.into_iter().map(PrimaryResourceRecord::from).collect())
    }

    async fn set_short_url(
        &self,
        id: ResourceId,
        short_url: &str,
        updated_at: OffsetDateTime,
    ) -> ReconcileResult<u64> {
        Ok(self.primary.set_short_url(id, short_url, updated_at).await?)
    }

    async fn resource_ids(&self, active: bool) -> ReconcileResult<Vec<ResourceId>> {
        Ok(self.primary.resource_ids(active).await?)
    }

    async fn find_link(&self, short_path: &str) -> ReconcileResult<Lookup<DerivedLinkDocument>> {
        Ok(self.derived.find_link(short_path).await?)
    }

    async fn upsert_link(
        &self,
        patch: &LinkDocumentPatch,
    ) -> ReconcileResult<DerivedLinkDocument> {
        Ok(self.derived.upsert_link(patch).await?)
    }

    async fn set_resources_active(
        &self,
        ids: &[ResourceId],
        active: bool,
    ) -> ReconcileResult<u64> {
        Ok(self.derived.set_resources_active(ids, active).await?)
    }

    async fn set_links_active(
        &self,
        short_paths: &[String],
        active: bool,
    ) -> ReconcileResult<u64> {
        Ok(self.derived.set_links_active(short_paths, active).await?)
    }
}
