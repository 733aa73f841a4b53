//! Derived store trait definitions.

use crate::error::DerivedResult;
use async_trait::async_trait;
use relink_core::{
    DerivedLinkDocument, DerivedResourceDocument, LinkDocumentPatch, Lookup, ResourceId,
};

/// Link documents, keyed by short path.
#[async_trait]
pub trait LinkCollection: Send + Sync {
    /// Fetch a link document. Absence is `Lookup::NotFound`, not an error.
    async fn find_link(&self, short_path: &str) -> DerivedResult<Lookup<DerivedLinkDocument>>;

    /// Insert or update the document keyed by `patch.short_path` and return
    /// what is stored afterwards. Applying the same patch twice leaves the
    /// same stored state.
    async fn upsert_link(&self, patch: &LinkDocumentPatch) -> DerivedResult<DerivedLinkDocument>;

    /// Set `active` on every existing document whose key is listed.
    /// Returns the number of documents matched, changed or not.
    async fn set_links_active(&self, short_paths: &[String], active: bool) -> DerivedResult<u64>;
}

/// Resource documents, keyed by id.
#[async_trait]
pub trait ResourceCollection: Send + Sync {
    /// Fetch a resource document.
    async fn find_resource(&self, id: ResourceId)
    -> DerivedResult<Lookup<DerivedResourceDocument>>;

    /// Store a resource document, replacing any previous one.
    async fn put_resource(&self, doc: &DerivedResourceDocument) -> DerivedResult<()>;

    /// Set `active` on every existing document whose id is listed.
    /// Returns the number of documents matched, changed or not.
    async fn set_resources_active(&self, ids: &[ResourceId], active: bool) -> DerivedResult<u64>;
}

/// Combined derived store.
#[async_trait]
pub trait DocumentStore: LinkCollection + ResourceCollection + Send + Sync + 'static {
    /// Check that the store is reachable.
    async fn health_check(&self) -> DerivedResult<()>;
}
