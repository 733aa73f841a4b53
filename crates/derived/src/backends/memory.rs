//! In-process document backend.

use crate::error::DerivedResult;
use crate::traits::{DocumentStore, LinkCollection, ResourceCollection};
use async_trait::async_trait;
use relink_core::{
    DerivedLinkDocument, DerivedResourceDocument, LinkDocumentPatch, Lookup, ResourceId,
};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

/// Document store kept in memory. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryBackend {
    links: RwLock<BTreeMap<String, DerivedLinkDocument>>,
    resources: RwLock<BTreeMap<ResourceId, DerivedResourceDocument>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkCollection for MemoryBackend {
    async fn find_link(&self, short_path: &str) -> DerivedResult<Lookup<DerivedLinkDocument>> {
        Ok(self.links.read().await.get(short_path).cloned().into())
    }

    async fn upsert_link(&self, patch: &LinkDocumentPatch) -> DerivedResult<DerivedLinkDocument> {
        let mut links = self.links.write().await;
        let doc = patch.apply_to(links.get(&patch.short_path).cloned());
        links.insert(patch.short_path.clone(), doc.clone());
        Ok(doc)
    }

    async fn set_links_active(&self, short_paths: &[String], active: bool) -> DerivedResult<u64> {
        let mut links = self.links.write().await;
        let mut matched = 0;
        for short_path in short_paths.iter().collect::<BTreeSet<_>>() {
            if let Some(doc) = links.get_mut(short_path.as_str()) {
                doc.active = active;
                matched += 1;
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl ResourceCollection for MemoryBackend {
    async fn find_resource(
        &self,
        id: ResourceId,
    ) -> DerivedResult<Lookup<DerivedResourceDocument>> {
        Ok(self.resources.read().await.get(&id).copied().into())
    }

    async fn put_resource(&self, doc: &DerivedResourceDocument) -> DerivedResult<()> {
        self.resources.write().await.insert(doc.id, *doc);
        Ok(())
    }

    async fn set_resources_active(&self, ids: &[ResourceId], active: bool) -> DerivedResult<u64> {
        let mut resources = self.resources.write().await;
        let mut matched = 0;
        for id in ids.iter().collect::<BTreeSet<_>>() {
            if let Some(doc) = resources.get_mut(id) {
                doc.active = active;
                matched += 1;
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn health_check(&self) -> DerivedResult<()> {
        Ok(())
    }
}
