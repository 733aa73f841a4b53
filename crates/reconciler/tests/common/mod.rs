//! Test utilities for reconciliation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use relink_core::{
    DerivedLinkDocument, DerivedResourceDocument, LinkDeriver, LinkDocumentPatch, LookbackDays,
    Lookup, PrimaryResourceRecord, ResourceId,
};
use relink_reconciler::{ReconcileContext, ReconcileError, ReconcileResult, StorageGateway, StoreKind};
use std::collections::BTreeMap;
use std::sync::Mutex;
use time::{Duration, OffsetDateTime};

pub const BASE_URL: &str = "https://s.example.com";
pub const PREFIX: &str = "r";

pub fn context() -> ReconcileContext {
    ReconcileContext::new(LinkDeriver::new(BASE_URL, PREFIX), LookbackDays::DEFAULT)
}

/// A primary record updated an hour ago with a correct short URL.
pub fn record(id: ResourceId, title: &str) -> PrimaryResourceRecord {
    PrimaryResourceRecord {
        id,
        title: title.to_string(),
        resource_url: format!("https://resources.example.org/{id}"),
        short_url: Some(format!("{BASE_URL}/{PREFIX}{id}")),
        active: true,
        primary: true,
        updated_at: OffsetDateTime::now_utc() - Duration::hours(1),
    }
}

/// Store calls seen by [`FakeGateway`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub scan_candidates: u32,
    pub set_short_url: u32,
    pub resource_ids: u32,
    pub find_link: u32,
    pub upsert_link: u32,
    pub set_resources_active: u32,
    pub set_links_active: u32,
}

impl Calls {
    pub fn writes(&self) -> u32 {
        self.set_short_url + self.upsert_link + self.set_resources_active + self.set_links_active
    }
}

#[derive(Default)]
struct State {
    records: BTreeMap<ResourceId, PrimaryResourceRecord>,
    links: BTreeMap<String, DerivedLinkDocument>,
    resources: BTreeMap<ResourceId, DerivedResourceDocument>,
    calls: Calls,
    fail_upserts: bool,
}

/// In-memory gateway that counts every call.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_record(&self, record: PrimaryResourceRecord) {
        self.state.lock().unwrap().records.insert(record.id, record);
    }

    pub fn insert_link(&self, doc: DerivedLinkDocument) {
        self.state
            .lock()
            .unwrap()
            .links
            .insert(doc.short_path.clone(), doc);
    }

    pub fn insert_resource(&self, id: ResourceId, active: bool) {
        self.state
            .lock()
            .unwrap()
            .resources
            .insert(id, DerivedResourceDocument { id, active });
    }

    pub fn record(&self, id: ResourceId) -> Option<PrimaryResourceRecord> {
        self.state.lock().unwrap().records.get(&id).cloned()
    }

    pub fn link(&self, short_path: &str) -> Option<DerivedLinkDocument> {
        self.state.lock().unwrap().links.get(short_path).cloned()
    }

    pub fn resource(&self, id: ResourceId) -> Option<DerivedResourceDocument> {
        self.state.lock().unwrap().resources.get(&id).copied()
    }

    pub fn calls(&self) -> Calls {
        self.state.lock().unwrap().calls
    }

    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls = Calls::default();
    }

    /// Make every following upsert fail with a derived query error.
    pub fn fail_upserts(&self) {
        self.state.lock().unwrap().fail_upserts = true;
    }
}

#[async_trait]
impl StorageGateway for FakeGateway {
    async fn scan_candidates(
        &self,
        updated_since: OffsetDateTime,
    ) -> ReconcileResult<Vec<PrimaryResourceRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.scan_candidates += 1;
        Ok(state
            .records
            .values()
            .filter(|r| {
                r.active
                    && r.primary
                    && r.resource_url.starts_with("http")
                    && r.updated_at >= updated_since
            })
            .cloned()
            .collect())
    }

    async fn set_short_url(
        &self,
        id: ResourceId,
        short_url: &str,
        updated_at: OffsetDateTime,
    ) -> ReconcileResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.calls.set_short_url += 1;
        match state.records.get_mut(&id) {
            Some(record) => {
                record.short_url = Some(short_url.to_string());
                record.updated_at = updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn resource_ids(&self, active: bool) -> ReconcileResult<Vec<ResourceId>> {
        let mut state = self.state.lock().unwrap();
        state.calls.resource_ids += 1;
        Ok(state
            .records
            .values()
            .filter(|r| r.resource_url.starts_with("http") && r.active == active)
            .map(|r| r.id)
            .collect())
    }

    async fn find_link(&self, short_path: &str) -> ReconcileResult<Lookup<DerivedLinkDocument>> {
        let mut state = self.state.lock().unwrap();
        state.calls.find_link += 1;
        Ok(state.links.get(short_path).cloned().into())
    }

    async fn upsert_link(
        &self,
        patch: &LinkDocumentPatch,
    ) -> ReconcileResult<DerivedLinkDocument> {
        let mut state = self.state.lock().unwrap();
        state.calls.upsert_link += 1;
        if state.fail_upserts {
            return Err(ReconcileError::Query {
                store: StoreKind::Derived,
                source: "injected upsert failure".into(),
            });
        }
        let doc = patch.apply_to(state.links.get(&patch.short_path).cloned());
        state.links.insert(patch.short_path.clone(), doc.clone());
        Ok(doc)
    }

    async fn set_resources_active(
        &self,
        ids: &[ResourceId],
        active: bool,
    ) -> ReconcileResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.calls.set_resources_active += 1;
        let mut matched = 0;
        for id in ids {
            if let Some(doc) = state.resources.get_mut(id) {
                doc.active = active;
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn set_links_active(
        &self,
        short_paths: &[String],
        active: bool,
    ) -> ReconcileResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.calls.set_links_active += 1;
        let mut matched = 0;
        for short_path in short_paths {
            if let Some(doc) = state.links.get_mut(short_path) {
                doc.active = active;
                matched += 1;
            }
        }
        Ok(matched)
    }
}
