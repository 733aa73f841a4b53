//! Resource records and their derived documents.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable integer identity of a resource in the primary store.
pub type ResourceId = i64;

/// A resource record as held by the authoritative primary store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryResourceRecord {
    pub id: ResourceId,
    pub title: String,
    pub resource_url: String,
    /// Denormalized full short URL. NULL in the store reads as `None`.
    pub short_url: Option<String>,
    pub active: bool,
    /// False for aliases/duplicates of another record.
    pub primary: bool,
    pub updated_at: OffsetDateTime,
}

impl PrimaryResourceRecord {
    /// Whether the stored short URL is exactly `expected`.
    pub fn has_short_url(&self, expected: &str) -> bool {
        self.short_url.as_deref() == Some(expected)
    }
}

/// Materialized link document, keyed by short path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedLinkDocument {
    pub short_path: String,
    #[serde(default)]
    pub long_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl DerivedLinkDocument {
    /// An unmaterialized document carrying only its key.
    pub fn empty(short_path: impl Into<String>) -> Self {
        Self {
            short_path: short_path.into(),
            long_url: String::new(),
            title: String::new(),
            active: false,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Minimal resource projection, keyed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedResourceDocument {
    pub id: ResourceId,
    pub active: bool,
}

/// The link document fields the per-record pass is allowed to write.
///
/// `active` of an existing document belongs to the active-flag pass, so it is
/// only written when the upsert creates the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDocumentPatch {
    pub short_path: String,
    pub long_url: String,
    pub title: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub active_on_insert: bool,
}

impl LinkDocumentPatch {
    /// Merge this patch into the stored document, or materialize a new one.
    ///
    /// An existing `created_at` is never replaced.
    pub fn apply_to(&self, existing: Option<DerivedLinkDocument>) -> DerivedLinkDocument {
        match existing {
            Some(doc) => DerivedLinkDocument {
                short_path: self.short_path.clone(),
                long_url: self.long_url.clone(),
                title: self.title.clone(),
                active: doc.active,
                created_at: doc.created_at.or(Some(self.created_at)),
                updated_at: Some(self.updated_at),
            },
            None => DerivedLinkDocument {
                short_path: self.short_path.clone(),
                long_url: self.long_url.clone(),
                title: self.title.clone(),
                active: self.active_on_insert,
                created_at: Some(self.created_at),
                updated_at: Some(self.updated_at),
            },
        }
    }
}

/// Result of a keyed read against the derived store.
///
/// Absence is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}
