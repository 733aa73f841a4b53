//! Short link derivation.
//!
//! A resource's short path is the configured prefix followed by its id with no
//! padding (`r12`, `r3435`). The short URL is the base URL joined with that
//! path. Link documents store only the path; the full URL lives on the
//! primary record.

use crate::config::ShortLinkConfig;
use crate::resource::ResourceId;

/// Derives canonical short paths and URLs from resource ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDeriver {
    base_url: String,
    prefix: String,
}

impl LinkDeriver {
    /// Create a deriver from an already validated base URL and prefix.
    pub fn new(base_url: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &ShortLinkConfig) -> Self {
        Self::new(config.base_url.clone(), config.prefix.clone())
    }

    /// Short path for a resource id, e.g. `r42`.
    pub fn short_path(&self, id: ResourceId) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Full short URL for a short path, e.g. `https://s.example.com/r42`.
    pub fn short_url_for(&self, short_path: &str) -> String {
        format!("{}/{}", self.base_url, short_path)
    }

    /// Full short URL for a resource id.
    pub fn short_url(&self, id: ResourceId) -> String {
        self.short_url_for(&self.short_path(id))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
