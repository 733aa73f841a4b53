//! Local filesystem document backend.
//!
//! Each document is one JSON file: `links/<short_path>.json` and
//! `resources/<id>.json` under the configured root.

use crate::error::{DerivedError, DerivedResult};
use crate::traits::{DocumentStore, LinkCollection, ResourceCollection};
use async_trait::async_trait;
use relink_core::{
    DerivedLinkDocument, DerivedResourceDocument, LinkDocumentPatch, Lookup, ResourceId,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

const LINKS_DIR: &str = "links";
const RESOURCES_DIR: &str = "resources";

/// Maximum key length; keeps file names well under common filesystem limits.
const MAX_KEY_LEN: usize = 128;

/// Filesystem-backed document store.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the collection directories.
    pub async fn new(root: impl AsRef<Path>) -> DerivedResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(LINKS_DIR)).await?;
        fs::create_dir_all(root.join(RESOURCES_DIR)).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject keys that could name anything but a plain file in a collection.
    fn validate_key(key: &str) -> DerivedResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(DerivedError::InvalidKey(format!(
                "key length must be 1..={MAX_KEY_LEN}: {key:?}"
            )));
        }
        if let Some(c) = key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DerivedError::InvalidKey(format!(
                "unsupported character {c:?} in key {key:?}"
            )));
        }
        Ok(())
    }

    fn link_path(&self, short_path: &str) -> DerivedResult<PathBuf> {
        Self::validate_key(short_path)?;
        Ok(self.root.join(LINKS_DIR).join(format!("{short_path}.json")))
    }

    fn resource_path(&self, id: ResourceId) -> PathBuf {
        self.root.join(RESOURCES_DIR).join(format!("{id}.json"))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> DerivedResult<Option<T>> {
        match fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| DerivedError::Corrupt {
                    key: path.display().to_string(),
                    source,
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a uniquely named temp file, fsync, then rename over the target.
    async fn write_json<T: Serialize>(path: &Path, value: &T) -> DerivedResult<()> {
        let data = serde_json::to_vec_pretty(value)?;

        let temp_name = format!(".tmp.{}", Uuid::new_v4());
        let temp_path = path.with_file_name(
            path.file_name()
                .map(|n| format!("{}{}", n.to_string_lossy(), temp_name))
                .unwrap_or_else(|| temp_name.clone()),
        );
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, path).await?;

        Ok(())
    }
}

#[async_trait]
impl LinkCollection for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn find_link(&self, short_path: &str) -> DerivedResult<Lookup<DerivedLinkDocument>> {
        let path = self.link_path(short_path)?;
        Ok(Self::read_json(&path).await?.into())
    }

    #[instrument(skip(self, patch), fields(backend = "filesystem", short_path = %patch.short_path))]
    async fn upsert_link(&self, patch: &LinkDocumentPatch) -> DerivedResult<DerivedLinkDocument> {
        let path = self.link_path(&patch.short_path)?;
        let existing: Option<DerivedLinkDocument> = Self::read_json(&path).await?;
        let doc = patch.apply_to(existing);
        Self::write_json(&path, &doc).await?;
        Ok(doc)
    }

    #[instrument(skip(self, short_paths), fields(backend = "filesystem", count = short_paths.len()))]
    async fn set_links_active(&self, short_paths: &[String], active: bool) -> DerivedResult<u64> {
        let mut matched = 0;
        let unique: BTreeSet<&str> = short_paths.iter().map(String::as_str).collect();
        for short_path in unique {
            let path = self.link_path(short_path)?;
            let Some(mut doc) = Self::read_json::<DerivedLinkDocument>(&path).await? else {
                continue;
            };
            matched += 1;
            if doc.active != active {
                doc.active = active;
                Self::write_json(&path, &doc).await?;
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl ResourceCollection for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn find_resource(
        &self,
        id: ResourceId,
    ) -> DerivedResult<Lookup<DerivedResourceDocument>> {
        Ok(Self::read_json(&self.resource_path(id)).await?.into())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn put_resource(&self, doc: &DerivedResourceDocument) -> DerivedResult<()> {
        Self::write_json(&self.resource_path(doc.id), doc).await
    }

    #[instrument(skip(self, ids), fields(backend = "filesystem", count = ids.len()))]
    async fn set_resources_active(&self, ids: &[ResourceId], active: bool) -> DerivedResult<u64> {
        let mut matched = 0;
        let unique: BTreeSet<ResourceId> = ids.iter().copied().collect();
        for id in unique {
            let path = self.resource_path(id);
            let Some(mut doc) = Self::read_json::<DerivedResourceDocument>(&path).await? else {
                continue;
            };
            matched += 1;
            if doc.active != active {
                doc.active = active;
                Self::write_json(&path, &doc).await?;
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl DocumentStore for FilesystemBackend {
    async fn health_check(&self) -> DerivedResult<()> {
        for dir in [LINKS_DIR, RESOURCES_DIR] {
            let path = self.root.join(dir);
            let metadata = fs::metadata(&path).await.map_err(|e| {
                DerivedError::Io(std::io::Error::new(
                    e.kind(),
                    format!("derived collection not accessible: {}: {e}", path.display()),
                ))
            })?;
            if !metadata.is_dir() {
                return Err(DerivedError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    format!("derived collection is not a directory: {}", path.display()),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(FilesystemBackend::validate_key("r42").is_ok());
        assert!(FilesystemBackend::validate_key("res-7_b").is_ok());
        assert!(FilesystemBackend::validate_key("").is_err());
        assert!(FilesystemBackend::validate_key("../r1").is_err());
        assert!(FilesystemBackend::validate_key("a/b").is_err());
        assert!(FilesystemBackend::validate_key(".hidden").is_err());
        assert!(FilesystemBackend::validate_key(&"x".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(temp.path()).await.unwrap();
        std::fs::write(temp.path().join(LINKS_DIR).join("r1.json"), b"{not json").unwrap();

        match backend.find_link("r1").await {
            Err(DerivedError::Corrupt { key, .. }) => assert!(key.ends_with("r1.json")),
            other => panic!("expected corrupt document error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_check_detects_missing_collection() {
        let temp = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(temp.path()).await.unwrap();
        backend.health_check().await.unwrap();

        std::fs::remove_dir_all(temp.path().join(RESOURCES_DIR)).unwrap();
        let err = backend.health_check().await.unwrap_err();
        assert!(err.is_connectivity());
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let temp = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(temp.path()).await.unwrap();
        backend
            .put_resource(&DerivedResourceDocument { id: 3, active: true })
            .await
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(temp.path().join(RESOURCES_DIR))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["3.json".to_string()]);
    }
}
