//! In-memory blob store shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use blobctl::blob::{AccessTier, BlobKind, BlobProperties, BlobStore};
use blobctl::{BlobctlError, Result};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct MemoryBlob {
    pub kind: BlobKind,
    pub tier: Option<AccessTier>,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Container held in memory. Blob names listed in `failing_tiers` reject
/// tier changes, names in `vanishing` disappear right after listing. When
/// `listing_error` is set the container cannot be listed at all.
#[derive(Default)]
pub struct MemoryBlobStore {
    pub container: String,
    pub blobs: Mutex<BTreeMap<String, MemoryBlob>>,
    pub failing_tiers: HashSet<String>,
    pub vanishing: HashSet<String>,
    pub listing_error: Option<String>,
    pub tier_calls: Mutex<Vec<(String, AccessTier)>>,
}

impl MemoryBlobStore {
    pub fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            ..Default::default()
        }
    }

    pub fn with_blob(self, name: &str, kind: BlobKind) -> Self {
        self.with_content(name, kind, name.as_bytes().to_vec())
    }

    pub fn with_content(self, name: &str, kind: BlobKind, content: Vec<u8>) -> Self {
        self.blobs.lock().unwrap().insert(
            name.to_string(),
            MemoryBlob {
                kind,
                tier: Some(AccessTier::Hot),
                content,
                content_type: "application/octet-stream".to_string(),
            },
        );
        self
    }

    pub fn failing_tier_on(mut self, name: &str) -> Self {
        self.failing_tiers.insert(name.to_string());
        self
    }

    pub fn vanishing(mut self, name: &str) -> Self {
        self.vanishing.insert(name.to_string());
        self
    }

    pub fn failing_listing(mut self, message: &str) -> Self {
        self.listing_error = Some(message.to_string());
        self
    }

    pub fn tier_calls(&self) -> Vec<(String, AccessTier)> {
        self.tier_calls.lock().unwrap().clone()
    }

    pub fn blob(&self, name: &str) -> Option<MemoryBlob> {
        self.blobs.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn container_name(&self) -> String {
        self.container.clone()
    }

    async fn list_blob_names(&self, prefix: Option<String>) -> Result<Vec<String>> {
        if let Some(message) = &self.listing_error {
            return Err(BlobctlError::azure_api(message.clone()));
        }

        let mut blobs = self.blobs.lock().unwrap();
        let names: Vec<String> = blobs
            .keys()
            .filter(|name| prefix.as_deref().map_or(true, |p| name.starts_with(p)))
            .cloned()
            .collect();
        for name in &self.vanishing {
            blobs.remove(name);
        }
        Ok(names)
    }

    async fn get_properties(&self, name: &str) -> Result<BlobProperties> {
        let blobs = self.blobs.lock().unwrap();
        let blob = blobs
            .get(name)
            .ok_or_else(|| BlobctlError::blob_not_found(name))?;
        Ok(BlobProperties {
            name: name.to_string(),
            kind: blob.kind,
            access_tier: blob.tier.map(|t| t.to_string()),
            content_length: blob.content.len() as u64,
        })
    }

    async fn set_access_tier(&self, name: &str, tier: AccessTier) -> Result<()> {
        self.tier_calls
            .lock()
            .unwrap()
            .push((name.to_string(), tier));

        if self.failing_tiers.contains(name) {
            return Err(BlobctlError::azure_api(
                "There is currently a lease on the blob and no lease ID was specified",
            ));
        }

        let mut blobs = self.blobs.lock().unwrap();
        let blob = blobs
            .get_mut(name)
            .ok_or_else(|| BlobctlError::blob_not_found(name))?;
        blob.tier = Some(tier);
        Ok(())
    }

    async fn download(&self, name: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(name)
            .map(|b| b.content.clone())
            .ok_or_else(|| BlobctlError::blob_not_found(name))
    }

    async fn upload(&self, name: &str, content: Vec<u8>, content_type: &str) -> Result<()> {
        self.blobs.lock().unwrap().insert(
            name.to_string(),
            MemoryBlob {
                kind: BlobKind::BlockBlob,
                tier: None,
                content,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
