//! Container-scoped blob storage abstraction
//!
//! The tier changer and the copier only talk to storage through this
//! trait, so both can run against Azure or an in-memory store.

use async_trait::async_trait;

use crate::blob::models::{AccessTier, BlobProperties};
use crate::error::Result;

/// Operations on the blobs of a single container
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Name of the container this store is bound to
    fn container_name(&self) -> String;

    /// List every blob name starting with `prefix`, across all pages
    async fn list_blob_names(&self, prefix: Option<String>) -> Result<Vec<String>>;

    /// Fetch blob properties.
    ///
    /// Returns `BlobctlError::BlobNotFound` when the blob does not exist.
    async fn get_properties(&self, name: &str) -> Result<BlobProperties>;

    /// Set the access tier of a block blob
    async fn set_access_tier(&self, name: &str, tier: AccessTier) -> Result<()>;

    /// Download the full content of a blob into memory
    async fn download(&self, name: &str) -> Result<Vec<u8>>;

    /// Upload content as a block blob, overwriting any existing blob
    async fn upload(&self, name: &str, content: Vec<u8>, content_type: &str) -> Result<()>;
}
