//! Azure Blob Storage backed implementation of [`BlobStore`]
//!
//! Wraps an `azure_storage_blobs` container client built from static
//! credentials. Every call is awaited before the next one is issued.

use async_trait::async_trait;
use azure_core::error::ErrorKind;
use azure_core::StatusCode;
use azure_storage_blobs::blob::BlobType;
use azure_storage_blobs::prelude::{AccessTier as SdkAccessTier, ClientBuilder, ContainerClient};
use futures::TryStreamExt;
use tracing::debug;

use crate::auth::{ResolvedAuth, StorageAuth};
use crate::blob::models::{AccessTier, BlobKind, BlobProperties};
use crate::blob::store::BlobStore;
use crate::error::{BlobctlError, Result};

/// Whether the service answered 404 for the requested resource
fn is_not_found(error: &azure_core::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::HttpResponse {
            status: StatusCode::NotFound,
            ..
        }
    )
}

fn sdk_access_tier(tier: AccessTier) -> SdkAccessTier {
    match tier {
        AccessTier::Hot => SdkAccessTier::Hot,
        AccessTier::Cool => SdkAccessTier::Cool,
        AccessTier::Cold => SdkAccessTier::Cold,
        AccessTier::Archive => SdkAccessTier::Archive,
    }
}

/// Blob store bound to one container of one storage account
pub struct AzureBlobStore {
    account: String,
    container_name: String,
    container_client: ContainerClient,
}

impl AzureBlobStore {
    /// Create a store from any supported credential
    pub fn new(auth: &StorageAuth, container_name: impl Into<String>) -> Result<Self> {
        let container_name = container_name.into();
        if container_name.trim().is_empty() {
            return Err(BlobctlError::invalid_argument("Container name cannot be empty"));
        }

        let ResolvedAuth {
            account,
            location,
            credentials,
        } = auth.resolve()?;

        let container_client =
            ClientBuilder::with_location(location, credentials).container_client(container_name.clone());

        debug!(account = %account, container = %container_name, "created container client");

        Ok(Self {
            account,
            container_name,
            container_client,
        })
    }

    /// Shared key access, `https://<account>.blob.core.windows.net` unless
    /// `endpoint` overrides it
    pub fn from_access_key(
        account: impl Into<String>,
        key: impl Into<String>,
        endpoint: Option<String>,
        container_name: impl Into<String>,
    ) -> Result<Self> {
        let auth = StorageAuth::AccountKey {
            account: account.into(),
            key: zeroize::Zeroizing::new(key.into()),
            endpoint,
        };
        Self::new(&auth, container_name)
    }

    pub fn from_connection_string(
        connection_string: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Result<Self> {
        Self::new(&StorageAuth::connection_string(connection_string), container_name)
    }

    /// Get the storage account name
    pub fn account(&self) -> &str {
        &self.account
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn container_name(&self) -> String {
        self.container_name.clone()
    }

    async fn list_blob_names(&self, prefix: Option<String>) -> Result<Vec<String>> {
        let mut list_builder = self.container_client.list_blobs();

        if let Some(prefix) = prefix {
            list_builder = list_builder.prefix(prefix);
        }

        let mut stream = list_builder.into_stream();
        let mut names = Vec::new();

        while let Some(page) = stream
            .try_next()
            .await
            .map_err(|e| BlobctlError::azure_api(format!("Failed to list blobs: {e}")))?
        {
            for blob_item in page.blobs.blobs() {
                names.push(blob_item.name.clone());
            }
        }

        debug!(container = %self.container_name, count = names.len(), "listed blobs");
        Ok(names)
    }

    async fn get_properties(&self, name: &str) -> Result<BlobProperties> {
        let blob_client = self.container_client.blob_client(name);

        let response = blob_client.get_properties().await.map_err(|e| {
            if is_not_found(&e) {
                BlobctlError::blob_not_found(name)
            } else {
                BlobctlError::azure_api(format!("Failed to get blob properties: {e}"))
            }
        })?;

        let properties = &response.blob.properties;
        let kind = match properties.blob_type {
            BlobType::BlockBlob => BlobKind::BlockBlob,
            BlobType::PageBlob => BlobKind::PageBlob,
            BlobType::AppendBlob => BlobKind::AppendBlob,
        };

        Ok(BlobProperties {
            name: name.to_string(),
            kind,
            access_tier: properties.access_tier.as_ref().map(|t| format!("{t:?}")),
            content_length: properties.content_length,
        })
    }

    async fn set_access_tier(&self, name: &str, tier: AccessTier) -> Result<()> {
        self.container_client
            .blob_client(name)
            .set_blob_tier(sdk_access_tier(tier))
            .await
            .map_err(|e| BlobctlError::azure_api(e.to_string()))?;

        debug!(blob = %name, tier = %tier, "set access tier");
        Ok(())
    }

    async fn download(&self, name: &str) -> Result<Vec<u8>> {
        let properties = self.get_properties(name).await?;

        // A ranged read of a 0-byte blob fails with 416 Range Not Satisfiable
        if properties.content_length == 0 {
            return Ok(Vec::new());
        }

        let content = self
            .container_client
            .blob_client(name)
            .get_content()
            .await
            .map_err(|e| BlobctlError::azure_api(format!("Failed to download blob: {e}")))?;

        debug!(blob = %name, bytes = content.len(), "downloaded blob");
        Ok(content)
    }

    async fn upload(&self, name: &str, content: Vec<u8>, content_type: &str) -> Result<()> {
        let content_length = content.len();

        self.container_client
            .blob_client(name)
            .put_block_blob(content)
            .content_type(content_type.to_string())
            .await
            .map_err(|e| BlobctlError::azure_api(format!("Failed to upload blob: {e}")))?;

        debug!(blob = %name, bytes = content_length, "uploaded blob");
        Ok(())
    }
}
