//! Single blob copy between containers
//!
//! The whole blob is read into memory and written back under the same
//! name, so this is only suited to blobs that fit in RAM.

use sha2::{Digest, Sha256};
use tracing::info;

use crate::blob::models::CopyReport;
use crate::blob::store::BlobStore;
use crate::error::{BlobctlError, Result};

/// Copy `blob_name` from `source` to `destination`, overwriting any
/// destination blob with the same name
pub async fn copy_blob(
    source: &dyn BlobStore,
    destination: &dyn BlobStore,
    blob_name: &str,
) -> Result<CopyReport> {
    if blob_name.trim().is_empty() {
        return Err(BlobctlError::invalid_argument("Blob name cannot be empty"));
    }

    let source_container = source.container_name();
    let destination_container = destination.container_name();

    info!(
        blob = %blob_name,
        source = %source_container,
        destination = %destination_container,
        "copying blob"
    );

    let content = source.download(blob_name).await?;
    let size = content.len() as u64;
    let sha256 = hex::encode(Sha256::digest(&content));
    let content_type = mime_guess::from_path(blob_name)
        .first_or_octet_stream()
        .to_string();

    destination.upload(blob_name, content, &content_type).await?;

    info!(blob = %blob_name, bytes = size, sha256 = %sha256, "copied blob");

    Ok(CopyReport {
        name: blob_name.to_string(),
        source_container,
        destination_container,
        size,
        sha256,
        content_type,
    })
}
