//! Azure Blob Storage operations
//!
//! This module provides the bulk tier changer, the single blob copier and
//! the storage abstraction both of them run against.

pub mod azure;
pub mod copy;
pub mod models;
pub mod store;
pub mod tier;

// Re-export commonly used types
pub use azure::AzureBlobStore;
pub use copy::copy_blob;
pub use models::*;
pub use store::BlobStore;
pub use tier::{change_blob_tiers, change_blob_tiers_with_progress};
