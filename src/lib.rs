//! blobctl - Azure Blob Storage administration tool
//!
//! Bulk access tier changes for the blobs of a container and single blob
//! copies between storage accounts.

pub mod auth;
pub mod blob;
pub mod cli;
pub mod config;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use error::{BlobctlError, Result};
