//! Authentication module for Azure Storage
//!
//! This module provides static credential handling for blob storage:
//! account name and key pairs, and storage connection strings.

pub mod credentials;

pub use credentials::*;
