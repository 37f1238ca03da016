//! Data models for blob storage operations
//!
//! This module defines the data structures used by the tier changer and
//! the blob copier, including requests, per-blob outcomes and reports.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BlobctlError;

/// Storage access tier assignable to block blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(try_from = "String")]
#[value(rename_all = "PascalCase")]
pub enum AccessTier {
    Hot,
    Cool,
    Cold,
    Archive,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Hot => "Hot",
            AccessTier::Cool => "Cool",
            AccessTier::Cold => "Cold",
            AccessTier::Archive => "Archive",
        }
    }
}

impl Default for AccessTier {
    fn default() -> Self {
        AccessTier::Cold
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = BlobctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(AccessTier::Hot),
            "cool" => Ok(AccessTier::Cool),
            "cold" => Ok(AccessTier::Cold),
            "archive" => Ok(AccessTier::Archive),
            other => Err(BlobctlError::invalid_argument(format!(
                "Invalid access tier '{other}'. Expected one of: Hot, Cool, Cold, Archive"
            ))),
        }
    }
}

impl TryFrom<String> for AccessTier {
    type Error = BlobctlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Kind of blob as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobKind {
    BlockBlob,
    PageBlob,
    AppendBlob,
}

impl fmt::Display for BlobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlobKind::BlockBlob => "BlockBlob",
            BlobKind::PageBlob => "PageBlob",
            BlobKind::AppendBlob => "AppendBlob",
        };
        f.write_str(name)
    }
}

/// Properties consulted before changing a blob's tier
#[derive(Debug, Clone, PartialEq)]
pub struct BlobProperties {
    pub name: String,
    pub kind: BlobKind,
    pub access_tier: Option<String>,
    pub content_length: u64,
}

/// Name filters applied while enumerating a container.
///
/// Empty strings are treated the same as an absent filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlobFilter {
    pub prefix: Option<String>,
    pub extension: Option<String>,
}

impl BlobFilter {
    pub fn new(prefix: Option<String>, extension: Option<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
            extension: extension.filter(|e| !e.is_empty()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn matches_prefix(&self, name: &str) -> bool {
        self.prefix.as_deref().map_or(true, |p| name.starts_with(p))
    }

    pub fn matches_extension(&self, name: &str) -> bool {
        self.extension.as_deref().map_or(true, |e| name.ends_with(e))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matches_prefix(name) && self.matches_extension(name)
    }
}

/// Request for a bulk tier change
#[derive(Debug, Clone)]
pub struct TierChangeRequest {
    pub tier: AccessTier,
    pub filter: BlobFilter,
}

/// Result of visiting a single blob that passed the filters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierOutcome {
    Updated { name: String },
    Skipped { name: String, blob_type: BlobKind },
    Failed { name: String, message: String },
}

impl TierOutcome {
    pub fn name(&self) -> &str {
        match self {
            TierOutcome::Updated { name }
            | TierOutcome::Skipped { name, .. }
            | TierOutcome::Failed { name, .. } => name,
        }
    }
}

impl fmt::Display for TierOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierOutcome::Updated { name } => write!(f, "Updated tier for blob: {name}"),
            TierOutcome::Skipped { name, blob_type } => {
                write!(f, "Skipping {name}: Not a block blob (type: {blob_type})")
            }
            TierOutcome::Failed { name, message } => {
                write!(f, "Failed to update tier for blob {name}: {message}")
            }
        }
    }
}

/// Aggregated report of a tier change run
#[derive(Debug, Clone, Serialize)]
pub struct TierChangeReport {
    pub container: String,
    pub tier: AccessTier,
    pub filter: BlobFilter,
    pub outcomes: Vec<TierOutcome>,
    /// Listed blobs rejected by the name filters
    pub filtered_out: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TierChangeReport {
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, TierOutcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TierOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TierOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&TierOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Report of a completed copy
#[derive(Debug, Clone, Serialize)]
pub struct CopyReport {
    pub name: String,
    pub source_container: String,
    pub destination_container: String,
    pub size: u64,
    pub sha256: String,
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_tier_parsing() {
        assert_eq!("Cool".parse::<AccessTier>().unwrap(), AccessTier::Cool);
        assert_eq!("archive".parse::<AccessTier>().unwrap(), AccessTier::Archive);
        assert_eq!(" HOT ".parse::<AccessTier>().unwrap(), AccessTier::Hot);
        assert!("Premium".parse::<AccessTier>().is_err());
        assert_eq!(AccessTier::default(), AccessTier::Cold);
    }

    #[test]
    fn test_filter_treats_empty_as_unset() {
        let filter = BlobFilter::new(Some(String::new()), Some(String::new()));
        assert_eq!(filter.prefix(), None);
        assert!(filter.matches("anything.txt"));
    }

    #[test]
    fn test_filter_combines_prefix_and_extension() {
        let filter = BlobFilter::new(Some("a/".into()), Some(".fastq.gz".into()));
        assert!(filter.matches("a/x.fastq.gz"));
        assert!(!filter.matches("a/x.bam"));
        assert!(!filter.matches("b/y.fastq.gz"));
    }

    #[test]
    fn test_outcome_lines() {
        let skipped = TierOutcome::Skipped {
            name: "disk.vhd".into(),
            blob_type: BlobKind::PageBlob,
        };
        assert_eq!(
            skipped.to_string(),
            "Skipping disk.vhd: Not a block blob (type: PageBlob)"
        );

        let failed = TierOutcome::Failed {
            name: "z".into(),
            message: "boom".into(),
        };
        assert_eq!(failed.to_string(), "Failed to update tier for blob z: boom");
    }
}
