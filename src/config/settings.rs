//! Configuration settings management
//!
//! This module handles loading configuration from multiple sources,
//! validation, and persistence.

use crate::auth::mask_secret;
use crate::blob::models::AccessTier;
use crate::error::{BlobctlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults for `blobctl copy`, usually only the non-secret parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub source_connection_string: Option<String>,
    pub source_container: Option<String>,
    pub source_blob: Option<String>,
    pub destination_connection_string: Option<String>,
    pub destination_container: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug: bool,
    pub output_json: bool,
    pub default_tier: AccessTier,
    /// Custom blob endpoint used with account key access
    pub endpoint: Option<String>,
    pub copy: Option<CopyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            output_json: false,
            default_tier: AccessTier::Cold,
            endpoint: None,
            copy: None,
        }
    }
}

/// Fully resolved inputs of a blob copy
#[derive(Debug, Clone, PartialEq)]
pub struct CopySettings {
    pub source_connection_string: String,
    pub source_container: String,
    pub source_blob: String,
    pub destination_connection_string: String,
    pub destination_container: String,
}

/// Copy inputs given on the command line; any of them may be missing
#[derive(Debug, Clone, Default)]
pub struct CopyOverrides {
    pub source_connection_string: Option<String>,
    pub source_container: Option<String>,
    pub source_blob: Option<String>,
    pub destination_connection_string: Option<String>,
    pub destination_container: Option<String>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("BLOBCTL_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        // Use XDG Base Directory specification on Linux and macOS
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| BlobctlError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("blobctl").join("blobctl.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| BlobctlError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("blobctl").join("blobctl.toml"))
        }
    }

    /// Resolve copy inputs.
    /// Priority: CLI argument > environment / config file
    pub fn resolve_copy(&self, overrides: CopyOverrides) -> Result<CopySettings> {
        let file = self.copy.clone().unwrap_or_default();

        fn pick(cli: Option<String>, file: Option<String>, what: &str, flag: &str) -> Result<String> {
            cli.or(file)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    BlobctlError::config(format!(
                        "No {what} specified. Use --{flag} or set it in the [copy] section of the config file"
                    ))
                })
        }

        Ok(CopySettings {
            source_connection_string: pick(
                overrides.source_connection_string,
                file.source_connection_string,
                "source connection string",
                "source-connection-string",
            )?,
            source_container: pick(
                overrides.source_container,
                file.source_container,
                "source container",
                "source-container",
            )?,
            source_blob: pick(overrides.source_blob, file.source_blob, "source blob", "blob")?,
            destination_connection_string: pick(
                overrides.destination_connection_string,
                file.destination_connection_string,
                "destination connection string",
                "destination-connection-string",
            )?,
            destination_container: pick(
                overrides.destination_container,
                file.destination_container,
                "destination container",
                "destination-container",
            )?,
        })
    }

    /// Copy of this configuration with connection strings masked, for display
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        if let Some(copy) = config.copy.as_mut() {
            copy.source_connection_string = copy.source_connection_string.as_deref().map(mask_secret);
            copy.destination_connection_string =
                copy.destination_connection_string.as_deref().map(mask_secret);
        }
        config
    }
}

/// Load configuration from multiple sources with priority order:
/// 1. Command-line flags (handled by clap)
/// 2. Environment variables
/// 3. Configuration file
/// 4. Default values
pub async fn load_config() -> Result<Config> {
    let config_path = Config::get_config_path()?;
    let mut config = if config_path.exists() {
        load_from_file(&config_path).await?
    } else {
        Config::default()
    };

    load_from_env(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

pub async fn load_from_file(path: &Path) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;

    // Try to parse as TOML first, then JSON as fallback
    let toml_error = match toml::from_str::<Config>(&contents) {
        Ok(config) => return Ok(config),
        Err(e) => e,
    };

    serde_json::from_str::<Config>(&contents).map_err(|_| {
        BlobctlError::config(format!(
            "Failed to parse config file {}: {toml_error}",
            path.display()
        ))
    })
}

/// Apply environment overrides, reading variables through `lookup`
pub fn load_from_env<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("BLOBCTL_DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = lookup("BLOBCTL_OUTPUT_JSON") {
        config.output_json = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = lookup("BLOBCTL_DEFAULT_TIER") {
        config.default_tier = value
            .parse()
            .map_err(|e| BlobctlError::config(format!("BLOBCTL_DEFAULT_TIER: {e}")))?;
    }

    if let Some(value) = lookup("AZURE_STORAGE_ENDPOINT") {
        config.endpoint = Some(value);
    }

    let mut copy = config.copy.clone().unwrap_or_default();
    let mut copy_updated = false;

    for (key, slot) in [
        ("BLOBCTL_SOURCE_CONNECTION_STRING", &mut copy.source_connection_string),
        ("BLOBCTL_SOURCE_CONTAINER", &mut copy.source_container),
        ("BLOBCTL_SOURCE_BLOB", &mut copy.source_blob),
        ("BLOBCTL_DESTINATION_CONNECTION_STRING", &mut copy.destination_connection_string),
        ("BLOBCTL_DESTINATION_CONTAINER", &mut copy.destination_container),
    ] {
        if let Some(value) = lookup(key) {
            *slot = Some(value);
            copy_updated = true;
        }
    }

    if config.copy.is_some() || copy_updated {
        config.copy = Some(copy);
    }

    Ok(())
}

pub async fn save_config(config: &Config, path: &Path) -> Result<()> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| BlobctlError::serialization(e.to_string()))?;

    tokio::fs::write(path, contents).await?;

    Ok(())
}

/// Write a default configuration file; returns false if one already exists
pub async fn init_default_config(path: &Path) -> Result<bool> {
    // Don't overwrite existing configuration
    if path.exists() {
        return Ok(false);
    }

    save_config(&Config::default(), path).await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn test_load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blobctl.toml");
        tokio::fs::write(
            &path,
            "default_tier = \"archive\"\n\n[copy]\nsource_container = \"raw\"\ndestination_container = \"backup\"\n",
        )
        .await
        .unwrap();

        let config = load_from_file(&path).await.unwrap();

        assert_eq!(config.default_tier, AccessTier::Archive);
        let copy = config.copy.unwrap();
        assert_eq!(copy.source_container.as_deref(), Some("raw"));
        assert_eq!(copy.destination_container.as_deref(), Some("backup"));
        assert_eq!(copy.source_blob, None);
    }

    #[tokio::test]
    async fn test_invalid_tier_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blobctl.toml");
        tokio::fs::write(&path, "default_tier = \"Premium\"\n").await.unwrap();

        let result = load_from_file(&path).await;

        assert!(matches!(result, Err(BlobctlError::ConfigError(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            copy: Some(CopyConfig {
                source_container: Some("from-file".into()),
                ..CopyConfig::default()
            }),
            ..Config::default()
        };

        load_from_env(
            &mut config,
            env(&[
                ("BLOBCTL_SOURCE_CONTAINER", "from-env"),
                ("BLOBCTL_DEFAULT_TIER", "Hot"),
                ("BLOBCTL_DEBUG", "1"),
            ]),
        )
        .unwrap();

        assert!(config.debug);
        assert_eq!(config.default_tier, AccessTier::Hot);
        assert_eq!(
            config.copy.unwrap().source_container.as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_bad_env_tier_is_config_error() {
        let mut config = Config::default();
        let result = load_from_env(&mut config, env(&[("BLOBCTL_DEFAULT_TIER", "Glacier")]));
        assert!(matches!(result, Err(BlobctlError::ConfigError(_))));
    }

    #[test]
    fn test_resolve_copy_prefers_cli() {
        let config = Config {
            copy: Some(CopyConfig {
                source_connection_string: Some("AccountName=a;AccountKey=k".into()),
                source_container: Some("src".into()),
                source_blob: Some("file.bin".into()),
                destination_connection_string: Some("AccountName=b;AccountKey=k".into()),
                destination_container: Some("dst".into()),
            }),
            ..Config::default()
        };

        let settings = config
            .resolve_copy(CopyOverrides {
                source_blob: Some("other.bin".into()),
                ..CopyOverrides::default()
            })
            .unwrap();

        assert_eq!(settings.source_blob, "other.bin");
        assert_eq!(settings.source_container, "src");
        assert_eq!(settings.destination_container, "dst");
    }

    #[test]
    fn test_resolve_copy_reports_missing_input() {
        let err = Config::default()
            .resolve_copy(CopyOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("--source-connection-string"));
    }

    #[test]
    fn test_masked_hides_connection_strings() {
        let config = Config {
            copy: Some(CopyConfig {
                source_connection_string: Some("AccountName=a;AccountKey=secret".into()),
                ..CopyConfig::default()
            }),
            ..Config::default()
        };

        let masked = config.masked();
        let shown = masked.copy.unwrap().source_connection_string.unwrap();
        assert!(!shown.contains("secret"));
    }

    #[tokio::test]
    async fn test_init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("blobctl.toml");

        assert!(init_default_config(&path).await.unwrap());
        tokio::fs::write(&path, "debug = true\n").await.unwrap();
        assert!(!init_default_config(&path).await.unwrap());

        let config = load_from_file(&path).await.unwrap();
        assert!(config.debug);
    }
}
