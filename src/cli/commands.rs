//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, subcommands, and their arguments.

use crate::blob::{
    change_blob_tiers, change_blob_tiers_with_progress, copy_blob, AccessTier, AzureBlobStore,
    BlobFilter, BlobStore, TierChangeReport, TierChangeRequest,
};
use crate::config::{self, Config, CopyOverrides};
use crate::error::{BlobctlError, Result};
use crate::utils::format::{format_size, to_pretty_json, OutputFormat};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use tracing::info;

/// Build-time information generated by `built`
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser, Debug)]
#[command(name = "blobctl")]
#[command(about = "Bulk access tier changes and blob copies for Azure Blob Storage")]
#[command(version = built_info::PKG_VERSION, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format (defaults to text, or json when output_json is configured)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Change the access tier of blobs in a container
    SetTier {
        /// Azure Storage account name
        #[arg(long, env = "AZURE_STORAGE_ACCOUNT")]
        account_name: String,
        /// Azure Storage account key
        #[arg(long, env = "AZURE_STORAGE_KEY", hide_env_values = true)]
        account_key: String,
        /// Container name
        #[arg(long)]
        container_name: String,
        /// Desired access tier (Hot, Cool, Cold or Archive). Defaults to Cold
        #[arg(long, value_enum, ignore_case = true)]
        tier: Option<AccessTier>,
        /// Optional virtual folder prefix (e.g., "folder1/subfolder/")
        #[arg(long)]
        prefix: Option<String>,
        /// Optional file extension filter (e.g., ".fastq.gz")
        #[arg(long)]
        file_extension: Option<String>,
        /// Custom blob service endpoint instead of https://<account>.blob.core.windows.net
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Copy a blob from one storage account/container to another
    Copy {
        /// Connection string of the source storage account
        #[arg(long)]
        source_connection_string: Option<String>,
        /// Source container name
        #[arg(long)]
        source_container: Option<String>,
        /// Name of the blob to copy; the destination blob gets the same name
        #[arg(long)]
        blob: Option<String>,
        /// Connection string of the destination storage account
        #[arg(long)]
        destination_connection_string: Option<String>,
        /// Destination container name
        #[arg(long)]
        destination_container: Option<String>,
    },
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show detailed version and build information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration with secrets masked
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file if none exists
    Init,
}

impl Cli {
    pub async fn execute(self, config: Config) -> Result<()> {
        let format = self.format.unwrap_or(if config.output_json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        });

        match self.command {
            Commands::SetTier {
                account_name,
                account_key,
                container_name,
                tier,
                prefix,
                file_extension,
                endpoint,
            } => {
                let tier = tier.unwrap_or(config.default_tier);
                let endpoint = endpoint.or_else(|| config.endpoint.clone());
                let store =
                    AzureBlobStore::from_access_key(account_name, account_key, endpoint, container_name)?;
                let request = TierChangeRequest {
                    tier,
                    filter: BlobFilter::new(prefix, file_extension),
                };
                execute_set_tier(&store, &request, format, &mut io::stdout()).await
            }
            Commands::Copy {
                source_connection_string,
                source_container,
                blob,
                destination_connection_string,
                destination_container,
            } => {
                let overrides = CopyOverrides {
                    source_connection_string,
                    source_container,
                    source_blob: blob,
                    destination_connection_string,
                    destination_container,
                };
                execute_copy(&config, overrides, format).await
            }
            Commands::Config { command } => execute_config_command(command).await,
            Commands::Version => {
                execute_version_command();
                Ok(())
            }
        }
    }
}

/// Run a tier change, writing one line per visited blob and then the summary
pub async fn execute_set_tier(
    store: &dyn BlobStore,
    request: &TierChangeRequest,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    info!(container = %store.container_name(), "starting tier change");

    match format {
        OutputFormat::Text => {
            let mut written: io::Result<()> = Ok(());
            let report = change_blob_tiers_with_progress(store, request, |outcome| {
                if written.is_ok() {
                    written = writeln!(out, "{outcome}");
                }
            })
            .await?;
            written?;
            writeln!(out, "{}", summary_line(&report))?;
        }
        OutputFormat::Json => {
            let report = change_blob_tiers(store, request).await?;
            writeln!(out, "{}", to_pretty_json(&report)?)?;
        }
    }

    Ok(())
}

/// Final line printed after a completed tier change
pub fn summary_line(report: &TierChangeReport) -> String {
    format!(
        "Successfully updated all blob tiers ({} updated, {} skipped, {} failed)",
        report.updated(),
        report.skipped(),
        report.failed()
    )
}

/// Line printed to stderr when a command fails
pub fn failure_line(error: &BlobctlError) -> String {
    format!("An error occurred: {error}")
}

async fn execute_copy(config: &Config, overrides: CopyOverrides, format: OutputFormat) -> Result<()> {
    let settings = config.resolve_copy(overrides)?;

    let source = AzureBlobStore::from_connection_string(
        settings.source_connection_string,
        settings.source_container,
    )?;
    let destination = AzureBlobStore::from_connection_string(
        settings.destination_connection_string,
        settings.destination_container,
    )?;

    let report = copy_blob(&source, &destination, &settings.source_blob).await?;

    match format {
        OutputFormat::Text => println!(
            "Copied {} ({}) from {}/{} to {}/{}",
            report.name,
            format_size(report.size),
            source.account(),
            report.source_container,
            destination.account(),
            report.destination_container
        ),
        OutputFormat::Json => println!("{}", to_pretty_json(&report)?),
    }

    Ok(())
}

async fn execute_config_command(command: ConfigCommands) -> Result<()> {
    let path = Config::get_config_path()?;

    match command {
        ConfigCommands::Show => {
            let config = config::load_config().await?;
            let rendered = toml::to_string_pretty(&config.masked())
                .map_err(|e| BlobctlError::serialization(e.to_string()))?;
            println!("# {}", path.display());
            print!("{rendered}");
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Init => {
            if config::init_default_config(&path).await? {
                println!("Created configuration file at {}", path.display());
            } else {
                println!("Configuration file already exists at {}", path.display());
            }
        }
    }

    Ok(())
}

fn execute_version_command() {
    println!("blobctl {}", built_info::PKG_VERSION);
    println!(
        "  Git commit: {}",
        built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown")
    );
    println!("  Built:      {}", built_info::BUILT_TIME_UTC);
    println!("  Target:     {}", built_info::TARGET);
    println!("  Rustc:      {}", built_info::RUSTC_VERSION);
}
