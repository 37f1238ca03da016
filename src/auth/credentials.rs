//! Static storage credentials
//!
//! This module turns an account name and key, or a storage connection
//! string, into the credentials and cloud location used by the Azure SDK.

use azure_core::Url;
use azure_storage::{
    CloudLocation, ConnectionString, EndpointProtocol, StorageCredentials, EMULATOR_ACCOUNT,
};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{BlobctlError, Result};

const PUBLIC_ENDPOINT_SUFFIX: &str = "core.windows.net";
const CHINA_ENDPOINT_SUFFIX: &str = "core.chinacloudapi.cn";
const EMULATOR_ADDRESS: &str = "127.0.0.1";
const EMULATOR_BLOB_PORT: u16 = 10000;

/// Credentials accepted by blobctl
#[derive(Clone)]
pub enum StorageAuth {
    /// Shared key access to `https://<account>.blob.core.windows.net`,
    /// or to `endpoint` when given
    AccountKey {
        account: String,
        key: Zeroizing<String>,
        endpoint: Option<String>,
    },
    /// Full storage connection string
    ConnectionString(Zeroizing<String>),
}

impl fmt::Debug for StorageAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageAuth::AccountKey { account, endpoint, .. } => f
                .debug_struct("AccountKey")
                .field("account", account)
                .field("key", &"***")
                .field("endpoint", endpoint)
                .finish(),
            StorageAuth::ConnectionString(_) => f.write_str("ConnectionString(***)"),
        }
    }
}

/// Credentials resolved into the pieces the SDK client builder needs
pub struct ResolvedAuth {
    pub account: String,
    pub location: CloudLocation,
    pub credentials: StorageCredentials,
}

impl StorageAuth {
    pub fn account_key(account: impl Into<String>, key: impl Into<String>) -> Self {
        StorageAuth::AccountKey {
            account: account.into(),
            key: Zeroizing::new(key.into()),
            endpoint: None,
        }
    }

    pub fn connection_string(value: impl Into<String>) -> Self {
        StorageAuth::ConnectionString(Zeroizing::new(value.into()))
    }

    /// Resolve into SDK credentials and location
    pub fn resolve(&self) -> Result<ResolvedAuth> {
        match self {
            StorageAuth::AccountKey { account, key, endpoint } => {
                if account.trim().is_empty() {
                    return Err(BlobctlError::authentication("Storage account name cannot be empty"));
                }
                if key.trim().is_empty() {
                    return Err(BlobctlError::authentication("Storage account key cannot be empty"));
                }

                let location = match endpoint {
                    Some(uri) => CloudLocation::Custom {
                        account: account.clone(),
                        uri: uri.trim_end_matches('/').to_string(),
                    },
                    None => CloudLocation::Public {
                        account: account.clone(),
                    },
                };

                Ok(ResolvedAuth {
                    account: account.clone(),
                    location,
                    credentials: StorageCredentials::access_key(account.clone(), key.to_string()),
                })
            }
            StorageAuth::ConnectionString(value) => resolve_connection_string(value),
        }
    }
}

fn resolve_connection_string(value: &str) -> Result<ResolvedAuth> {
    let parsed = ConnectionString::new(value)
        .map_err(|e| BlobctlError::invalid_connection_string(e.to_string()))?;

    if parsed.use_development_storage == Some(true) {
        let location = match parsed.blob_endpoint {
            Some(uri) => CloudLocation::Custom {
                account: EMULATOR_ACCOUNT.to_string(),
                uri: uri.trim_end_matches('/').to_string(),
            },
            None => CloudLocation::Emulator {
                address: EMULATOR_ADDRESS.to_string(),
                port: EMULATOR_BLOB_PORT,
            },
        };
        return Ok(ResolvedAuth {
            account: EMULATOR_ACCOUNT.to_string(),
            location,
            credentials: StorageCredentials::emulator(),
        });
    }

    let credentials = parsed
        .storage_credentials()
        .map_err(|e| BlobctlError::invalid_connection_string(e.to_string()))?;
    let (account, location) = cloud_location(&parsed)?;

    Ok(ResolvedAuth {
        account,
        location,
        credentials,
    })
}

/// Blob service location named by a connection string
fn cloud_location(parsed: &ConnectionString<'_>) -> Result<(String, CloudLocation)> {
    if let Some(endpoint) = parsed.blob_endpoint {
        let account = match parsed.account_name {
            Some(account) => account.to_string(),
            None => account_from_endpoint(endpoint)?,
        };
        let location = CloudLocation::Custom {
            account: account.clone(),
            uri: endpoint.trim_end_matches('/').to_string(),
        };
        return Ok((account, location));
    }

    let account = parsed
        .account_name
        .ok_or_else(|| {
            BlobctlError::invalid_connection_string("expected AccountName or BlobEndpoint")
        })?
        .to_string();

    let https = parsed.default_endpoints_protocol != Some(EndpointProtocol::Http);
    let location = match parsed.endpoint_suffix {
        None | Some(PUBLIC_ENDPOINT_SUFFIX) if https => CloudLocation::Public {
            account: account.clone(),
        },
        Some(CHINA_ENDPOINT_SUFFIX) if https => CloudLocation::China {
            account: account.clone(),
        },
        suffix => {
            let protocol = if https { "https" } else { "http" };
            CloudLocation::Custom {
                account: account.clone(),
                uri: format!(
                    "{protocol}://{account}.blob.{}",
                    suffix.unwrap_or(PUBLIC_ENDPOINT_SUFFIX)
                ),
            }
        }
    };

    Ok((account, location))
}

/// Account name from the first label of a `https://<account>.blob...` endpoint
fn account_from_endpoint(endpoint: &str) -> Result<String> {
    let url = Url::parse(endpoint).map_err(|e| {
        BlobctlError::invalid_connection_string(format!("invalid BlobEndpoint '{endpoint}': {e}"))
    })?;

    url.host_str()
        .and_then(|host| host.split('.').next())
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BlobctlError::invalid_connection_string(format!("BlobEndpoint '{endpoint}' has no host"))
        })
}

/// Mask everything after the first few characters of a secret
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}***")
}
