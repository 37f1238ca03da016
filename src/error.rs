use thiserror::Error;

/// Main error type for blobctl operations
#[derive(Debug, Error)]
pub enum BlobctlError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Blob not found: {name}")]
    BlobNotFound { name: String },

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl BlobctlError {
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::AuthenticationError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn blob_not_found<S: Into<String>>(name: S) -> Self {
        Self::BlobNotFound { name: name.into() }
    }

    pub fn invalid_connection_string<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConnectionString(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type alias for blobctl operations
pub type Result<T> = std::result::Result<T, BlobctlError>;

/// Convert Azure Core errors to BlobctlError
impl From<azure_core::Error> for BlobctlError {
    fn from(error: azure_core::Error) -> Self {
        Self::AzureApiError(error.to_string())
    }
}
