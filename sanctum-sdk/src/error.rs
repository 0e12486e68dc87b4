//! Error types for the Sanctum SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Error, Debug)]
pub enum SdkError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),

    /// Batch save completed with failures; succeeded writes stayed applied
    #[error("Batch save: {succeeded} succeeded, {failed} failed")]
    Batch {
        succeeded: usize,
        failed: usize,
        errors: Vec<String>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sanctum_client::ClientError> for SdkError {
    fn from(err: sanctum_client::ClientError) -> Self {
        match err {
            sanctum_client::ClientError::NotFound(id) => SdkError::NotFound(id),
            sanctum_client::ClientError::Http(e) => SdkError::Network(e.to_string()),
            sanctum_client::ClientError::Json(e) => SdkError::Serialization(e.to_string()),
            other => SdkError::Repository(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
