//! Error types for spam-rs

use thiserror::Error;

/// Result type alias for spam-rs operations
pub type Result<T> = std::result::Result<T, SpamError>;

/// Spam service error types
#[derive(Error, Debug)]
pub enum SpamError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model artifact parsed but its parameters are inconsistent
    #[error("Invalid model artifact: {0}")]
    ModelFormat(String),

    /// No classifier is loaded
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Classifier failed while scoring a message
    #[error("Classification failed: {0}")]
    Classification(String),
}

impl From<config::ConfigError> for SpamError {
    fn from(err: config::ConfigError) -> Self {
        SpamError::Config(err.to_string())
    }
}
