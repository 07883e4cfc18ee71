//! Error types for the media cloner

use thiserror::Error;

/// Result type alias for start-up and configuration operations
pub type Result<T> = std::result::Result<T, ClonerError>;

/// Failures that prevent the daemon from starting
#[derive(Error, Debug)]
pub enum ClonerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Invalid lifecycle state: {0}")]
    InvalidState(String),
}

impl ClonerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
