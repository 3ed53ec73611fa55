//! Error types for the logging system.

use thiserror::Error;

/// Errors that can occur in the logging system.
#[derive(Debug, Error)]
pub enum LogError {
    /// The configured severity name is not recognized.
    #[error("failed to parse log level: unrecognized level {0:?}")]
    InvalidLevel(String),

    /// The configuration cannot produce a logger.
    #[error("invalid logger configuration: {0}")]
    InvalidConfig(String),

    /// Serialization of a record failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred while writing or rotating.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
