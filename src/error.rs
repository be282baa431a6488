//! Error types for the load tracker.
//!
//! Notification handlers never fail: unknown identifiers and malformed redirects
//! are absorbed as ordinary bookkeeping. Only the edges (decoding inbound
//! notifications, loading configuration, installing logging) return errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Failed to decode notification: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for TrackerError {
    fn from(err: config::ConfigError) -> Self {
        TrackerError::Config(err.to_string())
    }
}
