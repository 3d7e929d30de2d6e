//! Error types for the psdocs crate

use thiserror::Error;

/// Result type for psdocs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for psdocs operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint returned an error response
    #[error("Endpoint error: {status_code} - {message}")]
    Endpoint {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Request exceeded the configured deadline
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured deadline in milliseconds
        timeout_ms: u64,
    },

    /// External answering is disabled by configuration
    #[error("External answering is disabled")]
    Disabled,

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
