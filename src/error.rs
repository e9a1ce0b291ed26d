//! Error types
//!
//! Three layers of failure: directory sources ([`BackendError`]), preference
//! storage ([`StorageError`]) and the store-facing [`TreeError`] that wraps both.

use thiserror::Error;

/// Failures reported by a directory-listing source.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or connection failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Credentials or share password were rejected.
    #[error("Access denied: {0}")]
    Unauthorized(String),

    /// The response body was not a directory listing.
    #[error("Failed to decode directory listing: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Failures of the preference key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the write because it would exceed its capacity.
    #[error("Quota exceeded writing {key} (limit {limit} bytes)")]
    QuotaExceeded { key: String, limit: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the tree store and its ambient layers.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A directory listing could not be fetched. Cache state has already been
    /// restored when this is returned.
    #[error("Failed to load {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for TreeError {
    fn from(err: config::ConfigError) -> Self {
        TreeError::Config(err.to_string())
    }
}
