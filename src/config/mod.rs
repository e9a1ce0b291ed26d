//! Configuration
//!
//! Layered settings for the tree store, the HTTP sources and logging. See
//! [`ConfigLoader`] for source precedence.

pub mod facade;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::persistence::EXPANDED_PATHS_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree store behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Quiet window before expansion state is written (milliseconds)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Preference key holding the expansion state
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Display name of the root node
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Directory for persisted preferences; None means the platform state dir
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_storage_key() -> String {
    EXPANDED_PATHS_KEY.to_string()
}

fn default_root_name() -> String {
    "Root".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            storage_key: default_storage_key(),
            root_name: default_root_name(),
            state_dir: None,
        }
    }
}

/// File-sharing server used by the HTTP sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Pre-issued session token sent as `X-Auth` to the private API
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Password for protected shares
    #[serde(default)]
    pub share_password: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            share_password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
