//! ConfigLoader facade over the layered config sources.

use super::sources;
use super::TreeConfig;
use config::{Config, ConfigError};
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence: defaults (lowest) -> global file -> `explicit` file ->
    /// environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<TreeConfig, ConfigError> {
        let builder = sources::add_global_file(Config::builder());
        let builder = match explicit {
            Some(path) => sources::add_file(builder, path),
            None => builder,
        };
        let builder = sources::add_environment(builder);

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a single file without global or environment layers.
    pub fn load_from_file(path: &Path) -> Result<TreeConfig, ConfigError> {
        sources::add_file(Config::builder(), path)
            .build()?
            .try_deserialize()
    }

    /// Create default configuration.
    pub fn default() -> TreeConfig {
        TreeConfig::default()
    }
}
