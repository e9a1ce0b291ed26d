//! Config sources: global file, explicit file and SHARETREE_* environment.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::{Path, PathBuf};

/// Environment prefix; nested keys use `__`, e.g. `SHARETREE_STORE__DEBOUNCE_MS`.
pub const ENV_PREFIX: &str = "SHARETREE";

/// `<platform config dir>/config.toml`, if the platform has one.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "sharetree", "sharetree")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global config file; absent files are skipped.
pub fn add_global_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    }
}

/// Add an explicitly requested config file; it must exist.
pub fn add_file(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(true))
}

/// Add the environment overlay.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
