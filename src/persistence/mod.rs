//! Preference persistence
//!
//! Durable key-value storage for UI preferences plus the debounced writer that
//! keeps the expansion state in it.

pub mod debounce;
pub mod file;
pub mod memory;

use crate::error::StorageError;

pub use debounce::DebouncedSaver;
pub use file::FilePreferenceStore;
pub use memory::MemoryPreferenceStore;

/// Default key under which the expansion state is stored.
pub const EXPANDED_PATHS_KEY: &str = "expandedPaths";

/// Synchronous string key-value store.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
