//! Expansion state: which directories are shown expanded.

use crate::error::StorageError;
use crate::persistence::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Path → expanded flag. Serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    paths: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the persisted state under `key`.
    ///
    /// Missing, unreadable or malformed values yield an empty state.
    pub fn load(store: &dyn PreferenceStore, key: &str) -> Self {
        let raw = match store.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read expansion state, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(key, error = %e, "Discarding corrupt expansion state");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.paths.get(path).copied().unwrap_or(false)
    }

    pub fn set(&mut self, path: &str, expanded: bool) {
        self.paths.insert(path.to_string(), expanded);
    }

    /// Flip `path` and return its new value.
    pub fn toggle(&mut self, path: &str) -> bool {
        let expanded = !self.is_expanded(path);
        self.set(path, expanded);
        expanded
    }

    /// Paths currently marked expanded, in key order.
    pub fn expanded_paths(&self) -> Vec<String> {
        self.paths
            .iter()
            .filter(|(_, expanded)| **expanded)
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn entries(&self) -> &BTreeMap<String, bool> {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
