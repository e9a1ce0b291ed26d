//! Directory node record

use serde::{Deserialize, Serialize};

/// One cached directory.
///
/// Only directories are ever cached; `is_dir` exists so renderers can treat
/// nodes and raw listing entries uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    /// Child directory keys in source order.
    pub children: Vec<String>,
    /// Set once a fetch has succeeded; cleared only by a cache reset.
    pub loaded: bool,
    /// A fetch for this node is in flight.
    pub loading: bool,
}

impl TreeNode {
    /// Placeholder for a directory that has never been listed.
    pub fn unloaded(name: String, path: String) -> Self {
        Self {
            name,
            path,
            is_dir: true,
            children: Vec::new(),
            loaded: false,
            loading: false,
        }
    }
}
