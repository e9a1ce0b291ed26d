//! Node cache
//!
//! Keyed by normalized path, one [`TreeNode`] per directory. Owns the
//! `loading`/`loaded` transitions; fetching itself happens in the store.

use super::node::TreeNode;
use super::path;
use crate::source::DirectoryEntry;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::warn;

/// Proof that a fetch was started for `path` in cache epoch `epoch`.
///
/// A reset bumps the epoch, so tickets issued before it no longer touch the
/// fresh cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    path: String,
    epoch: u64,
}

impl LoadTicket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

pub struct NodeCache {
    nodes: HashMap<String, TreeNode>,
    root_name: String,
    epoch: u64,
}

impl NodeCache {
    pub fn new(root_name: &str) -> Self {
        Self {
            nodes: HashMap::new(),
            root_name: root_name.to_string(),
            epoch: 0,
        }
    }

    pub fn get(&self, path: &str) -> Option<&TreeNode> {
        self.nodes.get(path)
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.nodes.get(path).map(|n| n.loaded).unwrap_or(false)
    }

    pub fn is_loading(&self, path: &str) -> bool {
        self.nodes.get(path).map(|n| n.loading).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &HashMap<String, TreeNode> {
        &self.nodes
    }

    /// Mark `path` as loading, creating its node when missing.
    ///
    /// Returns `None` if a fetch for `path` is already in flight.
    pub fn begin_load(&mut self, path: &str) -> Option<LoadTicket> {
        match self.nodes.get_mut(path) {
            Some(node) if node.loading => return None,
            Some(node) => node.loading = true,
            None => {
                let mut node =
                    TreeNode::unloaded(path::display_name(path, &self.root_name), path.to_string());
                node.loading = true;
                self.nodes.insert(path.to_string(), node);
            }
        }

        Some(LoadTicket {
            path: path.to_string(),
            epoch: self.epoch,
        })
    }

    /// Ingest a successful listing for the ticket's node.
    ///
    /// Files are dropped; unseen child directories get unloaded placeholder nodes.
    /// An entry without a path is keyed by its name below the parent. Entries
    /// that do not resolve strictly below the parent are skipped.
    /// Returns the number of child directories, or `None` if the ticket predates
    /// a reset.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        entries: &[DirectoryEntry],
    ) -> Option<usize> {
        if ticket.epoch != self.epoch {
            return None;
        }

        let mut children: Vec<String> = Vec::new();
        for entry in entries.iter().filter(|e| e.is_dir) {
            let child = if entry.path.is_empty() {
                path::join(&ticket.path, &entry.name)
            } else {
                path::normalize(&entry.path)
            };
            if !path::is_descendant(&ticket.path, &child) || children.contains(&child) {
                warn!(
                    parent = %ticket.path,
                    entry = %entry.name,
                    "Skipping listing entry that does not resolve to a new child"
                );
                continue;
            }
            self.nodes
                .entry(child.clone())
                .or_insert_with(|| TreeNode::unloaded(entry.name.clone(), child.clone()));
            children.push(child);
        }

        let count = children.len();
        let node = self.nodes.get_mut(&ticket.path)?;
        node.children = children;
        node.loaded = true;
        Some(count)
    }

    /// Clear the in-flight flag for the ticket's node.
    pub fn finish_load(&mut self, ticket: &LoadTicket) {
        if ticket.epoch != self.epoch {
            return;
        }
        if let Some(node) = self.nodes.get_mut(&ticket.path) {
            node.loading = false;
        }
    }

    /// Drop every node. Fetches still in flight become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.epoch += 1;
    }
}

/// Clears `loading` when dropped, whether the fetch finished, failed or its
/// future was abandoned.
pub(crate) struct LoadGuard<'a> {
    cache: &'a RwLock<NodeCache>,
    ticket: LoadTicket,
}

impl<'a> LoadGuard<'a> {
    pub(crate) fn start(cache: &'a RwLock<NodeCache>, path: &str) -> Option<Self> {
        let ticket = cache.write().begin_load(path)?;
        Some(Self { cache, ticket })
    }

    pub(crate) fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.cache.write().finish_load(&self.ticket);
    }
}
