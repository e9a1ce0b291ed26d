//! Tree Store
//!
//! The lazily loaded directory tree behind a collapsible file browser. Combines
//! the node cache, the expansion state and its debounced persistence, and routes
//! fetches to the private or share source.
//!
//! Locks are only held for synchronous sections; the sole suspension point is
//! the source fetch inside [`TreeStore::ensure_loaded`].

pub mod expansion;

pub use expansion::ExpansionState;

use crate::config::StoreConfig;
use crate::error::TreeError;
use crate::persistence::{DebouncedSaver, PreferenceStore};
use crate::source::{Source, SourceSelector};
use crate::tree::cache::LoadGuard;
use crate::tree::{path, NodeCache, TreeNode};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a single [`TreeStore::ensure_loaded`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Listing fetched and ingested.
    Loaded { children: usize },
    /// Another fetch for the same path was in flight; nothing was requested.
    AlreadyLoading,
    /// The cache was reset while the fetch was in flight; its result was dropped.
    Stale,
}

/// What [`TreeStore::ensure_path_expanded`] did along the ancestor chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Ancestors that were collapsed before the call.
    pub newly_expanded: Vec<String>,
    /// Ancestors whose listing was fetched successfully.
    pub fetched: Vec<String>,
    /// Ancestors whose fetch failed. The walk continued past them.
    pub failed: Vec<String>,
}

impl ExpansionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Flattened row of the visible (expanded) part of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub expanded: bool,
    pub loaded: bool,
    pub loading: bool,
}

pub struct TreeStore {
    cache: RwLock<NodeCache>,
    expansion: Arc<RwLock<ExpansionState>>,
    sources: SourceSelector,
    saver: DebouncedSaver,
}

impl TreeStore {
    /// Build a store, restoring expansion state from `store`.
    pub fn new(
        sources: SourceSelector,
        store: Arc<dyn PreferenceStore>,
        config: &StoreConfig,
    ) -> Self {
        let expansion = ExpansionState::load(store.as_ref(), &config.storage_key);
        info!(
            expanded = expansion.expanded_paths().len(),
            "Restored expansion state"
        );
        let expansion = Arc::new(RwLock::new(expansion));
        let saver = DebouncedSaver::new(
            store,
            &config.storage_key,
            Arc::clone(&expansion),
            Duration::from_millis(config.debounce_ms),
        );

        Self {
            cache: RwLock::new(NodeCache::new(&config.root_name)),
            expansion,
            sources,
            saver,
        }
    }

    /// Fetch and ingest the listing for `path` unless a fetch is already running.
    ///
    /// A failed fetch leaves `loaded` and `children` untouched; `loading` is
    /// always cleared before this returns.
    pub async fn ensure_loaded(
        &self,
        path: &str,
        source: &Source,
    ) -> Result<LoadOutcome, TreeError> {
        let guard = match LoadGuard::start(&self.cache, path) {
            Some(guard) => guard,
            None => {
                debug!(path, "Fetch already in flight, skipping");
                return Ok(LoadOutcome::AlreadyLoading);
            }
        };

        let address = path::backend_address(path);
        let result = self.sources.fetch(source, &address).await;

        match result {
            Ok(listing) => {
                let ingested = self.cache.write().complete_load(guard.ticket(), &listing.items);
                match ingested {
                    Some(children) => {
                        debug!(path, children, share = source.is_share(), "Loaded directory");
                        Ok(LoadOutcome::Loaded { children })
                    }
                    None => {
                        debug!(path, "Cache reset during fetch, dropping listing");
                        Ok(LoadOutcome::Stale)
                    }
                }
            }
            Err(e) => {
                warn!(path, error = %e, "Failed to fetch tree node");
                Err(TreeError::Fetch {
                    path: path.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Flip the expansion of `path` and load it if it just opened unloaded.
    ///
    /// Returns the new expanded state. The flip is kept and persisted even when
    /// the fetch fails.
    pub async fn toggle(&self, path: &str, source: &Source) -> Result<bool, TreeError> {
        let expanded = self.expansion.write().toggle(path);
        self.save_expansion_state();

        if expanded && !self.is_loaded(path) {
            self.ensure_loaded(path, source).await?;
        }
        Ok(expanded)
    }

    /// Expand and load every strict ancestor of `target`, root first.
    ///
    /// Fetches run one after another. A failing ancestor is recorded in the
    /// report and the walk moves on. The target itself is neither expanded nor
    /// loaded.
    pub async fn ensure_path_expanded(&self, target: &str, source: &Source) -> ExpansionReport {
        let target = path::normalize(target);
        let mut report = ExpansionReport::default();

        let mut chain = path::ancestors(&target);
        if chain.is_empty() {
            // Revealing the root still opens the root itself.
            chain.push(path::ROOT.to_string());
        }

        for ancestor in chain {
            let newly = {
                let mut expansion = self.expansion.write();
                if expansion.is_expanded(&ancestor) {
                    false
                } else {
                    expansion.set(&ancestor, true);
                    true
                }
            };
            if newly {
                report.newly_expanded.push(ancestor.clone());
            }

            if self.is_loaded(&ancestor) {
                continue;
            }
            match self.ensure_loaded(&ancestor, source).await {
                Ok(LoadOutcome::Loaded { .. }) => report.fetched.push(ancestor),
                Ok(_) => {}
                Err(_) => report.failed.push(ancestor),
            }
        }

        self.save_expansion_state();
        report
    }

    /// Drop every cached node. Expansion state is kept.
    pub fn reset_cache(&self) {
        self.cache.write().clear();
        info!("Tree cache reset");
    }

    /// Forget all expansion choices, in memory and in storage.
    pub fn clear_expansion(&self) -> Result<(), TreeError> {
        self.saver.discard()?;
        Ok(())
    }

    /// Schedule a debounced write of the expansion state.
    pub fn save_expansion_state(&self) {
        self.saver.schedule();
    }

    /// Write any pending expansion state now. Returns whether a write happened.
    pub fn flush(&self) -> Result<bool, TreeError> {
        Ok(self.saver.flush()?)
    }

    pub fn node(&self, path: &str) -> Option<TreeNode> {
        self.cache.read().get(path).cloned()
    }

    pub fn children(&self, path: &str) -> Vec<String> {
        self.cache
            .read()
            .get(path)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.cache.read().is_loaded(path)
    }

    pub fn is_loading(&self, path: &str) -> bool {
        self.cache.read().is_loading(path)
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expansion.read().is_expanded(path)
    }

    pub fn nodes(&self) -> HashMap<String, TreeNode> {
        self.cache.read().nodes().clone()
    }

    pub fn expansion(&self) -> ExpansionState {
        self.expansion.read().clone()
    }

    /// Depth-first rows of the tree as a renderer would show it: every cached
    /// node reachable from the root through expanded directories.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let cache = self.cache.read();
        let expansion = self.expansion.read();
        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![path::ROOT.to_string()];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(node) = cache.get(&current) else {
                continue;
            };
            let expanded = expansion.is_expanded(&current);
            rows.push(VisibleRow {
                path: node.path.clone(),
                name: node.name.clone(),
                depth: path::depth(&node.path),
                expanded,
                loaded: node.loaded,
                loading: node.loading,
            });
            if expanded {
                stack.extend(node.children.iter().rev().cloned());
            }
        }
        rows
    }
}
