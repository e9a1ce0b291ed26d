//! Sharetree: Lazy Directory Tree for File-Sharing Clients
//!
//! Caches directory listings fetched on demand from a private file API or a public
//! share, tracks which directories are expanded, and persists that expansion state
//! with a debounced writer.

pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod source;
pub mod store;
pub mod tooling;
pub mod tree;

pub use error::{BackendError, StorageError, TreeError};
pub use source::{Source, SourceSelector};
pub use store::{ExpansionReport, ExpansionState, LoadOutcome, TreeStore, VisibleRow};
pub use tree::TreeNode;
