//! Directory sources and backend selection
//!
//! A listing comes either from the authenticated file API or from a public share.
//! [`SourceSelector`] routes each request to the right one based on [`Source`].

pub mod http;

use crate::error::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use http::{HttpFileSource, HttpShareSource};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
}

impl DirectoryEntry {
    pub fn directory(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            is_dir: true,
        }
    }

    pub fn file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            is_dir: false,
        }
    }
}

/// Listing body returned by both APIs. Fields other than `items` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub items: Vec<DirectoryEntry>,
}

impl DirectoryListing {
    pub fn new(items: Vec<DirectoryEntry>) -> Self {
        Self { items }
    }
}

/// Which API a request is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Authenticated file API.
    Private,
    /// Public share identified by its handle.
    Share(String),
}

impl Source {
    /// Build a source from the UI's `(is_share, share_handle)` pair.
    ///
    /// A share flag without a non-empty handle falls back to the private API.
    pub fn from_flags(is_share: bool, share_handle: Option<&str>) -> Self {
        match share_handle {
            Some(handle) if is_share && !handle.is_empty() => Source::Share(handle.to_string()),
            _ => Source::Private,
        }
    }

    pub fn is_share(&self) -> bool {
        matches!(self, Source::Share(_))
    }
}

/// Listing access to the authenticated file API.
#[async_trait]
pub trait PrivateDirectorySource: Send + Sync {
    async fn fetch_directory(&self, path: &str) -> Result<DirectoryListing, BackendError>;
}

/// Listing access to a public share.
#[async_trait]
pub trait PublicDirectorySource: Send + Sync {
    async fn fetch_directory(
        &self,
        share: &str,
        path: &str,
    ) -> Result<DirectoryListing, BackendError>;
}

/// Routes listing requests to the private or public source.
#[derive(Clone)]
pub struct SourceSelector {
    private: Arc<dyn PrivateDirectorySource>,
    public: Arc<dyn PublicDirectorySource>,
}

impl SourceSelector {
    pub fn new(
        private: Arc<dyn PrivateDirectorySource>,
        public: Arc<dyn PublicDirectorySource>,
    ) -> Self {
        Self { private, public }
    }

    /// Fetch the listing at `address`, which must already carry a leading `/`.
    pub async fn fetch(
        &self,
        source: &Source,
        address: &str,
    ) -> Result<DirectoryListing, BackendError> {
        match source {
            Source::Private => self.private.fetch_directory(address).await,
            Source::Share(handle) => self.public.fetch_directory(handle, address).await,
        }
    }
}
