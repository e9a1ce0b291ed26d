//! CLI Tooling
//!
//! Command-line front end for the tree store: reveal paths, toggle directories
//! and inspect the persisted expansion state against a running file server.

use crate::config::{ConfigLoader, TreeConfig};
use crate::error::TreeError;
use crate::persistence::{FilePreferenceStore, PreferenceStore};
use crate::source::{HttpFileSource, HttpShareSource, Source, SourceSelector};
use crate::store::{LoadOutcome, TreeStore, VisibleRow};
use crate::tree::path;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// sharetree - browse a file server's directory tree from the terminal
#[derive(Parser)]
#[command(name = "sharetree")]
#[command(about = "Lazy directory tree for private files and public shares")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for persisted expansion state
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Server base URL (overrides config)
    #[arg(long)]
    pub server: Option<String>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand every ancestor of a path and print the visible tree
    Reveal {
        /// Path to reveal
        path: String,
        /// Share hash to browse instead of the private file API
        #[arg(long)]
        share: Option<String>,
        /// Share password for protected shares (overrides config)
        #[arg(long)]
        password: Option<String>,
    },
    /// Toggle a directory open or closed
    Toggle {
        /// Directory path
        path: String,
        /// Share hash to browse instead of the private file API
        #[arg(long)]
        share: Option<String>,
        /// Share password for protected shares (overrides config)
        #[arg(long)]
        password: Option<String>,
    },
    /// List persisted expanded paths
    Expanded,
    /// Forget all persisted expansion state
    Forget,
}

impl Commands {
    fn password(&self) -> Option<&str> {
        match self {
            Commands::Reveal { password, .. } | Commands::Toggle { password, .. } => {
                password.as_deref()
            }
            Commands::Expanded | Commands::Forget => None,
        }
    }
}

/// Everything a command needs: resolved config and the tree store.
pub struct CliContext {
    config: TreeConfig,
    store: TreeStore,
}

impl CliContext {
    pub fn new(cli: &Cli) -> Result<Self, TreeError> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;
        if let Some(server) = &cli.server {
            config.server.base_url = server.clone();
        }
        if let Some(password) = cli.command.password() {
            config.server.share_password = Some(password.to_string());
        }
        if let Some(dir) = &cli.state_dir {
            config.store.state_dir = Some(dir.clone());
        }

        if cli.verbose {
            crate::logging::init_logging(Some(&config.logging))?;
        }

        let preferences: Arc<dyn PreferenceStore> = match &config.store.state_dir {
            Some(dir) => Arc::new(FilePreferenceStore::new(dir.clone())),
            None => Arc::new(FilePreferenceStore::in_state_dir()?),
        };
        let sources = SourceSelector::new(
            Arc::new(HttpFileSource::from_config(&config.server)?),
            Arc::new(HttpShareSource::from_config(&config.server)?),
        );
        let store = TreeStore::new(sources, preferences, &config.store);

        Ok(Self { config, store })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Run a command and return its printable output. Pending expansion state
    /// is flushed before returning.
    pub async fn execute(&self, command: &Commands) -> Result<String, TreeError> {
        let output = match command {
            Commands::Reveal { path, share, .. } => {
                let source = Source::from_flags(share.is_some(), share.as_deref());
                Ok(reveal_tree(&self.store, path, &source).await)
            }
            Commands::Toggle { path, share, .. } => self.toggle(path, share.as_deref()).await,
            Commands::Expanded => Ok(self
                .store
                .expansion()
                .expanded_paths()
                .iter()
                .map(|p| display_path(p))
                .collect::<Vec<_>>()
                .join("\n")),
            Commands::Forget => {
                self.store.clear_expansion()?;
                Ok("Expansion state cleared".to_string())
            }
        };

        self.store.flush()?;
        output
    }

    async fn toggle(&self, target: &str, share: Option<&str>) -> Result<String, TreeError> {
        let source = Source::from_flags(share.is_some(), share);
        let target = path::normalize(target);
        let expanded = self.store.toggle(&target, &source).await?;

        let state = if expanded { "expanded" } else { "collapsed" };
        let mut out = format!("{} {}\n", display_path(&target), state);
        if expanded {
            for child in self.store.children(&target) {
                let _ = writeln!(out, "  {}", path::display_name(&child, ""));
            }
        }
        Ok(out.trim_end().to_string())
    }
}

/// Reveal `target` and render the resulting tree.
///
/// Every ancestor is expanded and loaded, then the target itself is loaded so
/// its subdirectories are listed under it. Failed loads are appended as `!` lines.
pub async fn reveal_tree(store: &TreeStore, target: &str, source: &Source) -> String {
    let target = path::normalize(target);
    let mut report = store.ensure_path_expanded(&target, source).await;
    if !store.is_loaded(&target) {
        match store.ensure_loaded(&target, source).await {
            Ok(LoadOutcome::Loaded { .. }) => report.fetched.push(target.clone()),
            Ok(_) => {}
            Err(_) => report.failed.push(target.clone()),
        }
    }
    info!(
        path = %display_path(&target),
        expanded = report.newly_expanded.len(),
        failed = report.failed.len(),
        "Revealed path"
    );

    let mut rows = store.visible_rows();
    if !store.is_expanded(&target) {
        if let Some(at) = rows.iter().position(|row| row.path == target) {
            let depth = rows[at].depth + 1;
            let children: Vec<VisibleRow> = store
                .children(&target)
                .iter()
                .filter_map(|child| store.node(child))
                .map(|node| VisibleRow {
                    path: node.path,
                    name: node.name,
                    depth,
                    expanded: false,
                    loaded: node.loaded,
                    loading: node.loading,
                })
                .collect();
            let tail = rows.split_off(at + 1);
            rows.extend(children);
            rows.extend(tail);
        }
    }

    let mut out = render_rows(&rows, Some(target.as_str()));
    for failed in &report.failed {
        let _ = writeln!(out, "! failed to load {}", display_path(failed));
    }
    out.trim_end().to_string()
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Indented text rendering of visible rows; `mark` flags one path.
pub fn render_rows(rows: &[VisibleRow], mark: Option<&str>) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = if row.expanded { "v" } else { ">" };
        let suffix = if mark == Some(row.path.as_str()) { "  <" } else { "" };
        let _ = writeln!(
            out,
            "{}{} {}{}",
            "  ".repeat(row.depth),
            marker,
            row.name,
            suffix
        );
    }
    out
}
