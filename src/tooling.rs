//! Tooling
//!
//! Command-line front end over the tree store.

pub mod cli;

pub use cli::{reveal_tree, Cli, CliContext, Commands};
