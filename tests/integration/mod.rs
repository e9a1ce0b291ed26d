//! Integration tests for the sharetree tree store

mod cli_reveal;
mod node_loading;
mod persistence_roundtrip;
