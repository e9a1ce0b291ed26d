use crate::integration::support::{memory_store, sample_source};
use sharetree::tooling::reveal_tree;
use sharetree::Source;
use std::sync::Arc;

#[tokio::test]
async fn reveal_loads_target_and_lists_its_children() {
    let source = Arc::new(sample_source());
    let (store, _) = memory_store(source.clone());

    let out = reveal_tree(&store, "/docs/", &Source::Private).await;

    assert_eq!(out, "v Root\n  > docs  <\n    > 2024");
    assert_eq!(source.calls(), vec!["/", "/docs"]);
    assert!(store.is_loaded("/docs"));
    assert!(!store.is_expanded("/docs"));
}

#[tokio::test]
async fn reveal_of_root_shows_top_level() {
    let source = Arc::new(sample_source());
    let (store, _) = memory_store(source.clone());

    let out = reveal_tree(&store, "/", &Source::Private).await;

    assert_eq!(out, "v Root  <\n  > docs");
    assert_eq!(source.calls(), vec!["/"]);
}

#[tokio::test]
async fn reveal_reports_failed_target() {
    let source = Arc::new(sample_source());
    source.fail("/docs");
    let (store, _) = memory_store(source.clone());

    let out = reveal_tree(&store, "/docs", &Source::from_flags(true, Some("h1"))).await;

    assert!(out.starts_with("v Root\n  > docs  <"));
    assert!(out.ends_with("! failed to load /docs"));
    assert_eq!(source.calls(), vec!["h1:/", "h1:/docs"]);
}
