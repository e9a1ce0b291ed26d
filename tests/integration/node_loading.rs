use crate::integration::support::{memory_store, sample_source, ScriptedSource};
use sharetree::source::{DirectoryEntry, DirectoryListing};
use sharetree::{LoadOutcome, Source, TreeError, TreeStore};
use std::sync::Arc;

#[tokio::test]
async fn root_listing_scenario() {
    let source = Arc::new(sample_source());
    let (store, _) = memory_store(source.clone());

    store.ensure_loaded("", &Source::Private).await.unwrap();

    let root = store.node("").unwrap();
    assert_eq!(root.children, vec!["/docs"]);
    assert!(root.loaded);
    let docs = store.node("/docs").unwrap();
    assert!(!docs.loaded);
    assert_eq!(docs.name, "docs");
    assert!(store.node("/note.txt").is_none());
    assert_eq!(source.calls(), vec!["/"]);
}

#[tokio::test]
async fn repeated_loads_never_duplicate_nodes() {
    let source = Arc::new(sample_source());
    let (store, _) = memory_store(source.clone());

    store.ensure_loaded("", &Source::Private).await.unwrap();
    let first = store.nodes();
    store.ensure_loaded("", &Source::Private).await.unwrap();
    let second = store.nodes();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn directory_entries_keep_source_order() {
    let source = Arc::new(ScriptedSource::new().with_listing(
        "/mixed",
        vec![
            DirectoryEntry::directory("zeta", "/mixed/zeta"),
            DirectoryEntry::file("a.txt", "/mixed/a.txt"),
            DirectoryEntry::directory("alpha", "mixed/alpha"),
            DirectoryEntry::file("b.bin", "/mixed/b.bin"),
            DirectoryEntry::directory("mid", "/mixed/mid/"),
        ],
    ));
    let (store, _) = memory_store(source);

    let outcome = store.ensure_loaded("/mixed", &Source::Private).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { children: 3 });
    assert_eq!(
        store.children("/mixed"),
        vec!["/mixed/zeta", "/mixed/alpha", "/mixed/mid"]
    );
    assert_eq!(store.nodes().len(), 4);
}

#[tokio::test]
async fn concurrent_load_of_same_path_fetches_once() {
    let source = Arc::new(ScriptedSource::gated().with_listing(
        "/",
        vec![DirectoryEntry::directory("docs", "/docs")],
    ));
    let (store, _) = memory_store(source.clone());
    let store = Arc::new(store);

    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.ensure_loaded("", &Source::Private).await })
    };
    source.wait_entered().await;
    assert!(store.is_loading(""));

    let second = store.ensure_loaded("", &Source::Private).await.unwrap();
    assert_eq!(second, LoadOutcome::AlreadyLoading);
    assert_eq!(source.calls().len(), 1);

    source.release(1);
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, LoadOutcome::Loaded { children: 1 });
    assert!(!store.is_loading(""));
    assert_eq!(source.calls().len(), 1);
}

#[tokio::test]
async fn joined_loads_of_same_path_fetch_once() {
    let source = Arc::new(ScriptedSource::gated().with_listing(
        "/docs",
        vec![DirectoryEntry::directory("2024", "/docs/2024")],
    ));
    let (store, _) = memory_store(source.clone());

    let (first, second, _) = futures::join!(
        store.ensure_loaded("/docs", &Source::Private),
        store.ensure_loaded("/docs", &Source::Private),
        async {
            source.wait_entered().await;
            source.release(1);
        }
    );

    assert_eq!(first.unwrap(), LoadOutcome::Loaded { children: 1 });
    assert_eq!(second.unwrap(), LoadOutcome::AlreadyLoading);
    assert_eq!(source.calls(), vec!["/docs"]);
    assert!(!store.is_loading("/docs"));
}

#[tokio::test]
async fn entry_without_path_is_keyed_by_name() {
    let listing: DirectoryListing =
        serde_json::from_str(r#"{"items":[{"name":"docs","isDir":true}]}"#).unwrap();
    let source = Arc::new(
        ScriptedSource::new()
            .with_listing("/", listing.items)
            .with_listing("/docs", vec![DirectoryEntry::directory("2024", "/docs/2024")]),
    );
    let (store, _) = memory_store(source.clone());

    store.ensure_path_expanded("/docs/2024", &Source::Private).await;

    assert_eq!(store.children(""), vec!["/docs"]);
    assert_eq!(store.node("/docs").unwrap().name, "docs");
    assert_eq!(source.calls(), vec!["/", "/docs"]);
    let rows: Vec<String> = store.visible_rows().into_iter().map(|r| r.path).collect();
    assert_eq!(rows, vec!["", "/docs", "/docs/2024"]);
}

#[tokio::test]
async fn entry_pointing_at_parent_is_skipped() {
    let source = Arc::new(
        ScriptedSource::new()
            .with_listing(
                "/",
                vec![
                    DirectoryEntry::directory("loop", "/"),
                    DirectoryEntry::directory("docs", "/docs"),
                ],
            )
            .with_listing(
                "/docs",
                vec![
                    DirectoryEntry::directory("self", "/docs"),
                    DirectoryEntry::directory("up", "/"),
                ],
            ),
    );
    let (store, _) = memory_store(source);

    let outcome = store.ensure_loaded("", &Source::Private).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { children: 1 });
    store.ensure_path_expanded("/docs/x", &Source::Private).await;

    assert_eq!(store.children(""), vec!["/docs"]);
    assert!(store.children("/docs").is_empty());
    assert!(store.is_loaded("/docs"));
    assert_eq!(store.visible_rows().len(), 2);
}

#[tokio::test]
async fn failed_fetch_resets_loading_without_marking_loaded() {
    let source = Arc::new(sample_source());
    source.fail("/docs");
    let (store, _) = memory_store(source);

    let err = store.ensure_loaded("/docs", &Source::Private).await.unwrap_err();
    assert!(matches!(err, TreeError::Fetch { ref path, .. } if path == "/docs"));

    let docs = store.node("/docs").unwrap();
    assert!(!docs.loaded);
    assert!(!docs.loading);
    assert!(docs.children.is_empty());
}

#[tokio::test]
async fn toggle_keeps_expansion_when_fetch_fails() {
    let source = Arc::new(sample_source());
    source.fail("/docs");
    let (store, _) = memory_store(source.clone());

    assert!(store.toggle("/docs", &Source::Private).await.is_err());
    assert!(store.is_expanded("/docs"));
    assert!(!store.is_loaded("/docs"));

    // Re-clicking collapses; a third click retries the fetch.
    assert!(!store.toggle("/docs", &Source::Private).await.unwrap());
    assert!(store.toggle("/docs", &Source::Private).await.is_err());
    assert_eq!(source.calls(), vec!["/docs", "/docs"]);
}

#[tokio::test]
async fn share_requests_carry_handle() {
    let source = Arc::new(sample_source());
    let (store, _) = memory_store(source.clone());

    let share = Source::from_flags(true, Some("abc"));
    store.ensure_loaded("", &share).await.unwrap();
    store.ensure_loaded("/docs", &share).await.unwrap();

    assert_eq!(source.calls(), vec!["abc:/", "abc:/docs"]);
    assert_eq!(store.children(""), vec!["/docs"]);
}

#[tokio::test]
async fn reset_during_fetch_discards_listing() {
    let source = Arc::new(ScriptedSource::gated().with_listing(
        "/",
        vec![DirectoryEntry::directory("docs", "/docs")],
    ));
    let (store, _) = memory_store(source.clone());
    let store: Arc<TreeStore> = Arc::new(store);

    let pending = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.ensure_loaded("", &Source::Private).await })
    };
    source.wait_entered().await;
    store.reset_cache();
    source.release(1);

    assert_eq!(pending.await.unwrap().unwrap(), LoadOutcome::Stale);
    assert!(store.nodes().is_empty());
}
