use crate::integration::support::{build_store, memory_store, sample_source};
use sharetree::persistence::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use sharetree::{ExpansionState, Source, StorageError, TreeError};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test(start_paused = true)]
async fn rapid_toggles_write_once_with_final_state() {
    let source = Arc::new(sample_source());
    let (store, preferences) = memory_store(source);

    for _ in 0..5 {
        store.toggle("/docs", &Source::Private).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(preferences.writes(), 0);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(preferences.writes(), 1);

    let saved: ExpansionState =
        serde_json::from_str(&preferences.get("expandedPaths").unwrap()).unwrap();
    assert!(saved.is_expanded("/docs"));
}

#[tokio::test(start_paused = true)]
async fn walk_persists_once_after_all_ancestors() {
    let source = Arc::new(sample_source());
    let (store, preferences) = memory_store(source);

    store.ensure_path_expanded("/docs/2024/q1", &Source::Private).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(preferences.writes(), 1);
    let saved = ExpansionState::load(preferences.as_ref(), "expandedPaths");
    assert_eq!(saved.expanded_paths(), vec!["", "/docs", "/docs/2024"]);
}

#[tokio::test]
async fn expansion_survives_rebuild_from_storage() {
    let source = Arc::new(sample_source());
    let preferences = Arc::new(MemoryPreferenceStore::new());

    let store = build_store(source.clone(), preferences.clone());
    store.toggle("/docs", &Source::Private).await.unwrap();
    store.toggle("/other", &Source::Private).await.unwrap();
    store.toggle("/other", &Source::Private).await.unwrap();
    assert!(store.flush().unwrap());

    let rebuilt = build_store(source, preferences);
    assert!(rebuilt.is_expanded("/docs"));
    assert!(!rebuilt.is_expanded("/other"));
    assert!(rebuilt.nodes().is_empty());
}

#[tokio::test]
async fn file_store_round_trip() {
    let temp = TempDir::new().unwrap();
    let source = Arc::new(sample_source());

    let preferences: Arc<dyn PreferenceStore> =
        Arc::new(FilePreferenceStore::new(temp.path().to_path_buf()));
    let store = build_store(source.clone(), preferences);
    store.ensure_path_expanded("/docs/2024", &Source::Private).await;
    store.flush().unwrap();

    let preferences: Arc<dyn PreferenceStore> =
        Arc::new(FilePreferenceStore::new(temp.path().to_path_buf()));
    let rebuilt = build_store(source, preferences);
    assert!(rebuilt.is_expanded(""));
    assert!(rebuilt.is_expanded("/docs"));
}

#[tokio::test]
async fn corrupt_storage_starts_empty() {
    let source = Arc::new(sample_source());
    let preferences = Arc::new(MemoryPreferenceStore::new().with_entry("expandedPaths", "[1, 2"));

    let store = build_store(source, preferences);
    assert!(store.expansion().is_empty());
    assert!(!store.is_expanded(""));
}

#[tokio::test]
async fn explicit_flush_reports_quota_errors() {
    let source = Arc::new(sample_source());
    let preferences = Arc::new(MemoryPreferenceStore::with_quota(8));
    let store = build_store(source, preferences.clone());

    store.toggle("/a/very/long/path", &Source::Private).await.unwrap();
    let err = store.flush().unwrap_err();
    assert!(matches!(
        err,
        TreeError::Storage(StorageError::QuotaExceeded { limit: 8, .. })
    ));
    assert_eq!(preferences.writes(), 0);
    assert!(!store.flush().unwrap());
}
