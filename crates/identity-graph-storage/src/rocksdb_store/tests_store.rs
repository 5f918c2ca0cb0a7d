//! Store adapter tests: ordering, cursors, prefix isolation, persistence.

use tempfile::TempDir;

use identity_graph_core::error::StoreError;
use identity_graph_core::traits::KeyValueStore;

use super::config::RocksDbConfig;
use super::store::RocksDbKeyValueStore;

fn create_temp_store() -> (TempDir, RocksDbKeyValueStore) {
    let tmp = TempDir::new().expect("create temp dir");
    let store = RocksDbKeyValueStore::open(tmp.path()).expect("open store");
    (tmp, store)
}

async fn seed(store: &RocksDbKeyValueStore, keys: &[&str]) {
    for key in keys {
        store.put(key, b"{}".to_vec()).await.expect("seed put");
    }
}

#[tokio::test]
async fn open_creates_database() {
    let tmp = TempDir::new().expect("create temp dir");
    let store = RocksDbKeyValueStore::open(tmp.path()).expect("open store");
    assert!(tmp.path().exists());
    assert_eq!(store.path(), tmp.path().to_string_lossy());
}

#[tokio::test]
async fn open_with_custom_config() {
    let tmp = TempDir::new().expect("create temp dir");
    let config = RocksDbConfig {
        max_open_files: 64,
        block_cache_size: 16 * 1024 * 1024,
        ..Default::default()
    };
    let store = RocksDbKeyValueStore::open_with_config(tmp.path(), config).expect("open store");
    store.put("k", b"v".to_vec()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
}

#[tokio::test]
async fn get_absent_key_is_none() {
    let (_tmp, store) = create_temp_store();
    assert_eq!(store.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn put_overwrites() {
    let (_tmp, store) = create_temp_store();
    store.put("k", b"v1".to_vec()).await.unwrap();
    store.put("k", b"v2".to_vec()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(b"v2".to_vec()));
}

#[tokio::test]
async fn delete_succeeds_for_absent_key() {
    let (_tmp, store) = create_temp_store();
    store.delete("never-existed").await.unwrap();

    store.put("k", b"v".to_vec()).await.unwrap();
    store.delete("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn list_is_lexicographic_and_prefix_bounded() {
    let (_tmp, store) = create_temp_store();
    seed(&store, &["node:c", "node:a", "edge:x", "node:b", "nodes:q"]).await;

    let page = store.list("node:", 10, None).await.unwrap();
    assert_eq!(page.keys, vec!["node:a", "node:b", "node:c"]);
    assert!(page.complete);
    assert!(page.cursor.is_none());
}

#[tokio::test]
async fn list_paginates_without_skipping() {
    let (_tmp, store) = create_temp_store();
    seed(&store, &["k:1", "k:2", "k:3", "k:4", "k:5"]).await;

    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = store.list("k:", 2, cursor.as_deref()).await.unwrap();
        collected.extend(page.keys.clone());
        if page.complete {
            break;
        }
        cursor = page.cursor;
    }
    assert_eq!(collected, vec!["k:1", "k:2", "k:3", "k:4", "k:5"]);
}

#[tokio::test]
async fn list_rejects_foreign_cursor() {
    let (_tmp, store) = create_temp_store();
    seed(&store, &["a:1", "b:1"]).await;
    let err = store.list("a:", 10, Some("b:1")).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidCursor { .. }));
}

#[tokio::test]
async fn values_survive_reopen() {
    let tmp = TempDir::new().expect("create temp dir");
    {
        let store = RocksDbKeyValueStore::open(tmp.path()).expect("open store");
        store.put("persist", b"yes".to_vec()).await.unwrap();
        store.flush().unwrap();
    }
    let store = RocksDbKeyValueStore::open(tmp.path()).expect("reopen store");
    assert_eq!(store.get("persist").await.unwrap(), Some(b"yes".to_vec()));
}
