use super::*;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn file_store_returns_none_for_missing_key() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert!(store.read_json(PLAYLISTS_KEY).unwrap().is_none());
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempdir().unwrap();
    {
        let mut store = FileStore::open(dir.path()).unwrap();
        store
            .write_json(RECENTLY_PLAYED_KEY, &json!([{"id": "1"}]))
            .unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    let v = store.read_json(RECENTLY_PLAYED_KEY).unwrap().unwrap();
    assert_eq!(v, json!([{"id": "1"}]));
    assert!(dir.path().join("recentlyPlayed.json").is_file());
    assert!(!dir.path().join("recentlyPlayed.json.tmp").exists());
}

#[test]
fn file_store_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut store = FileStore::open(&nested).unwrap();
    store.write_json("k", &json!(1)).unwrap();
    assert!(nested.join("k.json").is_file());
}

#[test]
fn file_store_sanitizes_keys() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.write_json("../escape", &json!(true)).unwrap();
    assert!(dir.path().join("escape.json").is_file());
}

#[test]
fn file_store_reports_malformed_json() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("playlists.json"), b"{not json").unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert!(matches!(
        store.read_json(PLAYLISTS_KEY),
        Err(StoreError::Json(_))
    ));
}

#[test]
fn memory_store_overwrites() {
    let mut store = MemoryStore::new();
    store.write_json("k", &json!(1)).unwrap();
    store.write_json("k", &json!(2)).unwrap();
    assert_eq!(store.read_json("k").unwrap(), Some(json!(2)));
}
