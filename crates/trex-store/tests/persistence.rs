//! Hash store persistence over the JSON file backend.

use std::fs;
use trex_store::{FileBackend, HashStore, KvBackend};

#[test]
fn hash_store_preserves_foreign_bookkeeping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(
        &path,
        r#"{"internal__trex__last_update_check": "2024-01-01", "theme": "dark"}"#,
    )
    .unwrap();

    let store = HashStore::new(FileBackend::open(&path).unwrap());
    assert!(!store.has_any_hash().unwrap());
    store.set_hash("oak", "deadbeef").unwrap();

    let reopened = FileBackend::open(&path).unwrap();
    let all = reopened.list_all().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all.get("theme").map(String::as_str), Some("dark"));
    assert_eq!(
        all.get("internal__trex__hash:oak").map(String::as_str),
        Some("deadbeef")
    );
}

#[test]
fn non_string_bookkeeping_survives_hash_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(
        &path,
        r#"{"internal__trex__last_check": 1700000000, "prefs": {"color": true}}"#,
    )
    .unwrap();

    let store = HashStore::new(FileBackend::open(&path).unwrap());
    assert!(!store.has_any_hash().unwrap());
    store.set_hash("oak", "deadbeef").unwrap();
    assert_eq!(store.get_hash("oak").unwrap().as_deref(), Some("deadbeef"));

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({
            "internal__trex__hash:oak": "deadbeef",
            "internal__trex__last_check": 1_700_000_000,
            "prefs": {"color": true}
        })
    );
}

#[test]
fn stale_entries_survive_later_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let store = HashStore::new(FileBackend::open(&path).unwrap());
        store.set_hash("removed", "h1").unwrap();
    }

    let store = HashStore::new(FileBackend::open(&path).unwrap());
    store.set_hash("kept", "h2").unwrap();

    let hashes = store.hashes().unwrap();
    assert_eq!(hashes.get("removed").map(String::as_str), Some("h1"));
    assert_eq!(hashes.get("kept").map(String::as_str), Some("h2"));
}

#[test]
fn store_file_is_written_atomically_as_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");
    let store = HashStore::new(FileBackend::open(&path).unwrap());
    store.set_hash("a", "1").unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed["internal__trex__hash:a"], "1");

    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n != "storage.json" && n != ".storage.json.lock")
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}
