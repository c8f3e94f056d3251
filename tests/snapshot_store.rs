// tests/snapshot_store.rs
//
// FileStore against real files in the temp dir.
//
use std::fs;
use std::path::PathBuf;

use wiki_watch::store::{FileStore, Snapshot, SnapshotStore};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("wiki_watch_store_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

#[test]
fn missing_file_loads_empty() {
    let dir = tmp_dir("missing");
    let store = FileStore::new(dir.join("snapshot.json"));
    let snap = store.load();
    assert!(snap.is_empty());
    assert_eq!(snap, Snapshot::default());
}

#[test]
fn corrupt_file_loads_empty() {
    let dir = tmp_dir("corrupt");
    let path = dir.join("snapshot.json");
    fs::write(&path, "{ this is not json").unwrap();
    assert!(FileStore::new(&path).load().is_empty());

    fs::write(&path, "").unwrap();
    assert!(FileStore::new(&path).load().is_empty());
}

#[test]
fn save_then_load_returns_same_snapshot() {
    let dir = tmp_dir("roundtrip");
    let store = FileStore::new(dir.join("snapshot.json"));
    let snap = Snapshot::observed(12, "<p>body with \"quotes\" and 日本語</p>");
    store.save(&snap).unwrap();
    assert_eq!(store.load(), snap);
}

#[test]
fn save_replaces_previous_state_and_leaves_no_temp_file() {
    let dir = tmp_dir("replace");
    let store = FileStore::new(dir.join("snapshot.json"));
    store.save(&Snapshot::observed(1, "<p>old</p>")).unwrap();
    store.save(&Snapshot::observed(2, "<p>new</p>")).unwrap();

    assert_eq!(store.load(), Snapshot::observed(2, "<p>new</p>"));
    let names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["snapshot.json"]);
}

#[test]
fn save_creates_parent_directories() {
    let dir = tmp_dir("nested");
    let path = dir.join("a").join("b").join("snapshot.json");
    let store = FileStore::new(&path);
    store.save(&Snapshot::observed(3, "x")).unwrap();
    assert!(path.is_file());
}

#[test]
fn file_layout_is_version_and_body() {
    let dir = tmp_dir("layout");
    let path = dir.join("snapshot.json");
    FileStore::new(&path).save(&Snapshot::observed(7, "<p>b</p>")).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], 7);
    assert_eq!(json["body"], "<p>b</p>");
}

#[test]
fn partial_record_is_accepted() {
    let dir = tmp_dir("partial");
    let path = dir.join("snapshot.json");
    fs::write(&path, r#"{ "version": 4 }"#).unwrap();
    let snap = FileStore::new(&path).load();
    assert_eq!(snap.version, Some(4));
    assert_eq!(snap.body, None);
}
