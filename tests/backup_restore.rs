use opsdesk::{backup, JsonFileStore, RestoreError, StoreHandle, SCHEMA_VERSION};
use serde_json::json;
use tempfile::tempdir;

#[path = "util.rs"]
mod util;

#[test]
fn export_import_round_trip_through_a_file_store() {
    let dir = tempdir().unwrap();
    let store_path = dir.path().join("state.json");
    let store = StoreHandle::open(JsonFileStore::new(&store_path)).unwrap();
    util::seed_event_with_task(&store, "Summer Fete", 12);
    util::seed_users(&store);

    let backup_path =
        backup::export_to_file(&store.snapshot(), &dir.path().join("backups"), "opsdesk").unwrap();

    // A fresh store imports the file and ends up with the exact same tree.
    let other = StoreHandle::in_memory();
    let restored = backup::import_from_file(&other, &backup_path).unwrap();
    assert_eq!(restored, store.snapshot());
    assert_eq!(other.snapshot(), store.snapshot());
}

#[test]
fn future_version_aborts_without_touching_state() {
    let (store, _center) = util::memory_center();
    util::seed_event_with_task(&store, "Keep Me", 5);
    let before = store.snapshot();

    let doc = json!({"version": SCHEMA_VERSION + 1, "events": []});
    let err = backup::apply_restore(&store, doc).unwrap_err();
    assert_eq!(err.code(), "BACKUP/FUTURE_VERSION");
    assert_eq!(store.snapshot(), before);
}

#[test]
fn older_version_migrates_then_applies() {
    let (store, _center) = util::memory_center();
    let doc = json!({
        "version": 1,
        "events": [
            {"id": "e1", "title": "Legacy Gala", "status": "Planned",
             "tasks": [{"description": "send invites", "done": false}]}
        ],
        "users": [{"id": "u1", "name": "Pat"}]
    });

    let state = backup::apply_restore(&store, doc).unwrap();
    assert_eq!(state.events[0].title, "Legacy Gala");
    assert!(!state.events[0].tasks[0].is_completed);
    assert_eq!(store.snapshot(), state);
}

#[test]
fn version_tag_must_be_a_number() {
    let err = backup::restore(json!({"version": "2", "events": []})).unwrap_err();
    assert!(matches!(err, RestoreError::MalformedDocument));
}

#[test]
fn legacy_store_files_are_migrated_at_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        serde_json::to_vec_pretty(&json!({
            "version": 2,
            "users": [{"id": "u1", "name": "Pat"}]
        }))
        .unwrap(),
    )
    .unwrap();

    let store = StoreHandle::open(JsonFileStore::new(&path)).unwrap();
    assert_eq!(store.snapshot().users[0].role, opsdesk::UserRole::Staff);
}

#[test]
fn reload_discards_in_memory_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = StoreHandle::open(JsonFileStore::new(&path)).unwrap();
    util::seed_users(&store);

    // Clobber the committed file from a second handle, then reload.
    let other = StoreHandle::open(JsonFileStore::new(&path)).unwrap();
    other.mutate(|state| state.users.clear()).unwrap();

    let fresh = store.reload().unwrap();
    assert!(fresh.users.is_empty());
    assert!(store.snapshot().users.is_empty());
}
