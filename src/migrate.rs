use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Schema version stamped on every serialized document.
pub const SCHEMA_VERSION: u32 = 3;

type MigrationFn = fn(&mut Map<String, Value>) -> anyhow::Result<()>;

/// Each entry upgrades a document from `version - 1` to `version`, applied
/// in order, one version at a time.
static MIGRATIONS: &[(u32, MigrationFn)] = &[
    (2, notification_read_flags),
    (3, task_completion_and_roles),
];

/// Upgrade a serialized document to [`SCHEMA_VERSION`]. A document already
/// at (or past) the target is returned unchanged.
pub fn migrate_document(mut doc: Value, from: u32) -> AppResult<Value> {
    if from >= SCHEMA_VERSION {
        return Ok(doc);
    }
    let Some(obj) = doc.as_object_mut() else {
        return Err(AppError::new(
            "MIGRATE/NOT_OBJECT",
            "Document root must be a JSON object",
        ));
    };
    for (version, step) in MIGRATIONS {
        if *version <= from {
            continue;
        }
        step(obj).map_err(|err| {
            AppError::new("MIGRATE/STEP", err.to_string())
                .with_context("target_version", version.to_string())
        })?;
        obj.insert("version".into(), json!(version));
        info!(target: "opsdesk", event = "migration_applied", version);
    }
    Ok(doc)
}

/// v1 → v2: notifications predate the read flag, and settings predate the
/// motion section.
fn notification_read_flags(doc: &mut Map<String, Value>) -> anyhow::Result<()> {
    if let Some(entries) = doc.get_mut("notifications").and_then(Value::as_array_mut) {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            entry.entry("read").or_insert(Value::Bool(false));
        }
    }
    if let Some(settings) = doc.get_mut("settings").and_then(Value::as_object_mut) {
        settings.entry("motion").or_insert(json!({
            "enableAnimations": true,
            "transitionMs": 180,
            "reduceMotion": false,
        }));
    }
    Ok(())
}

/// v2 → v3: task completion was renamed from `done`, and users gained roles.
fn task_completion_and_roles(doc: &mut Map<String, Value>) -> anyhow::Result<()> {
    if let Some(events) = doc.get_mut("events").and_then(Value::as_array_mut) {
        for event in events.iter_mut().filter_map(Value::as_object_mut) {
            let Some(tasks) = event.get_mut("tasks").and_then(Value::as_array_mut) else {
                continue;
            };
            for task in tasks.iter_mut().filter_map(Value::as_object_mut) {
                if let Some(done) = task.remove("done") {
                    task.insert("isCompleted".into(), done);
                } else {
                    task.entry("isCompleted").or_insert(Value::Bool(false));
                }
            }
        }
    }
    if let Some(users) = doc.get_mut("users").and_then(Value::as_array_mut) {
        for user in users.iter_mut().filter_map(Value::as_object_mut) {
            user.entry("role").or_insert(Value::String("Staff".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_document() -> Value {
        json!({
            "version": 1,
            "notifications": [
                {"id": "n1", "title": "t", "message": "m", "type": "info",
                 "timestamp": "2024-01-01T00:00:00Z"}
            ],
            "events": [
                {"id": "e1", "title": "Gala", "status": "Planned",
                 "tasks": [{"description": "book room", "done": true}]}
            ],
            "users": [{"id": "u1", "name": "Dana"}],
            "settings": {"themeMode": "dark"}
        })
    }

    #[test]
    fn migrates_one_version_at_a_time_to_current() {
        let out = migrate_document(v1_document(), 1).unwrap();
        assert_eq!(out["version"], json!(SCHEMA_VERSION));
        assert_eq!(out["notifications"][0]["read"], json!(false));
        assert_eq!(out["events"][0]["tasks"][0]["isCompleted"], json!(true));
        assert!(out["events"][0]["tasks"][0].get("done").is_none());
        assert_eq!(out["users"][0]["role"], json!("Staff"));
        assert!(out["settings"]["motion"].is_object());
    }

    #[test]
    fn document_at_target_version_is_untouched() {
        let doc = json!({"version": SCHEMA_VERSION, "events": []});
        let out = migrate_document(doc.clone(), SCHEMA_VERSION).unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn migrated_output_is_stable_when_rerun() {
        let once = migrate_document(v1_document(), 1).unwrap();
        let twice = migrate_document(once.clone(), SCHEMA_VERSION).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn non_object_roots_are_rejected() {
        let err = migrate_document(json!([1, 2, 3]), 1).unwrap_err();
        assert_eq!(err.code(), "MIGRATE/NOT_OBJECT");
    }
}
