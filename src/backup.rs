use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::migrate::{migrate_document, SCHEMA_VERSION};
use crate::model::ApplicationState;
use crate::store::{write_atomic, StoreHandle};

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("backup document has no numeric version tag")]
    MalformedDocument,
    #[error("backup version {found} is newer than this build supports ({supported})")]
    FutureVersion { found: u32, supported: u32 },
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("backup document could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<RestoreError> for AppError {
    fn from(err: RestoreError) -> Self {
        let code = match &err {
            RestoreError::MalformedDocument => "BACKUP/MALFORMED",
            RestoreError::FutureVersion { .. } => "BACKUP/FUTURE_VERSION",
            RestoreError::Migration(_) => "BACKUP/MIGRATION",
            RestoreError::Decode(_) => "BACKUP/DECODE",
        };
        AppError::new(code, err.to_string())
    }
}

/// Deterministic, version-tagged document of the full state tree.
pub fn serialize(state: &ApplicationState) -> AppResult<Value> {
    let mut doc = serde_json::to_value(state)
        .map_err(|err| AppError::from(err).with_context("operation", "serialize_state"))?;
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("version".into(), json!(SCHEMA_VERSION));
    }
    Ok(doc)
}

/// Decode a backup document, migrating it forward when it is behind.
/// All-or-nothing: any failure leaves the caller's state untouched.
pub fn restore(doc: Value) -> Result<ApplicationState, RestoreError> {
    let tag = doc.get("version").ok_or(RestoreError::MalformedDocument)?;
    let found = if let Some(v) = tag.as_u64() {
        v as u32
    } else if let Some(v) = tag.as_f64() {
        // Some producers write every JSON number as a float.
        v as u32
    } else {
        return Err(RestoreError::MalformedDocument);
    };

    if found > SCHEMA_VERSION {
        return Err(RestoreError::FutureVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    let doc = if found < SCHEMA_VERSION {
        migrate_document(doc, found).map_err(|err| RestoreError::Migration(err.to_string()))?
    } else {
        doc
    };
    Ok(serde_json::from_value(doc)?)
}

/// Restore and commit: on success the document fully replaces the current
/// state, never merges into it. Safe to call from a late file-read callback;
/// the handle clone keeps working after the session that spawned it moved on.
pub fn apply_restore(store: &StoreHandle, doc: Value) -> AppResult<ApplicationState> {
    let state = restore(doc).map_err(AppError::from)?;
    store.replace(state.clone())?;
    info!(target: "opsdesk", event = "backup_restored");
    Ok(state)
}

/// Write `<prefix>_<YYYYMMDD>_<HHMMSS>.json` under `out_parent`.
pub fn export_to_file(
    state: &ApplicationState,
    out_parent: &Path,
    prefix: &str,
) -> AppResult<PathBuf> {
    let doc = serialize(state)?;
    let payload = serde_json::to_vec_pretty(&doc)
        .map_err(|err| AppError::from(err).with_context("operation", "encode_backup"))?;

    fs::create_dir_all(out_parent).map_err(|err| {
        AppError::from(err)
            .with_context("operation", "create_out_parent")
            .with_context("path", out_parent.display().to_string())
    })?;
    let path = unique_export_path(out_parent, prefix, &Utc::now())?;
    write_atomic(&path, &payload)?;
    info!(target: "opsdesk", event = "backup_exported", path = %path.display());
    Ok(path)
}

/// Read a backup file as UTF-8 JSON and apply it.
pub fn import_from_file(store: &StoreHandle, path: &Path) -> AppResult<ApplicationState> {
    let raw = fs::read_to_string(path).map_err(|err| {
        AppError::from(err)
            .with_context("operation", "read_backup")
            .with_context("path", path.display().to_string())
    })?;
    let doc: Value = serde_json::from_str(&raw)
        .map_err(|err| AppError::from(err).with_context("operation", "parse_backup"))?;
    apply_restore(store, doc)
}

fn unique_export_path(
    root: &Path,
    prefix: &str,
    timestamp: &DateTime<Utc>,
) -> AppResult<PathBuf> {
    let base = format!("{prefix}_{}", timestamp.format("%Y%m%d_%H%M%S"));
    for suffix in 0..100 {
        let candidate = if suffix == 0 {
            root.join(format!("{base}.json"))
        } else {
            root.join(format!("{base}-{suffix:02}.json"))
        };
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(AppError::new(
        "BACKUP/EXPORT_PATH",
        "Could not allocate a unique backup filename",
    ))
}
