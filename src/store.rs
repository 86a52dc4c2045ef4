use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::backup;
use crate::error::{AppError, AppResult};
use crate::model::ApplicationState;

const PARTIAL_SUFFIX: &str = ".partial";

/// Durability backend behind the store handle. The core never touches the
/// backing medium directly; everything goes through one of these.
pub trait StateBackend: Send + Sync {
    /// Read the full tree from the backing medium.
    fn load(&self) -> AppResult<ApplicationState>;
    /// Write the full tree to the backing medium. Must be all-or-nothing.
    fn persist(&self, state: &ApplicationState) -> AppResult<()>;
}

/// File-backed store: one pretty-printed, version-tagged JSON document,
/// replaced atomically on every commit. Documents written by older builds
/// are migrated at load.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBackend for JsonFileStore {
    fn load(&self) -> AppResult<ApplicationState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // First run: seed an empty tree; it reaches disk on the
                // first mutation.
                info!(target: "opsdesk", event = "store_seeded", path = %self.path.display());
                return Ok(ApplicationState::default());
            }
            Err(err) => {
                return Err(AppError::from(err)
                    .with_context("operation", "read_store")
                    .with_context("path", self.path.display().to_string()))
            }
        };
        let doc: serde_json::Value = serde_json::from_str(&raw).map_err(|err| {
            AppError::from(err)
                .with_context("operation", "parse_store")
                .with_context("path", self.path.display().to_string())
        })?;
        backup::restore(doc)
            .map_err(|err| AppError::from(err).with_context("operation", "load_store"))
    }

    fn persist(&self, state: &ApplicationState) -> AppResult<()> {
        let doc = backup::serialize(state)?;
        let payload = serde_json::to_vec_pretty(&doc)
            .map_err(|err| AppError::from(err).with_context("operation", "encode_store"))?;
        write_atomic(&self.path, &payload)
    }
}

/// In-memory backend for tests and headless shells.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<ApplicationState>,
}

impl StateBackend for MemoryStore {
    fn load(&self) -> AppResult<ApplicationState> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn persist(&self, state: &ApplicationState) -> AppResult<()> {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state.clone();
        Ok(())
    }
}

/// Cheaply cloneable handle owning the published state tree.
///
/// Every mutation runs against a scratch copy, is persisted, and only then
/// published — a persist failure leaves the published tree untouched, so no
/// partial write is ever observable.
#[derive(Clone)]
pub struct StoreHandle {
    published: Arc<Mutex<ApplicationState>>,
    backend: Arc<dyn StateBackend>,
}

impl StoreHandle {
    pub fn open(backend: impl StateBackend + 'static) -> AppResult<Self> {
        let state = backend.load()?;
        Ok(StoreHandle {
            published: Arc::new(Mutex::new(state)),
            backend: Arc::new(backend),
        })
    }

    pub fn in_memory() -> Self {
        StoreHandle {
            published: Arc::new(Mutex::new(ApplicationState::default())),
            backend: Arc::new(MemoryStore::default()),
        }
    }

    /// Transient copy of the published tree.
    pub fn snapshot(&self) -> ApplicationState {
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Apply `f` to the latest state and commit. Visible to every
    /// subsequent read once this returns.
    pub fn mutate<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut ApplicationState),
    {
        let mut guard = self.published.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = guard.clone();
        f(&mut next);
        self.backend.persist(&next)?;
        *guard = next;
        Ok(())
    }

    /// Wholesale replacement, used by restore.
    pub fn replace(&self, state: ApplicationState) -> AppResult<()> {
        let mut guard = self.published.lock().unwrap_or_else(|e| e.into_inner());
        self.backend.persist(&state)?;
        *guard = state;
        Ok(())
    }

    /// Re-read from the backing medium, discarding anything not committed
    /// there.
    pub fn reload(&self) -> AppResult<ApplicationState> {
        let fresh = self.backend.load()?;
        let mut guard = self.published.lock().unwrap_or_else(|e| e.into_inner());
        *guard = fresh.clone();
        Ok(fresh)
    }
}

pub(crate) fn write_atomic(path: &Path, payload: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            AppError::from(err)
                .with_context("operation", "create_store_parent")
                .with_context("path", parent.display().to_string())
        })?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(PARTIAL_SUFFIX);
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, payload).map_err(|err| {
        AppError::from(err)
            .with_context("operation", "write_partial")
            .with_context("path", tmp.display().to_string())
    })?;
    fs::rename(&tmp, path).map_err(|err| {
        AppError::from(err)
            .with_context("operation", "commit_partial")
            .with_context("path", path.display().to_string())
    })?;
    Ok(())
}
