//! Session Storage - the slot holding the serialized session record
//!
//! The guard only ever sees the [`SessionStore`] trait, so it can run against an
//! in-memory slot in tests and a file on disk from the command line.

use edumatch_core::{storage_error, EdumatchError, EdumatchResult, ErrorContext, SessionConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// A single named slot holding one serialized session record
pub trait SessionStore: Send + Sync {
    /// Raw stored value, or `None` when the slot is empty
    fn read(&self) -> EdumatchResult<Option<String>>;

    /// Replace the stored value
    fn write(&self, raw: &str) -> EdumatchResult<()>;

    /// Empty the slot. Clearing an empty slot is a no-op.
    fn clear(&self) -> EdumatchResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn read(&self) -> EdumatchResult<Option<String>> {
        (**self).read()
    }

    fn write(&self, raw: &str) -> EdumatchResult<()> {
        (**self).write(raw)
    }

    fn clear(&self) -> EdumatchResult<()> {
        (**self).clear()
    }
}

/// In-process slot
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw value, e.g. a hand-written record
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    fn lock(&self) -> EdumatchResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| storage_error!("Session slot lock poisoned", "memory_session_store"))
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> EdumatchResult<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, raw: &str) -> EdumatchResult<()> {
        *self.lock()? = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> EdumatchResult<()> {
        self.lock()?.take();
        Ok(())
    }
}

/// Slot backed by `<storage_dir>/<storage_key>.json`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

fn file_error(message: String, operation: &str, path: &Path, source: std::io::Error) -> EdumatchError {
    EdumatchError::Storage {
        message,
        source: Some(Box::new(source)),
        context: ErrorContext::new("file_session_store")
            .with_operation(operation)
            .with_metadata("path", &path.display().to_string()),
    }
}

impl FileSessionStore {
    /// Create the store, creating `storage_dir` if it doesn't exist
    pub fn new<P: AsRef<Path>>(storage_dir: P, storage_key: &str) -> EdumatchResult<Self> {
        let storage_dir = storage_dir.as_ref();
        std::fs::create_dir_all(storage_dir).map_err(|e| {
            file_error(
                format!("Failed to create session directory: {}", e),
                "create_dir",
                storage_dir,
                e,
            )
        })?;

        let path = storage_dir.join(format!("{}.json", storage_key));
        info!("Session storage initialized at: {}", path.display());

        Ok(Self { path })
    }

    pub fn from_config(config: &SessionConfig) -> EdumatchResult<Self> {
        Self::new(&config.storage_dir, &config.storage_key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> EdumatchResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(file_error(
                format!("Failed to read session file: {}", e),
                "read",
                &self.path,
                e,
            )),
        }
    }

    fn write(&self, raw: &str) -> EdumatchResult<()> {
        // Write beside the target and rename so readers never see half a record
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, raw).map_err(|e| {
            file_error(
                format!("Failed to write session file: {}", e),
                "write",
                &tmp_path,
                e,
            )
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            file_error(
                format!("Failed to replace session file: {}", e),
                "rename",
                &self.path,
                e,
            )
        })?;

        debug!("Saved session record to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> EdumatchResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Deleted session file: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(file_error(
                format!("Failed to delete session file: {}", e),
                "delete",
                &self.path,
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_slot() {
        let store = MemorySessionStore::new();
        assert_eq!(store.read().unwrap(), None);

        store.write("{}").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("{}"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("nested"), "edumatch_session").unwrap();
        assert_eq!(store.path().file_name().unwrap(), "edumatch_session.json");
        assert_eq!(store.read().unwrap(), None);

        store.write("first").unwrap();
        store.write("second").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("second"));
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_shared_store_through_arc() {
        let store = Arc::new(MemorySessionStore::with_raw("seed"));
        let shared: Arc<dyn SessionStore> = store.clone();

        shared.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
