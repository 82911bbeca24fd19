//! Durable key-value slots.
//!
//! Every piece of persisted dashboard state lives in one named slot holding
//! plain text: the search history under [`HISTORY_KEY`] and the alert opt-out
//! flag under [`ALERTS_KEY`].

use std::{
    collections::HashMap,
    fmt::Debug,
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use tracing::warn;

use crate::error::StorageError;

/// Slot holding the JSON-encoded search history.
pub const HISTORY_KEY: &str = "weatherHistory";

/// Slot holding the alert opt-out flag (`"off"` disables alerts).
pub const ALERTS_KEY: &str = "alerts";

pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the slot entirely. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

const ALERTS_OFF: &str = "off";
const ALERTS_ON: &str = "on";

/// Alerts stay on unless the user switched them off.
pub fn alerts_enabled(store: &dyn KeyValueStore) -> bool {
    match store.get(ALERTS_KEY) {
        Ok(flag) => flag.as_deref() != Some(ALERTS_OFF),
        Err(err) => {
            warn!(error = %err, "alert flag unreadable, keeping alerts on");
            true
        }
    }
}

pub fn set_alerts_enabled(store: &dyn KeyValueStore, enabled: bool) -> Result<(), StorageError> {
    store.set(ALERTS_KEY, if enabled { ALERTS_ON } else { ALERTS_OFF })
}

/// One file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.slot"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| StorageError::Write { path: self.dir.clone(), source })?;

        let path = self.slot_path(key);
        fs::write(&path, value).map_err(|source| StorageError::Write { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove { path, source }),
        }
    }
}

/// Process-local store, used by tests and by embedders that do not want
/// anything written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}
