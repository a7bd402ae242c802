//! Persistence of user labels.
//!
//! Labels live under a single key as a JSON array of `{"message", "font"}`
//! records. Natively every key is a JSON file in the platform data directory,
//! in the browser it is an entry of `window.localStorage`.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub message: String,
    pub font: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

/// Stores shared between threads natively. Browser storage handles are
/// bound to the main thread, so the bound is dropped on wasm.
#[cfg(not(target_arch = "wasm32"))]
pub trait ThreadSafe: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> ThreadSafe for T {}

#[cfg(target_arch = "wasm32")]
pub trait ThreadSafe {}
#[cfg(target_arch = "wasm32")]
impl<T> ThreadSafe for T {}

/// A string key-value store.
pub trait KeyValueStore: ThreadSafe {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store, used in tests and when no persistent backend is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform data directory, e.g. `~/.local/share/particle-ocean`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_data_dir() -> Option<Self> {
        directories::ProjectDirs::from("io", "particle-ocean", "particle-ocean")
            .map(|dirs| Self::new(dirs.data_dir()))
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        // Write next to the target and rename so readers never see half a file
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct WebStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl WebStorage {
    pub fn new() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

/// The persistent store of this platform, or a memory store if there is none.
pub fn default_backend() -> Arc<dyn KeyValueStore> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        match FileStore::in_data_dir() {
            Some(store) => {
                log::info!("Labels are stored in {}", store.dir.display());
                Arc::new(store)
            }
            None => {
                log::warn!("No data directory found, labels will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        match WebStorage::new() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!("{}, labels will not survive a reload", e);
                Arc::new(MemoryStore::new())
            }
        }
    }
}

/// The ordered, append-only list of labels under one key.
///
/// Appends are serialized by an internal lock, so one store can be shared by
/// several threads.
pub struct LabelStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    lock: Mutex<()>,
}

impl LabelStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
            lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All stored labels in insertion order. Missing or malformed data reads as empty.
    pub fn load(&self) -> Vec<Label> {
        match self.read() {
            Ok(labels) => labels,
            Err(e) => {
                log::warn!("Ignoring stored labels under {:?}: {}", self.key, e);
                Vec::new()
            }
        }
    }

    fn read(&self) -> Result<Vec<Label>, StoreError> {
        match self.backend.get(&self.key)? {
            Some(value) if !value.trim().is_empty() => Ok(serde_json::from_str(&value)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Like [`Self::read`], but a malformed value counts as empty. Backend
    /// failures still propagate: writing over an unreadable value would lose it.
    fn read_for_append(&self) -> Result<Vec<Label>, StoreError> {
        match self.read() {
            Err(StoreError::Serde(e)) => {
                log::warn!("Replacing malformed labels under {:?}: {}", self.key, e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Append `label` as one read-modify-write under the store lock.
    ///
    /// Returns the number of stored labels afterwards.
    pub fn append(&self, label: Label) -> Result<usize, StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::Unavailable("label store poisoned".to_string()))?;
        let mut labels = self.read_for_append()?;
        labels.push(label);
        let value = serde_json::to_string(&labels)?;
        self.backend.set(&self.key, &value)?;
        Ok(labels.len())
    }
}
