use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// StorageError
///
/// Failure raised by a durable store write. Reads never fail: an unreadable or
/// malformed backing file is treated as an empty store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("simulated storage failure")]
    Simulated,
}

// 1. KeyValueStore Contract
/// KeyValueStore
///
/// The durable string key/value contract the session is persisted through, mirroring
/// the browser's `localStorage` surface (`getItem` / `setItem` / `removeItem`).
/// Implementations are swappable: `FileStore` for the CLI, `MemoryStore` for tests.
///
/// Calls are synchronous so that a session mutation is visible to the next read
/// without any eventual-consistency window.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// 2. The Durable Implementation
/// FileStore
///
/// Persists all keys as one flat JSON object on disk. Every write rewrites the whole
/// document through a sibling temp file followed by a rename, so a crash mid-write
/// leaves the previous document intact.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session store unreadable");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(map) => map
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session store is not valid JSON, ignoring it");
                BTreeMap::new()
            }
        }
    }

    fn write_document(&self, doc: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source: io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let encoded = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        self.read_document().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut doc = self.read_document();
        doc.insert(key.to_string(), value.to_string());
        self.write_document(&doc)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut doc = self.read_document();
        if doc.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&doc)
    }
}

// 3. The In-Memory Implementation (For Tests)
/// MemoryStore
///
/// An in-process store used by tests and by callers that want an ephemeral session.
/// `new_failing()` builds a store whose writes always fail while reads keep working,
/// which lets tests exercise the fire-and-forget persistence path.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    /// When true, every write returns a simulated failure.
    pub should_fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            should_fail: true,
        }
    }

    /// Builds a store pre-populated with `pairs`, as if written by an earlier run.
    pub fn with_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
            should_fail: false,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// StorageState
///
/// The shared handle type used to hand the durable store to the session.
pub type StorageState = Arc<dyn KeyValueStore>;
