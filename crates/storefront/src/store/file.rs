//! File-backed store implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] persisted as a single JSON document on disk.
///
/// The whole document is loaded once at open and kept in memory; every
/// mutation rewrites the file. That is acceptable for this store's contents
/// (a few small collections and flags) and mirrors the synchronous
/// write-through behavior of browser local storage.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, creating an empty one if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if an existing file cannot be read or is not a
    /// valid JSON string map.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let map = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = map.len(), "opened file store");
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.lock();
        map.insert(key.to_owned(), value.to_owned());
        self.flush(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.lock();
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&map)
    }
}
