//! Local key-value persistence.
//!
//! The seam that stands in for browser `localStorage`: string values under
//! string keys, synchronous, last-write-wins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

/// A synchronous string key-value store.
pub trait StorageAdapter {
    /// Read the value under a key.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store fails.
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    /// Write a value under a key.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Remove a key. A no-op when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store fails.
    fn remove(&mut self, key: &str) -> Result<(), ClientError>;
}

/// In-memory storage, used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed storage: one JSON object mapping keys to values.
///
/// Loaded once at open; every write persists the whole map. An unreadable
/// or corrupt file reads as empty rather than failing the open.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open storage at a path, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the parent directory cannot be
    /// created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = Self::load_entries(&path);
        Ok(Self { path, entries })
    }

    fn load_entries(path: &Path) -> HashMap<String, String> {
        let Ok(raw) = fs::read_to_string(path) else {
            return HashMap::new();
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), "discarding unreadable storage file: {e}");
                HashMap::new()
            }
        }
    }

    fn persist(&self) -> Result<(), ClientError> {
        let encoded = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ClientError::Storage(std::io::Error::other(e)))?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }
}

impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("vc_cart:guest").unwrap().is_none());

        storage.set("vc_cart:guest", "[]").unwrap();
        assert_eq!(storage.get("vc_cart:guest").unwrap().as_deref(), Some("[]"));

        storage.remove("vc_cart:guest").unwrap();
        assert!(storage.get("vc_cart:guest").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let mut storage = FileStorage::open(&path).unwrap();
            storage.set("vc_session", "{\"id\":1}").unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(
            storage.get("vc_session").unwrap().as_deref(),
            Some("{\"id\":1}")
        );
    }

    #[test]
    fn test_file_storage_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not valid json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_remove_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        storage.remove("missing").unwrap();
    }
}
