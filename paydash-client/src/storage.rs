//! Key/value persistence behind the session store.
//!
//! The session lives under two string keys served by a [`Storage`] backend.
//! [`FileStorage`] keeps every key in one JSON document with owner-only
//! permissions, and [`MemoryStorage`] lives for the duration of the process.

use std::{
    collections::{BTreeMap, HashMap},
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use thiserror::Error;
use tracing::warn;

/// Failures reported by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or removing the backing file failed.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        /// Backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The backing file exists but does not hold a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        /// Backing file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The stored entries could not be serialized.
    #[error("failed to encode storage file {path}: {source}")]
    Encode {
        /// Backing file.
        path: PathBuf,
        /// Serialization error.
        #[source]
        source: serde_json::Error,
    },
    /// A thread panicked while holding the storage lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Synchronous string key/value store.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`; removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items()?.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk.
///
/// The file is created on first write with mode `0600` on Unix and deleted
/// once its last key is removed.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a store backed by `path`. Nothing touches the disk until the
    /// first read or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|err| self.io_error(err))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Entries to update in place. A corrupt file is treated as empty so it
    /// gets replaced; any other failure is returned.
    fn read_items_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_items() {
            Err(StorageError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "replacing corrupt storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if items.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|err| self.io_error(err))?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let contents = serde_json::to_string_pretty(items).map_err(|source| {
            StorageError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .map_err(|err| self.io_error(err))?;
            file.write_all(contents.as_bytes())
                .map_err(|err| self.io_error(err))?;
            // `mode` only applies when the file is created.
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|err| self.io_error(err))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = fs::File::create(&self.path).map_err(|err| self.io_error(err))?;
            file.write_all(contents.as_bytes())
                .map_err(|err| self.io_error(err))?;
        }

        Ok(())
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.lock.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut items = self.read_items_for_update()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut items = self.read_items_for_update()?;
        if items.remove(key).is_some() || items.is_empty() {
            self.write_items(&items)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.remove_item("k").unwrap();
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStorage::new(&path).set_item("auth_token", "{}").unwrap();
        let reopened = FileStorage::new(&path);

        assert_eq!(reopened.get_item("auth_token").unwrap().as_deref(), Some("{}"));
        assert!(path.exists());
    }

    #[test]
    fn file_storage_removes_file_when_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        storage.remove_item("a").unwrap();
        assert!(storage.path().exists());

        storage.remove_item("b").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn file_storage_reports_corruption_on_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get_item("a").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn file_storage_write_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);

        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn file_storage_write_surfaces_io_errors() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        let err = storage.set_item("a", "1").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));

        let err = storage.remove_item("a").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(dir.path().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_tightens_existing_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStorage::new(&path).set_item("a", "1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.set_item("a", "1").unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
