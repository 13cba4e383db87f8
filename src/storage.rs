//! JSON document storage for persisting application state to disk.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Fixed storage keys for the independently persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    /// The aggregate `PersistentDocument`.
    Document,
    /// The notification collection.
    Notifications,
    /// Backup-service connection state.
    DriveState,
}

impl StoreKey {
    pub fn filename(&self) -> &'static str {
        match self {
            StoreKey::Document => "data.json",
            StoreKey::Notifications => "notifications.json",
            StoreKey::DriveState => "drive.json",
        }
    }
}

/// Storage for JSON documents under the application data directory.
#[derive(Clone, Debug)]
pub struct DataStorage {
    data_dir: PathBuf,
}

impl DataStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path for a storage key.
    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }

    /// Checks if a document exists on disk.
    pub fn exists(&self, key: StoreKey) -> bool {
        self.path(key).exists()
    }

    /// Loads a document from disk.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    /// Returns `Err` for other I/O or parsing errors.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StorageError> {
        let path = self.path(key);

        match fs::read(&path) {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| StorageError::Parse(path, e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    /// Saves a document to disk.
    ///
    /// Creates the data directory if it doesn't exist.
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::Io(self.data_dir.clone(), e))?;

        let path = self.path(key);
        let bytes = serde_json::to_vec(value).map_err(|e| StorageError::Parse(path.clone(), e))?;

        fs::write(&path, bytes).map_err(|e| StorageError::Io(path, e))?;

        Ok(())
    }
}

/// Errors that can occur during document storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    Io(PathBuf, io::Error),
    /// Error parsing or serializing a JSON document.
    Parse(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::Parse(path, e) => {
                write!(f, "Failed to parse document {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(_, e) => Some(e),
            StorageError::Parse(_, e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersistentDocument;
    use tempfile::TempDir;

    fn test_storage() -> (DataStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = DataStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_store_key_filename() {
        assert_eq!(StoreKey::Document.filename(), "data.json");
        assert_eq!(StoreKey::Notifications.filename(), "notifications.json");
        assert_eq!(StoreKey::DriveState.filename(), "drive.json");
    }

    #[test]
    fn test_storage_path() {
        let (storage, _temp) = test_storage();
        let path = storage.path(StoreKey::Document);
        assert!(path.ends_with("data.json"));
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (storage, _temp) = test_storage();
        let result: Option<PersistentDocument> = storage.load(StoreKey::Document).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let storage = DataStorage::new(nested_dir.clone());

        storage
            .save(StoreKey::Document, &PersistentDocument::default())
            .unwrap();

        assert!(nested_dir.exists());
        assert!(storage.exists(StoreKey::Document));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (storage, _temp) = test_storage();

        let mut doc = PersistentDocument::default();
        doc.habits
            .push(crate::models::Habit::new("Read", crate::models::Frequency::Daily));

        storage.save(StoreKey::Document, &doc).unwrap();
        let loaded: PersistentDocument = storage.load(StoreKey::Document).unwrap().unwrap();

        assert_eq!(loaded.habits.len(), 1);
        assert_eq!(loaded.habits[0].name, "Read");
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let (storage, _temp) = test_storage();
        std::fs::create_dir_all(storage.data_dir()).unwrap();
        std::fs::write(storage.path(StoreKey::Document), b"not json{").unwrap();

        let result: Result<Option<PersistentDocument>, _> = storage.load(StoreKey::Document);
        assert!(matches!(result, Err(StorageError::Parse(_, _))));
    }
}
