//! Export/import of the full document as a standalone backup file.
//!
//! The file format is pretty-printed JSON named
//! `daily-drive-backup-<YYYY-MM-DD>.json`. Imports are validated only for
//! the presence of the `habits`, `todos`, and `notes` top-level keys.

use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::PersistentDocument;

const REQUIRED_KEYS: [&str; 3] = ["habits", "todos", "notes"];

/// Returns the backup filename for a given calendar date.
pub fn backup_filename(date: NaiveDate) -> String {
    format!("daily-drive-backup-{}.json", date)
}

/// Writes a snapshot to `path` as pretty-printed JSON.
pub fn write_snapshot(path: &Path, document: &PersistentDocument) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::Io(parent.to_path_buf(), e))?;
        }
    }

    let json = serde_json::to_string_pretty(document)
        .map_err(|e| SnapshotError::Parse(path.to_path_buf(), e))?;
    fs::write(path, json).map_err(|e| SnapshotError::Io(path.to_path_buf(), e))?;

    Ok(())
}

/// Reads and validates a snapshot file.
///
/// Rejects files missing any of the `habits`, `todos`, or `notes` keys
/// before deserializing, so the caller can surface a clear error.
pub fn read_snapshot(path: &Path) -> Result<PersistentDocument, SnapshotError> {
    let bytes = fs::read(path).map_err(|e| SnapshotError::Io(path.to_path_buf(), e))?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| SnapshotError::Parse(path.to_path_buf(), e))?;

    for key in REQUIRED_KEYS {
        if value.get(key).is_none() {
            return Err(SnapshotError::MissingKey(key));
        }
    }

    serde_json::from_value(value).map_err(|e| SnapshotError::Parse(path.to_path_buf(), e))
}

/// Errors that can occur reading or writing a snapshot file.
#[derive(Debug)]
pub enum SnapshotError {
    Io(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
    /// A required top-level key is missing from the imported file.
    MissingKey(&'static str),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            SnapshotError::Parse(path, e) => {
                write!(f, "Invalid backup file {}: {}", path.display(), e)
            }
            SnapshotError::MissingKey(key) => {
                write!(f, "Invalid backup file: missing '{}' data", key)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(_, e) => Some(e),
            SnapshotError::Parse(_, e) => Some(e),
            SnapshotError::MissingKey(_) => None,
        }
    }
}
