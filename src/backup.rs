//! Backup client for the pluggable storage backend.
//!
//! Two backends exist: `LocalOnly` writes and restores real snapshot files
//! under `<data_dir>/backups/`, while `Drive` is a stub that only simulates
//! transfer latency and flips local state. Both are gated on a connection
//! flag persisted alongside the data files, and both reject backup/restore
//! while disconnected.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::snapshot::{self, SnapshotError};
use crate::storage::{DataStorage, StorageError, StoreKey};
use crate::store::{Store, StoreError};

const CONNECT_DELAY: Duration = Duration::from_millis(1500);
const TRANSFER_DELAY: Duration = Duration::from_millis(2000);

/// Where backups go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackupBackend {
    /// Snapshot files under the local data directory.
    #[default]
    LocalOnly,
    /// Remote drive stub; simulates latency, transfers nothing.
    Drive,
}

impl fmt::Display for BackupBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupBackend::LocalOnly => write!(f, "localonly"),
            BackupBackend::Drive => write!(f, "drive"),
        }
    }
}

impl FromStr for BackupBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "localonly" | "local" => Ok(BackupBackend::LocalOnly),
            "drive" => Ok(BackupBackend::Drive),
            _ => Err(format!(
                "Invalid backup backend '{}'. Valid options: localonly, drive",
                s
            )),
        }
    }
}

/// Persisted connection state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct DriveState {
    connected: bool,
}

/// Outcome of a restore attempt.
#[derive(Debug, Clone)]
pub enum RestoreOutcome {
    /// A snapshot was imported into the store.
    Restored(PathBuf),
    /// The backend had nothing to restore (no snapshots, or the stub).
    Nothing,
}

pub struct BackupClient {
    backend: BackupBackend,
    storage: DataStorage,
    connected: bool,
}

impl BackupClient {
    /// Loads the persisted connection flag; a missing or malformed state
    /// file means disconnected.
    pub fn load(storage: DataStorage, backend: BackupBackend) -> Self {
        let state: DriveState = storage
            .load(StoreKey::DriveState)
            .ok()
            .flatten()
            .unwrap_or_default();

        Self {
            backend,
            storage,
            connected: state.connected,
        }
    }

    pub fn backend(&self) -> BackupBackend {
        self.backend
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn backups_dir(&self) -> PathBuf {
        self.storage.data_dir().join("backups")
    }

    pub async fn connect(&mut self) -> Result<(), BackupError> {
        if self.backend == BackupBackend::Drive {
            // Stand-in for the remote handshake.
            tokio::time::sleep(CONNECT_DELAY).await;
        }

        self.connected = true;
        self.persist_state()?;
        info!("backup backend {} connected", self.backend);
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), BackupError> {
        self.connected = false;
        self.persist_state()?;
        info!("backup backend {} disconnected", self.backend);
        Ok(())
    }

    /// Backs up the store's current document and records the backup time.
    ///
    /// Rejects when not connected, leaving all state unchanged.
    pub async fn backup(&self, store: &mut Store) -> Result<DateTime<Utc>, BackupError> {
        if !self.connected {
            return Err(BackupError::NotConnected);
        }

        let now = Utc::now();
        match self.backend {
            BackupBackend::LocalOnly => {
                let filename = snapshot::backup_filename(Local::now().date_naive());
                let path = self.backups_dir().join(filename);
                snapshot::write_snapshot(&path, &store.export_snapshot(now))?;
                debug!("wrote backup snapshot to {}", path.display());
            }
            BackupBackend::Drive => {
                // No transfer happens; the drive integration is a stub.
                tokio::time::sleep(TRANSFER_DELAY).await;
            }
        }

        store.mark_backed_up(now)?;
        Ok(now)
    }

    /// Restores the most recent snapshot into the store.
    ///
    /// Rejects when not connected. The `Drive` backend has nothing to fetch
    /// and reports `Nothing`; `LocalOnly` imports the lexicographically
    /// latest file from the backups directory, which sorts by date for the
    /// `daily-drive-backup-<YYYY-MM-DD>.json` naming scheme.
    pub async fn restore(&self, store: &mut Store) -> Result<RestoreOutcome, BackupError> {
        if !self.connected {
            return Err(BackupError::NotConnected);
        }

        match self.backend {
            BackupBackend::Drive => {
                tokio::time::sleep(TRANSFER_DELAY).await;
                Ok(RestoreOutcome::Nothing)
            }
            BackupBackend::LocalOnly => {
                let Some(path) = self.latest_backup()? else {
                    return Ok(RestoreOutcome::Nothing);
                };

                let document = snapshot::read_snapshot(&path)?;
                store.import_snapshot(document)?;
                info!("restored snapshot from {}", path.display());
                Ok(RestoreOutcome::Restored(path))
            }
        }
    }

    fn latest_backup(&self) -> Result<Option<PathBuf>, BackupError> {
        let dir = self.backups_dir();
        if !dir.exists() {
            return Ok(None);
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| {
            BackupError::Storage(StorageError::Io(dir.clone(), e))
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("daily-drive-backup-") && n.ends_with(".json"))
                    .unwrap_or(false)
            })
            .collect();

        candidates.sort();
        Ok(candidates.pop())
    }

    fn persist_state(&self) -> Result<(), BackupError> {
        let state = DriveState {
            connected: self.connected,
        };
        self.storage.save(StoreKey::DriveState, &state)?;
        Ok(())
    }
}

/// Errors that can occur during backup operations.
#[derive(Debug)]
pub enum BackupError {
    /// Backup or restore was invoked while disconnected.
    NotConnected,
    Storage(StorageError),
    Snapshot(SnapshotError),
    Store(StoreError),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::NotConnected => {
                write!(f, "Not connected. Run 'dailydrive drive connect' first.")
            }
            BackupError::Storage(e) => write!(f, "Storage error: {}", e),
            BackupError::Snapshot(e) => write!(f, "{}", e),
            BackupError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BackupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackupError::NotConnected => None,
            BackupError::Storage(e) => Some(e),
            BackupError::Snapshot(e) => Some(e),
            BackupError::Store(e) => Some(e),
        }
    }
}

impl From<StorageError> for BackupError {
    fn from(e: StorageError) -> Self {
        BackupError::Storage(e)
    }
}

impl From<SnapshotError> for BackupError {
    fn from(e: SnapshotError) -> Self {
        BackupError::Snapshot(e)
    }
}

impl From<StoreError> for BackupError {
    fn from(e: StoreError) -> Self {
        BackupError::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Habit};
    use tempfile::TempDir;

    fn fixture(backend: BackupBackend) -> (BackupClient, Store, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = DataStorage::new(temp.path().to_path_buf());
        let client = BackupClient::load(storage.clone(), backend);
        let store = Store::load(storage);
        (client, store, temp)
    }

    #[tokio::test]
    async fn test_backup_rejected_when_disconnected() {
        let (client, mut store, _temp) = fixture(BackupBackend::LocalOnly);

        let result = client.backup(&mut store).await;
        assert!(matches!(result, Err(BackupError::NotConnected)));
        assert!(store.last_backup_date().is_none());
    }

    #[tokio::test]
    async fn test_restore_rejected_when_disconnected() {
        let (client, mut store, _temp) = fixture(BackupBackend::LocalOnly);

        let result = client.restore(&mut store).await;
        assert!(matches!(result, Err(BackupError::NotConnected)));
    }

    #[tokio::test]
    async fn test_local_backup_writes_snapshot_and_marks_store() {
        let (mut client, mut store, temp) = fixture(BackupBackend::LocalOnly);
        store.add_habit(Habit::new("Read", Frequency::Daily)).unwrap();

        client.connect().await.unwrap();
        let backed_up_at = client.backup(&mut store).await.unwrap();

        assert_eq!(store.last_backup_date(), Some(backed_up_at));
        let backups: Vec<_> = std::fs::read_dir(temp.path().join("backups"))
            .unwrap()
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[tokio::test]
    async fn test_local_restore_roundtrip() {
        let (mut client, mut store, _temp) = fixture(BackupBackend::LocalOnly);
        let habit = store.add_habit(Habit::new("Read", Frequency::Daily)).unwrap();

        client.connect().await.unwrap();
        client.backup(&mut store).await.unwrap();

        store.delete_habit(habit.id).unwrap();
        assert!(store.habits().is_empty());

        let outcome = client.restore(&mut store).await.unwrap();
        assert!(matches!(outcome, RestoreOutcome::Restored(_)));
        assert_eq!(store.habits().len(), 1);
        assert_eq!(store.habits()[0].id, habit.id);
    }

    #[tokio::test]
    async fn test_local_restore_without_backups_is_nothing() {
        let (mut client, mut store, _temp) = fixture(BackupBackend::LocalOnly);
        client.connect().await.unwrap();

        let outcome = client.restore(&mut store).await.unwrap();
        assert!(matches!(outcome, RestoreOutcome::Nothing));
    }

    #[tokio::test]
    async fn test_connection_flag_persists() {
        let temp = TempDir::new().unwrap();
        let storage = DataStorage::new(temp.path().to_path_buf());

        let mut client = BackupClient::load(storage.clone(), BackupBackend::LocalOnly);
        assert!(!client.is_connected());
        client.connect().await.unwrap();

        let reloaded = BackupClient::load(storage.clone(), BackupBackend::LocalOnly);
        assert!(reloaded.is_connected());

        client.disconnect().unwrap();
        let reloaded = BackupClient::load(storage, BackupBackend::LocalOnly);
        assert!(!reloaded.is_connected());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!(
            BackupBackend::from_str("drive").unwrap(),
            BackupBackend::Drive
        );
        assert_eq!(
            BackupBackend::from_str("local").unwrap(),
            BackupBackend::LocalOnly
        );
        assert!(BackupBackend::from_str("icloud").is_err());
    }
}
