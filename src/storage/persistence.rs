use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{RecordStore, StoreError};
use crate::model::{Alert, Prescription};

const PRESCRIPTIONS: &str = "prescriptions";
const ALERTS: &str = "prescription_alerts";

/// Durable JSON-file store.
///
/// Each collection lives in one file under the base directory. Writes go
/// to a temporary file, are synced, and then renamed into place so a
/// crash mid-write never leaves a truncated collection behind.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = base_path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path)
            .map_err(|e| StoreError::Io(format!("Failed to create store directory: {}", e)))?;

        Ok(FileStore {
            base_path,
            write_guard: Mutex::new(()),
        })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", name))
    }

    fn load_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let path = self.collection_path(name);

        // A collection that has never been saved is empty, not an error
        if !path.exists() {
            return Ok(Vec::new());
        }

        let buffer = fs::read(&path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_slice(&buffer)
            .map_err(|e| StoreError::Serialization(format!("Failed to deserialize {}: {}", name, e)))
    }

    fn save_collection<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.write_guard.lock().unwrap();

        let path = self.collection_path(name);
        let serialized = serde_json::to_vec_pretty(items)
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize {}: {}", name, e)))?;

        // Write to a temporary file first
        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)
            .map_err(|e| StoreError::Io(format!("Failed to create file: {}", e)))?;

        file.write_all(&serialized)
            .map_err(|e| StoreError::Io(format!("Failed to write data: {}", e)))?;

        // Ensure data is flushed to disk
        file.sync_all()
            .map_err(|e| StoreError::Io(format!("Failed to sync data: {}", e)))?;

        // Rename temp file to final name (atomic operation on most filesystems)
        fs::rename(&temp_path, &path)
            .map_err(|e| StoreError::Io(format!("Failed to rename file: {}", e)))?;

        Ok(())
    }
}

impl RecordStore for FileStore {
    fn load_prescriptions(&self) -> Result<Vec<Prescription>, StoreError> {
        self.load_collection(PRESCRIPTIONS)
    }

    fn save_prescriptions(&self, prescriptions: &[Prescription]) -> Result<(), StoreError> {
        self.save_collection(PRESCRIPTIONS, prescriptions)
    }

    fn load_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.load_collection(ALERTS)
    }

    fn save_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        self.save_collection(ALERTS, alerts)
    }
}
