//! Snapshot backends. [`JsonSnapshot`] is the production backend: one pretty-printed JSON file, rewritten in full on
//! every save. [`MemoryBackend`] keeps the last saved snapshot in memory and is meant for tests and throwaway
//! deployments.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    db_types::Transaction,
    traits::{SnapshotBackend, StorageError},
};

pub const SNAPSHOT_FILE_NAME: &str = "transactions.json";

//--------------------------------------    JsonSnapshot     ---------------------------------------------------------
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self { path: data_dir.as_ref().join(SNAPSHOT_FILE_NAME) }
    }
}

impl SnapshotBackend for JsonSnapshot {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Transaction>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(transactions)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

//--------------------------------------    MemoryBackend    ---------------------------------------------------------
#[derive(Default)]
pub struct MemoryBackend {
    saved: Mutex<Vec<Transaction>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collection as of the last `save` call.
    pub fn last_saved(&self) -> Vec<Transaction> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SnapshotBackend for MemoryBackend {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<Vec<Transaction>, StorageError> {
        Ok(self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, transactions: &[Transaction]) -> Result<(), StorageError> {
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = transactions.to_vec();
        Ok(())
    }
}
