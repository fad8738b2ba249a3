//! The raw-payload audit trail. Every accepted webhook body is archived here, per provider, before any structural
//! validation happens, so that a mis-parsed payload can be replayed after a fix. Forwarding outcomes are recorded
//! in the same directory.
//!
//! Log files are JSON arrays rewritten in full on each append, like the transaction snapshot. Logging failures are
//! contained: they degrade the audit trail, never the webhook response.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{db_types::TxSource, traits::StorageError};

pub const FORWARD_LOG_FILE_NAME: &str = "webhook-forward.json";

/// The recorded result of one forwarding attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardOutcome {
    pub time: DateTime<Utc>,
    pub source: TxSource,
    pub url: String,
    pub status: Option<u16>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct WebhookLog {
    log_dir: PathBuf,
}

impl WebhookLog {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self { log_dir: data_dir.as_ref().join("logs") }
    }

    /// Archive a raw webhook body under the provider's tag.
    pub fn record(&self, source: TxSource, body: &Value) {
        let entry = json!({
            "receivedAt": Utc::now(),
            "body": body,
        });
        self.append(&format!("webhook-{}.json", source.as_tag()), entry);
    }

    /// Record the outcome of a forwarding attempt.
    pub fn record_forward_outcome(&self, outcome: &ForwardOutcome) {
        match serde_json::to_value(outcome) {
            Ok(entry) => self.append(FORWARD_LOG_FILE_NAME, entry),
            Err(e) => warn!("📜️ Could not serialize a forward outcome for the audit trail. {e}"),
        }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.log_dir.join(file_name)
    }

    fn append(&self, file_name: &str, entry: Value) {
        if let Err(e) = self.try_append(file_name, entry) {
            warn!("📜️ Could not write {file_name} in {}. {e}", self.log_dir.display());
        }
    }

    fn try_append(&self, file_name: &str, entry: Value) -> Result<(), StorageError> {
        fs::create_dir_all(&self.log_dir)?;
        let path = self.log_dir.join(file_name);
        let mut entries: Vec<Value> = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("📜️ {file_name} is not a valid JSON array ({e}). Starting a fresh log.");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        entries.push(entry);
        fs::write(&path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
