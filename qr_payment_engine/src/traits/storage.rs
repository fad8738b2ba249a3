use thiserror::Error;

use crate::db_types::Transaction;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error in the snapshot backend. {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not (de)serialize the transaction snapshot. {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable persistence for the transaction store.
///
/// The store keeps the authoritative collection in memory and hands the *entire* collection to [`Self::save`] after
/// every insert. Backends therefore only need to support whole-snapshot load and rewrite; there is no incremental
/// append in this contract. Implementations must make a saved snapshot either fully visible or not at all to a
/// subsequent [`Self::load`] — readers never observe a partially written collection.
pub trait SnapshotBackend: Send + Sync + 'static {
    /// A human-readable location of the snapshot, for log messages.
    fn location(&self) -> String;

    /// Load the persisted collection. An empty collection, not an error, is the answer when nothing has been
    /// persisted yet.
    fn load(&self) -> Result<Vec<Transaction>, StorageError>;

    /// Persist the full collection, replacing whatever was there before.
    fn save(&self, transactions: &[Transaction]) -> Result<(), StorageError>;
}
