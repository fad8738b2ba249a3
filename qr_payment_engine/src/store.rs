use std::sync::{PoisonError, RwLock};

use log::{error, info, warn};

use crate::{
    db_types::Transaction,
    traits::{SnapshotBackend, StorageError},
};

/// The process-wide, append-only collection of canonical transaction records.
///
/// The in-memory collection is authoritative. Every successful insert synchronously rewrites the full snapshot
/// through the backend; a failed write is logged and swallowed, so the freshly ingested record stays visible to
/// the match engine even when the disk is unhappy. Records are never mutated or deleted, which is what lets
/// readers take cheap clones without coordination beyond the lock.
///
/// This assumes an effectively-single-writer deployment: one process owns the snapshot file.
pub struct TransactionStore<B: SnapshotBackend> {
    backend: B,
    transactions: RwLock<Vec<Transaction>>,
}

impl<B: SnapshotBackend> TransactionStore<B> {
    /// Load the persisted collection, or start empty when there is none. A load error is logged and treated as
    /// an empty store rather than taking the process down.
    pub fn load_or_default(backend: B) -> Self {
        let transactions = match backend.load() {
            Ok(txs) => {
                info!("🗄️ Loaded {} transaction(s) from {}", txs.len(), backend.location());
                txs
            },
            Err(e) => {
                error!(
                    "🗄️ Could not load the transaction snapshot from {}. Starting with an empty collection. {e}",
                    backend.location()
                );
                Vec::new()
            },
        };
        Self { backend, transactions: RwLock::new(transactions) }
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// The full collection, in insertion order.
    pub fn all(&self) -> Vec<Transaction> {
        self.read().clone()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.read().iter().any(|t| t.id == id)
    }

    /// The first record, in insertion order, satisfying `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<Transaction>
    where F: Fn(&Transaction) -> bool {
        self.read().iter().find(|t| predicate(t)).cloned()
    }

    /// Append a record and persist the whole collection. Idempotent: inserting an id that is already present is a
    /// no-op and returns `false`.
    ///
    /// Persistence is deliberately best-effort. A backend failure is logged; the in-memory append stands so that
    /// payment confirmation keeps working, at the cost of possible divergence from disk until the next successful
    /// save.
    pub fn insert(&self, transaction: Transaction) -> bool {
        let mut txs = self.transactions.write().unwrap_or_else(PoisonError::into_inner);
        if txs.iter().any(|t| t.id == transaction.id) {
            return false;
        }
        txs.push(transaction);
        if let Err(e) = self.backend.save(&txs) {
            warn!(
                "🗄️ Could not persist the transaction snapshot to {}. The in-memory record is kept. {e}",
                self.backend.location()
            );
        }
        true
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Transaction>> {
        self.transactions.read().unwrap_or_else(PoisonError::into_inner)
    }
}
