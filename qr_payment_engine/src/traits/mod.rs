//! Seams between the engine and its environment. Currently this is just snapshot persistence; the server picks a
//! backend at startup and the store never needs to know where its records live.

mod storage;

pub use storage::{SnapshotBackend, StorageError};
