//! QR Payment Engine
//!
//! The QR Payment Engine contains the core logic for confirming bank transfers against QR payment codes. It is
//! HTTP-framework agnostic; the server crate wires its pieces up to the webhook endpoints.
//!
//! The engine is made up of four parts:
//! 1. The transaction store ([`mod@store`]). An append-only, in-memory collection of canonical transaction records
//!    with duplicate-id suppression. Persistence is delegated to a [`traits::SnapshotBackend`]; the default backend
//!    ([`JsonSnapshot`]) rewrites a single JSON snapshot file on every insert.
//! 2. The match engine ([`mod@matcher`]). Scans the store for the first incoming transaction whose free-text memo
//!    contains a payment code, received within the last 30 minutes, optionally narrowed by account number and amount.
//! 3. The webhook log ([`mod@webhook_log`]). A raw-payload audit trail kept per provider, independent of the store,
//!    for forensic replay. Forwarding outcomes land in the same directory.
//! 4. The webhook forwarder ([`mod@forwarder`]). A best-effort, fire-and-forget relay of raw webhook payloads to an
//!    external observer endpoint. Failures are logged to the audit trail and never surface to the webhook sender.

pub mod db_types;
pub mod forwarder;
pub mod helpers;
pub mod matcher;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod webhook_log;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use snapshot::{JsonSnapshot, MemoryBackend};
pub use store::TransactionStore;
pub use webhook_log::WebhookLog;
