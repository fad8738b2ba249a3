//! The match engine. Given a payment code (and optional account/amount hints), find the stored transaction that
//! confirms the transfer.
//!
//! The predicate is deliberately permissive — a case-insensitive substring check on the free-text memo — because
//! banks and aggregators mangle memo formatting in transit. The entropy of the generated payment codes (see
//! [`crate::helpers::new_payment_code`]) is what keeps false positives at bay, together with a 30-minute trailing
//! window measured against the ingestion clock, not the bank's timestamp.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use qpg_common::Vnd;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Transaction, TransferDirection},
    store::TransactionStore,
    traits::SnapshotBackend,
};

/// How long an ingested transaction remains eligible for confirmation.
pub const MATCH_WINDOW: Duration = Duration::minutes(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// The payment code to look for in the transfer memo. Matched case-insensitively, as a substring.
    pub code: String,
    /// When supplied, the destination account number must match exactly.
    pub account_number: Option<String>,
    /// When supplied, the transfer amount must match exactly.
    pub amount: Option<Vnd>,
}

impl MatchQuery {
    pub fn for_code<S: Into<String>>(code: S) -> Self {
        Self { code: code.into(), account_number: None, amount: None }
    }
}

/// The projection of a matched transaction that is safe to hand to polling clients. Internal bookkeeping (the
/// provider extension bag, the ingestion source) stays out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransaction {
    pub id: String,
    pub gateway: String,
    pub transaction_date: String,
    pub account_number: String,
    pub content: String,
    pub transfer_amount: Vnd,
    pub accumulated: Vnd,
    pub reference_code: String,
}

impl From<Transaction> for ConfirmedTransaction {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            gateway: t.gateway,
            transaction_date: t.transaction_date,
            account_number: t.account_number,
            content: t.content,
            transfer_amount: t.transfer_amount,
            accumulated: t.accumulated,
            reference_code: t.reference_code,
        }
    }
}

/// Scan the store, in insertion order, for the first transaction that confirms `query` as of `now`.
///
/// A record matches when all of the following hold:
/// * the memo contains the code, ignoring case;
/// * the transfer is incoming;
/// * it was ingested within [`MATCH_WINDOW`] of `now` (records without an ingestion timestamp never match);
/// * the account-number and amount hints, where supplied, match exactly.
///
/// `None` is the ordinary "not confirmed yet" answer, not a failure.
pub fn find_matching_transaction<B: SnapshotBackend>(
    store: &TransactionStore<B>,
    query: &MatchQuery,
    now: DateTime<Utc>,
) -> Option<ConfirmedTransaction> {
    let code = query.code.to_uppercase();
    let found = store.find(|t| {
        let content_match = t.content.to_uppercase().contains(&code);
        let incoming = t.transfer_type == TransferDirection::In;
        let recent = t.received_at.map(|at| now - at <= MATCH_WINDOW).unwrap_or(false);
        let account_match = query.account_number.as_deref().map_or(true, |acc| t.account_number == acc);
        let amount_match = query.amount.map_or(true, |amount| t.transfer_amount == amount);
        content_match && incoming && recent && account_match && amount_match
    });
    match &found {
        Some(t) => debug!("🔎️ Code {} confirmed by transaction {}", query.code, t.id),
        None => debug!("🔎️ No transaction confirms code {} yet", query.code),
    }
    found.map(ConfirmedTransaction::from)
}
