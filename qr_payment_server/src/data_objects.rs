use std::fmt::Display;

use qr_payment_engine::{db_types::Transaction, matcher::ConfirmedTransaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JsonResponse {
    pub fn ok() -> Self {
        Self { success: true, message: None }
    }

    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: Some(message.to_string()) }
    }
}

/// Body of the `GET /webhook` and `GET /webhook-casso` listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub success: bool,
    pub total: usize,
    pub transactions: Vec<Transaction>,
}

/// Query parameters of `GET /check-transaction`. Everything arrives as a string; empty strings count as absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTransactionParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckTransactionResponse {
    pub success: bool,
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<ConfirmedTransaction>,
}

//-------------------------------------------  Casso batch results  ---------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CassoEntryStatus {
    Processed,
    Duplicate,
    Skipped,
}

/// Per-entry outcome of a Casso batch. Entries are processed independently, so one bad entry never fails the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CassoEntryResult {
    pub id: Option<String>,
    pub status: CassoEntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CassoEntryResult {
    pub fn processed(id: String) -> Self {
        Self { id: Some(id), status: CassoEntryStatus::Processed, reason: None }
    }

    pub fn duplicate(id: String) -> Self {
        Self { id: Some(id), status: CassoEntryStatus::Duplicate, reason: None }
    }

    pub fn skipped<S: Display>(reason: S) -> Self {
        Self { id: None, status: CassoEntryStatus::Skipped, reason: Some(reason.to_string()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CassoWebhookResponse {
    pub success: bool,
    pub results: Vec<CassoEntryResult>,
}
