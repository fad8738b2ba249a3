//! SePay sends one transaction per webhook call, already close to the canonical shape. The mapping is 1:1 with
//! defaults for whatever the bank left out; the only hard requirement is the presence of an id.

use chrono::Utc;
use qpg_common::Vnd;
use qr_payment_engine::db_types::{Transaction, TransferDirection, TxSource};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::WebhookConversionError;

/// The raw SePay webhook payload. SePay has been observed sending ids as both numbers and strings, so `id` stays
/// a [`Value`] until [`transaction_from_sepay`] normalizes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SepayTransaction {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub gateway: String,
    #[serde(default)]
    pub transaction_date: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub transfer_type: TransferDirection,
    #[serde(default)]
    pub transfer_amount: i64,
    #[serde(default)]
    pub accumulated: i64,
    #[serde(default)]
    pub sub_account: Option<String>,
    #[serde(default)]
    pub reference_code: String,
    #[serde(default)]
    pub description: String,
}

/// Normalize a provider id that may be a JSON number or string. Empty strings and other JSON types count as absent.
pub fn native_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Build a canonical record from a raw SePay payload, stamping `received_at` with the ingestion clock.
pub fn transaction_from_sepay(payload: &Value) -> Result<Transaction, WebhookConversionError> {
    let id = native_id(payload.get("id")).ok_or(WebhookConversionError::MissingId)?;
    let tx: SepayTransaction =
        serde_json::from_value(payload.clone()).map_err(|e| WebhookConversionError::Malformed(e.to_string()))?;
    Ok(Transaction {
        id: TxSource::SePay.namespaced_id(&id),
        gateway: tx.gateway,
        transaction_date: tx.transaction_date,
        account_number: tx.account_number,
        code: tx.code,
        content: tx.content,
        transfer_type: tx.transfer_type,
        transfer_amount: Vnd::from(tx.transfer_amount),
        accumulated: Vnd::from(tx.accumulated),
        sub_account: tx.sub_account,
        reference_code: tx.reference_code,
        description: tx.description,
        received_at: Some(Utc::now()),
        source: TxSource::SePay,
        casso_original: None,
    })
}
