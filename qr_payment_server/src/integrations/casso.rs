//! Casso aggregates several banks and delivers transactions in batches: `{error: 0, data: [...]}`. Its field names
//! are a mix of camelCase and snake_case, transfer direction is encoded in the sign of the amount, and ids are
//! plain integers that must be namespaced before they can live next to SePay ids in the store.

use chrono::Utc;
use qpg_common::Vnd;
use qr_payment_engine::db_types::{CassoOriginal, Transaction, TransferDirection, TxSource};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::WebhookConversionError;

/// One entry of a Casso webhook batch, as delivered. Field renames are explicit because Casso does not follow a
/// single naming convention.
#[derive(Debug, Clone, Deserialize)]
pub struct CassoEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "bankName")]
    pub bank_name: String,
    #[serde(default, rename = "bankAbbreviation")]
    pub bank_abbreviation: String,
    #[serde(default)]
    pub when: String,
    #[serde(default, rename = "bank_sub_acc_id")]
    pub bank_sub_acc_id: String,
    #[serde(default, rename = "subAccId")]
    pub sub_acc_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default, rename = "cusum_balance")]
    pub cusum_balance: i64,
    #[serde(default, rename = "virtualAccount")]
    pub virtual_account: String,
    #[serde(default, rename = "virtualAccountName")]
    pub virtual_account_name: String,
    #[serde(default)]
    pub tid: String,
    #[serde(default, rename = "corresponsiveName")]
    pub corresponsive_name: String,
    #[serde(default, rename = "corresponsiveAccount")]
    pub corresponsive_account: String,
    #[serde(default, rename = "corresponsiveBankId")]
    pub corresponsive_bank_id: String,
    #[serde(default, rename = "corresponsiveBankName")]
    pub corresponsive_bank_name: String,
}

/// Check the envelope of a Casso webhook: `error` must be the success sentinel `0` and `data` must be an array.
/// Returns the entries for per-entry processing.
pub fn batch_entries(payload: &Value) -> Option<&Vec<Value>> {
    if payload.get("error").and_then(Value::as_i64) != Some(0) {
        return None;
    }
    payload.get("data").and_then(Value::as_array)
}

/// Build a canonical record from one batch entry. The provider-specific correspondent and virtual-account fields
/// are preserved verbatim in the extension bag; the match engine never reads them.
pub fn transaction_from_casso(entry: &Value) -> Result<Transaction, WebhookConversionError> {
    let entry: CassoEntry =
        serde_json::from_value(entry.clone()).map_err(|e| WebhookConversionError::Malformed(e.to_string()))?;
    let native_id = entry.id.ok_or(WebhookConversionError::MissingId)?;
    let amount = Vnd::from(entry.amount);
    let gateway = first_non_empty(entry.bank_name.clone(), entry.bank_abbreviation.clone());
    let account_number = first_non_empty(entry.bank_sub_acc_id.clone(), entry.sub_acc_id.clone());
    let direction = if amount.is_positive() { TransferDirection::In } else { TransferDirection::Out };
    Ok(Transaction {
        id: TxSource::Casso.namespaced_id(&native_id.to_string()),
        gateway,
        transaction_date: entry.when.clone(),
        account_number,
        code: None,
        content: entry.description.clone(),
        transfer_type: direction,
        transfer_amount: amount.abs(),
        accumulated: Vnd::from(entry.cusum_balance),
        sub_account: Some(entry.virtual_account.clone()).filter(|s| !s.is_empty()),
        reference_code: entry.tid.clone(),
        description: entry.description.clone(),
        received_at: Some(Utc::now()),
        source: TxSource::Casso,
        casso_original: Some(CassoOriginal {
            id: native_id,
            tid: entry.tid,
            corresponsive_name: entry.corresponsive_name,
            corresponsive_account: entry.corresponsive_account,
            corresponsive_bank_id: entry.corresponsive_bank_id,
            corresponsive_bank_name: entry.corresponsive_bank_name,
            virtual_account_name: entry.virtual_account_name,
        }),
    })
}

fn first_non_empty(first: String, second: String) -> String {
    if first.is_empty() {
        second
    } else {
        first
    }
}
