//! Fixtures shared by the engine's own tests and, behind the `test_utils` feature, by downstream crates' tests.

use chrono::{DateTime, TimeZone, Utc};
use qpg_common::Vnd;

use crate::db_types::{Transaction, TransferDirection, TxSource};

/// A representative incoming SePay transfer carrying a payment code in its memo.
pub fn sample_transaction() -> Transaction {
    Transaction {
        id: "12345".to_string(),
        gateway: "MBBank".to_string(),
        transaction_date: "2025-11-02 14:00:00".to_string(),
        account_number: "0359123456".to_string(),
        code: None,
        content: "Payment SEVQRAB12X ok".to_string(),
        transfer_type: TransferDirection::In,
        transfer_amount: Vnd::from(50_000),
        accumulated: Vnd::from(1_250_000),
        sub_account: None,
        reference_code: "FT25306772".to_string(),
        description: "Payment SEVQRAB12X ok".to_string(),
        received_at: Some(Utc.with_ymd_and_hms(2025, 11, 2, 14, 0, 5).unwrap()),
        source: TxSource::SePay,
        casso_original: None,
    }
}

/// An incoming transfer with the given id and memo, stamped `received_at`.
pub fn incoming_transfer(id: &str, content: &str, received_at: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.to_string(),
        content: content.to_string(),
        description: content.to_string(),
        received_at: Some(received_at),
        ..sample_transaction()
    }
}
