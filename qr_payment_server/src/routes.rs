//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! All handlers are generic over the snapshot backend so the endpoint tests can run against the in-memory backend
//! while production uses the JSON snapshot file. Registration happens in [`crate::server::configure_routes`].

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use qpg_common::Vnd;
use qr_payment_engine::{
    matcher::{find_matching_transaction, MatchQuery},
    traits::SnapshotBackend,
    TransactionStore,
};

use crate::{
    data_objects::{CheckTransactionParams, CheckTransactionResponse, TransactionListResponse},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Listing  ----------------------------------------------------
/// `GET /webhook` and `GET /webhook-casso`: the full transaction list, for diagnostics. No filtering.
pub async fn transaction_list<B: SnapshotBackend>(store: web::Data<TransactionStore<B>>) -> HttpResponse {
    let transactions = store.all();
    trace!("💻️ Listing {} stored transaction(s)", transactions.len());
    HttpResponse::Ok().json(TransactionListResponse { success: true, total: transactions.len(), transactions })
}

//----------------------------------------------   Matching  ----------------------------------------------------
/// `GET /check-transaction?code=&accountNumber=&amount=`
///
/// `code` is required. An absent match is a successful response with `confirmed: false` — the polling client keeps
/// asking until its own budget runs out.
pub async fn check_transaction<B: SnapshotBackend>(
    params: web::Query<CheckTransactionParams>,
    store: web::Data<TransactionStore<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = params.into_inner();
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(ServerError::MissingParameter("code"));
    };
    let amount = match params.amount.filter(|a| !a.is_empty()) {
        Some(raw) => Some(raw.parse::<i64>().map(Vnd::from).map_err(|e| {
            debug!("💻️ Rejecting check-transaction request with malformed amount '{raw}'. {e}");
            ServerError::InvalidPayload("amount must be an integer".to_string())
        })?),
        None => None,
    };
    let query = MatchQuery {
        code,
        account_number: params.account_number.filter(|a| !a.is_empty()),
        amount,
    };
    let response = match find_matching_transaction(store.get_ref(), &query, Utc::now()) {
        Some(tx) => {
            info!("💻️ Code {} confirmed: {} from {}", query.code, tx.transfer_amount, tx.gateway);
            CheckTransactionResponse { success: true, confirmed: true, transaction: Some(tx) }
        },
        None => CheckTransactionResponse { success: true, confirmed: false, transaction: None },
    };
    Ok(HttpResponse::Ok().json(response))
}
