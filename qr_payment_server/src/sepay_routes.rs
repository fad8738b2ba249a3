//----------------------------------------------   SePay webhook  ----------------------------------------------------

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::*;
use qr_payment_engine::{db_types::TxSource, traits::SnapshotBackend, TransactionStore, WebhookLog};
use serde_json::Value;

use crate::{
    config::WebhookAuthConfig,
    data_objects::JsonResponse,
    errors::ServerError,
    integrations::sepay::transaction_from_sepay,
};

/// `POST /webhook`: one transaction per call, authenticated with a shared API key.
///
/// Order of operations matters and is part of the contract: the API key is checked first (an unauthorized request
/// leaves no trace beyond its log line), then the raw payload is archived, and only then is the payload validated
/// and stored. A payload that fails validation is therefore still available in the audit trail for replay.
pub async fn sepay_webhook<B: SnapshotBackend>(
    req: HttpRequest,
    body: web::Json<Value>,
    store: web::Data<TransactionStore<B>>,
    webhook_log: web::Data<WebhookLog>,
    auth: web::Data<WebhookAuthConfig>,
) -> Result<HttpResponse, ServerError> {
    trace!("🏦️ Received SePay webhook request: {}", req.uri());
    let supplied = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).unwrap_or_default();
    let expected = format!("Apikey {}", auth.sepay_api_key.reveal());
    // An unconfigured key fails closed rather than accepting "Apikey ".
    if !auth.sepay_api_key.is_provided() || supplied != expected {
        warn!("🏦️ Unauthorized SePay webhook request - invalid API key");
        return Err(ServerError::Unauthorized);
    }

    let payload = body.into_inner();
    webhook_log.record(TxSource::SePay, &payload);

    let transaction = transaction_from_sepay(&payload).map_err(|e| {
        warn!("🏦️ Invalid SePay payload. {e}");
        ServerError::InvalidPayload("Invalid transaction data".to_string())
    })?;

    let summary = transaction.to_string();
    if !store.insert(transaction) {
        info!("🏦️ Duplicate SePay transaction: {summary}");
        return Ok(HttpResponse::Ok().json(JsonResponse::success("Transaction already processed")));
    }
    info!("🏦️ Stored transaction {summary}");
    Ok(HttpResponse::Ok().json(JsonResponse::ok()))
}
