//----------------------------------------------   Casso webhook  ----------------------------------------------------

use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use qr_payment_engine::{
    db_types::TxSource,
    forwarder::WebhookForwarder,
    traits::SnapshotBackend,
    TransactionStore,
    WebhookLog,
};
use serde_json::Value;

use crate::{
    config::WebhookAuthConfig,
    data_objects::{CassoEntryResult, CassoWebhookResponse},
    errors::ServerError,
    integrations::casso::{batch_entries, transaction_from_casso},
};

pub const SECURE_TOKEN_HEADER: &str = "Secure-Token";

/// `POST /webhook-casso`: a batch of transactions from the Casso aggregator.
///
/// Auth comes first: when a secure token is configured, it must match the `Secure-Token` header exactly. With no
/// token configured the check is skipped entirely (open mode — intended for local development, flagged at startup).
///
/// After auth, the raw payload is archived and relayed to the forwarder regardless of what validation makes of it.
/// Entries are then processed independently: a bad entry is reported as `skipped` and never sinks its siblings.
pub async fn casso_webhook<B: SnapshotBackend>(
    req: HttpRequest,
    body: web::Json<Value>,
    store: web::Data<TransactionStore<B>>,
    webhook_log: web::Data<WebhookLog>,
    forwarder: web::Data<WebhookForwarder>,
    auth: web::Data<WebhookAuthConfig>,
) -> Result<HttpResponse, ServerError> {
    trace!("🧾️ Received Casso webhook request: {}", req.uri());
    if let Some(expected) = &auth.casso_secure_token {
        let supplied = req.headers().get(SECURE_TOKEN_HEADER).and_then(|v| v.to_str().ok()).unwrap_or_default();
        if supplied != expected.reveal() {
            warn!("🧾️ Unauthorized Casso webhook request - invalid secure token");
            return Err(ServerError::Unauthorized);
        }
    }

    let payload = body.into_inner();
    webhook_log.record(TxSource::Casso, &payload);
    forwarder.forward(TxSource::Casso, payload.clone());

    let Some(entries) = batch_entries(&payload) else {
        warn!("🧾️ Invalid Casso payload: {payload}");
        return Err(ServerError::InvalidPayload("Invalid Casso payload".to_string()));
    };

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        match transaction_from_casso(entry) {
            Err(e) => {
                debug!("🧾️ Skipping Casso batch entry. {e}");
                results.push(CassoEntryResult::skipped(e));
            },
            Ok(transaction) => {
                let id = transaction.id.clone();
                let summary = transaction.to_string();
                if store.insert(transaction) {
                    info!("🧾️ Stored transaction {summary}");
                    results.push(CassoEntryResult::processed(id));
                } else {
                    info!("🧾️ Duplicate Casso transaction: {id}");
                    results.push(CassoEntryResult::duplicate(id));
                }
            },
        }
    }
    Ok(HttpResponse::Ok().json(CassoWebhookResponse { success: true, results }))
}
