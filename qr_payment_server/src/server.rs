use std::{sync::Arc, time::Duration};

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::Logger,
    web,
    web::ServiceConfig,
    App,
    HttpServer,
};
use log::{info, warn};
use qr_payment_engine::{
    forwarder::WebhookForwarder,
    traits::SnapshotBackend,
    JsonSnapshot,
    TransactionStore,
    WebhookLog,
};

use crate::{
    casso_routes::casso_webhook,
    config::{ServerConfig, WebhookAuthConfig},
    errors::ServerError,
    routes::{check_transaction, health, transaction_list},
    sepay_routes::sepay_webhook,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = TransactionStore::load_or_default(JsonSnapshot::new(&config.data_dir));
    let srv = create_server_instance(config, store)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Build the server around an already-loaded store. The store, audit log and forwarder are created once and shared
/// by every worker — the store must be a single instance, since it owns the snapshot file.
pub fn create_server_instance<B: SnapshotBackend>(
    config: ServerConfig,
    store: TransactionStore<B>,
) -> Result<Server, ServerError> {
    if config.casso_secure_token.is_none() {
        warn!(
            "🚨️🚨️🚨️ QPG_CASSO_SECURE_TOKEN is not set, so the Casso webhook runs in OPEN MODE and accepts \
             unauthenticated requests. This is for local development only. DO NOT run a production instance like \
             this. 🚨️🚨️🚨️"
        );
    }
    let webhook_log = Arc::new(WebhookLog::new(&config.data_dir));
    let forwarder = WebhookForwarder::new(config.forwarder.clone(), Arc::clone(&webhook_log))
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if forwarder.is_enabled() {
        info!("📡️ Webhook forwarding is enabled");
    }
    let auth = WebhookAuthConfig::from_config(&config);

    let store = web::Data::new(store);
    let webhook_log = web::Data::from(webhook_log);
    let forwarder = web::Data::new(forwarder);
    let auth = web::Data::new(auth);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("qpg::access_log"))
            .app_data(store.clone())
            .app_data(webhook_log.clone())
            .app_data(forwarder.clone())
            .app_data(auth.clone())
            .configure(configure_routes::<B>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Route table, shared between the production server and the endpoint tests. Method-guarded resources give a 405
/// for a wrong method on a known path for free.
pub fn configure_routes<B: SnapshotBackend>(cfg: &mut ServiceConfig) {
    cfg.service(health)
        .service(
            web::resource("/webhook")
                .route(web::get().to(transaction_list::<B>))
                .route(web::post().to(sepay_webhook::<B>)),
        )
        .service(
            web::resource("/webhook-casso")
                .route(web::get().to(transaction_list::<B>))
                .route(web::post().to(casso_webhook::<B>)),
        )
        .service(web::resource("/check-transaction").route(web::get().to(check_transaction::<B>)));
}
