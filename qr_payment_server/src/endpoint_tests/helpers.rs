use std::sync::Arc;

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use qpg_common::Secret;
use qr_payment_engine::{
    forwarder::{ForwarderConfig, WebhookForwarder},
    MemoryBackend,
    TransactionStore,
    WebhookLog,
};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::{config::WebhookAuthConfig, server::configure_routes};

pub const SEPAY_API_KEY: &str = "test-sepay-key";
pub const CASSO_SECURE_TOKEN: &str = "test-casso-token";

/// One fully wired server instance over the in-memory backend. The audit log writes into a temp dir that lives as
/// long as the context. Forwarding stays disabled; its fire-and-forget contract is tested in the engine crate.
pub struct TestContext {
    pub store: web::Data<TransactionStore<MemoryBackend>>,
    webhook_log: web::Data<WebhookLog>,
    forwarder: web::Data<WebhookForwarder>,
    auth: web::Data<WebhookAuthConfig>,
    _data_dir: TempDir,
}

impl TestContext {
    /// Both webhook credentials configured. This is the normal production shape.
    pub fn new() -> Self {
        Self::with_auth(Secret::new(SEPAY_API_KEY.into()), Some(Secret::new(CASSO_SECURE_TOKEN.into())))
    }

    /// No Casso token configured, so the Casso webhook accepts unauthenticated requests.
    pub fn open_mode() -> Self {
        Self::with_auth(Secret::new(SEPAY_API_KEY.into()), None)
    }

    /// An unconfigured SePay key. The server must fail closed, not accept `Apikey ` with an empty key.
    pub fn without_sepay_key() -> Self {
        Self::with_auth(Secret::default(), Some(Secret::new(CASSO_SECURE_TOKEN.into())))
    }

    fn with_auth(sepay_api_key: Secret<String>, casso_secure_token: Option<Secret<String>>) -> Self {
        let _ = env_logger::try_init().ok();
        let data_dir = TempDir::new().expect("Could not create a temp dir for the test context");
        let store = web::Data::new(TransactionStore::load_or_default(MemoryBackend::new()));
        let webhook_log = Arc::new(WebhookLog::new(data_dir.path()));
        let forwarder = WebhookForwarder::new(ForwarderConfig::default(), Arc::clone(&webhook_log))
            .expect("Could not build the test forwarder");
        let auth = WebhookAuthConfig { sepay_api_key, casso_secure_token };
        Self {
            store,
            webhook_log: web::Data::from(webhook_log),
            forwarder: web::Data::new(forwarder),
            auth: web::Data::new(auth),
            _data_dir: data_dir,
        }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.call(TestRequest::get().uri(path)).await
    }

    pub async fn post(&self, path: &str, headers: &[(&str, &str)], body: &Value) -> (StatusCode, String) {
        let mut req = TestRequest::post().uri(path).set_json(body);
        for &(name, value) in headers {
            req = req.insert_header((name, value));
        }
        self.call(req).await
    }

    pub async fn call(&self, req: TestRequest) -> (StatusCode, String) {
        let app = App::new()
            .app_data(self.store.clone())
            .app_data(self.webhook_log.clone())
            .app_data(self.forwarder.clone())
            .app_data(self.auth.clone())
            .configure(configure_routes::<MemoryBackend>);
        let service = test::init_service(app).await;
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        (status, body)
    }
}

/// A well-formed SePay payload carrying the given memo.
pub fn sepay_payload(id: &str, content: &str) -> Value {
    json!({
        "id": id,
        "gateway": "MBBank",
        "transactionDate": "2025-11-02 14:00:00",
        "accountNumber": "0359123456",
        "content": content,
        "transferType": "in",
        "transferAmount": 50_000,
        "accumulated": 1_250_000,
        "referenceCode": "FT25306772",
        "description": content,
    })
}

/// A well-formed Casso batch entry. Positive amounts are incoming transfers.
pub fn casso_entry(id: i64, description: &str, amount: i64) -> Value {
    json!({
        "id": id,
        "tid": format!("BFT{id}"),
        "description": description,
        "amount": amount,
        "cusum_balance": 5_320_000,
        "when": "2025-11-02 14:05:00",
        "bank_sub_acc_id": "9704229299",
        "bankName": "ACB",
    })
}

/// Wrap entries in the Casso delivery envelope.
pub fn casso_batch(entries: Vec<Value>) -> Value {
    json!({ "error": 0, "data": entries })
}
