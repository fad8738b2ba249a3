use actix_web::http::StatusCode;
use serde_json::{json, Value};

use super::helpers::{sepay_payload, TestContext, SEPAY_API_KEY};

fn auth_header() -> (&'static str, String) {
    ("Authorization", format!("Apikey {SEPAY_API_KEY}"))
}

#[actix_web::test]
async fn health_check() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn a_webhook_without_credentials_is_unauthorized() {
    let ctx = TestContext::new();
    let (status, body) = ctx.post("/webhook", &[], &sepay_payload("1", "SEVQRAB12X")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"success": false, "error": "Unauthorized"}));
    assert_eq!(ctx.store.count(), 0);
}

#[actix_web::test]
async fn a_webhook_with_the_wrong_key_is_unauthorized() {
    let ctx = TestContext::new();
    let (status, _) =
        ctx.post("/webhook", &[("Authorization", "Apikey nope")], &sepay_payload("1", "SEVQRAB12X")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn an_unconfigured_key_fails_closed() {
    let ctx = TestContext::without_sepay_key();
    // The exact header an attacker would guess for an empty key.
    let (status, _) = ctx.post("/webhook", &[("Authorization", "Apikey ")], &sepay_payload("1", "SEVQRAB12X")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = ctx.post("/webhook", &[("Authorization", "Apikey")], &sepay_payload("1", "SEVQRAB12X")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn a_valid_transaction_is_stored() {
    let ctx = TestContext::new();
    let header = auth_header();
    let (status, body) = ctx.post("/webhook", &[(header.0, header.1.as_str())], &sepay_payload("92704", "SEVQRAB12X")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"success": true}));
    assert!(ctx.store.exists("92704"));
}

#[actix_web::test]
async fn a_payload_without_an_id_is_rejected() {
    let ctx = TestContext::new();
    let header = auth_header();
    let (status, body) = ctx.post("/webhook", &[(header.0, header.1.as_str())], &json!({"content": "SEVQRAB12X"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"success": false, "error": "Invalid transaction data"}));
    assert_eq!(ctx.store.count(), 0);
}

#[actix_web::test]
async fn redelivery_is_idempotent() {
    let ctx = TestContext::new();
    let header = auth_header();
    let payload = sepay_payload("92704", "SEVQRAB12X");
    let (status, _) = ctx.post("/webhook", &[(header.0, header.1.as_str())], &payload).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = ctx.post("/webhook", &[(header.0, header.1.as_str())], &payload).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"success": true, "message": "Transaction already processed"}));
    assert_eq!(ctx.store.count(), 1);
}

#[actix_web::test]
async fn the_listing_returns_every_stored_transaction() {
    let ctx = TestContext::new();
    let header = auth_header();
    let _ = ctx.post("/webhook", &[(header.0, header.1.as_str())], &sepay_payload("1", "SEVQRAB12X")).await;
    let _ = ctx.post("/webhook", &[(header.0, header.1.as_str())], &sepay_payload("2", "SEVQRZZ99Q")).await;
    let (status, body) = ctx.get("/webhook").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["transactions"][0]["id"], json!("1"));
    assert_eq!(body["transactions"][1]["id"], json!("2"));
}

#[actix_web::test]
async fn an_unsupported_method_is_a_405() {
    let ctx = TestContext::new();
    let req = actix_web::test::TestRequest::delete().uri("/webhook");
    let (status, _) = ctx.call(req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
