use actix_web::http::StatusCode;
use serde_json::{json, Value};

use super::helpers::{casso_batch, casso_entry, sepay_payload, TestContext, CASSO_SECURE_TOKEN, SEPAY_API_KEY};

const TOKEN_HEADER: (&str, &str) = ("Secure-Token", CASSO_SECURE_TOKEN);

#[actix_web::test]
async fn a_webhook_without_the_token_is_unauthorized() {
    let ctx = TestContext::new();
    let batch = casso_batch(vec![casso_entry(1, "SEVQRAB12X", 150_000)]);
    let (status, _) = ctx.post("/webhook-casso", &[], &batch).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = ctx.post("/webhook-casso", &[("Secure-Token", "nope")], &batch).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.store.count(), 0);
}

#[actix_web::test]
async fn open_mode_skips_the_token_check() {
    let ctx = TestContext::open_mode();
    let batch = casso_batch(vec![casso_entry(1, "SEVQRAB12X", 150_000)]);
    let (status, _) = ctx.post("/webhook-casso", &[], &batch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.store.count(), 1);
}

#[actix_web::test]
async fn a_bad_envelope_is_rejected() {
    let ctx = TestContext::new();
    for payload in [json!({"error": 1, "data": []}), json!({"data": []}), json!({"error": 0, "data": {}})] {
        let (status, body) = ctx.post("/webhook-casso", &[TOKEN_HEADER], &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"success": false, "error": "Invalid Casso payload"}));
    }
}

#[actix_web::test]
async fn an_empty_batch_is_a_successful_no_op() {
    let ctx = TestContext::new();
    let (status, body) = ctx.post("/webhook-casso", &[TOKEN_HEADER], &casso_batch(vec![])).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"success": true, "results": []}));
}

#[actix_web::test]
async fn one_bad_entry_never_sinks_its_siblings() {
    let ctx = TestContext::new();
    let mut orphan = casso_entry(0, "no id here", 10_000);
    orphan.as_object_mut().unwrap().remove("id");
    let batch = casso_batch(vec![casso_entry(1, "SEVQRAB12X", 150_000), orphan, casso_entry(2, "SEVQRZZ99Q", 75_000)]);
    let (status, body) = ctx.post("/webhook-casso", &[TOKEN_HEADER], &batch).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], json!(true));
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], json!({"id": "casso_1", "status": "processed"}));
    assert_eq!(results[1]["status"], json!("skipped"));
    assert_eq!(results[1]["id"], json!(null));
    assert_eq!(results[1]["reason"], json!("Missing transaction id"));
    assert_eq!(results[2], json!({"id": "casso_2", "status": "processed"}));
    assert_eq!(ctx.store.count(), 2);
}

#[actix_web::test]
async fn redelivered_entries_come_back_as_duplicates() {
    let ctx = TestContext::new();
    let batch = casso_batch(vec![casso_entry(7, "SEVQRAB12X", 150_000)]);
    let (status, _) = ctx.post("/webhook-casso", &[TOKEN_HEADER], &batch).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = ctx.post("/webhook-casso", &[TOKEN_HEADER], &batch).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["results"][0], json!({"id": "casso_7", "status": "duplicate"}));
    assert_eq!(ctx.store.count(), 1);
}

#[actix_web::test]
async fn provider_ids_never_collide_across_sources() {
    let ctx = TestContext::new();
    let auth = format!("Apikey {SEPAY_API_KEY}");
    let (status, _) = ctx.post("/webhook", &[("Authorization", auth.as_str())], &sepay_payload("777", "SEVQRAB12X")).await;
    assert_eq!(status, StatusCode::OK);
    let batch = casso_batch(vec![casso_entry(777, "SEVQRAB12X", 150_000)]);
    let (status, _) = ctx.post("/webhook-casso", &[TOKEN_HEADER], &batch).await;
    assert_eq!(status, StatusCode::OK);
    // Same native id, different providers: both survive.
    assert_eq!(ctx.store.count(), 2);
    assert!(ctx.store.exists("777"));
    assert!(ctx.store.exists("casso_777"));
}
