//! Best-effort relay of raw webhook payloads to an external observer endpoint.
//!
//! Forwarding is fire-and-forget: the webhook handler hands the payload over and responds without waiting.
//! Each attempt gets one shot with a fixed timeout; the outcome — delivered, rejected, or failed — is only ever
//! observed through the audit trail. Nothing is retried and nothing propagates back to the webhook sender.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use log::{debug, error, info, trace};
use qpg_common::Secret;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    db_types::TxSource,
    webhook_log::{ForwardOutcome, WebhookLog},
};

/// One attempt per payload; anything still in flight after this long is abandoned and logged as failed.
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);
/// Response bodies are truncated to this many bytes in the audit trail.
pub const RESPONSE_SNIPPET_LEN: usize = 500;

#[derive(Debug, Error)]
#[error("Could not initialize the webhook forwarder. {0}")]
pub struct ForwarderInitError(String);

#[derive(Clone, Debug, Default)]
pub struct ForwarderConfig {
    /// Where to relay payloads to. `None` disables forwarding entirely.
    pub url: Option<String>,
    pub api_key: Secret<String>,
    /// The observer endpoint often sits behind a self-signed certificate.
    pub accept_invalid_certs: bool,
}

pub struct WebhookForwarder {
    client: Client,
    url: Option<String>,
    api_key: Secret<String>,
    log: Arc<WebhookLog>,
}

impl WebhookForwarder {
    pub fn new(config: ForwarderConfig, log: Arc<WebhookLog>) -> Result<Self, ForwarderInitError> {
        let client = Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ForwarderInitError(e.to_string()))?;
        Ok(Self { client, url: config.url, api_key: config.api_key, log })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Relay a raw webhook body to the observer endpoint on a detached task. Returns immediately; the task's only
    /// trace is a [`ForwardOutcome`] in the audit trail. Completion is not guaranteed across process shutdown.
    pub fn forward(&self, source: TxSource, body: Value) {
        let Some(url) = self.url.clone() else {
            trace!("📡️ No forward URL configured. Dropping {source} payload.");
            return;
        };
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let log = Arc::clone(&self.log);
        tokio::spawn(async move {
            let payload = json!({
                "source": source,
                "forwardedAt": Utc::now(),
                "data": body,
            });
            let result = client
                .post(&url)
                .header("Authorization", format!("Apikey {}", api_key.reveal()))
                .header("X-Webhook-Source", source.as_tag())
                .json(&payload)
                .send()
                .await;
            let outcome = match result {
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    let success = status.is_success();
                    if success {
                        debug!("📡️ {source} → {url} | Status: {status} | OK");
                    } else {
                        info!("📡️ {source} → {url} | Status: {status} | FAILED | {}", snippet(&text));
                    }
                    ForwardOutcome {
                        time: Utc::now(),
                        source,
                        url,
                        status: Some(status.as_u16()),
                        success,
                        response: Some(snippet(&text)),
                        error: None,
                    }
                },
                Err(e) => {
                    error!("📡️ {source} → {url} | {e}");
                    ForwardOutcome {
                        time: Utc::now(),
                        source,
                        url,
                        status: None,
                        success: false,
                        response: None,
                        error: Some(e.to_string()),
                    }
                },
            };
            log.record_forward_outcome(&outcome);
        });
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(RESPONSE_SNIPPET_LEN).collect()
}
