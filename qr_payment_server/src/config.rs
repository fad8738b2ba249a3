use std::{env, path::PathBuf};

use log::*;
use qpg_common::Secret;
use qr_payment_engine::forwarder::ForwarderConfig;

const DEFAULT_QPG_HOST: &str = "127.0.0.1";
const DEFAULT_QPG_PORT: u16 = 8360;
const DEFAULT_QPG_DATA_DIR: &str = "./data";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where the transaction snapshot and the webhook audit logs live.
    pub data_dir: PathBuf,
    /// Shared secret for the SePay direct webhook. When empty, every SePay webhook is rejected (fail closed).
    pub sepay_api_key: Secret<String>,
    /// Secure token for the Casso aggregator webhook. `None` means open mode: the token check is skipped entirely.
    /// That is intended for local development only and is flagged loudly at startup.
    pub casso_secure_token: Option<Secret<String>>,
    pub forwarder: ForwarderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_QPG_HOST.to_string(),
            port: DEFAULT_QPG_PORT,
            data_dir: PathBuf::from(DEFAULT_QPG_DATA_DIR),
            sepay_api_key: Secret::default(),
            casso_secure_token: None,
            forwarder: ForwarderConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("QPG_HOST").ok().unwrap_or_else(|| DEFAULT_QPG_HOST.into());
        let port = env::var("QPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for QPG_PORT. {e} Using the default, {DEFAULT_QPG_PORT}, instead."
                    );
                    DEFAULT_QPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_QPG_PORT);
        let data_dir = env::var("QPG_DATA_DIR").map(PathBuf::from).ok().unwrap_or_else(|| {
            info!("🪛️ QPG_DATA_DIR is not set. Using the default, {DEFAULT_QPG_DATA_DIR}.");
            PathBuf::from(DEFAULT_QPG_DATA_DIR)
        });
        let sepay_api_key = match env::var("QPG_SEPAY_API_KEY") {
            Ok(key) if !key.is_empty() => Secret::new(key),
            _ => {
                error!(
                    "🪛️ QPG_SEPAY_API_KEY is not set. Every SePay webhook will be rejected until it is configured."
                );
                Secret::default()
            },
        };
        let casso_secure_token = match env::var("QPG_CASSO_SECURE_TOKEN") {
            Ok(token) if !token.is_empty() => Some(Secret::new(token)),
            _ => None,
        };
        let forwarder = forwarder_config_from_env();
        Self { host, port, data_dir, sepay_api_key, casso_secure_token, forwarder }
    }
}

fn forwarder_config_from_env() -> ForwarderConfig {
    let url = env::var("QPG_FORWARD_URL").ok().filter(|s| !s.is_empty());
    if url.is_none() {
        info!("🪛️ QPG_FORWARD_URL is not set. Webhook forwarding is disabled.");
    }
    let api_key = env::var("QPG_FORWARD_API_KEY").map(Secret::new).unwrap_or_default();
    let accept_invalid_certs =
        env::var("QPG_FORWARD_ACCEPT_INVALID_CERTS").map(|s| &s == "1" || &s == "true").unwrap_or(false);
    ForwarderConfig { url, api_key, accept_invalid_certs }
}

//-------------------------------------------  WebhookAuthConfig  -----------------------------------------------------
/// The subset of the configuration the webhook handlers need: just the per-provider credentials. Kept small so the
/// full config (paths, forwarding secrets) doesn't travel through request state.
#[derive(Clone, Debug)]
pub struct WebhookAuthConfig {
    pub sepay_api_key: Secret<String>,
    pub casso_secure_token: Option<Secret<String>>,
}

impl WebhookAuthConfig {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { sepay_api_key: config.sepay_api_key.clone(), casso_secure_token: config.casso_secure_token.clone() }
    }
}
