//! The confirmation watcher. One cancellable loop replaces the poll-timer / timeout-timer / cleanup-timer tangle a
//! browser client needs: a single `select!` races the poll ticker against the overall deadline, and dropping the
//! future tears everything down.

use std::time::Duration;

use anyhow::{anyhow, Result};
use log::{debug, warn};
use qr_payment_engine::matcher::ConfirmedTransaction;
use qr_payment_server::data_objects::CheckTransactionResponse;
use reqwest::Client;
use tokio::time::{interval, sleep, MissedTickBehavior};
use url::Url;

use crate::WatchParams;

#[derive(Debug)]
pub enum WatchOutcome {
    Confirmed(ConfirmedTransaction),
    Expired,
}

pub async fn watch_for_confirmation(params: &WatchParams) -> Result<WatchOutcome> {
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
    let url = build_query_url(params)?;
    debug!("Polling {url} every {}s for up to {}s", params.interval, params.timeout);

    let deadline = sleep(Duration::from_secs(params.timeout));
    tokio::pin!(deadline);
    let mut ticker = interval(Duration::from_secs(params.interval.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = &mut deadline => return Ok(WatchOutcome::Expired),
            _ = ticker.tick() => {
                if let Some(tx) = poll_once(&client, &url).await? {
                    return Ok(WatchOutcome::Confirmed(tx));
                }
            },
        }
    }
}

fn build_query_url(params: &WatchParams) -> Result<Url> {
    let mut url = Url::parse(&params.server)?.join("check-transaction")?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("code", &params.code);
        if let Some(account) = &params.account_number {
            query.append_pair("accountNumber", account);
        }
        if let Some(amount) = params.amount {
            query.append_pair("amount", &amount.to_string());
        }
    }
    Ok(url)
}

/// One poll. Transport errors are transient and keep the loop going; a 4xx/5xx means the query itself is bad and
/// will never succeed, so it aborts the watch.
async fn poll_once(client: &Client, url: &Url) -> Result<Option<ConfirmedTransaction>> {
    let response = match client.get(url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("Poll failed, will retry. {e}");
            return Ok(None);
        },
    };
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("The server rejected the query with status {status}. {body}"));
    }
    let body: CheckTransactionResponse = response.json().await?;
    Ok(if body.confirmed { body.transaction } else { None })
}
