use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use qr_payment_engine::helpers::new_payment_code;

mod watcher;

use crate::watcher::{watch_for_confirmation, WatchOutcome};

#[derive(Parser, Debug)]
#[command(version, about = "Client-side helpers for the QR payment gateway")]
pub struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new random payment code to embed in a transfer QR
    #[clap(name = "code")]
    NewCode,
    /// Poll the gateway until a payment code is confirmed, or give up after the timeout
    #[clap(name = "watch")]
    Watch(WatchParams),
}

#[derive(Debug, Args)]
pub struct WatchParams {
    /// The payment code to watch for
    #[arg(short = 'c', long = "code")]
    pub code: String,
    /// Base URL of the payment gateway server
    #[arg(short = 's', long = "server", default_value = "http://127.0.0.1:8360")]
    pub server: String,
    /// Only accept transfers into this account number
    #[arg(short = 'a', long = "account")]
    pub account_number: Option<String>,
    /// Only accept transfers of exactly this amount, in VND
    #[arg(short = 'm', long = "amount")]
    pub amount: Option<i64>,
    /// Seconds between polls
    #[arg(short = 'i', long = "interval", default_value = "3")]
    pub interval: u64,
    /// Give up after this many seconds
    #[arg(short = 't', long = "timeout", default_value = "1800")]
    pub timeout: u64,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    match cli.command {
        Command::NewCode => println!("{}", new_payment_code()),
        Command::Watch(params) => watch(params).await,
    }
}

async fn watch(params: WatchParams) {
    let code = params.code.clone();
    match watch_for_confirmation(&params).await {
        Ok(WatchOutcome::Confirmed(tx)) => {
            println!("--------------------------- Payment confirmed --------------------------");
            println!("Code:      {code}");
            println!("Amount:    {}", tx.transfer_amount);
            println!("Gateway:   {}", tx.gateway);
            println!("Account:   {}", tx.account_number);
            println!("Reference: {}", tx.reference_code);
            println!("Memo:      {}", tx.content);
            println!("------------------------------------------------------------------------");
        },
        Ok(WatchOutcome::Expired) => {
            println!("No payment with code {code} arrived within {} seconds.", params.timeout);
        },
        Err(e) => eprintln!("Could not watch for {code}. {e}"),
    }
}
