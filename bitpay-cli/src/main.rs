//! BitPay CLI
//!
//! Command-line front end for the legacy invoice API: create and fetch
//! invoices, verify notification payloads, and compute posData hashes.

mod config;

use bitpay_sdk::config::{InvoiceOptions, TransactionSpeed};
use bitpay_sdk::signature::pos_data_hash;
use bitpay_sdk::{BitPayClient, Config};
use clap::{Args as ClapArgs, Parser, Subcommand};
use config::ConfigLoader;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// BitPay CLI - client for the BitPay legacy invoice API
#[derive(Parser, Debug)]
#[command(name = "bitpay-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./bitpay.toml")]
    config: PathBuf,

    /// Override the API key from the configuration file
    #[arg(long, env = "BITPAY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an invoice
    CreateInvoice(CreateInvoiceArgs),

    /// Fetch an invoice by id
    GetInvoice {
        /// Invoice id
        id: String,
    },

    /// Verify a notification payload read from a file or stdin
    VerifyNotification {
        /// File holding the raw notification body (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Compute the posData hash for a value
    Hash {
        /// posData value
        data: String,

        /// Hash key (the merchant API key)
        #[arg(short, long)]
        key: String,

        /// Treat DATA as JSON instead of a plain string
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct CreateInvoiceArgs {
    /// Merchant order id
    #[arg(long)]
    order_id: String,

    /// Price in the invoice currency
    #[arg(long)]
    price: Decimal,

    /// Opaque merchant reference echoed back on notifications
    #[arg(long)]
    pos_data: String,

    /// Treat --pos-data as JSON instead of a plain string
    #[arg(long)]
    pos_data_json: bool,

    #[arg(long)]
    currency: Option<String>,

    #[arg(long)]
    item_desc: Option<String>,

    #[arg(long)]
    item_code: Option<String>,

    #[arg(long)]
    notification_url: Option<String>,

    #[arg(long)]
    redirect_url: Option<String>,

    #[arg(long)]
    buyer_email: Option<String>,

    #[arg(long, value_parser = parse_speed)]
    transaction_speed: Option<TransactionSpeed>,
}

impl CreateInvoiceArgs {
    fn options(&self) -> InvoiceOptions {
        InvoiceOptions {
            currency: self.currency.clone(),
            item_desc: self.item_desc.clone(),
            item_code: self.item_code.clone(),
            notification_url: self.notification_url.clone(),
            redirect_url: self.redirect_url.clone(),
            buyer_email: self.buyer_email.clone(),
            transaction_speed: self.transaction_speed,
            ..Default::default()
        }
    }
}

fn parse_speed(value: &str) -> Result<TransactionSpeed, String> {
    match value {
        "high" => Ok(TransactionSpeed::High),
        "medium" => Ok(TransactionSpeed::Medium),
        "low" => Ok(TransactionSpeed::Low),
        other => Err(format!("unknown transaction speed: {other}")),
    }
}

fn parse_pos_data(raw: &str, as_json: bool) -> anyhow::Result<Value> {
    if as_json {
        Ok(serde_json::from_str(raw)?)
    } else {
        Ok(Value::String(raw.to_owned()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    match args.command {
        // Hashing is offline and needs no configuration file.
        Command::Hash { data, key, json } => print_hash(&data, &key, json)?,
        command => {
            let config = load_config(&args.config, args.api_key)?;
            let client = BitPayClient::new(config)?;
            run(&client, command).await?;
        }
    }

    Ok(())
}

async fn run(client: &BitPayClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::CreateInvoice(create) => {
            let pos_data = parse_pos_data(&create.pos_data, create.pos_data_json)?;
            let invoice = client
                .create_invoice(create.order_id.clone(), create.price, pos_data, create.options())
                .await?;
            print_json(&invoice)?;
        }
        Command::GetInvoice { id } => {
            let invoice = client.get_invoice(&id, None).await?;
            print_json(&invoice)?;
        }
        Command::VerifyNotification { file } => {
            let payload = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let invoice = client.verify_notification(None, Some(payload.trim()))?;
            print_json(&invoice)?;
        }
        Command::Hash { data, key, json } => print_hash(&data, &key, json)?,
    }
    Ok(())
}

fn load_config(path: &Path, api_key: Option<String>) -> anyhow::Result<Config> {
    let loader = ConfigLoader::new(path, api_key);
    let config = loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", path);
    Ok(config)
}

fn print_hash(data: &str, key: &str, as_json: bool) -> anyhow::Result<()> {
    let value = parse_pos_data(data, as_json)?;
    println!("{}", pos_data_hash(&value, key));
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
