//! Gateway CLI
//!
//! Command-line interface for the payment gateway API.

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use gateway_client::{GatewayClient, compact, expand, generate_trace_number};
use gateway_types::domain::card::expected_cvv_length;
use gateway_types::domain::DEFAULT_PROCESSING_CODE;
use gateway_types::{FunctionCode, Transaction, TransactionRequest};

#[derive(Parser)]
#[command(name = "gateway")]
#[command(author, version, about = "Payment gateway CLI client", long_about = None)]
struct Cli {
    /// Base URL of the gateway API
    #[arg(
        long,
        env = "GATEWAY_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Request a single-use encryption key
    Key,
    /// Encrypt and submit a transaction
    Pay(TransactionArgs),
    /// Print a transaction's 28-byte compact record as hex
    Encode(TransactionArgs),
    /// Decode a hex compact record
    Decode {
        /// 56 hex characters
        hex: String,
    },
}

#[derive(Args)]
struct TransactionArgs {
    /// Card number
    #[arg(long)]
    card: String,
    /// Cardholder name
    #[arg(long, default_value = "")]
    holder: String,
    /// Amount in major units, e.g. 10.00
    #[arg(long)]
    amount: Decimal,
    /// ISO-4217 numeric currency code
    #[arg(long, default_value = "840")]
    currency: String,
    /// Expiry as MM/YY (defaults to one year from now)
    #[arg(long)]
    expiry: Option<String>,
    /// Card verification value (defaults to a dummy of the right length)
    #[arg(long)]
    cvv: Option<String>,
    /// purchase, refund or void (numeric codes accepted)
    #[arg(long, default_value = "purchase")]
    function: FunctionCode,
    /// Six-digit trace number (random when omitted)
    #[arg(long)]
    trace: Option<String>,
}

impl TransactionArgs {
    fn into_transaction(self) -> Transaction {
        let cvv = self
            .cvv
            .unwrap_or_else(|| "1234"[..expected_cvv_length(&self.card)].to_string());
        Transaction {
            processing_code: DEFAULT_PROCESSING_CODE.to_string(),
            system_trace_nr: self.trace.unwrap_or_else(generate_trace_number),
            function_code: self.function,
            card_no: self.card,
            card_holder: self.holder,
            amount: self.amount,
            currency_code: self.currency,
            expiry_date: self.expiry.unwrap_or_else(default_expiry),
            cvv,
        }
    }
}

/// Same month next year, as MM/YY.
fn default_expiry() -> String {
    let now = Utc::now();
    format!("{:02}/{:02}", now.month(), (now.year() + 1) % 100)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Key => {
            let key = client.request_key().await?;
            println!("{}", serde_json::to_string_pretty(&key)?);
        }

        Commands::Pay(args) => {
            let request = TransactionRequest::from(args.into_transaction());
            let response = client.submit(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.is_approved() {
                std::process::exit(2);
            }
        }

        Commands::Encode(args) => {
            let record = compact(&args.into_transaction())?;
            println!("{}", hex::encode(record.as_bytes()));
        }

        Commands::Decode { hex: input } => {
            let bytes = hex::decode(input.trim()).context("Input is not valid hex")?;
            let tx = expand(&bytes)?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_types::domain::card;

    fn args(card: &str) -> TransactionArgs {
        TransactionArgs {
            card: card.into(),
            holder: "Jane Doe".into(),
            amount: Decimal::new(1000, 2),
            currency: "840".into(),
            expiry: None,
            cvv: None,
            function: FunctionCode::Purchase,
            trace: None,
        }
    }

    #[test]
    fn test_defaults_produce_a_valid_transaction() {
        let tx = args("4532015112830366").into_transaction();

        assert_eq!(tx.cvv, "123");
        assert_eq!(tx.system_trace_nr.len(), 6);
        assert!(card::validate(&tx, Utc::now()).is_ok());
    }

    #[test]
    fn test_default_cvv_follows_card_brand() {
        let tx = args("378282246310005").into_transaction();
        assert_eq!(tx.cvv, "1234");
    }

    #[test]
    fn test_cli_parses_pay() {
        let cli = Cli::try_parse_from([
            "gateway", "pay", "--card", "4532015112830366", "--amount", "10.00", "--function",
            "refund", "--trace", "123456",
        ])
        .unwrap();

        let Commands::Pay(args) = cli.command else {
            panic!("expected pay");
        };
        assert_eq!(args.function, FunctionCode::Refund);
        assert_eq!(args.amount, Decimal::new(1000, 2));
        assert_eq!(args.trace.as_deref(), Some("123456"));
    }
}
