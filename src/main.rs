//! pmarket-cli — Entry Point
//!
//! Parses the subcommand, initializes logging to stderr (stdout is
//! reserved for command output), and dispatches to the command layer.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use pmarket_cli::cli;
use pmarket_cli::domain::order::Side;

#[derive(Parser)]
#[command(
    name = "pmarket-cli",
    version,
    about = "Trade and redeem Polymarket positions from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the wallet private key in the config directory
    Init {
        /// Hex-encoded private key (0x-prefixed)
        private_key: String,
    },
    /// Derive or create CLOB API credentials for the wallet
    Keys,
    /// Rebuild the local market cache from the CLOB
    Refresh,
    /// Search cached markets by question text
    List {
        /// Case-insensitive substring of the market question
        query: String,
    },
    /// Show the order book for an outcome token
    Book {
        /// Outcome token id
        token_id: String,
    },
    /// Place a GTC limit buy order
    Buy {
        /// Outcome token id
        token_id: String,
        /// Number of outcome tokens
        size: Decimal,
        /// Price per token in USDC.e, in (0, 1)
        price: Decimal,
    },
    /// Place a GTC limit sell order
    Sell {
        /// Outcome token id
        token_id: String,
        /// Number of outcome tokens
        size: Decimal,
        /// Price per token in USDC.e, in (0, 1)
        price: Decimal,
    },
    /// Cancel every open order owned by the wallet
    CancelAll,
    /// Show current wallet positions
    Positions,
    /// Approve USDC.e spending for the exchange contracts
    Allowance {
        /// Amount of USDC.e to approve
        amount: Decimal,
    },
    /// Redeem every resolved market the wallet holds a claim on
    Redeem,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Init { private_key } => cli::init(&private_key),
        Command::Keys => cli::keys().await,
        Command::Refresh => cli::refresh().await,
        Command::List { query } => cli::list(&query),
        Command::Book { token_id } => cli::book(&token_id).await,
        Command::Buy {
            token_id,
            size,
            price,
        } => cli::trade(Side::Buy, &token_id, price, size).await,
        Command::Sell {
            token_id,
            size,
            price,
        } => cli::trade(Side::Sell, &token_id, price, size).await,
        Command::CancelAll => cli::cancel_all().await,
        Command::Positions => cli::positions().await,
        Command::Allowance { amount } => cli::allowance(amount).await,
        Command::Redeem => cli::redeem().await,
    }
}
