//! CLI Commands - One Function per Subcommand
//!
//! Each command wires the adapters it needs from the stored config and
//! prints human-readable results to stdout; diagnostics go to stderr
//! through tracing. Commands stay thin: orchestration lives in
//! `usecases`, protocol detail in `adapters`.

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::adapters::api::markets::{fetch_all_markets, fetch_order_book};
use crate::adapters::api::orders::OrderApi;
use crate::adapters::api::{ClobAuth, ClobClient, DataApiPositions};
use crate::adapters::api::client::ClobClientConfig;
use crate::adapters::chain::{ChainGateway, ContractAddresses, PolygonProvider};
use crate::adapters::persistence::market_cache::{filter_markets, CachedMarket, MarketCache};
use crate::config::store::ConfigStore;
use crate::config::CliConfig;
use crate::domain::order::{order_amounts, Side};
use crate::ports::positions::PositionSource;
use crate::usecases::allowance::SetAllowance;
use crate::usecases::redeem::RedeemPositions;

fn open_config() -> Result<(ConfigStore, CliConfig)> {
    let store = ConfigStore::open()?;
    let config = store.load_config()?;
    Ok((store, config))
}

fn clob_client(config: &CliConfig) -> Result<ClobClient> {
    ClobClient::new(ClobClientConfig::new(&config.endpoints.clob_url))
}

fn order_api(store: &ConfigStore, config: &CliConfig) -> Result<OrderApi> {
    let signer = store.signer(config)?;
    let credentials = store.load_credentials()?;
    let addresses = ContractAddresses::from_config(&config.contracts)?;

    Ok(OrderApi::new(
        clob_client(config)?,
        ClobAuth::new(signer.clone(), credentials),
        signer,
        addresses.ctf_exchange,
        addresses.neg_risk_exchange,
    ))
}

async fn connect_gateway(
    store: &ConfigStore,
    config: &CliConfig,
) -> Result<Arc<ChainGateway>> {
    let signer = store.signer(config)?;
    let addresses = ContractAddresses::from_config(&config.contracts)?;
    let provider = Arc::new(PolygonProvider::connect(&config.rpc_url, signer).await?);
    Ok(Arc::new(ChainGateway::new(provider, addresses)))
}

fn load_cache(store: &ConfigStore) -> Result<Vec<CachedMarket>> {
    MarketCache::in_dir(store.dir())
        .load()?
        .context("Market cache is missing or stale. Run `pmarket-cli refresh` first")
}

fn polygonscan(hash: &str) -> String {
    format!("https://polygonscan.com/tx/{hash}")
}

/// Truncate on characters, not bytes; market questions are arbitrary
/// unicode and a byte cut can land inside a multi-byte char.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// `init <private-key>`: validate and store the wallet key.
pub fn init(private_key: &str) -> Result<()> {
    let store = ConfigStore::open()?;
    let address = store.save_private_key(private_key)?;

    println!("Wallet configured: {address}");
    println!("Config directory: {}", store.dir().display());
    Ok(())
}

/// `keys`: derive (or create) CLOB API credentials and store them.
pub async fn keys() -> Result<()> {
    let (store, config) = open_config()?;
    let api = order_api(&store, &config)?;

    let creds = api.derive_or_create_credentials().await?;
    store.save_credentials(&creds.api_key, &creds.secret, &creds.passphrase)?;

    println!("API credentials stored (key {})", creds.api_key);
    Ok(())
}

/// `refresh`: rebuild the local market cache from the CLOB.
pub async fn refresh() -> Result<()> {
    let (store, config) = open_config()?;
    let client = clob_client(&config)?;

    println!("Fetching market catalog (this walks every page)...");
    let markets = fetch_all_markets(&client).await?;
    let cached: Vec<CachedMarket> = markets.iter().filter_map(CachedMarket::from_api).collect();

    let count = MarketCache::in_dir(store.dir()).save(cached)?;
    println!("Cached {count} markets");
    Ok(())
}

/// `list <query>`: search the cached catalog by question text.
pub fn list(query: &str) -> Result<()> {
    let (store, _config) = open_config()?;
    let markets = load_cache(&store)?;

    let hits = filter_markets(&markets, query);
    if hits.is_empty() {
        println!("No markets match {query:?}");
        return Ok(());
    }

    for market in hits {
        let status = if market.closed {
            "closed"
        } else if market.active {
            "active"
        } else {
            "inactive"
        };
        println!("{} [{status}]", market.question);
        println!("  condition: {}", market.condition_id);
        println!("  yes token: {}", market.yes_token_id);
        println!("  no token:  {}", market.no_token_id);
        if market.neg_risk {
            println!("  neg_risk market");
        }
    }
    Ok(())
}

/// `book <token-id>`: print the order book for one outcome token.
pub async fn book(token_id: &str) -> Result<()> {
    let (_store, config) = open_config()?;
    let client = clob_client(&config)?;

    let book = fetch_order_book(&client, token_id).await?;

    println!("Order book for token {token_id}");
    println!("{:>12}  {:>14}", "price", "size");
    for level in book.asks.iter().rev() {
        println!("{:>12}  {:>14}  ask", level.price, level.size);
    }
    for level in &book.bids {
        println!("{:>12}  {:>14}  bid", level.price, level.size);
    }
    Ok(())
}

/// `buy` / `sell <token-id> <price> <size>`: place a GTC limit order.
pub async fn trade(side: Side, token_id: &str, price: Decimal, size: Decimal) -> Result<()> {
    let (store, config) = open_config()?;
    let markets = load_cache(&store)?;

    // The signature must bind to the exchange that settles this token.
    let neg_risk = markets
        .iter()
        .find(|m| m.yes_token_id == token_id || m.no_token_id == token_id)
        .context("Token not found in market cache. Run `pmarket-cli refresh` first")?
        .neg_risk;

    let amounts = order_amounts(side, size, price)?;
    let api = order_api(&store, &config)?;
    let response = api.place_order(token_id, side, amounts, neg_risk).await?;

    if response.success {
        println!("{} order placed: {}", side.as_str(), response.order_id);
    } else {
        anyhow::bail!("Order rejected: {}", response.error_msg);
    }
    Ok(())
}

/// `cancel-all`: cancel every open order for the wallet.
pub async fn cancel_all() -> Result<()> {
    let (store, config) = open_config()?;
    let api = order_api(&store, &config)?;

    let response = api.cancel_all().await?;
    println!("Canceled {} order(s)", response.canceled.len());
    Ok(())
}

/// `positions`: print the wallet's current positions with totals.
pub async fn positions() -> Result<()> {
    let (store, config) = open_config()?;
    let signer = store.signer(&config)?;

    let source = DataApiPositions::new(&config.endpoints.data_api_url, signer.address())?;
    let positions = source.positions().await?;

    if positions.is_empty() {
        println!("No positions");
        return Ok(());
    }

    println!(
        "{:<50} {:>4} {:>12} {:>8} {:>12} {:>10}",
        "market", "side", "size", "price", "value", "pnl"
    );
    let mut total_value = 0.0;
    let mut total_pnl = 0.0;
    for p in &positions {
        let title = truncate_chars(&p.title, 50);
        let flag = if p.redeemable { " (redeemable)" } else { "" };
        println!(
            "{title:<50} {:>4} {:>12.4} {:>8.3} {:>12.2} {:>10.2}{flag}",
            p.outcome, p.size, p.cur_price, p.current_value, p.cash_pnl
        );
        total_value += p.current_value;
        total_pnl += p.cash_pnl;
    }
    println!("{:>78} {total_value:>12.2} {total_pnl:>10.2}", "total:");
    Ok(())
}

/// `allowance <amount>`: approve USDC.e spending for all exchanges.
pub async fn allowance(amount: Decimal) -> Result<()> {
    let (store, config) = open_config()?;
    let gateway = connect_gateway(&store, &config).await?;

    println!("Approving {amount} USDC.e for the exchange contracts...");
    let receipts = SetAllowance::new(Arc::clone(&gateway))
        .set_allowance(amount)
        .await?;

    println!("CTFExchange:     {}", polygonscan(&receipts.ctf_exchange.hash));
    println!("NegRiskExchange: {}", polygonscan(&receipts.neg_risk_exchange.hash));
    println!("NegRiskAdapter:  {}", polygonscan(&receipts.neg_risk_adapter.hash));

    println!("Awaiting NegRiskAdapter confirmation...");
    use crate::ports::chain::ApprovalChain;
    let block = gateway.confirm_approval(&receipts.neg_risk_adapter).await?;
    println!("All approvals confirmed (final block {block})");
    Ok(())
}

/// `redeem`: sweep every resolved market the wallet can claim.
pub async fn redeem() -> Result<()> {
    let (store, config) = open_config()?;
    let signer = store.signer(&config)?;
    let wallet = signer.address();

    let source = DataApiPositions::new(&config.endpoints.data_api_url, wallet)?;
    let gateway = connect_gateway(&store, &config).await?;

    let summary = RedeemPositions::new(source, gateway).redeem_all().await?;

    if summary.total == 0 {
        println!("No redeemable positions");
        return Ok(());
    }

    for outcome in &summary.outcomes {
        match (&outcome.tx_hash, &outcome.error) {
            (Some(hash), _) => {
                println!("✓ {}", outcome.title);
                println!("  {}", polygonscan(hash));
            }
            (None, Some(error)) => {
                println!("✗ {}", outcome.title);
                println!("  {error}");
            }
            _ => {}
        }
    }

    println!(
        "Redeemed {}/{} market(s). USDC.e has been returned to your wallet.",
        summary.redeemed, summary.total
    );
    Ok(())
}
