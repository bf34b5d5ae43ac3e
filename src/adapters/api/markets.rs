//! Market Catalog Fetching - Cursor-paginated CLOB Reads
//!
//! Public (unauthenticated) CLOB reads: the full market listing used
//! to build the local cache, and per-token order books.

use anyhow::{Context, Result};
use tracing::debug;

use super::client::ClobClient;
use super::types::{Market, MarketsPage, OrderBook};

/// Cursor value marking the final page of `GET /markets`.
const END_CURSOR: &str = "LTE=";

/// Fetch every market, walking the cursor until the terminal page.
pub async fn fetch_all_markets(client: &ClobClient) -> Result<Vec<Market>> {
    let mut markets = Vec::new();
    let mut cursor = String::new();

    loop {
        let path = if cursor.is_empty() {
            "/markets".to_string()
        } else {
            format!("/markets?next_cursor={cursor}")
        };

        let page: MarketsPage = client
            .get_json(&path, Vec::new())
            .await
            .context("Market listing fetch failed")?;

        debug!(count = page.data.len(), cursor = %page.next_cursor, "Fetched markets page");
        let empty_page = page.data.is_empty();
        markets.extend(page.data);

        if page.next_cursor.is_empty() || page.next_cursor == END_CURSOR || empty_page {
            break;
        }
        cursor = page.next_cursor;
    }

    Ok(markets)
}

/// Fetch the order book for one outcome token.
pub async fn fetch_order_book(client: &ClobClient, token_id: &str) -> Result<OrderBook> {
    client
        .get_json(&format!("/book?token_id={token_id}"), Vec::new())
        .await
        .with_context(|| format!("Order book fetch failed for token {token_id}"))
}
