//! CLOB API Wire Types
//!
//! Serde types for the CLOB REST responses the CLI consumes. Numeric
//! fields arrive as strings on this API and are kept as strings until
//! a command needs arithmetic on them.

use serde::Deserialize;

/// One page of the cursor-paginated `GET /markets` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsPage {
    #[serde(default)]
    pub data: Vec<Market>,
    /// Opaque cursor for the next page; `"LTE="` marks the end.
    #[serde(default)]
    pub next_cursor: String,
}

/// A single market as listed by the CLOB.
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    #[serde(default)]
    pub condition_id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub tokens: Vec<MarketToken>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub closed: bool,
    /// Whether orders settle through the NegRisk exchange.
    #[serde(default)]
    pub neg_risk: bool,
}

/// One tradeable outcome token of a market.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketToken {
    #[serde(default)]
    pub token_id: String,
    #[serde(default)]
    pub outcome: String,
}

/// `GET /book` response for one token.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
}

/// A single price level, stringly typed on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceLevel {
    pub price: String,
    pub size: String,
}

/// Credentials returned by `POST /auth/api-key` and
/// `GET /auth/derive-api-key`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredsResponse {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub secret: String,
    pub passphrase: String,
}

/// `POST /order` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "errorMsg")]
    pub error_msg: String,
    #[serde(default, rename = "orderID")]
    pub order_id: String,
}

/// `DELETE /orders` (cancel all) response.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelAllResponse {
    #[serde(default)]
    pub canceled: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_page_parses_with_missing_fields() {
        let page: MarketsPage = serde_json::from_str(
            r#"{"data":[{"condition_id":"0xabc","question":"Will it?","tokens":
                [{"token_id":"123","outcome":"Yes"},{"token_id":"456","outcome":"No"}],
                "active":true,"closed":false}],"next_cursor":"MTA="}"#,
        )
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert!(!page.data[0].neg_risk);
        assert_eq!(page.data[0].tokens[1].outcome, "No");
        assert_eq!(page.next_cursor, "MTA=");
    }

    #[test]
    fn order_response_renames_camel_case_fields() {
        let response: OrderResponse =
            serde_json::from_str(r#"{"success":true,"orderID":"0xdeadbeef","errorMsg":""}"#)
                .unwrap();
        assert!(response.success);
        assert_eq!(response.order_id, "0xdeadbeef");
    }
}
