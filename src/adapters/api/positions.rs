//! Data-API Position Source
//!
//! Implements the `PositionSource` port against the public data API's
//! `GET /positions` endpoint. Dust positions below 0.01 tokens are
//! filtered server-side; results arrive sorted by current value.

use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::position::Position;
use crate::ports::positions::PositionSource;

/// Minimum position size worth listing, in outcome tokens.
const SIZE_THRESHOLD: &str = "0.01";

/// Position source backed by the public data API.
pub struct DataApiPositions {
    http: Client,
    base_url: String,
    wallet: Address,
}

impl DataApiPositions {
    pub fn new(base_url: &str, wallet: Address) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            wallet,
        })
    }
}

#[async_trait]
impl PositionSource for DataApiPositions {
    async fn positions(&self) -> Result<Vec<Position>> {
        let url = format!(
            "{}/positions?user={}&sizeThreshold={SIZE_THRESHOLD}&sortBy=CURRENT&sortDirection=DESC",
            self.base_url, self.wallet
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Positions request failed")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "Positions request returned {status}");

        let positions: Vec<Position> = response
            .json()
            .await
            .context("Failed to parse positions response")?;

        debug!(count = positions.len(), wallet = %self.wallet, "Fetched positions");
        Ok(positions)
    }
}
