//! Fee Oracle - EIP-1559 Fee Data for Polygon
//!
//! Reads the network's suggested priority fee and the latest block's
//! base fee, then derives a `FeeSchedule` through the pure domain
//! logic (floor clamping, 2x base-fee headroom). Fee estimation is
//! never allowed to fail a command: an unreachable fee-data source
//! degrades to the configured floors, since fees affect inclusion
//! latency, not correctness.

use std::sync::Arc;

use alloy::eips::BlockNumberOrTag;
use alloy::providers::Provider;
use tracing::{debug, instrument};

use crate::domain::fees::FeeSchedule;

use super::provider::PolygonProvider;

/// Fee estimator for Polygon EIP-1559 transactions.
pub struct FeeOracle {
    /// Shared Polygon provider.
    provider: Arc<PolygonProvider>,
}

impl FeeOracle {
    /// Create a new fee oracle.
    pub fn new(provider: Arc<PolygonProvider>) -> Self {
        Self { provider }
    }

    /// Derive a fee schedule for a transaction with `gas_limit`.
    ///
    /// Fail-soft: both RPC reads are optional and absent values fall
    /// back to the floors.
    #[instrument(skip(self))]
    pub async fn estimate_fees(&self, gas_limit: u64) -> FeeSchedule {
        let inner = self.provider.inner();

        let suggested_priority = match inner.get_max_priority_fee_per_gas().await {
            Ok(fee) => Some(fee),
            Err(e) => {
                debug!(error = %e, "Priority fee query failed, using floor");
                None
            }
        };

        let last_base_fee = match inner
            .get_fee_history(1, BlockNumberOrTag::Latest, &[])
            .await
        {
            Ok(history) => history.latest_block_base_fee(),
            Err(e) => {
                debug!(error = %e, "Fee history query failed, using floor");
                None
            }
        };

        let fees = FeeSchedule::from_network(suggested_priority, last_base_fee, gas_limit);
        debug!(
            priority = fees.max_priority_fee_per_gas,
            max_fee = fees.max_fee_per_gas,
            gas_limit,
            "Fee schedule derived"
        );
        fees
    }
}
