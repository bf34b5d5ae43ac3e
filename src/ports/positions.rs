//! Position Source Port - Wallet Position Snapshots
//!
//! The data API reports every outcome share the wallet currently
//! holds. Snapshots are fetched fresh per command invocation and
//! never cached by this layer.

use async_trait::async_trait;

use crate::domain::position::Position;

/// Trait for fetching the wallet's current positions.
///
/// A failure here is fatal to the redemption command: with no position
/// list there is nothing to redeem and no partial progress to make.
#[async_trait]
pub trait PositionSource: Send + Sync + 'static {
    /// Fetch all positions held by the configured wallet.
    async fn positions(&self) -> anyhow::Result<Vec<Position>>;
}
