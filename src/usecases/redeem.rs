//! Redemption Use Case - Batch Redemption of Resolved Markets
//!
//! Drives the full redemption flow for every resolved market the
//! wallet holds a claim on:
//!
//! 1. Fetch positions and group them into one unit per condition
//! 2. Classify each condition (standard vs. neg_risk)
//! 3. Standard: direct CTF redemption
//!    Neg_risk: one-time operator approval, then adapter redemption
//! 4. Confirm each transaction before the next submission
//!
//! Units are processed strictly one at a time: a single wallet signing
//! sequential transactions needs no explicit nonce allocation. A
//! failing unit is logged and skipped; only the initial position fetch
//! is fatal.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::domain::position::{group_positions, GroupedRedemption};
use crate::domain::redemption::RedemptionPath;
use crate::domain::units::f64_to_collateral_units;
use crate::ports::chain::RedemptionChain;
use crate::ports::positions::PositionSource;

/// Pause between redemption units. The shared RPC provider enforces a
/// request-count-per-window limit, so consecutive write transactions
/// are paced with a fixed delay rather than adaptive backoff.
const UNIT_PACING: Duration = Duration::from_secs(5);

/// Result of one redemption unit.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    /// The condition that was attempted.
    pub condition_id: String,
    /// Market question for display.
    pub title: String,
    /// Path taken, if classification succeeded.
    pub path: Option<RedemptionPath>,
    /// Redemption transaction hash, if the unit succeeded.
    pub tx_hash: Option<String>,
    /// Error message, if the unit failed.
    pub error: Option<String>,
}

impl UnitOutcome {
    /// Whether the unit redeemed successfully.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated report from a redemption sweep.
#[derive(Debug, Clone)]
pub struct RedeemSummary {
    /// Units redeemed and confirmed on-chain.
    pub redeemed: usize,
    /// Total grouped units attempted.
    pub total: usize,
    /// Per-unit outcomes, in processing order.
    pub outcomes: Vec<UnitOutcome>,
}

/// Orchestrates batch redemption over the position and chain ports.
pub struct RedeemPositions<P, C> {
    positions: P,
    chain: C,
    pacing: Duration,
}

impl<P: PositionSource, C: RedemptionChain> RedeemPositions<P, C> {
    /// Create an orchestrator with the default 5s unit pacing.
    pub fn new(positions: P, chain: C) -> Self {
        Self::with_pacing(positions, chain, UNIT_PACING)
    }

    /// Create an orchestrator with custom pacing (tests use zero).
    pub fn with_pacing(positions: P, chain: C, pacing: Duration) -> Self {
        Self {
            positions,
            chain,
            pacing,
        }
    }

    /// Redeem every resolved position, continuing past per-unit
    /// failures.
    ///
    /// # Errors
    /// Fails only when the position list cannot be fetched; individual
    /// unit failures are reported in the summary instead.
    pub async fn redeem_all(&self) -> Result<RedeemSummary> {
        let positions = self
            .positions
            .positions()
            .await
            .context("Failed to fetch positions")?;

        let grouped = group_positions(&positions);
        if grouped.is_empty() {
            info!("No redeemable positions found");
            return Ok(RedeemSummary {
                redeemed: 0,
                total: 0,
                outcomes: Vec::new(),
            });
        }

        let total = grouped.len();
        info!(markets = total, "Redeeming resolved markets");

        let mut outcomes = Vec::with_capacity(total);
        let mut redeemed = 0;

        for unit in &grouped {
            match self.redeem_unit(unit).await {
                Ok((path, hash)) => {
                    info!(
                        condition_id = %unit.condition_id,
                        market = ?path,
                        tx_hash = %hash,
                        "Redemption confirmed"
                    );
                    redeemed += 1;
                    outcomes.push(UnitOutcome {
                        condition_id: unit.condition_id.clone(),
                        title: unit.title.clone(),
                        path: Some(path),
                        tx_hash: Some(hash),
                        error: None,
                    });

                    // Pacing is best-effort and skipped on failure
                    // paths: a failed unit consumed almost no RPC
                    // budget beyond its classification read.
                    if total > 1 {
                        tokio::time::sleep(self.pacing).await;
                    }
                }
                Err(e) => {
                    let msg = format!("{e:#}");
                    error!(
                        condition_id = %unit.condition_id,
                        "Failed to redeem: {msg}"
                    );
                    outcomes.push(UnitOutcome {
                        condition_id: unit.condition_id.clone(),
                        title: unit.title.clone(),
                        path: None,
                        tx_hash: None,
                        error: Some(msg),
                    });
                }
            }
        }

        info!(redeemed, total, "Redemption sweep complete");
        Ok(RedeemSummary {
            redeemed,
            total,
            outcomes,
        })
    }

    /// Classify one unit and drive it through its redemption path.
    async fn redeem_unit(&self, unit: &GroupedRedemption) -> Result<(RedemptionPath, String)> {
        let path = self.chain.classify(&unit.condition_id).await?;

        match path {
            RedemptionPath::Standard => {
                let tx = self
                    .chain
                    .submit_standard_redemption(&unit.condition_id)
                    .await?;
                info!(tx_hash = %tx.hash, "Standard redemption submitted");
                self.chain.confirm(&tx).await?;
                Ok((path, tx.hash))
            }
            RedemptionPath::AdapterMediated => {
                // The adapter transfers the wallet's conditional
                // tokens to itself during redemption and reverts
                // without operator rights.
                if !self.chain.operator_approved().await? {
                    let approval = self.chain.submit_operator_approval().await?;
                    info!(tx_hash = %approval.hash, "Operator approval submitted");
                    self.chain.confirm(&approval).await?;
                }

                let amounts = [
                    f64_to_collateral_units(unit.yes_size),
                    f64_to_collateral_units(unit.no_size),
                ];
                let tx = self
                    .chain
                    .submit_adapter_redemption(&unit.condition_id, amounts)
                    .await?;
                info!(tx_hash = %tx.hash, "Neg_risk redemption submitted");
                self.chain.confirm(&tx).await?;
                Ok((path, tx.hash))
            }
        }
    }
}
