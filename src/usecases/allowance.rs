//! Allowance Use Case - Sequenced USDC.e Approvals
//!
//! Grants spending authority over the wallet's collateral to each
//! exchange contract, one approval at a time: CTF Exchange, NegRisk
//! Exchange, then the NegRisk Adapter. The first two block until
//! mined so failures surface before more gas is committed; the final
//! approval is returned as a pending handle for the caller to await,
//! shaving latency off the common all-succeed case.
//!
//! Approvals to the same spender for the same amount are economically
//! idempotent, so a partially-approved state is recovered by simply
//! re-running the command.

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::units::to_collateral_units;
use crate::ports::chain::{ApprovalChain, ApprovalTarget, SubmittedTx};

/// Pause between consecutive approval submissions. The constraint is
/// the RPC provider's request-per-window limit, not congestion, so a
/// fixed delay is deliberate.
const APPROVAL_PACING: Duration = Duration::from_secs(30);

/// Transaction handles for the three approvals.
///
/// `ctf_exchange` and `neg_risk_exchange` are confirmed before this
/// struct is returned; `neg_risk_adapter` is still pending and the
/// caller decides when to await it.
#[derive(Debug, Clone)]
pub struct AllowanceReceipts {
    pub ctf_exchange: SubmittedTx,
    pub neg_risk_exchange: SubmittedTx,
    pub neg_risk_adapter: SubmittedTx,
}

/// Orchestrates the approval sequence over the chain port.
pub struct SetAllowance<A> {
    chain: A,
    pacing: Duration,
}

impl<A: ApprovalChain> SetAllowance<A> {
    /// Create an orchestrator with the default 30s pacing.
    pub fn new(chain: A) -> Self {
        Self::with_pacing(chain, APPROVAL_PACING)
    }

    /// Create an orchestrator with custom pacing (tests use zero).
    pub fn with_pacing(chain: A, pacing: Duration) -> Self {
        Self { chain, pacing }
    }

    /// Approve `amount` USDC.e for all exchange contracts, in order.
    ///
    /// # Errors
    /// Any approval failure aborts the remaining sequence; already
    /// mined approvals stay in effect.
    pub async fn set_allowance(&self, amount: Decimal) -> Result<AllowanceReceipts> {
        ensure!(
            amount > Decimal::ZERO,
            "allowance amount must be positive, got {amount}"
        );
        let units = to_collateral_units(amount);

        let ctf_exchange = self
            .approve_and_confirm(ApprovalTarget::CtfExchange, units)
            .await?;
        tokio::time::sleep(self.pacing).await;

        let neg_risk_exchange = self
            .approve_and_confirm(ApprovalTarget::NegRiskExchange, units)
            .await?;
        tokio::time::sleep(self.pacing).await;

        // Submitted but deliberately not confirmed here.
        let neg_risk_adapter = self
            .chain
            .submit_approval(ApprovalTarget::NegRiskAdapter, units)
            .await
            .with_context(|| format!("{} approval failed", ApprovalTarget::NegRiskAdapter))?;
        info!(
            spender = %ApprovalTarget::NegRiskAdapter,
            tx_hash = %neg_risk_adapter.hash,
            "Approval submitted, confirmation left to caller"
        );

        Ok(AllowanceReceipts {
            ctf_exchange,
            neg_risk_exchange,
            neg_risk_adapter,
        })
    }

    async fn approve_and_confirm(
        &self,
        target: ApprovalTarget,
        units: u128,
    ) -> Result<SubmittedTx> {
        let tx = self
            .chain
            .submit_approval(target, units)
            .await
            .with_context(|| format!("{target} approval failed"))?;
        info!(spender = %target, tx_hash = %tx.hash, "Approval submitted");

        let block = self
            .chain
            .confirm_approval(&tx)
            .await
            .with_context(|| format!("{target} approval not confirmed"))?;
        info!(spender = %target, block, "Approval confirmed");

        Ok(tx)
    }
}
