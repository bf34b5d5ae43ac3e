//! Chain Ports - On-chain Interaction Interfaces
//!
//! Traits for the transaction-submitting side of the CLI: collateral
//! approvals, redemption classification, and redemption submission.
//! Submission and confirmation are split so orchestrators control the
//! sequencing (a transaction may deliberately be left pending for the
//! caller to await).

use async_trait::async_trait;

use crate::domain::redemption::{ClassifyError, RedemptionPath};

/// Handle for a broadcast but not necessarily mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTx {
    /// Transaction hash, 0x-prefixed.
    pub hash: String,
}

/// Exchange contracts that need USDC.e spending authority.
///
/// Approval order is fixed; the orchestrator iterates these in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalTarget {
    /// The order-matching CTF Exchange.
    CtfExchange,
    /// The combined-risk exchange.
    NegRiskExchange,
    /// The combined-risk exchange's adapter contract.
    NegRiskAdapter,
}

impl std::fmt::Display for ApprovalTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CtfExchange => write!(f, "CTFExchange"),
            Self::NegRiskExchange => write!(f, "NegRiskExchange"),
            Self::NegRiskAdapter => write!(f, "NegRiskAdapter"),
        }
    }
}

/// On-chain operations required by the redemption orchestrator.
///
/// All submissions price the transaction with the current fee
/// schedule; implementors own nonce discipline by construction since
/// the orchestrator never submits concurrently.
#[async_trait]
pub trait RedemptionChain: Send + Sync + 'static {
    /// Determine which redemption path applies to a condition.
    ///
    /// Re-queried for every attempt; never cached.
    async fn classify(&self, condition_id: &str) -> Result<RedemptionPath, ClassifyError>;

    /// Submit a direct CTF redemption for both outcome index sets.
    async fn submit_standard_redemption(&self, condition_id: &str)
        -> anyhow::Result<SubmittedTx>;

    /// Submit a NegRiskAdapter redemption with per-outcome amounts
    /// `[yes_units, no_units]` in atomic collateral units.
    async fn submit_adapter_redemption(
        &self,
        condition_id: &str,
        amounts: [u128; 2],
    ) -> anyhow::Result<SubmittedTx>;

    /// Whether the wallet has already granted the adapter operator
    /// rights over its conditional tokens.
    async fn operator_approved(&self) -> anyhow::Result<bool>;

    /// Grant the adapter operator rights (`setApprovalForAll`).
    async fn submit_operator_approval(&self) -> anyhow::Result<SubmittedTx>;

    /// Wait until a submitted transaction is mined; errors on revert
    /// or timeout.
    async fn confirm(&self, tx: &SubmittedTx) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: RedemptionChain + ?Sized> RedemptionChain for std::sync::Arc<T> {
    async fn classify(&self, condition_id: &str) -> Result<RedemptionPath, ClassifyError> {
        (**self).classify(condition_id).await
    }

    async fn submit_standard_redemption(&self, condition_id: &str)
        -> anyhow::Result<SubmittedTx> {
        (**self).submit_standard_redemption(condition_id).await
    }

    async fn submit_adapter_redemption(
        &self,
        condition_id: &str,
        amounts: [u128; 2],
    ) -> anyhow::Result<SubmittedTx> {
        (**self).submit_adapter_redemption(condition_id, amounts).await
    }

    async fn operator_approved(&self) -> anyhow::Result<bool> {
        (**self).operator_approved().await
    }

    async fn submit_operator_approval(&self) -> anyhow::Result<SubmittedTx> {
        (**self).submit_operator_approval().await
    }

    async fn confirm(&self, tx: &SubmittedTx) -> anyhow::Result<()> {
        (**self).confirm(tx).await
    }
}

/// On-chain operations required by the allowance orchestrator.
#[async_trait]
pub trait ApprovalChain: Send + Sync + 'static {
    /// Submit an ERC-20 `approve` of `amount_units` (atomic USDC.e
    /// units) for the given spender contract.
    async fn submit_approval(
        &self,
        target: ApprovalTarget,
        amount_units: u128,
    ) -> anyhow::Result<SubmittedTx>;

    /// Wait until an approval is mined; returns the inclusion block.
    async fn confirm_approval(&self, tx: &SubmittedTx) -> anyhow::Result<u64>;
}

#[async_trait]
impl<T: ApprovalChain + ?Sized> ApprovalChain for std::sync::Arc<T> {
    async fn submit_approval(
        &self,
        target: ApprovalTarget,
        amount_units: u128,
    ) -> anyhow::Result<SubmittedTx> {
        (**self).submit_approval(target, amount_units).await
    }

    async fn confirm_approval(&self, tx: &SubmittedTx) -> anyhow::Result<u64> {
        (**self).confirm_approval(tx).await
    }
}
