//! Redemption path classification.
//!
//! Every resolved condition is redeemed through exactly one of two
//! mutually exclusive paths, determined per condition on every run
//! (classification is a cheap read next to a write transaction, and
//! market state is only authoritative at call time).

use thiserror::Error;

/// How a resolved condition's payout must be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionPath {
    /// Outcome tokens redeem directly against the collateral token
    /// via the ConditionalTokens contract.
    Standard,
    /// Combined / negated-risk market: payout is held in the adapter's
    /// wrapped collateral and requires a one-time operator approval
    /// plus a NegRiskAdapter call.
    AdapterMediated,
}

impl std::fmt::Display for RedemptionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::AdapterMediated => write!(f, "neg_risk"),
        }
    }
}

/// Classification failure for a single condition.
///
/// Unit-recoverable: the redemption orchestrator logs it and moves on
/// to the next unit.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The condition id is not a valid 32-byte hex identifier.
    #[error("invalid condition id {0:?}")]
    InvalidConditionId(String),
    /// The read-only contract call reverted or the RPC errored.
    #[error("condition read failed: {0}")]
    Call(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_display_matches_market_kind() {
        assert_eq!(RedemptionPath::Standard.to_string(), "standard");
        assert_eq!(RedemptionPath::AdapterMediated.to_string(), "neg_risk");
    }

    #[test]
    fn classify_error_messages_carry_context() {
        let err = ClassifyError::Call("RPC rate limit".to_string());
        assert_eq!(err.to_string(), "condition read failed: RPC rate limit");
    }
}
