//! EIP-1559 fee schedule derivation for Polygon transactions.
//!
//! Polygon validators drop transactions with a priority fee below
//! ~25 gwei no matter what the fee-data API suggests, so the derived
//! priority fee is clamped to a 30 gwei floor. The max fee budgets for
//! one full base-fee doubling between submission and inclusion:
//! `max_fee = base * 2 + priority`.
//!
//! Derivation is pure; fetching raw fee data lives in
//! `adapters::chain::fees::FeeOracle`.

/// Priority fee floor: 30 gwei (Polygon minimum is 25, 30 to be safe).
pub const PRIORITY_FEE_FLOOR_WEI: u128 = 30_000_000_000;

/// Base fee fallback when the fee-data source is unreachable: 30 gwei.
pub const BASE_FEE_FALLBACK_WEI: u128 = 30_000_000_000;

/// Gas limit for an ERC-20 `approve` or `setApprovalForAll`.
pub const APPROVAL_GAS_LIMIT: u64 = 100_000;

/// Gas limit for a CTF or adapter redemption.
pub const REDEMPTION_GAS_LIMIT: u64 = 300_000;

/// EIP-1559 fee parameters for a single transaction, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Tip paid to the block proposer, per gas.
    pub max_priority_fee_per_gas: u128,
    /// Ceiling on total fee paid per gas (base + priority).
    pub max_fee_per_gas: u128,
    /// Gas limit for the transaction.
    pub gas_limit: u64,
}

impl FeeSchedule {
    /// Derive a schedule from raw network fee data.
    ///
    /// Either field may be absent (the fee-data RPC is tolerant of
    /// partial responses); absent fields degrade to the floors.
    pub fn from_network(
        suggested_priority_fee: Option<u128>,
        last_base_fee: Option<u128>,
        gas_limit: u64,
    ) -> Self {
        let priority = suggested_priority_fee
            .unwrap_or(PRIORITY_FEE_FLOOR_WEI)
            .max(PRIORITY_FEE_FLOOR_WEI);
        let base = last_base_fee.unwrap_or(BASE_FEE_FALLBACK_WEI);
        let max_fee = base.saturating_mul(2).saturating_add(priority);

        Self {
            max_priority_fee_per_gas: priority,
            max_fee_per_gas: max_fee,
            gas_limit,
        }
    }

    /// Floor-only schedule used when the fee-data source is down.
    pub fn fallback(gas_limit: u64) -> Self {
        Self::from_network(None, None, gas_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GWEI: u128 = 1_000_000_000;

    #[test]
    fn priority_fee_below_floor_is_clamped() {
        let fees = FeeSchedule::from_network(Some(5 * GWEI), Some(40 * GWEI), 100_000);
        assert_eq!(fees.max_priority_fee_per_gas, PRIORITY_FEE_FLOOR_WEI);
    }

    #[test]
    fn priority_fee_above_floor_passes_through() {
        let fees = FeeSchedule::from_network(Some(45 * GWEI), Some(40 * GWEI), 100_000);
        assert_eq!(fees.max_priority_fee_per_gas, 45 * GWEI);
    }

    #[test]
    fn max_fee_absorbs_one_base_fee_doubling() {
        let fees = FeeSchedule::from_network(Some(35 * GWEI), Some(50 * GWEI), 100_000);
        assert_eq!(fees.max_fee_per_gas, 100 * GWEI + 35 * GWEI);
        assert!(fees.max_fee_per_gas >= 2 * 50 * GWEI + fees.max_priority_fee_per_gas);
    }

    #[test]
    fn missing_fee_data_falls_back_to_floors() {
        let fees = FeeSchedule::fallback(300_000);
        assert_eq!(fees.max_priority_fee_per_gas, PRIORITY_FEE_FLOOR_WEI);
        assert_eq!(
            fees.max_fee_per_gas,
            BASE_FEE_FALLBACK_WEI * 2 + PRIORITY_FEE_FLOOR_WEI
        );
        assert_eq!(fees.gas_limit, 300_000);
    }

    #[test]
    fn partial_fee_data_is_tolerated() {
        let fees = FeeSchedule::from_network(None, Some(80 * GWEI), 100_000);
        assert_eq!(fees.max_priority_fee_per_gas, PRIORITY_FEE_FLOOR_WEI);
        assert_eq!(fees.max_fee_per_gas, 160 * GWEI + PRIORITY_FEE_FLOOR_WEI);
    }
}
