//! Fixed-point amount conversion for the collateral token.
//!
//! USDC.e on Polygon uses 6 decimals. Every amount that crosses into a
//! transaction argument is converted from a decimal share count to the
//! token's integer representation by TRUNCATING at 6 fractional digits.
//! Truncation (not round-to-nearest) is required so the submitted
//! amounts match on-chain balances exactly.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Fractional digits of the collateral token (USDC.e).
pub const COLLATERAL_DECIMALS: u32 = 6;

/// Multiplier from whole tokens to atomic units (10^6).
const UNIT_SCALE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Convert a decimal token amount to atomic (6-decimal) units.
///
/// Truncates at 6 fractional digits. Negative amounts clamp to zero;
/// amounts too large for the token supply saturate at `u128::MAX`.
pub fn to_collateral_units(amount: Decimal) -> u128 {
    if amount.is_sign_negative() {
        return 0;
    }
    let truncated = amount.trunc_with_scale(COLLATERAL_DECIMALS);
    (truncated * UNIT_SCALE).to_u128().unwrap_or(u128::MAX)
}

/// Convert an `f64` share count (as reported by the data API) to
/// atomic units. NaN and infinite inputs collapse to zero.
///
/// Uses the shortest-round-trip decimal form of the float, not its
/// exact binary expansion: a JSON `0.29` arrives as the double just
/// below 0.29, and truncating its full expansion would come up one
/// atomic unit short of the on-chain balance.
pub fn f64_to_collateral_units(amount: f64) -> u128 {
    Decimal::from_f64(amount)
        .map(to_collateral_units)
        .unwrap_or(0)
}
