//! Order amount math for the CLOB exchange.
//!
//! The CTF exchange settles orders as a (makerAmount, takerAmount)
//! pair in atomic units. For a BUY the maker gives collateral and
//! takes outcome tokens; for a SELL the reverse. Both legs use the
//! same 6-decimal truncation as redemption amounts.

use anyhow::{ensure, Result};
use rust_decimal::Decimal;

use super::units::to_collateral_units;

/// Order side, serialized as "BUY" / "SELL" on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire representation expected by the CLOB API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Numeric side used in the EIP-712 order struct (0 = buy).
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }
}

/// Maker / taker legs of a limit order, in atomic units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAmounts {
    /// What the maker gives up.
    pub maker_amount: u128,
    /// What the maker receives.
    pub taker_amount: u128,
}

/// Compute the maker/taker amounts for a limit order.
///
/// `size` is the outcome-token count, `price` the collateral price per
/// token in (0, 1).
pub fn order_amounts(side: Side, size: Decimal, price: Decimal) -> Result<OrderAmounts> {
    ensure!(size > Decimal::ZERO, "order size must be positive, got {size}");
    ensure!(
        price > Decimal::ZERO && price < Decimal::ONE,
        "order price must be in (0, 1), got {price}"
    );

    let token_units = to_collateral_units(size);
    let collateral_units = to_collateral_units(size * price);

    Ok(match side {
        Side::Buy => OrderAmounts {
            maker_amount: collateral_units,
            taker_amount: token_units,
        },
        Side::Sell => OrderAmounts {
            maker_amount: token_units,
            taker_amount: collateral_units,
        },
    })
}
