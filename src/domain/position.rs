//! Position records and redemption grouping.
//!
//! A `Position` is one held outcome share as reported by the Polymarket
//! data API — an immutable snapshot fetched fresh on every invocation.
//! `group_positions` folds the redeemable subset into one redemption
//! unit per condition, preserving first-seen order for display.

use std::collections::HashMap;

use serde::Deserialize;

/// Lightweight market / condition identifier used at the ports boundary.
pub type ConditionId = String;

/// One held outcome share, as reported by the data API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Outcome token id.
    pub asset: String,
    /// Market identifier (CTF condition id).
    pub condition_id: ConditionId,
    /// "Yes" or "No".
    pub outcome: String,
    /// Decimal share count.
    pub size: f64,
    /// Market resolved and payout claimable.
    pub redeemable: bool,
    /// Display name of the market question.
    pub title: String,
    /// Current market price of the outcome token.
    #[serde(default)]
    pub cur_price: f64,
    /// Current position value in USDC.
    #[serde(default)]
    pub current_value: f64,
    /// Unrealized profit and loss in USDC.
    #[serde(default)]
    pub cash_pnl: f64,
}

/// One redemption unit per resolved condition.
///
/// `yes_size` / `no_size` come from the wallet's redeemable positions
/// for that outcome; a unit always originates from at least one
/// redeemable position, so both sizes are never zero together.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRedemption {
    /// The condition this unit redeems.
    pub condition_id: ConditionId,
    /// Display name of the market question.
    pub title: String,
    /// Held "Yes" shares.
    pub yes_size: f64,
    /// Held "No" shares.
    pub no_size: f64,
}

/// Group redeemable positions into one unit per condition.
///
/// Pure function. Non-redeemable positions are dropped; duplicate
/// outcome rows for the same condition are tolerated with last write
/// winning. Output order is the first-seen order of each condition,
/// which callers may rely on for display only.
pub fn group_positions(positions: &[Position]) -> Vec<GroupedRedemption> {
    let mut units: Vec<GroupedRedemption> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for pos in positions.iter().filter(|p| p.redeemable) {
        let slot = match index.get(pos.condition_id.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(pos.condition_id.as_str(), units.len());
                units.push(GroupedRedemption {
                    condition_id: pos.condition_id.clone(),
                    title: pos.title.clone(),
                    yes_size: 0.0,
                    no_size: 0.0,
                });
                units.len() - 1
            }
        };

        if pos.outcome == "Yes" {
            units[slot].yes_size = pos.size;
        } else {
            units[slot].no_size = pos.size;
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(condition_id: &str, outcome: &str, size: f64, redeemable: bool) -> Position {
        Position {
            asset: format!("token_{condition_id}_{outcome}"),
            condition_id: condition_id.to_string(),
            outcome: outcome.to_string(),
            size,
            redeemable,
            title: format!("Market {condition_id}"),
            cur_price: 1.0,
            current_value: size,
            cash_pnl: 0.0,
        }
    }

    #[test]
    fn yes_and_no_merge_into_one_unit() {
        let grouped = group_positions(&[
            position("0xabc", "Yes", 10.0, true),
            position("0xabc", "No", 5.0, true),
        ]);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].yes_size, 10.0);
        assert_eq!(grouped[0].no_size, 5.0);
    }

    #[test]
    fn non_redeemable_positions_never_appear() {
        let grouped = group_positions(&[
            position("0xopen", "Yes", 20.0, false),
            position("0xdone", "No", 3.0, true),
        ]);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].condition_id, "0xdone");
    }

    #[test]
    fn empty_input_yields_no_units() {
        assert!(group_positions(&[]).is_empty());
        assert!(group_positions(&[position("0x1", "Yes", 1.0, false)]).is_empty());
    }

    #[test]
    fn distinct_conditions_stay_separate_in_input_order() {
        let grouped = group_positions(&[
            position("0xb", "Yes", 15.0, true),
            position("0xa", "Yes", 5.0, true),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].condition_id, "0xb");
        assert_eq!(grouped[1].condition_id, "0xa");
    }

    #[test]
    fn duplicate_outcome_rows_last_write_wins() {
        let grouped = group_positions(&[
            position("0xdup", "Yes", 10.0, true),
            position("0xdup", "Yes", 7.0, true),
        ]);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].yes_size, 7.0);
        assert_eq!(grouped[0].no_size, 0.0);
    }

    #[test]
    fn grouping_is_deterministic() {
        let input = vec![
            position("0x1", "Yes", 1.0, true),
            position("0x2", "No", 2.0, true),
            position("0x1", "No", 3.0, true),
        ];

        assert_eq!(group_positions(&input), group_positions(&input));
    }
}
