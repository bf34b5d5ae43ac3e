//! Integration tests for the allowance and redemption orchestrators.
//!
//! Mocked at the ports layer: the chain and position-source traits are
//! replaced with mockall doubles, so the full orchestration logic runs
//! without touching an RPC endpoint. Pacing is zeroed so sweeps run
//! instantly.

use std::time::Duration;

use async_trait::async_trait;
use mockall::{mock, Sequence};
use rust_decimal_macros::dec;

use pmarket_cli::domain::position::Position;
use pmarket_cli::domain::redemption::{ClassifyError, RedemptionPath};
use pmarket_cli::ports::chain::{ApprovalChain, ApprovalTarget, RedemptionChain, SubmittedTx};
use pmarket_cli::ports::positions::PositionSource;
use pmarket_cli::usecases::allowance::SetAllowance;
use pmarket_cli::usecases::redeem::RedeemPositions;

mock! {
    Positions {}

    #[async_trait]
    impl PositionSource for Positions {
        async fn positions(&self) -> anyhow::Result<Vec<Position>>;
    }
}

mock! {
    Chain {}

    #[async_trait]
    impl RedemptionChain for Chain {
        async fn classify(&self, condition_id: &str) -> Result<RedemptionPath, ClassifyError>;
        async fn submit_standard_redemption(&self, condition_id: &str)
            -> anyhow::Result<SubmittedTx>;
        async fn submit_adapter_redemption(
            &self,
            condition_id: &str,
            amounts: [u128; 2],
        ) -> anyhow::Result<SubmittedTx>;
        async fn operator_approved(&self) -> anyhow::Result<bool>;
        async fn submit_operator_approval(&self) -> anyhow::Result<SubmittedTx>;
        async fn confirm(&self, tx: &SubmittedTx) -> anyhow::Result<()>;
    }
}

mock! {
    Approvals {}

    #[async_trait]
    impl ApprovalChain for Approvals {
        async fn submit_approval(
            &self,
            target: ApprovalTarget,
            amount_units: u128,
        ) -> anyhow::Result<SubmittedTx>;
        async fn confirm_approval(&self, tx: &SubmittedTx) -> anyhow::Result<u64>;
    }
}

fn position(condition_id: &str, outcome: &str, size: f64) -> Position {
    Position {
        asset: format!("token_{condition_id}_{outcome}"),
        condition_id: condition_id.to_string(),
        outcome: outcome.to_string(),
        size,
        redeemable: true,
        title: format!("Market {condition_id}"),
        cur_price: 1.0,
        current_value: size,
        cash_pnl: 0.0,
    }
}

fn tx(hash: &str) -> SubmittedTx {
    SubmittedTx {
        hash: hash.to_string(),
    }
}

#[tokio::test]
async fn standard_units_classify_once_each_and_redeem() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .times(1)
        .returning(|| Ok(vec![position("0xaaa", "Yes", 10.0), position("0xbbb", "No", 5.0)]));

    let mut chain = MockChain::new();
    chain
        .expect_classify()
        .times(2)
        .returning(|_| Ok(RedemptionPath::Standard));
    chain
        .expect_submit_standard_redemption()
        .times(2)
        .returning(|_| Ok(tx("0x01")));
    chain.expect_confirm().times(2).returning(|_| Ok(()));

    let summary = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 2);
    assert_eq!(summary.total, 2);
    assert!(summary.outcomes.iter().all(|o| o.succeeded()));
}

#[tokio::test]
async fn classification_failure_skips_the_unit_and_continues() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Ok(vec![position("0xbad", "Yes", 1.0), position("0xgood", "Yes", 2.0)]));

    let mut chain = MockChain::new();
    chain
        .expect_classify()
        .withf(|id| id == "0xbad")
        .returning(|_| Err(ClassifyError::Call("RPC timeout".to_string())));
    chain
        .expect_classify()
        .withf(|id| id == "0xgood")
        .returning(|_| Ok(RedemptionPath::Standard));
    chain
        .expect_submit_standard_redemption()
        .times(1)
        .withf(|id| id == "0xgood")
        .returning(|_| Ok(tx("0x02")));
    chain.expect_confirm().times(1).returning(|_| Ok(()));

    let summary = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 1);
    assert_eq!(summary.total, 2);
    let failed = &summary.outcomes[0];
    assert!(failed.error.as_deref().unwrap().contains("RPC timeout"));
    assert!(failed.tx_hash.is_none());
}

#[tokio::test]
async fn adapter_path_approves_operator_before_redeeming() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Ok(vec![position("0xneg", "Yes", 15.0)]));

    let mut chain = MockChain::new();
    let mut seq = Sequence::new();
    chain
        .expect_classify()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(RedemptionPath::AdapterMediated));
    chain
        .expect_operator_approved()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(false));
    chain
        .expect_submit_operator_approval()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(tx("0xapproval")));
    chain
        .expect_confirm()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|tx| tx.hash == "0xapproval")
        .returning(|_| Ok(()));
    chain
        .expect_submit_adapter_redemption()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|_, amounts| *amounts == [15_000_000, 0])
        .returning(|_, _| Ok(tx("0xredeem")));
    chain
        .expect_confirm()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|tx| tx.hash == "0xredeem")
        .returning(|_| Ok(()));

    let summary = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 1);
    assert_eq!(summary.outcomes[0].path, Some(RedemptionPath::AdapterMediated));
}

#[tokio::test]
async fn adapter_path_skips_approval_when_already_operator() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Ok(vec![position("0xneg", "No", 3.5)]));

    let mut chain = MockChain::new();
    chain
        .expect_classify()
        .returning(|_| Ok(RedemptionPath::AdapterMediated));
    chain.expect_operator_approved().returning(|| Ok(true));
    chain.expect_submit_operator_approval().times(0);
    chain
        .expect_submit_adapter_redemption()
        .withf(|_, amounts| *amounts == [0, 3_500_000])
        .returning(|_, _| Ok(tx("0x03")));
    chain.expect_confirm().returning(|_| Ok(()));

    let summary = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 1);
}

#[tokio::test]
async fn no_redeemable_positions_touches_no_chain_state() {
    let mut positions = MockPositions::new();
    positions.expect_positions().returning(|| {
        Ok(vec![Position {
            redeemable: false,
            ..position("0xopen", "Yes", 10.0)
        }])
    });

    let mut chain = MockChain::new();
    chain.expect_classify().times(0);

    let summary = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 0);
    assert_eq!(summary.total, 0);
    assert!(summary.outcomes.is_empty());
}

#[tokio::test]
async fn position_fetch_failure_is_fatal() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Err(anyhow::anyhow!("data API unreachable")));

    let chain = MockChain::new();
    let result = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await;

    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("Failed to fetch positions"));
}

#[tokio::test]
async fn allowance_approves_all_three_spenders_in_order() {
    let mut chain = MockApprovals::new();
    let mut seq = Sequence::new();

    chain
        .expect_submit_approval()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|target, units| *target == ApprovalTarget::CtfExchange && *units == 25_000_000)
        .returning(|_, _| Ok(tx("0xa")));
    chain
        .expect_confirm_approval()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(100));
    chain
        .expect_submit_approval()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|target, _| *target == ApprovalTarget::NegRiskExchange)
        .returning(|_, _| Ok(tx("0xb")));
    chain
        .expect_confirm_approval()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(101));
    chain
        .expect_submit_approval()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|target, _| *target == ApprovalTarget::NegRiskAdapter)
        .returning(|_, _| Ok(tx("0xc")));

    let receipts = SetAllowance::with_pacing(chain, Duration::ZERO)
        .set_allowance(dec!(25))
        .await
        .unwrap();

    // The adapter approval is returned pending, not confirmed.
    assert_eq!(receipts.neg_risk_adapter.hash, "0xc");
}

#[tokio::test]
async fn failed_second_approval_aborts_the_sequence() {
    let mut chain = MockApprovals::new();

    chain
        .expect_submit_approval()
        .withf(|target, _| *target == ApprovalTarget::CtfExchange)
        .returning(|_, _| Ok(tx("0xa")));
    chain.expect_confirm_approval().returning(|_| Ok(100));
    chain
        .expect_submit_approval()
        .withf(|target, _| *target == ApprovalTarget::NegRiskExchange)
        .returning(|_, _| Err(anyhow::anyhow!("nonce too low")));
    chain
        .expect_submit_approval()
        .withf(|target, _| *target == ApprovalTarget::NegRiskAdapter)
        .times(0);

    let result = SetAllowance::with_pacing(chain, Duration::ZERO)
        .set_allowance(dec!(10))
        .await;

    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("NegRiskExchange approval failed"));
}

#[tokio::test]
async fn non_positive_allowance_submits_nothing() {
    let mut chain = MockApprovals::new();
    chain.expect_submit_approval().times(0);

    let orchestrator = SetAllowance::with_pacing(chain, Duration::ZERO);
    assert!(orchestrator.set_allowance(dec!(0)).await.is_err());
    assert!(orchestrator.set_allowance(dec!(-5)).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn single_unit_sweep_skips_the_pacing_delay() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Ok(vec![position("0xonly", "Yes", 1.0)]));

    let mut chain = MockChain::new();
    chain
        .expect_classify()
        .returning(|_| Ok(RedemptionPath::Standard));
    chain
        .expect_submit_standard_redemption()
        .returning(|_| Ok(tx("0x05")));
    chain.expect_confirm().returning(|_| Ok(()));

    let start = tokio::time::Instant::now();
    let summary = RedeemPositions::with_pacing(positions, chain, Duration::from_secs(5))
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 1);
    // Paused clock: any sleep would have advanced it.
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn multi_unit_sweep_paces_between_units() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Ok(vec![position("0xaaa", "Yes", 1.0), position("0xbbb", "Yes", 2.0)]));

    let mut chain = MockChain::new();
    chain
        .expect_classify()
        .returning(|_| Ok(RedemptionPath::Standard));
    chain
        .expect_submit_standard_redemption()
        .returning(|_| Ok(tx("0x06")));
    chain.expect_confirm().returning(|_| Ok(()));

    let start = tokio::time::Instant::now();
    let summary = RedeemPositions::with_pacing(positions, chain, Duration::from_secs(5))
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 2);
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn fractional_sizes_truncate_to_atomic_units() {
    let mut positions = MockPositions::new();
    positions
        .expect_positions()
        .returning(|| Ok(vec![position("0xfrac", "Yes", 0.1234567)]));

    let mut chain = MockChain::new();
    chain
        .expect_classify()
        .returning(|_| Ok(RedemptionPath::AdapterMediated));
    chain.expect_operator_approved().returning(|| Ok(true));
    chain
        .expect_submit_adapter_redemption()
        .withf(|_, amounts| *amounts == [123_456, 0])
        .returning(|_, _| Ok(tx("0x04")));
    chain.expect_confirm().returning(|_| Ok(()));

    let summary = RedeemPositions::with_pacing(positions, chain, Duration::ZERO)
        .redeem_all()
        .await
        .unwrap();

    assert_eq!(summary.redeemed, 1);
}
