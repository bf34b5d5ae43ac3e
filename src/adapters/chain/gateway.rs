//! Chain Gateway - Approval and Redemption Port Implementations
//!
//! The single write-path adapter: builds calldata via `contracts`,
//! prices every submission through the `FeeOracle`, and broadcasts
//! through the shared wallet-backed provider. Serves both the
//! allowance orchestrator (`ApprovalChain`) and the redemption
//! orchestrator (`RedemptionChain`).

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{PendingTransactionConfig, Provider};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::fees::{APPROVAL_GAS_LIMIT, REDEMPTION_GAS_LIMIT};
use crate::domain::redemption::{ClassifyError, RedemptionPath};
use crate::ports::chain::{ApprovalChain, ApprovalTarget, RedemptionChain, SubmittedTx};

use super::contracts::{self, ContractAddresses};
use super::fees::FeeOracle;
use super::provider::PolygonProvider;

/// On-chain gateway for the CLI's write operations.
pub struct ChainGateway {
    /// Shared Polygon provider.
    provider: Arc<PolygonProvider>,
    /// Fee oracle for EIP-1559 pricing.
    fees: FeeOracle,
    /// Contract addresses from config.
    addresses: ContractAddresses,
}

impl ChainGateway {
    /// Create a new gateway over a connected provider.
    pub fn new(provider: Arc<PolygonProvider>, addresses: ContractAddresses) -> Self {
        let fees = FeeOracle::new(Arc::clone(&provider));
        Self {
            provider,
            fees,
            addresses,
        }
    }

    /// Read-only contract call, returning the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().to(to).input(data.into());
        self.provider
            .inner()
            .call(&tx)
            .await
            .context("Contract call failed")
    }

    /// Price, sign, and broadcast a state-changing transaction.
    async fn send(&self, to: Address, data: Bytes, gas_limit: u64) -> Result<SubmittedTx> {
        let fees = self.fees.estimate_fees(gas_limit).await;

        let tx = TransactionRequest::default()
            .to(to)
            .input(data.into())
            .max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
            .max_fee_per_gas(fees.max_fee_per_gas)
            .gas_limit(fees.gas_limit);

        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .context("Transaction broadcast failed")?;

        let hash = *pending.tx_hash();
        debug!(to = %to, hash = %hash, "Transaction submitted");

        Ok(SubmittedTx {
            hash: format!("{hash:#x}"),
        })
    }

    /// Wait for a submitted transaction to be mined.
    async fn wait_mined(&self, tx: &SubmittedTx) -> Result<B256> {
        let hash: B256 = tx
            .hash
            .parse()
            .with_context(|| format!("Invalid transaction hash {}", tx.hash))?;

        self.provider
            .inner()
            .watch_pending_transaction(PendingTransactionConfig::new(hash))
            .await
            .context("Transaction watch setup failed")?
            .await
            .with_context(|| format!("Transaction {} not confirmed", tx.hash))?;

        Ok(hash)
    }
}

/// Parse a 0x-prefixed 32-byte condition id.
fn parse_condition_id(condition_id: &str) -> Result<B256, ClassifyError> {
    condition_id
        .parse()
        .map_err(|_| ClassifyError::InvalidConditionId(condition_id.to_string()))
}

/// Decode a single ABI uint word, rejecting oversized return data
/// (`U256::from_be_slice` panics past 32 bytes).
fn decode_uint_word(data: &[u8], source: &str) -> Result<U256, ClassifyError> {
    if data.len() > 32 {
        return Err(ClassifyError::Call(format!(
            "{source} returned {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(data))
}

#[async_trait]
impl RedemptionChain for ChainGateway {
    /// Classify by probing for a directly-held CTF position: derive
    /// the YES collection for the condition, compute the position id
    /// against USDC.e, and check the wallet's ERC-1155 balance. A
    /// non-zero balance means the tokens live on the standard path;
    /// otherwise the payout sits behind the NegRisk adapter's wrapped
    /// collateral.
    #[instrument(skip(self))]
    async fn classify(&self, condition_id: &str) -> Result<RedemptionPath, ClassifyError> {
        let condition = parse_condition_id(condition_id)?;

        let collection = self
            .call(
                self.addresses.conditional_tokens,
                contracts::get_collection_id(condition, 1),
            )
            .await
            .map_err(|e| ClassifyError::Call(format!("{e:#}")))?;
        if collection.len() < 32 {
            return Err(ClassifyError::Call(format!(
                "getCollectionId returned {} bytes",
                collection.len()
            )));
        }
        let collection = B256::from_slice(&collection[..32]);

        let position = contracts::position_id(self.addresses.usdce, collection);
        let balance = self
            .call(
                self.addresses.conditional_tokens,
                contracts::balance_of(self.provider.wallet(), position),
            )
            .await
            .map_err(|e| ClassifyError::Call(format!("{e:#}")))?;
        let balance = decode_uint_word(&balance, "balanceOf")?;

        let path = if balance > U256::ZERO {
            RedemptionPath::Standard
        } else {
            RedemptionPath::AdapterMediated
        };
        debug!(condition_id, %balance, %path, "Condition classified");

        Ok(path)
    }

    async fn submit_standard_redemption(&self, condition_id: &str) -> Result<SubmittedTx> {
        let condition: B256 = condition_id
            .parse()
            .with_context(|| format!("Invalid condition id {condition_id}"))?;

        self.send(
            self.addresses.conditional_tokens,
            contracts::redeem_positions(self.addresses.usdce, condition),
            REDEMPTION_GAS_LIMIT,
        )
        .await
    }

    async fn submit_adapter_redemption(
        &self,
        condition_id: &str,
        amounts: [u128; 2],
    ) -> Result<SubmittedTx> {
        let condition: B256 = condition_id
            .parse()
            .with_context(|| format!("Invalid condition id {condition_id}"))?;

        self.send(
            self.addresses.neg_risk_adapter,
            contracts::neg_risk_redeem_positions(
                condition,
                [U256::from(amounts[0]), U256::from(amounts[1])],
            ),
            REDEMPTION_GAS_LIMIT,
        )
        .await
    }

    async fn operator_approved(&self) -> Result<bool> {
        let result = self
            .call(
                self.addresses.conditional_tokens,
                contracts::is_approved_for_all(
                    self.provider.wallet(),
                    self.addresses.neg_risk_adapter,
                ),
            )
            .await
            .context("Operator approval query failed")?;

        // ABI bool: last byte of a 32-byte word
        Ok(result.last().is_some_and(|byte| *byte == 1))
    }

    async fn submit_operator_approval(&self) -> Result<SubmittedTx> {
        self.send(
            self.addresses.conditional_tokens,
            contracts::set_approval_for_all(self.addresses.neg_risk_adapter),
            APPROVAL_GAS_LIMIT,
        )
        .await
    }

    async fn confirm(&self, tx: &SubmittedTx) -> Result<()> {
        self.wait_mined(tx).await?;
        Ok(())
    }
}

#[async_trait]
impl ApprovalChain for ChainGateway {
    async fn submit_approval(
        &self,
        target: ApprovalTarget,
        amount_units: u128,
    ) -> Result<SubmittedTx> {
        let spender = match target {
            ApprovalTarget::CtfExchange => self.addresses.ctf_exchange,
            ApprovalTarget::NegRiskExchange => self.addresses.neg_risk_exchange,
            ApprovalTarget::NegRiskAdapter => self.addresses.neg_risk_adapter,
        };

        self.send(
            self.addresses.usdce,
            contracts::approve(spender, U256::from(amount_units)),
            APPROVAL_GAS_LIMIT,
        )
        .await
    }

    async fn confirm_approval(&self, tx: &SubmittedTx) -> Result<u64> {
        let hash = self.wait_mined(tx).await?;

        let receipt = self
            .provider
            .inner()
            .get_transaction_receipt(hash)
            .await
            .context("Receipt query failed")?
            .with_context(|| format!("No receipt for confirmed transaction {}", tx.hash))?;

        receipt
            .block_number
            .with_context(|| format!("Receipt for {} missing block number", tx.hash))
    }
}
