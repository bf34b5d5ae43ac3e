//! Contract Calldata - CTF, Exchange, and Adapter ABI Encoding
//!
//! Hand-rolled calldata builders for the handful of functions the CLI
//! touches on the ConditionalTokens contract, the USDC.e token, and
//! the NegRisk adapter. Addresses come from `config.toml` and are
//! parsed once at startup.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use anyhow::{Context, Result};

use crate::config::ContractConfig;

/// Parsed contract addresses for one command invocation.
#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    /// USDC.e (bridged USDC) collateral token.
    pub usdce: Address,
    /// Gnosis ConditionalTokens framework contract.
    pub conditional_tokens: Address,
    /// CTF Exchange (order matching).
    pub ctf_exchange: Address,
    /// NegRisk CTF Exchange.
    pub neg_risk_exchange: Address,
    /// NegRisk Adapter (combined-market redemption).
    pub neg_risk_adapter: Address,
}

impl ContractAddresses {
    /// Parse the configured address strings.
    pub fn from_config(config: &ContractConfig) -> Result<Self> {
        Ok(Self {
            usdce: parse_address(&config.usdce, "usdce")?,
            conditional_tokens: parse_address(&config.conditional_tokens, "conditional_tokens")?,
            ctf_exchange: parse_address(&config.ctf_exchange, "ctf_exchange")?,
            neg_risk_exchange: parse_address(&config.neg_risk_exchange, "neg_risk_exchange")?,
            neg_risk_adapter: parse_address(&config.neg_risk_adapter, "neg_risk_adapter")?,
        })
    }
}

fn parse_address(value: &str, name: &str) -> Result<Address> {
    value
        .parse()
        .with_context(|| format!("Invalid {name} address in config.toml: {value}"))
}

/// First four bytes of the keccak256 of a function signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pad an address to a 32-byte ABI word.
fn word_from_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// `approve(spender, amount)` on the collateral token.
pub fn approve(spender: Address, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&selector("approve(address,uint256)"));
    data.extend_from_slice(&word_from_address(spender));
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    Bytes::from(data)
}

/// `redeemPositions(collateral, parentCollectionId, conditionId,
/// indexSets)` on the ConditionalTokens contract.
///
/// The parent collection is always the root (zero) and the index sets
/// are the two binary outcomes `[0b01, 0b10]`.
pub fn redeem_positions(collateral: Address, condition_id: B256) -> Bytes {
    let mut data = Vec::with_capacity(4 + 7 * 32);
    data.extend_from_slice(&selector(
        "redeemPositions(address,bytes32,bytes32,uint256[])",
    ));
    data.extend_from_slice(&word_from_address(collateral));
    data.extend_from_slice(&B256::ZERO[..]);
    data.extend_from_slice(&condition_id[..]);
    // Offset of the dynamic index-set array: 4 head words = 0x80
    data.extend_from_slice(&U256::from(0x80).to_be_bytes::<32>());
    data.extend_from_slice(&U256::from(2).to_be_bytes::<32>());
    data.extend_from_slice(&U256::from(1).to_be_bytes::<32>());
    data.extend_from_slice(&U256::from(2).to_be_bytes::<32>());
    Bytes::from(data)
}

/// `redeemPositions(conditionId, amounts)` on the NegRisk adapter,
/// with per-outcome amounts `[yes, no]` in atomic collateral units.
pub fn neg_risk_redeem_positions(condition_id: B256, amounts: [U256; 2]) -> Bytes {
    let mut data = Vec::with_capacity(4 + 5 * 32);
    data.extend_from_slice(&selector("redeemPositions(bytes32,uint256[])"));
    data.extend_from_slice(&condition_id[..]);
    // Offset of the dynamic amounts array: 2 head words = 0x40
    data.extend_from_slice(&U256::from(0x40).to_be_bytes::<32>());
    data.extend_from_slice(&U256::from(2).to_be_bytes::<32>());
    data.extend_from_slice(&amounts[0].to_be_bytes::<32>());
    data.extend_from_slice(&amounts[1].to_be_bytes::<32>());
    Bytes::from(data)
}

/// `isApprovedForAll(owner, operator)` on the ConditionalTokens
/// contract.
pub fn is_approved_for_all(owner: Address, operator: Address) -> Bytes {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&selector("isApprovedForAll(address,address)"));
    data.extend_from_slice(&word_from_address(owner));
    data.extend_from_slice(&word_from_address(operator));
    Bytes::from(data)
}

/// `setApprovalForAll(operator, true)` on the ConditionalTokens
/// contract.
pub fn set_approval_for_all(operator: Address) -> Bytes {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&selector("setApprovalForAll(address,bool)"));
    data.extend_from_slice(&word_from_address(operator));
    data.extend_from_slice(&U256::from(1).to_be_bytes::<32>());
    Bytes::from(data)
}

/// `getCollectionId(parentCollectionId, conditionId, indexSet)` on the
/// ConditionalTokens contract.
pub fn get_collection_id(condition_id: B256, index_set: u64) -> Bytes {
    let mut data = Vec::with_capacity(4 + 3 * 32);
    data.extend_from_slice(&selector("getCollectionId(bytes32,bytes32,uint256)"));
    data.extend_from_slice(&B256::ZERO[..]);
    data.extend_from_slice(&condition_id[..]);
    data.extend_from_slice(&U256::from(index_set).to_be_bytes::<32>());
    Bytes::from(data)
}

/// `balanceOf(owner, positionId)` on the ConditionalTokens contract
/// (ERC-1155 style).
pub fn balance_of(owner: Address, position_id: U256) -> Bytes {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&selector("balanceOf(address,uint256)"));
    data.extend_from_slice(&word_from_address(owner));
    data.extend_from_slice(&position_id.to_be_bytes::<32>());
    Bytes::from(data)
}

/// Derive a CTF position id off-chain:
/// `keccak256(collateral ++ collectionId)`.
pub fn position_id(collateral: Address, collection_id: B256) -> U256 {
    let mut preimage = Vec::with_capacity(52);
    preimage.extend_from_slice(collateral.as_slice());
    preimage.extend_from_slice(&collection_id[..]);
    U256::from_be_bytes(keccak256(&preimage).0)
}
