//! Chain Adapters - Polygon Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with a wallet-backed signer
//! - EIP-1559 fee estimation with floor fallback
//! - Calldata construction for the CTF / exchange contracts
//! - The chain gateway implementing the approval and redemption ports

pub mod contracts;
pub mod fees;
pub mod gateway;
pub mod provider;

pub use contracts::ContractAddresses;
pub use fees::FeeOracle;
pub use gateway::ChainGateway;
pub use provider::PolygonProvider;
