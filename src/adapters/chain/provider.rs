//! Polygon RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the Polygon PoS chain via alloy-rs.
//! Validates RPC connectivity at startup and exposes a shared,
//! wallet-backed provider instance for all on-chain operations.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a complex
//! filler type. We store it as a type-erased `dyn Provider` over the
//! concrete HTTP transport to keep the API clean across the adapter
//! layer (`Provider` is still generic over the transport in 0.9, so
//! the transport type has to be named in the trait object).

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Polygon mainnet chain id.
const POLYGON_CHAIN_ID: u64 = 137;

/// The HTTP transport every chain adapter runs over.
pub type PolygonTransport = Http<Client>;

/// Shared Polygon RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance; the wallet
/// filler signs every transaction with the configured private key.
///
/// Uses `dyn Provider<PolygonTransport>` for type erasure because
/// alloy 0.9's `ProviderBuilder` returns a deeply-nested generic
/// filler type that would leak implementation details.
pub struct PolygonProvider {
    /// The alloy HTTP provider connected to Polygon RPC (type-erased).
    provider: Arc<dyn Provider<PolygonTransport> + Send + Sync>,
    /// The signing wallet's address.
    wallet: Address,
}

impl PolygonProvider {
    /// Connect to Polygon RPC with a signing wallet and validate the
    /// chain ID.
    ///
    /// The RPC URL comes from `config.toml` (never hardcoded).
    #[instrument(skip_all)]
    pub async fn connect(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self> {
        let wallet = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .on_http(rpc_url.parse().context("Invalid RPC URL")?);

        // Erase the filler stack behind the transport-typed trait object
        let provider: Arc<dyn Provider<PolygonTransport> + Send + Sync> = Arc::new(provider);

        // Validate chain ID at startup
        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != POLYGON_CHAIN_ID {
            anyhow::bail!("Expected Polygon mainnet (chain_id=137), got {chain_id}");
        }

        debug!(chain_id, wallet = %wallet, "Connected to Polygon RPC");

        Ok(Self { provider, wallet })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider<PolygonTransport> + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// The signing wallet's address.
    pub fn wallet(&self) -> Address {
        self.wallet
    }
}
