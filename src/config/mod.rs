//! Configuration Module - TOML-based CLI Configuration
//!
//! Loads configuration from `~/.pmarket-cli/config.toml` (overridable
//! via `PMARKET_CONFIG_DIR`) with validated defaults. All contract
//! addresses and endpoints are externalized here - nothing is
//! hardcoded in the domain layer. API credentials live in a separate
//! `credentials.toml` so the config file can be shared safely.

pub mod store;

use serde::{Deserialize, Serialize};

/// Top-level CLI configuration, persisted as `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Hex-encoded wallet private key. Empty until `init` runs.
    #[serde(default)]
    pub private_key: String,
    /// Polygon RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Polymarket API endpoints.
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Contract addresses on Polygon mainnet.
    #[serde(default)]
    pub contracts: ContractConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            rpc_url: default_rpc_url(),
            endpoints: EndpointConfig::default(),
            contracts: ContractConfig::default(),
        }
    }
}

/// Polymarket HTTP endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// CLOB REST API base URL.
    #[serde(default = "default_clob_url")]
    pub clob_url: String,
    /// Data API base URL (position snapshots).
    #[serde(default = "default_data_api_url")]
    pub data_api_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            clob_url: default_clob_url(),
            data_api_url: default_data_api_url(),
        }
    }
}

/// Contract addresses, defaulting to the Polygon mainnet deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// USDC.e (bridged USDC) collateral token.
    #[serde(default = "default_usdce")]
    pub usdce: String,
    /// Gnosis ConditionalTokens framework contract.
    #[serde(default = "default_conditional_tokens")]
    pub conditional_tokens: String,
    /// CTF Exchange (order matching).
    #[serde(default = "default_ctf_exchange")]
    pub ctf_exchange: String,
    /// NegRisk CTF Exchange.
    #[serde(default = "default_neg_risk_exchange")]
    pub neg_risk_exchange: String,
    /// NegRisk Adapter (combined-market redemption).
    #[serde(default = "default_neg_risk_adapter")]
    pub neg_risk_adapter: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            usdce: default_usdce(),
            conditional_tokens: default_conditional_tokens(),
            ctf_exchange: default_ctf_exchange(),
            neg_risk_exchange: default_neg_risk_exchange(),
            neg_risk_adapter: default_neg_risk_adapter(),
        }
    }
}

/// CLOB API credentials, persisted as `credentials.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
    /// When the credentials were derived (ISO 8601).
    pub derived_at: String,
}

impl Credentials {
    /// Whether all three fields are present.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.passphrase.is_empty()
    }
}

// Default value functions for serde

fn default_rpc_url() -> String {
    "https://polygon-rpc.com".to_string()
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_data_api_url() -> String {
    "https://data-api.polymarket.com".to_string()
}

fn default_usdce() -> String {
    "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".to_string()
}

fn default_conditional_tokens() -> String {
    "0x4D97DCd97eC945f40cF65F87097ACe5EA0476045".to_string()
}

fn default_ctf_exchange() -> String {
    "0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E".to_string()
}

fn default_neg_risk_exchange() -> String {
    "0xC5d563A36AE78145C45a50134d48A1215220f80a".to_string()
}

fn default_neg_risk_adapter() -> String {
    "0xd91E80cF2E7be2e162c6513ceD06f1dD0dA35296".to_string()
}
