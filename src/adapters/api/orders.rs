//! Order Placement - EIP-712 Signed CLOB Orders
//!
//! Builds, signs, and posts limit orders to the CLOB, and manages the
//! API credentials that authorize them. Orders are signed against the
//! exchange contract that will settle them: the standard CTF Exchange
//! or the NegRisk exchange for combined markets.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol;
use alloy::sol_types::{eip712_domain, SolStruct};
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::order::{OrderAmounts, Side};

use super::auth::ClobAuth;
use super::client::ClobClient;
use super::types::{ApiCredsResponse, CancelAllResponse, OrderResponse};

sol! {
    /// The exchange's EIP-712 order struct.
    struct Order {
        uint256 salt;
        address maker;
        address signer;
        address taker;
        uint256 tokenId;
        uint256 makerAmount;
        uint256 takerAmount;
        uint256 expiration;
        uint256 nonce;
        uint256 feeRateBps;
        uint8 side;
        uint8 signatureType;
    }
}

/// EOA signature type in the exchange's order scheme.
const SIGNATURE_TYPE_EOA: u8 = 0;

/// Authenticated order operations against the CLOB.
pub struct OrderApi {
    client: ClobClient,
    auth: ClobAuth,
    signer: PrivateKeySigner,
    ctf_exchange: Address,
    neg_risk_exchange: Address,
}

impl OrderApi {
    pub fn new(
        client: ClobClient,
        auth: ClobAuth,
        signer: PrivateKeySigner,
        ctf_exchange: Address,
        neg_risk_exchange: Address,
    ) -> Self {
        Self {
            client,
            auth,
            signer,
            ctf_exchange,
            neg_risk_exchange,
        }
    }

    /// Derive existing API credentials for this wallet, creating a
    /// fresh key when none exist yet.
    pub async fn derive_or_create_credentials(&self) -> Result<ApiCredsResponse> {
        let headers = self.auth.l1_headers().await?;
        if let Ok(creds) = self
            .client
            .get_json::<ApiCredsResponse>("/auth/derive-api-key", headers)
            .await
        {
            debug!("Derived existing API credentials");
            return Ok(creds);
        }

        let headers = self.auth.l1_headers().await?;
        let creds = self
            .client
            .post_json("/auth/api-key", "{}", headers)
            .await
            .context("API key creation failed")?;
        debug!("Created new API credentials");
        Ok(creds)
    }

    /// Sign and submit a GTC limit order for `token_id`.
    ///
    /// `neg_risk` selects the settlement exchange the signature must
    /// bind to; a mismatch is rejected by the CLOB.
    pub async fn place_order(
        &self,
        token_id: &str,
        side: Side,
        amounts: OrderAmounts,
        neg_risk: bool,
    ) -> Result<OrderResponse> {
        let token: U256 = token_id
            .parse()
            .with_context(|| format!("Invalid token id {token_id}"))?;

        let salt = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let order = Order {
            salt: U256::from(salt),
            maker: self.signer.address(),
            signer: self.signer.address(),
            taker: Address::ZERO,
            tokenId: token,
            makerAmount: U256::from(amounts.maker_amount),
            takerAmount: U256::from(amounts.taker_amount),
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            feeRateBps: U256::ZERO,
            side: side.as_u8(),
            signatureType: SIGNATURE_TYPE_EOA,
        };

        let exchange = if neg_risk {
            self.neg_risk_exchange
        } else {
            self.ctf_exchange
        };
        let domain = eip712_domain! {
            name: "Polymarket CTF Exchange",
            version: "1",
            chain_id: 137,
            verifying_contract: exchange,
        };

        // Sign the EIP-712 digest explicitly; alloy 0.9 does not expose
        // a typed-data signing method on the local signer.
        let digest = order.eip712_signing_hash(&domain);
        let signature = self
            .signer
            .sign_hash(&digest)
            .await
            .context("Order signature failed")?;

        let api_key = self
            .auth
            .api_key()
            .context("No API credentials stored. Run `pmarket-cli keys` first")?;

        let body = serde_json::json!({
            "order": {
                "salt": salt,
                "maker": self.signer.address().to_string(),
                "signer": self.signer.address().to_string(),
                "taker": Address::ZERO.to_string(),
                "tokenId": token_id,
                "makerAmount": amounts.maker_amount.to_string(),
                "takerAmount": amounts.taker_amount.to_string(),
                "expiration": "0",
                "nonce": "0",
                "feeRateBps": "0",
                "side": side.as_str(),
                "signatureType": SIGNATURE_TYPE_EOA,
                "signature": alloy::hex::encode_prefixed(signature.as_bytes()),
            },
            "owner": api_key,
            "orderType": "GTC",
        })
        .to_string();

        let headers = self.auth.l2_headers("POST", "/order", &body)?;
        let response: OrderResponse = self
            .client
            .post_json("/order", &body, headers)
            .await
            .context("Order submission failed")?;

        if response.success {
            info!(order_id = %response.order_id, side = side.as_str(), "Order placed");
        }
        Ok(response)
    }

    /// Cancel every open order owned by this wallet.
    pub async fn cancel_all(&self) -> Result<CancelAllResponse> {
        let headers = self.auth.l2_headers("DELETE", "/orders", "")?;
        self.client
            .delete_json("/orders", headers)
            .await
            .context("Cancel-all request failed")
    }
}
