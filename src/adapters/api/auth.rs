//! CLOB Authentication - L1 Wallet and L2 HMAC Request Signing
//!
//! Two auth levels per the CLOB protocol:
//! - L1: an EIP-712 `ClobAuth` signature from the wallet key, used
//!   only to create or derive API credentials.
//! - L2: HMAC-SHA256 over `timestamp + method + path + body` with the
//!   URL-safe-base64 API secret, attached to every trading request.
//!
//! The API secret is never sent in a header, only the computed
//! signature.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol;
use alloy::sol_types::{eip712_domain, SolStruct};
use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use crate::config::Credentials;

sol! {
    /// EIP-712 payload for API key creation / derivation.
    struct ClobAuthMessage {
        address address;
        string timestamp;
        uint256 nonce;
        string message;
    }
}

/// Fixed attestation string required by the CLOB auth domain.
const AUTH_ATTESTATION: &str = "This message attests that I control the given wallet";

/// A full set of signed auth headers, ready to attach to a request.
pub type AuthHeaders = Vec<(&'static str, String)>;

/// Signs CLOB requests with the wallet key (L1) or stored API
/// credentials (L2).
pub struct ClobAuth {
    signer: PrivateKeySigner,
    credentials: Option<Credentials>,
}

impl ClobAuth {
    pub fn new(signer: PrivateKeySigner, credentials: Option<Credentials>) -> Self {
        Self {
            signer,
            credentials,
        }
    }

    /// The wallet address presented as `POLY_ADDRESS`.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The API key attached as order owner, if credentials exist.
    pub fn api_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.api_key.as_str())
    }

    /// Current Unix timestamp in seconds.
    fn timestamp() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string()
    }

    /// L1 headers: EIP-712 wallet signature over the auth attestation.
    ///
    /// Used only for `POST /auth/api-key` and `GET /auth/derive-api-key`.
    pub async fn l1_headers(&self) -> Result<AuthHeaders> {
        let timestamp = Self::timestamp();
        let nonce = 0u64;

        let payload = ClobAuthMessage {
            address: self.signer.address(),
            timestamp: timestamp.clone(),
            nonce: U256::from(nonce),
            message: AUTH_ATTESTATION.to_string(),
        };
        let domain = eip712_domain! {
            name: "ClobAuthDomain",
            version: "1",
            chain_id: 137,
        };

        // Sign the EIP-712 digest explicitly; alloy 0.9 does not expose
        // a typed-data signing method on the local signer.
        let digest = payload.eip712_signing_hash(&domain);
        let signature = self
            .signer
            .sign_hash(&digest)
            .await
            .context("Wallet auth signature failed")?;

        Ok(vec![
            ("POLY_ADDRESS", self.signer.address().to_string()),
            (
                "POLY_SIGNATURE",
                alloy::hex::encode_prefixed(signature.as_bytes()),
            ),
            ("POLY_TIMESTAMP", timestamp),
            ("POLY_NONCE", nonce.to_string()),
        ])
    }

    /// L2 headers: HMAC-SHA256 signature from stored API credentials.
    ///
    /// # Errors
    /// Fails when no credentials are stored (run `keys` first) or the
    /// stored secret is not valid URL-safe base64.
    pub fn l2_headers(&self, method: &str, path: &str, body: &str) -> Result<AuthHeaders> {
        let creds = self
            .credentials
            .as_ref()
            .context("No API credentials stored. Run `pmarket-cli keys` first")?;

        let timestamp = Self::timestamp();
        let signature = sign_hmac(&creds.api_secret, &timestamp, method, path, body)?;

        Ok(vec![
            ("POLY_ADDRESS", self.signer.address().to_string()),
            ("POLY_SIGNATURE", signature),
            ("POLY_TIMESTAMP", timestamp),
            ("POLY_API_KEY", creds.api_key.clone()),
            ("POLY_PASSPHRASE", creds.passphrase.clone()),
        ])
    }
}

/// HMAC-SHA256 over `timestamp + method + path + body`, keyed with
/// the URL-safe-base64-decoded secret, output re-encoded URL-safe.
fn sign_hmac(
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    body: &str,
) -> Result<String> {
    let key = URL_SAFE
        .decode(secret)
        .context("API secret is not valid base64")?;

    let message = format!("{timestamp}{method}{path}{body}");
    let mac = hmac_sha256::HMAC::mac(message.as_bytes(), &key);

    Ok(URL_SAFE.encode(mac))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> PrivateKeySigner {
        "0x0000000000000000000000000000000000000000000000000000000000000001"
            .parse()
            .unwrap()
    }

    fn test_credentials() -> Credentials {
        Credentials {
            api_key: "key-id".to_string(),
            api_secret: URL_SAFE.encode(b"shared-secret"),
            passphrase: "phrase".to_string(),
            derived_at: String::new(),
        }
    }

    #[test]
    fn hmac_signature_is_deterministic() {
        let secret = URL_SAFE.encode(b"shared-secret");
        let a = sign_hmac(&secret, "1700000000", "GET", "/markets", "").unwrap();
        let b = sign_hmac(&secret, "1700000000", "GET", "/markets", "").unwrap();
        assert_eq!(a, b);

        let other = sign_hmac(&secret, "1700000000", "GET", "/book", "").unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn invalid_secret_is_rejected() {
        assert!(sign_hmac("not base64 !!!", "0", "GET", "/", "").is_err());
    }

    #[test]
    fn l2_headers_require_credentials() {
        let auth = ClobAuth::new(test_signer(), None);
        assert!(auth.l2_headers("GET", "/markets", "").is_err());
    }

    #[test]
    fn l2_headers_carry_all_five_fields() {
        let auth = ClobAuth::new(test_signer(), Some(test_credentials()));
        let headers = auth.l2_headers("POST", "/order", "{}").unwrap();

        let names: Vec<&str> = headers.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "POLY_ADDRESS",
                "POLY_SIGNATURE",
                "POLY_TIMESTAMP",
                "POLY_API_KEY",
                "POLY_PASSPHRASE",
            ]
        );
    }

    #[tokio::test]
    async fn l1_headers_sign_with_the_wallet() {
        let auth = ClobAuth::new(test_signer(), None);
        let headers = auth.l1_headers().await.unwrap();

        let signature = &headers
            .iter()
            .find(|(name, _)| *name == "POLY_SIGNATURE")
            .unwrap()
            .1;
        assert!(signature.starts_with("0x"));
        // 65-byte ECDSA signature, hex encoded
        assert_eq!(signature.len(), 2 + 65 * 2);
    }
}
