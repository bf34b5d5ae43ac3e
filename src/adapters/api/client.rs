//! CLOB HTTP Client - Retrying REST Transport
//!
//! Thin reqwest wrapper shared by the market, order, and key-derivation
//! calls. Retries transient failures (429, 5xx, transport errors) with
//! exponential backoff; auth headers are supplied per request since
//! different endpoints need different auth levels.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::auth::AuthHeaders;

/// Configuration for the CLOB HTTP client.
#[derive(Debug, Clone)]
pub struct ClobClientConfig {
    /// Base URL for the CLOB API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient errors.
    pub max_retries: u32,
    /// Base delay between retries (exponential backoff).
    pub retry_base_delay: Duration,
}

impl ClobClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(200),
        }
    }
}

/// Retrying HTTP client for the CLOB REST API.
pub struct ClobClient {
    http: Client,
    config: ClobClientConfig,
}

impl ClobClient {
    /// Create a new CLOB client.
    pub fn new(config: ClobClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    /// GET `path` with the given auth headers and parse the JSON body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        headers: AuthHeaders,
    ) -> Result<T> {
        let request = self.http.get(self.url(path));
        let response = self.execute_with_retry(request, headers, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {path}"))
    }

    /// POST a JSON body to `path` and parse the JSON response.
    pub async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &str,
        headers: AuthHeaders,
    ) -> Result<T> {
        let request = self
            .http
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body.to_string());
        let response = self.execute_with_retry(request, headers, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {path}"))
    }

    /// DELETE `path` and parse the JSON response.
    pub async fn delete_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        headers: AuthHeaders,
    ) -> Result<T> {
        let request = self.http.delete(self.url(path));
        let response = self.execute_with_retry(request, headers, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {path}"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Execute a request, retrying transient failures.
    async fn execute_with_retry(
        &self,
        request: RequestBuilder,
        headers: AuthHeaders,
        path: &str,
    ) -> Result<Response> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis(), path, "Retrying request");
                sleep(delay).await;
            }

            let mut req = request.try_clone().context("Failed to clone request")?;
            for (name, value) in &headers {
                req = req.header(*name, value);
            }

            match req.send().await {
                Ok(response) => match response.status() {
                    status if status.is_success() => return Ok(response),
                    StatusCode::TOO_MANY_REQUESTS => {
                        warn!(path, "Rate limited by CLOB API, backing off");
                        last_error = Some(anyhow::anyhow!("Rate limited"));
                        continue;
                    }
                    status if status.is_server_error() => {
                        warn!(path, status = %status, "Server error, retrying");
                        last_error = Some(anyhow::anyhow!("Server error: {status}"));
                        continue;
                    }
                    status => {
                        let body = response.text().await.unwrap_or_default();
                        return Err(anyhow::anyhow!("API error {status} on {path}: {body}"));
                    }
                },
                Err(e) => {
                    warn!(path, error = %e, attempt, "Request failed");
                    last_error = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded on {path}")))
    }
}
