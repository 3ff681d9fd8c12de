//! HTTP POST transport backed by `reqwest`.
//!
//! One POST per call, no retries: failover across endpoints is handled by
//! the core executor. Non-2xx replies are returned with their body so that
//! error envelopes wrapped in 5xx statuses are still decoded.

use std::time::Duration;

use async_trait::async_trait;

use steemrpc_core::error::TransportError;
use steemrpc_core::transport::{HttpReply, RpcTransport};

/// Configuration for `ReqwestTransport`.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Timeout for a single POST, connect through body read.
    pub request_timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("steemrpc/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `RpcTransport` over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    request_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build reqwest client: {e}")))?;

        Ok(Self {
            http,
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(HttpTransportConfig::default())
    }

    fn map_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: timeout_ms(self.request_timeout),
            }
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

/// Milliseconds in `d`, saturating at `u64::MAX`.
fn timeout_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl RpcTransport for ReqwestTransport {
    async fn post(&self, url: &str, body: &str) -> Result<HttpReply, TransportError> {
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            tracing::debug!(url, status, "non-success HTTP status");
        }

        let body = resp.text().await.map_err(|e| self.map_error(e))?;
        Ok(HttpReply { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
