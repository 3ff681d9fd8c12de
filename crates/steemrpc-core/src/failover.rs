//! Sequential endpoint failover.
//!
//! One pass over the configured endpoints, in order, one POST each. The
//! first endpoint whose body decodes to a JSON object without an `error`
//! key wins. If none does, the last attempt's decoded body (possibly an
//! error envelope, possibly nothing) is the outcome; failures are not
//! aggregated across endpoints.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::diagnostics::trace_context;
use crate::response::{decode_envelope, is_error_envelope, is_usable, RpcResponse};
use crate::transport::RpcTransport;

/// Per-call diagnostics, returned alongside the decoded response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallReport {
    /// HTTP status of the last attempt; `None` if the transport failed
    /// before a status was read.
    pub status: Option<u16>,
    /// Endpoint that produced the final response.
    pub endpoint: Option<String>,
    /// Number of endpoints attempted.
    pub attempts: usize,
}

/// Result of one pass over the endpoint list.
#[derive(Debug, Clone)]
pub struct Execution {
    /// Decoded body of the winning (or last) attempt.
    pub response: Option<RpcResponse>,
    pub report: CallReport,
}

impl Execution {
    /// Returns `true` if a decoded object without an `error` key was found.
    pub fn is_usable(&self) -> bool {
        is_usable(self.response.as_ref())
    }
}

/// Sends a serialized request to each endpoint in turn until one answers
/// with a usable envelope.
pub struct FailoverExecutor {
    transport: Arc<dyn RpcTransport>,
    config: ClientConfig,
}

impl FailoverExecutor {
    pub fn new(transport: Arc<dyn RpcTransport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Run one failover pass for the serialized request `body`.
    pub async fn execute(&self, body: &str) -> Execution {
        let mut response = None;
        let mut report = CallReport::default();

        for url in self.config.endpoints() {
            report.attempts += 1;
            report.endpoint = Some(url.clone());

            response = match self.transport.post(url, body).await {
                Ok(reply) => {
                    report.status = Some(reply.status);
                    decode_envelope(&reply.body)
                }
                Err(e) => {
                    report.status = None;
                    tracing::warn!(
                        url = %url,
                        transport = self.transport.name(),
                        error = %e,
                        "transport failed"
                    );
                    None
                }
            };

            match &response {
                Some(resp) if !is_error_envelope(resp) => {
                    tracing::debug!(
                        url = %url,
                        status = ?report.status,
                        attempt = report.attempts,
                        "usable response"
                    );
                    break;
                }
                Some(_) => {
                    tracing::warn!(
                        url = %url,
                        status = ?report.status,
                        attempt = report.attempts,
                        "error envelope, trying next endpoint"
                    );
                }
                None => {
                    tracing::warn!(
                        url = %url,
                        status = ?report.status,
                        attempt = report.attempts,
                        "no decodable response, trying next endpoint"
                    );
                }
            }
        }

        if self.config.debug() {
            let traced = response.clone().map(Value::Object).unwrap_or(Value::Null);
            self.config
                .sink()
                .debug("Result", &trace_context([("response", traced)]));
        }

        Execution { response, report }
    }
}
