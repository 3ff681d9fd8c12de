//! The `RpcTransport` trait — the HTTP POST boundary of the client.

use async_trait::async_trait;

use crate::error::TransportError;

/// Raw reply to a POST: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a serialized request to one endpoint.
///
/// A non-2xx status is not an error here: the body is returned and decoded
/// like any other, since nodes may wrap JSON-RPC error envelopes in 5xx
/// replies.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// POST `body` to `url` and return the status and body text.
    async fn post(&self, url: &str, body: &str) -> Result<HttpReply, TransportError>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}
