//! Error types for the transport boundary, configuration and call outcomes.

use thiserror::Error;

use crate::response::JsonRpcError;

/// Errors raised by an [`RpcTransport`](crate::transport::RpcTransport)
/// while posting a request to a single endpoint.
///
/// The failover executor treats every variant the same way: the attempt
/// produced nothing decodable and the next endpoint is tried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, DNS, TLS, body read, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

/// Construction-time configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The endpoint list is empty.
    #[error("at least one webservice url is required")]
    NoEndpoints,

    /// An endpoint is blank or not an http(s) URL.
    #[error("invalid webservice url: {0:?}")]
    InvalidEndpoint(String),

    /// The options file could not be read.
    #[error("failed to read options from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The options document is not valid JSON for [`ClientOptions`](crate::config::ClientOptions).
    #[error("failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The single error a [`ServiceClient`](crate::client::ServiceClient) call
/// raises under [`FailurePolicy::Propagate`](crate::policy::FailurePolicy).
///
/// `Display` renders only the human-readable message: the method name when
/// nothing decodable came back, the remote `error.message` otherwise.
#[derive(Debug, Error)]
pub enum RemoteCallFailure {
    /// No endpoint produced a decodable JSON object.
    #[error("{method}")]
    NoResponse { method: String },

    /// The last attempted endpoint answered with an error envelope.
    #[error("{}", .0.message)]
    Remote(JsonRpcError),
}

impl RemoteCallFailure {
    /// The human-readable message carried by this failure.
    pub fn message(&self) -> &str {
        match self {
            Self::NoResponse { method } => method,
            Self::Remote(err) => &err.message,
        }
    }

    /// Returns `true` if no endpoint returned anything decodable.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse { .. })
    }

    /// The remote error object, if the failure came from an error envelope.
    pub fn remote_error(&self) -> Option<&JsonRpcError> {
        match self {
            Self::Remote(err) => Some(err),
            Self::NoResponse { .. } => None,
        }
    }
}
