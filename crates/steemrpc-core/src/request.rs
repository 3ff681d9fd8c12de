//! JSON-RPC 2.0 request envelope and builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version tag sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// The fixed request id. Only one call is in flight at a time, so
/// responses are never correlated by id.
pub const REQUEST_ID: u64 = 1;

/// A JSON-RPC 2.0 request.
///
/// Field order is the wire order: `jsonrpc`, `method`, `params`, `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    /// Create a new request with the fixed id.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id: REQUEST_ID,
        }
    }

    /// Serialize the envelope to its JSON text.
    pub fn encode(&self) -> String {
        // A struct of strings, an integer and a `Value` always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The envelope as a JSON value, used as trace context.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Params used when the caller passes none: an empty positional list.
pub fn empty_params() -> Value {
    Value::Array(Vec::new())
}

/// Build the request envelope for `method` with `params`.
///
/// `None` params become an empty array.
pub fn build_request(method: impl Into<String>, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest::new(method, params.unwrap_or_else(empty_params))
}
