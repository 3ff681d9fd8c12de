//! JSON-RPC 2.0 response envelope decoding.
//!
//! Responses are kept as raw JSON objects: the client never validates the
//! shape of `result`, and the whole envelope is handed to diagnostics as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded response envelope.
pub type RpcResponse = Map<String, Value>;

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Extract the error object from an `error` value.
    ///
    /// Extraction is lenient: a missing or non-integer `code` becomes `0`,
    /// a missing `message` becomes an empty string, and a bare string
    /// `error` is used as the message.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => Self {
                code: obj.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: obj
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                data: obj.get("data").cloned(),
            },
            Value::String(s) => Self {
                code: 0,
                message: s.clone(),
                data: None,
            },
            other => Self {
                code: 0,
                message: String::new(),
                data: Some(other.clone()),
            },
        }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// Decode a response body.
///
/// Returns `None` when the body is not JSON or its top level is not an
/// object.
pub fn decode_envelope(body: &str) -> Option<RpcResponse> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Returns `true` if the envelope carries an `error` key.
pub fn is_error_envelope(resp: &RpcResponse) -> bool {
    resp.contains_key("error")
}

/// Returns `true` if the decoded response can be handed back to the caller.
pub fn is_usable(resp: Option<&RpcResponse>) -> bool {
    resp.is_some_and(|r| !is_error_envelope(r))
}

/// The remote error carried by an error envelope.
pub fn remote_error(resp: &RpcResponse) -> Option<JsonRpcError> {
    resp.get("error").map(JsonRpcError::from_value)
}

/// Take the `result` field out of a usable envelope; `null` when absent.
pub fn into_result(mut resp: RpcResponse) -> Value {
    resp.remove("result").unwrap_or(Value::Null)
}
