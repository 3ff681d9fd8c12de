//! `ServiceClient` — the `call(method, params)` entry point.
//!
//! ```text
//! call → build_request → FailoverExecutor::execute → resolve → result
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::diagnostics::trace_context;
use crate::error::RemoteCallFailure;
use crate::failover::{CallReport, FailoverExecutor};
use crate::policy::{FailurePolicy, ABORT_EXIT_CODE};
use crate::request::{build_request, JsonRpcRequest};
use crate::response::{into_result, is_error_envelope, JsonRpcError, RpcResponse};
use crate::transport::RpcTransport;

/// The `result` of a successful call together with its diagnostics.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub result: Value,
    pub report: CallReport,
}

/// JSON-RPC client with sequential endpoint failover.
///
/// Holds only immutable configuration; per-call diagnostics are returned
/// by [`call_with_report`](Self::call_with_report), so a client can be
/// shared behind an `Arc`.
pub struct ServiceClient {
    executor: FailoverExecutor,
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn RpcTransport>, config: ClientConfig) -> Self {
        Self {
            executor: FailoverExecutor::new(transport, config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// Build and serialize the request envelope, tracing it in debug mode.
    pub fn build_request(&self, method: &str, params: Option<Value>) -> String {
        let request = build_request(method, params);
        self.trace_request(&request);
        request.encode()
    }

    /// Run one failover pass for an already serialized request and return
    /// the decoded final response, if any.
    pub async fn send_raw(&self, body: &str) -> (Option<RpcResponse>, CallReport) {
        let exec = self.executor.execute(body).await;
        (exec.response, exec.report)
    }

    /// Call `method` and return its `result`.
    ///
    /// Under [`FailurePolicy::Abort`] an unusable final response terminates
    /// the process instead of returning.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, RemoteCallFailure> {
        self.call_with_report(method, params).await.map(|o| o.result)
    }

    /// Like [`call`](Self::call), also returning the per-call report.
    pub async fn call_with_report(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<CallOutcome, RemoteCallFailure> {
        let request = build_request(method, params);
        self.trace_request(&request);

        let exec = self.executor.execute(&request.encode()).await;
        let report = exec.report;

        match self.resolve(&request, exec.response, &report) {
            Ok(result) => Ok(CallOutcome { result, report }),
            Err(failure) => match self.config().failure_policy() {
                FailurePolicy::Propagate => Err(failure),
                FailurePolicy::Abort => {
                    tracing::error!(method, error = %failure, "aborting after failed call");
                    std::process::exit(ABORT_EXIT_CODE)
                }
            },
        }
    }

    /// Map the final decoded response onto the caller's outcome, emitting
    /// the policy-specific failure traces.
    fn resolve(
        &self,
        request: &JsonRpcRequest,
        response: Option<RpcResponse>,
        report: &CallReport,
    ) -> Result<Value, RemoteCallFailure> {
        let config = self.config();
        let sink = config.sink();
        let abort = config.failure_policy().is_abort();

        match response {
            Some(resp) if !is_error_envelope(&resp) => Ok(into_result(resp)),
            None => {
                if abort {
                    sink.debug(
                        "We got no response...",
                        &trace_context([
                            ("method", Value::String(request.method.clone())),
                            ("params", request.params.clone()),
                        ]),
                    );
                }
                Err(RemoteCallFailure::NoResponse {
                    method: request.method.clone(),
                })
            }
            Some(resp) => {
                let err = JsonRpcError::from_value(resp.get("error").unwrap_or(&Value::Null));
                if abort {
                    sink.debug(
                        "We got an error response..",
                        &trace_context([
                            ("method", Value::String(request.method.clone())),
                            ("params", request.params.clone()),
                            ("response", Value::Object(resp)),
                        ]),
                    );
                } else if config.debug() {
                    sink.debug(
                        "Error response",
                        &trace_context([
                            ("code", report.status.map(Value::from).unwrap_or(Value::Null)),
                            ("response", Value::Object(resp)),
                        ]),
                    );
                }
                Err(RemoteCallFailure::Remote(err))
            }
        }
    }

    fn trace_request(&self, request: &JsonRpcRequest) {
        if self.config().debug() {
            self.config()
                .sink()
                .debug("Request", &trace_context([("request", request.to_value())]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::tests::{RecordingSink, SharedBuf};
    use crate::diagnostics::ConsoleSink;
    use crate::failover::tests::MockTransport;
    use serde_json::json;

    const A: &str = "https://a.example";
    const B: &str = "https://b.example";

    fn client(t: MockTransport, urls: &[&str], sink: Arc<RecordingSink>, debug: bool) -> ServiceClient {
        let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
        let cfg = ClientConfig::new(urls)
            .unwrap()
            .with_debug(debug)
            .with_sink(sink);
        ServiceClient::new(Arc::new(t), cfg)
    }

    fn err_body(message: &str) -> String {
        json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32000, "message": message } })
            .to_string()
    }

    #[tokio::test]
    async fn returns_result_field_only() {
        for debug in [false, true] {
            let t = MockTransport::default().reply(A, 200, r#"{"result": 42}"#);
            let c = client(t, &[A], Arc::new(RecordingSink::default()), debug);
            assert_eq!(c.call("condenser_api.get_block", None).await.unwrap(), json!(42));
        }
    }

    #[tokio::test]
    async fn failover_hides_earlier_error() {
        let t = MockTransport::default()
            .reply(A, 200, &err_body("from a"))
            .reply(B, 200, r#"{"jsonrpc":"2.0","id":1,"result":{"head_block_number":1}}"#);
        let sink = Arc::new(RecordingSink::default());
        let c = client(t, &[A, B], sink.clone(), true);

        let outcome = c
            .call_with_report("condenser_api.get_dynamic_global_properties", None)
            .await
            .unwrap();
        assert_eq!(outcome.result, json!({ "head_block_number": 1 }));
        assert_eq!(outcome.report.endpoint.as_deref(), Some(B));
        assert_eq!(outcome.report.attempts, 2);
        assert_eq!(sink.messages(), ["Request", "Result"]);
    }

    #[tokio::test]
    async fn all_errors_report_last_message() {
        let t = MockTransport::default()
            .reply(A, 200, &err_body("from a"))
            .reply(B, 503, &err_body("from b"));
        let sink = Arc::new(RecordingSink::default());
        let c = client(t, &[A, B], sink.clone(), true);

        let err = c.call("condenser_api.get_accounts", Some(json!([["x"]]))).await.unwrap_err();
        assert_eq!(err.to_string(), "from b");
        assert_eq!(err.remote_error().unwrap().code, -32000);

        assert_eq!(sink.messages(), ["Request", "Result", "Error response"]);
        let ctx = sink.context_of("Error response").unwrap();
        assert_eq!(ctx["code"], json!(503));
        assert_eq!(ctx["response"]["error"]["message"], json!("from b"));
    }

    #[tokio::test]
    async fn no_response_reports_method_name() {
        let t = MockTransport::default().reply(A, 200, "not json");
        let c = client(t, &[A], Arc::new(RecordingSink::default()), false);

        let err = c.call("condenser_api.get_config", None).await.unwrap_err();
        assert!(err.is_no_response());
        assert_eq!(err.to_string(), "condenser_api.get_config");
    }

    #[tokio::test]
    async fn propagate_without_debug_is_silent() {
        let t = MockTransport::default().reply(A, 200, &err_body("nope"));
        let sink = Arc::new(RecordingSink::default());
        let c = client(t, &[A], sink.clone(), false);

        assert!(c.call("m", None).await.is_err());
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn request_trace_carries_envelope() {
        let t = MockTransport::default().reply(A, 200, r#"{"result":[]}"#);
        let sink = Arc::new(RecordingSink::default());
        let c = client(t, &[A], sink.clone(), true);

        c.call("condenser_api.get_block", Some(json!([8675309]))).await.unwrap();
        let ctx = sink.context_of("Request").unwrap();
        assert_eq!(
            ctx["request"],
            json!({ "jsonrpc": "2.0", "method": "condenser_api.get_block", "params": [8675309], "id": 1 })
        );
        assert_eq!(sink.context_of("Result").unwrap()["response"], json!({ "result": [] }));
    }

    #[tokio::test]
    async fn console_fallback_mentions_request_and_result() {
        let buf = SharedBuf::default();
        let cfg = ClientConfig::new(A)
            .unwrap()
            .with_debug(true)
            .with_sink(Arc::new(ConsoleSink::new(buf.clone())));
        let c = ServiceClient::new(
            Arc::new(MockTransport::default().reply(A, 200, r#"{"result":42}"#)),
            cfg,
        );

        assert_eq!(c.call("m", None).await.unwrap(), json!(42));
        let out = buf.contents();
        assert!(!out.is_empty());
        assert!(out.contains("Request"));
        assert!(out.contains("Result"));
    }

    #[test]
    fn build_request_is_deterministic() {
        let c = client(MockTransport::default(), &[A], Arc::new(RecordingSink::default()), false);
        let params = Some(json!({ "tag": "steem", "limit": 20 }));
        assert_eq!(
            c.build_request("condenser_api.get_discussions_by_trending", params.clone()),
            c.build_request("condenser_api.get_discussions_by_trending", params)
        );
    }

    #[tokio::test]
    async fn send_raw_exposes_final_envelope() {
        let t = MockTransport::default().reply(A, 500, &err_body("boom"));
        let c = client(t, &[A], Arc::new(RecordingSink::default()), false);
        let body = c.build_request("m", None);

        let (resp, report) = c.send_raw(&body).await;
        assert!(is_error_envelope(resp.as_ref().unwrap()));
        assert_eq!(report.status, Some(500));
    }
}
