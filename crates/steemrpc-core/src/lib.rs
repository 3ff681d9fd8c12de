//! steemrpc-core — request building, failover and diagnostics for steemrpc.
//!
//! # Overview
//!
//! steemrpc is a small JSON-RPC 2.0 client for Steem-style API nodes with
//! sequential failover across an ordered endpoint list. The core crate
//! defines:
//!
//! - [`ServiceClient`] — the `call(method, params)` entry point
//! - [`JsonRpcRequest`] and the [`response`] helpers — wire types
//! - [`FailoverExecutor`] — one ordered pass over the endpoints
//! - [`RpcTransport`] — the HTTP POST boundary (see `steemrpc-http`)
//! - [`DiagnosticSink`] — injected logger or console fallback
//! - [`FailurePolicy`] — propagate an error or abort the process
//! - [`ClientOptions`] / [`ClientConfig`] — construction-time configuration

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod failover;
pub mod policy;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{CallOutcome, ServiceClient};
pub use config::{ClientConfig, ClientOptions, WebserviceUrl, DEFAULT_WEBSERVICE_URL};
pub use diagnostics::{ConsoleSink, DiagnosticSink, TraceContext, TracingSink};
pub use error::{ConfigError, RemoteCallFailure, TransportError};
pub use failover::{CallReport, Execution, FailoverExecutor};
pub use policy::FailurePolicy;
pub use request::JsonRpcRequest;
pub use response::{JsonRpcError, RpcResponse};
pub use transport::{HttpReply, RpcTransport};
