//! steemrpc-http — `reqwest` transport for the steemrpc failover client.
//!
//! ```rust,no_run
//! use steemrpc_core::ClientOptions;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = steemrpc_http::connect(ClientOptions {
//!     throw_exception: true,
//!     ..Default::default()
//! })?;
//! let props = client
//!     .call("condenser_api.get_dynamic_global_properties", Some(json!([])))
//!     .await?;
//! println!("{props}");
//! # Ok(())
//! # }
//! ```

pub mod client;

use std::sync::Arc;

use steemrpc_core::{ClientConfig, ClientOptions, ConfigError, ServiceClient, TransportError};

pub use client::{HttpTransportConfig, ReqwestTransport};

/// Errors from building a ready-to-use client.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Build a `ServiceClient` over the default `ReqwestTransport`.
pub fn connect(options: ClientOptions) -> Result<ServiceClient, ConnectError> {
    connect_config(ClientConfig::from_options(options)?)
}

/// Build a `ServiceClient` from an already validated configuration.
pub fn connect_config(config: ClientConfig) -> Result<ServiceClient, ConnectError> {
    connect_with(config, HttpTransportConfig::default())
}

/// Build a `ServiceClient` with explicit transport settings.
pub fn connect_with(
    config: ClientConfig,
    transport: HttpTransportConfig,
) -> Result<ServiceClient, ConnectError> {
    let transport = Arc::new(ReqwestTransport::new(transport)?);
    Ok(ServiceClient::new(transport, config))
}
