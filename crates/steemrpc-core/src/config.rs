//! Client configuration.
//!
//! [`ClientOptions`] is the serializable option set recognised at
//! construction (`debug`, `webservice_url`, `throw_exception`);
//! [`ClientConfig`] is the validated, immutable form a client holds.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{ConsoleSink, DiagnosticSink};
use crate::error::ConfigError;
use crate::policy::FailurePolicy;

/// Endpoint used when no `webservice_url` is given.
pub const DEFAULT_WEBSERVICE_URL: &str = "https://api.steemit.com";

/// One URL or an ordered failover list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebserviceUrl {
    One(String),
    Many(Vec<String>),
}

impl WebserviceUrl {
    /// Normalize to an ordered list.
    pub fn into_endpoints(self) -> Vec<String> {
        match self {
            Self::One(url) => vec![url],
            Self::Many(urls) => urls,
        }
    }
}

impl Default for WebserviceUrl {
    fn default() -> Self {
        Self::One(DEFAULT_WEBSERVICE_URL.to_string())
    }
}

impl From<&str> for WebserviceUrl {
    fn from(url: &str) -> Self {
        Self::One(url.to_string())
    }
}

impl From<String> for WebserviceUrl {
    fn from(url: String) -> Self {
        Self::One(url)
    }
}

impl From<Vec<String>> for WebserviceUrl {
    fn from(urls: Vec<String>) -> Self {
        Self::Many(urls)
    }
}

/// Construction-time options, as they appear in a JSON options document.
///
/// Unknown keys are ignored. The logger is never part of this document;
/// inject one with [`ClientConfig::with_sink`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Enables `"Request"` / `"Result"` / `"Error response"` traces.
    pub debug: bool,
    /// Ordered failover endpoint list.
    pub webservice_url: WebserviceUrl,
    /// `true` propagates failures as errors; `false` aborts the process.
    pub throw_exception: bool,
}

impl ClientOptions {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Validated client configuration. Immutable once built.
#[derive(Clone)]
pub struct ClientConfig {
    endpoints: Vec<String>,
    debug: bool,
    failure_policy: FailurePolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl ClientConfig {
    /// Build a configuration for `urls` with debug off, the
    /// [`FailurePolicy::Propagate`] policy and the console sink.
    pub fn new(urls: impl Into<WebserviceUrl>) -> Result<Self, ConfigError> {
        let endpoints = validate_endpoints(urls.into().into_endpoints())?;
        Ok(Self {
            endpoints,
            debug: false,
            failure_policy: FailurePolicy::Propagate,
            sink: Arc::new(ConsoleSink::stdout()),
        })
    }

    /// Build from an options document, keeping its defaults
    /// (`throw_exception = false` selects [`FailurePolicy::Abort`]).
    pub fn from_options(options: ClientOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(options.webservice_url)?
            .with_debug(options.debug)
            .with_failure_policy(FailurePolicy::from_throw_exception(options.throw_exception)))
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Inject a logger; replaces the console fallback.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoints", &self.endpoints)
            .field("debug", &self.debug)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

fn validate_endpoints(endpoints: Vec<String>) -> Result<Vec<String>, ConfigError> {
    if endpoints.is_empty() {
        return Err(ConfigError::NoEndpoints);
    }
    endpoints
        .into_iter()
        .map(|url| {
            let trimmed = url.trim();
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                Ok(trimmed.to_string())
            } else {
                Err(ConfigError::InvalidEndpoint(url))
            }
        })
        .collect()
}
