//! Diagnostic trace sinks.
//!
//! The client reports its `"Request"`, `"Result"` and failure traces to a
//! [`DiagnosticSink`] chosen at construction: either a logger injected by
//! the caller or the [`ConsoleSink`] fallback. Sinks never fail.

use std::io::Write;
use std::sync::Mutex;

use serde_json::{Map, Value};

/// Key/value context attached to a trace message.
pub type TraceContext = Map<String, Value>;

/// Build a [`TraceContext`] from key/value pairs, keeping their order.
pub fn trace_context<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> TraceContext {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Receives debug-severity trace messages.
pub trait DiagnosticSink: Send + Sync {
    fn debug(&self, message: &str, context: &TraceContext);
}

/// Development fallback: prints the message followed by a raw dump of each
/// context entry to a text stream.
///
/// Not meant to be parsed.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// A sink writing to `out`.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    fn write_all(out: &mut (dyn Write + Send), message: &str, context: &TraceContext) -> std::io::Result<()> {
        writeln!(out, "{message} ")?;
        for (key, value) in context {
            let dump = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            writeln!(out, "{key} => {dump}")?;
        }
        out.flush()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl DiagnosticSink for ConsoleSink {
    fn debug(&self, message: &str, context: &TraceContext) {
        // A poisoned lock only means an earlier writer panicked mid-line.
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = Self::write_all(&mut **out, message, context);
    }
}

/// Forwards traces to `tracing` at debug level, with the context rendered
/// as a JSON field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, message: &str, context: &TraceContext) {
        let context = Value::Object(context.clone());
        tracing::debug!(%context, "{message}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    /// Clonable in-memory writer for inspecting console output.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Records every trace it receives.
    #[derive(Default)]
    pub(crate) struct RecordingSink(pub Mutex<Vec<(String, TraceContext)>>);

    impl RecordingSink {
        pub(crate) fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
        }

        pub(crate) fn context_of(&self, message: &str) -> Option<TraceContext> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .find(|(m, _)| m == message)
                .map(|(_, c)| c.clone())
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn debug(&self, message: &str, context: &TraceContext) {
            self.0.lock().unwrap().push((message.to_string(), context.clone()));
        }
    }

    #[test]
    fn console_dumps_message_then_each_entry() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(buf.clone());
        sink.debug(
            "We got no response...",
            &trace_context([
                ("method", json!("condenser_api.get_block")),
                ("params", json!([7])),
            ]),
        );

        let out = buf.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "We got no response... ");
        assert_eq!(lines[1], r#"method => "condenser_api.get_block""#);
        assert!(lines[2].starts_with("params => ["));
        assert!(out.contains('7'));
    }

    #[test]
    fn console_with_empty_context_prints_only_message() {
        let buf = SharedBuf::default();
        ConsoleSink::new(buf.clone()).debug("Result", &TraceContext::new());
        assert_eq!(buf.contents(), "Result \n");
    }

    #[test]
    fn trace_context_keeps_insertion_order() {
        let ctx = trace_context([("method", json!("m")), ("params", json!([])), ("response", json!({}))]);
        let keys: Vec<&str> = ctx.keys().map(String::as_str).collect();
        assert_eq!(keys, ["method", "params", "response"]);
    }

    #[test]
    fn tracing_sink_reaches_crate_filter() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("steemrpc_core=debug"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.debug(
                "Error response",
                &trace_context([("code", json!(500)), ("response", json!({ "error": { "message": "boom" } }))]),
            );
        });

        let out = buf.contents();
        assert!(out.contains("DEBUG"));
        assert!(out.contains("steemrpc_core::diagnostics"));
        assert!(out.contains("Error response"));
        assert!(out.contains("boom"));
    }

    #[test]
    fn tracing_sink_never_panics_without_subscriber() {
        TracingSink.debug("Request", &trace_context([("request", json!({ "id": 1 }))]));
    }
}
