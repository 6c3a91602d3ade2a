//! Diagnostics facade over a completed trace tree.
//!
//! [`TraceDiagnostics`] is the public entry point: it is built from any node
//! of a trace, normalizes to the root, and answers summary questions about
//! the operation. Aggregated query metrics are computed on first request and
//! memoized.

use crate::error::{Error, Result};
use crate::options::DiagnosticsOptions;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use qtrace_core::{ContactedEndpoint, TraceNode};
use qtrace_metrics::{collect_server_side_metrics, find_relocation, ServerSideAccumulatedMetrics};
use qtrace_wire::{JsonTraceWriter, SerializationFormat, TraceWriter};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The tree-walk step that turns a root node into aggregated metrics.
pub type MetricsCollector = dyn Fn(&TraceNode) -> qtrace_core::Result<Option<ServerSideAccumulatedMetrics>>
    + Send
    + Sync;

/// Read-only view of an operation's diagnostics.
///
/// Implemented by [`TraceDiagnostics`]; other diagnostics sources can
/// implement it without sharing its internals.
pub trait Diagnostics: Send + Sync {
    /// Wall-clock time of the whole operation.
    fn client_elapsed_time(&self) -> Duration;

    /// Regions and endpoints contacted, or `None` if no summary was computed.
    fn contacted_regions(&self) -> Option<&[ContactedEndpoint]>;

    /// Aggregated backend metrics, or `None` if the trace carries none.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a query metrics datum in the tree has no backend
    /// metrics payload.
    fn query_metrics(&self) -> Result<Option<Arc<ServerSideAccumulatedMetrics>>>;

    /// When the operation started, if recorded.
    fn start_time(&self) -> Option<DateTime<Utc>>;

    /// Failed replica requests; `0` when no summary was computed.
    fn failed_request_count(&self) -> u32;
}

/// Diagnostics backed by a trace tree.
///
/// # Example
///
/// ```
/// use qtrace::{Diagnostics, TraceDiagnostics};
/// use qtrace_core::TraceBuilder;
/// use std::time::Duration;
///
/// let trace = TraceBuilder::new("ExecuteQuery")
///     .duration(Duration::from_millis(40))
///     .child(TraceBuilder::new("Page 1"))
///     .build();
///
/// // Any node works; the facade normalizes to the root.
/// let page = trace.child(0).unwrap();
/// let diagnostics = TraceDiagnostics::new(page);
/// assert_eq!(diagnostics.client_elapsed_time(), Duration::from_millis(40));
/// assert_eq!(diagnostics.failed_request_count(), 0);
/// assert!(diagnostics.query_metrics().unwrap().is_none());
/// ```
pub struct TraceDiagnostics {
    trace: TraceNode,
    options: DiagnosticsOptions,
    writer: Arc<dyn TraceWriter>,
    collector: Box<MetricsCollector>,
    accumulated: OnceCell<Arc<ServerSideAccumulatedMetrics>>,
}

impl TraceDiagnostics {
    /// Diagnostics over the tree containing `trace`, with default options.
    pub fn new(trace: TraceNode) -> Self {
        Self::with_options(trace, DiagnosticsOptions::default())
    }

    /// Diagnostics over the tree containing `trace`.
    pub fn with_options(trace: TraceNode, options: DiagnosticsOptions) -> Self {
        Self {
            trace: trace.root(),
            options,
            writer: Arc::new(JsonTraceWriter),
            collector: Box::new(collect_server_side_metrics),
            accumulated: OnceCell::new(),
        }
    }

    /// Replace the writer used by [`serialize`](Self::serialize) and
    /// [`write_trace`](Self::write_trace).
    pub fn with_writer(mut self, writer: impl TraceWriter + 'static) -> Self {
        self.writer = Arc::new(writer);
        self
    }

    /// Replace the metrics tree walk.
    pub fn with_collector<F>(mut self, collector: F) -> Self
    where
        F: Fn(&TraceNode) -> qtrace_core::Result<Option<ServerSideAccumulatedMetrics>>
            + Send
            + Sync
            + 'static,
    {
        self.collector = Box::new(collector);
        self
    }

    /// The root of the trace tree.
    pub fn trace(&self) -> &TraceNode {
        &self.trace
    }

    /// Options in effect.
    pub fn options(&self) -> &DiagnosticsOptions {
        &self.options
    }

    /// Whether any replica reported the configured relocation status.
    ///
    /// Scans the tree on every call.
    pub fn is_gone_exception_hit(&self) -> bool {
        find_relocation(&self.trace, &self.options.relocation_signal()).is_some()
    }

    /// Write the whole tree in `format`.
    pub fn write_trace(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        Ok(self.writer.write_trace(&self.trace, format)?)
    }

    /// Write the whole tree in the configured default format.
    pub fn write_trace_default(&self) -> Result<Vec<u8>> {
        self.write_trace(self.options.format)
    }

    /// The whole tree as JSON text.
    ///
    /// # Errors
    ///
    /// Propagates writer failures; `Encoding` if the writer output is not
    /// valid UTF-8.
    pub fn serialize(&self) -> Result<String> {
        let bytes = self.write_trace(SerializationFormat::Text)?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Diagnostics for TraceDiagnostics {
    fn client_elapsed_time(&self) -> Duration {
        self.trace.duration()
    }

    fn contacted_regions(&self) -> Option<&[ContactedEndpoint]> {
        self.trace
            .summary()
            .map(|summary| summary.regions_contacted.as_slice())
    }

    fn query_metrics(&self) -> Result<Option<Arc<ServerSideAccumulatedMetrics>>> {
        if let Some(cached) = self.accumulated.get() {
            debug!(trace = %self.trace.id(), "serving cached query metrics");
            return Ok(Some(Arc::clone(cached)));
        }

        let Some(computed) = (self.collector)(&self.trace)? else {
            debug!(trace = %self.trace.id(), "trace carries no query metrics");
            return Ok(None);
        };

        debug!(
            trace = %self.trace.id(),
            partitions = computed.partitioned_metrics.len(),
            "computed query metrics"
        );
        // A racing caller may have stored first; its value is equivalent.
        let _ = self.accumulated.set(Arc::new(computed));
        self.accumulated
            .get()
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::Internal("query metrics cache empty after store".into()))
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.trace.start_time()
    }

    fn failed_request_count(&self) -> u32 {
        self.trace
            .summary()
            .map_or(0, |summary| summary.failed_request_count)
    }
}

impl TryFrom<Option<TraceNode>> for TraceDiagnostics {
    type Error = Error;

    fn try_from(trace: Option<TraceNode>) -> Result<Self> {
        trace
            .map(TraceDiagnostics::new)
            .ok_or_else(|| qtrace_core::Error::invalid_argument("trace").into())
    }
}

impl From<TraceNode> for TraceDiagnostics {
    fn from(trace: TraceNode) -> Self {
        TraceDiagnostics::new(trace)
    }
}

impl fmt::Display for TraceDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.serialize().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for TraceDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceDiagnostics")
            .field("trace", &self.trace.id())
            .field("options", &self.options)
            .field("metrics_cached", &self.accumulated.get().is_some())
            .finish()
    }
}
