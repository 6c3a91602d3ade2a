//! # qtrace
//!
//! Query telemetry aggregation over distributed execution traces.
//!
//! A single logical query fans out to many partitions and replicas. Each
//! sub-operation records a node in a trace tree, and the nodes that reached
//! the backend carry a snapshot of its query metrics. qtrace turns such a
//! tree into answers:
//!
//! - aggregated backend metrics, in total and per partition
//! - whether any replica reported a partition relocation
//! - operation-wide summary values (elapsed time, contacted regions, failures)
//! - a portable text or binary rendition of the whole tree
//!
//! ## Quick Start
//!
//! ```
//! use qtrace::prelude::*;
//! use std::time::Duration;
//!
//! let backend = BackendMetrics {
//!     retrieved_document_count: 10,
//!     output_document_count: 10,
//!     index_hit_ratio: 1.0,
//!     ..BackendMetrics::EMPTY
//! };
//! let trace = TraceBuilder::new("ExecuteQuery")
//!     .duration(Duration::from_millis(12))
//!     .child(TraceBuilder::new("Page 1").datum(QUERY_METRICS_KEY, QueryMetricsDatum::new(backend)))
//!     .build();
//!
//! let diagnostics = TraceDiagnostics::new(trace);
//! let metrics = diagnostics.query_metrics()?.expect("trace carries metrics");
//! assert_eq!(metrics.cumulative_metrics.retrieved_document_count, 10);
//! assert!(!diagnostics.is_gone_exception_hit());
//! # Ok::<(), qtrace::Error>(())
//! ```
//!
//! ## Crates
//!
//! - [`qtrace_core`]: trace tree, datum kinds, metrics value types
//! - [`qtrace_metrics`]: accumulators and tree walks
//! - [`qtrace_wire`]: JSON and MessagePack trace writers

#![warn(missing_docs)]

mod diagnostics;
mod error;
mod options;

pub mod prelude;

// Re-export main entry points
pub use diagnostics::{Diagnostics, MetricsCollector, TraceDiagnostics};
pub use error::{Error, Result};
pub use options::DiagnosticsOptions;

// Re-export result and writer types
pub use qtrace_metrics::{
    PartitionedServerSideMetrics, ServerSideAccumulatedMetrics, ServerSideMetrics,
};
pub use qtrace_wire::{JsonTraceWriter, SerializationFormat, TraceWriter};
