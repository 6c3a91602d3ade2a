//! Convenient imports for qtrace.
//!
//! This module re-exports the most commonly used types so a caller can build
//! a trace and inspect it with a single import:
//!
//! ```
//! use qtrace::prelude::*;
//!
//! let diagnostics = TraceDiagnostics::new(TraceBuilder::new("ReadItem").build());
//! assert_eq!(diagnostics.failed_request_count(), 0);
//! ```

// Main entry point
pub use crate::diagnostics::{Diagnostics, TraceDiagnostics};
pub use crate::options::DiagnosticsOptions;

// Error handling
pub use crate::error::{Error, Result};

// Trace model
pub use qtrace_core::{
    ContactedEndpoint, StatusCode, TraceBuilder, TraceComponent, TraceLevel, TraceNode,
    TraceSummary,
};

// Datum kinds
pub use qtrace_core::{
    ClientSideRequestStatisticsDatum, QueryMetricsDatum, StoreResponseStatistics, StoreResult,
    TraceDatum, CLIENT_STATS_KEY, QUERY_METRICS_KEY,
};

// Metrics
pub use qtrace_core::{BackendMetrics, IndexUtilizationInfo};
pub use qtrace_metrics::{PartitionedServerSideMetrics, ServerSideAccumulatedMetrics};

// Writers
pub use qtrace_wire::SerializationFormat;
