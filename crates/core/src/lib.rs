//! Core types for qtrace
//!
//! This crate defines the canonical data structures shared by the metrics
//! accumulators, the wire writers and the diagnostics facade:
//!
//! - [`TraceNode`] / [`TraceBuilder`]: the execution trace tree
//! - [`TraceDatum`]: typed payloads attached to trace nodes
//! - [`BackendMetrics`] and its nested timing bundles
//! - [`IndexUtilizationInfo`]: index usage reports
//! - [`Error`]: the core error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datum;
pub mod error;
pub mod index_utilization;
pub mod metrics;
pub mod trace;

pub use datum::{
    ClientSideRequestStatisticsDatum, QueryMetricsDatum, StatusCode, StoreResponseStatistics,
    StoreResult, TraceDatum, CLIENT_STATS_KEY, QUERY_METRICS_KEY,
};
pub use error::{Error, Result};
pub use index_utilization::{
    CompositeIndexUtilizationEntity, IndexUtilizationInfo, SingleIndexUtilizationEntity,
};
pub use metrics::{BackendMetrics, QueryPreparationTimes, RuntimeExecutionTimes};
pub use trace::{
    Children, ContactedEndpoint, TraceBuilder, TraceComponent, TraceId, TraceLevel, TraceNode,
    TraceSummary,
};
