//! Query metrics aggregation for qtrace
//!
//! This crate walks a trace tree and folds the backend metrics it finds:
//!
//! - [`QueryPreparationTimesAccumulator`] / [`RuntimeExecutionTimesAccumulator`]:
//!   component-wise timing sums
//! - [`BackendMetricsAccumulator`]: sums plus the weighted index hit ratio
//! - [`IndexUtilizationAccumulator`]: lazy concatenation of index reports
//! - [`walker`]: depth-first walks for metrics and for relocation statuses
//! - [`ServerSideMetricsAccumulator`]: grand total plus per-partition breakdown
//!
//! Accumulators are transient: create one per aggregation, fold, take the
//! result, drop it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod index_utilization;
pub mod preparation;
pub mod runtime;
pub mod server_side;
pub mod walker;

pub use backend::BackendMetricsAccumulator;
pub use index_utilization::IndexUtilizationAccumulator;
pub use preparation::QueryPreparationTimesAccumulator;
pub use runtime::RuntimeExecutionTimesAccumulator;
pub use server_side::{
    collect_server_side_metrics, PartitionedServerSideMetrics, ServerSideAccumulatedMetrics,
    ServerSideMetrics, ServerSideMetricsAccumulator,
};
pub use walker::{
    find_relocation, is_gone_exception_hit, walk_for_query_metrics, RelocationSignal, WalkStats,
};
