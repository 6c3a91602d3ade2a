//! Backend metrics accumulator
//!
//! Folds per-call [`BackendMetrics`] snapshots into one aggregate. Every
//! count and duration is a plain sum. The index hit ratio is folded as a
//! running weighted value:
//!
//! ```text
//! ratio' = (output * ratio + next.output * next.ratio) / (retrieved + next.retrieved)
//! ```
//!
//! `output` and `retrieved` are the running totals *before* `next` is added.
//! When the denominator is zero (nothing retrieved so far, including `next`)
//! the ratio is defined as `0.0`.

use crate::preparation::QueryPreparationTimesAccumulator;
use crate::runtime::RuntimeExecutionTimesAccumulator;
use qtrace_core::{BackendMetrics, Error, Result};
use std::time::Duration;

/// Running aggregate of backend metrics snapshots
#[derive(Debug, Clone, Default)]
pub struct BackendMetricsAccumulator {
    retrieved_document_count: u64,
    retrieved_document_size: u64,
    output_document_count: u64,
    output_document_size: u64,
    index_hit_ratio: f64,
    total_time: Duration,
    query_preparation_times: QueryPreparationTimesAccumulator,
    index_lookup_time: Duration,
    document_load_time: Duration,
    runtime_execution_times: RuntimeExecutionTimesAccumulator,
    document_write_time: Duration,
    vm_execution_time: Duration,
    accumulated: usize,
}

impl BackendMetricsAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a possibly-absent snapshot
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `metrics` is `None`; the running state is left
    /// untouched.
    pub fn try_accumulate(&mut self, metrics: Option<&BackendMetrics>) -> Result<()> {
        let metrics = metrics.ok_or(Error::invalid_argument("backend_metrics"))?;
        self.accumulate(metrics);
        Ok(())
    }

    /// Fold one snapshot into the running aggregate
    pub fn accumulate(&mut self, next: &BackendMetrics) {
        // Ratio first: it is weighted by the pre-update totals.
        self.index_hit_ratio = weighted_index_hit_ratio(
            self.output_document_count,
            self.retrieved_document_count,
            self.index_hit_ratio,
            next,
        );

        self.retrieved_document_count += next.retrieved_document_count;
        self.retrieved_document_size += next.retrieved_document_size;
        self.output_document_count += next.output_document_count;
        self.output_document_size += next.output_document_size;
        self.total_time += next.total_time;
        self.query_preparation_times
            .accumulate(&next.query_preparation_times);
        self.index_lookup_time += next.index_lookup_time;
        self.document_load_time += next.document_load_time;
        self.runtime_execution_times
            .accumulate(&next.runtime_execution_times);
        self.document_write_time += next.document_write_time;
        self.vm_execution_time += next.vm_execution_time;
        self.accumulated += 1;
    }

    /// Number of snapshots folded so far
    pub fn len(&self) -> usize {
        self.accumulated
    }

    /// Check whether nothing has been folded yet
    pub fn is_empty(&self) -> bool {
        self.accumulated == 0
    }

    /// Current aggregate snapshot
    pub fn result(&self) -> BackendMetrics {
        BackendMetrics {
            retrieved_document_count: self.retrieved_document_count,
            retrieved_document_size: self.retrieved_document_size,
            output_document_count: self.output_document_count,
            output_document_size: self.output_document_size,
            index_hit_ratio: self.index_hit_ratio,
            total_time: self.total_time,
            query_preparation_times: self.query_preparation_times.result(),
            index_lookup_time: self.index_lookup_time,
            document_load_time: self.document_load_time,
            runtime_execution_times: self.runtime_execution_times.result(),
            document_write_time: self.document_write_time,
            vm_execution_time: self.vm_execution_time,
        }
    }
}

fn weighted_index_hit_ratio(
    running_output: u64,
    running_retrieved: u64,
    running_ratio: f64,
    next: &BackendMetrics,
) -> f64 {
    let denominator = running_retrieved as f64 + next.retrieved_document_count as f64;
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator = running_output as f64 * running_ratio
        + next.output_document_count as f64 * next.index_hit_ratio;
    numerator / denominator
}
