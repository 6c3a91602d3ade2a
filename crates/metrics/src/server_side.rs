//! Server-side metrics accumulation
//!
//! Composes the backend accumulator with a per-partition breakdown. Each
//! query metrics datum found by the walk is folded twice: into the grand
//! total and into the bucket of the partition it came from.
//!
//! ## Partition identity
//!
//! A datum's partition is its `partition_key_range_id` when the transport
//! recorded one, otherwise the id of the trace node that carries it. Datums
//! with the same identity share a bucket; buckets keep first-discovery order.
//!
//! ## Index utilization
//!
//! Index reports are not copied while the walk runs. The accumulator keeps a
//! handle to each contributing node and reads its descriptors only when
//! [`ServerSideMetricsAccumulator::result`] materializes the report.
//!
//! ## Absent result
//!
//! A walk that finds no metrics produces `None`, never a zeroed snapshot.

use crate::backend::BackendMetricsAccumulator;
use crate::index_utilization::IndexUtilizationAccumulator;
use crate::walker::{query_metrics_datum, walk_for_query_metrics};
use qtrace_core::{
    BackendMetrics, CompositeIndexUtilizationEntity, Error, IndexUtilizationInfo,
    QueryPreparationTimes, Result, RuntimeExecutionTimes, SingleIndexUtilizationEntity, TraceNode,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Backend metrics as exposed to diagnostics consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerSideMetrics {
    /// Total backend execution time
    pub total_time: Duration,
    /// Documents retrieved from storage
    pub retrieved_document_count: u64,
    /// Bytes retrieved from storage
    pub retrieved_document_size: u64,
    /// Documents returned to the client
    pub output_document_count: u64,
    /// Bytes returned to the client
    pub output_document_size: u64,
    /// Query preparation breakdown
    pub query_preparation_times: QueryPreparationTimes,
    /// Index lookup time
    pub index_lookup_time: Duration,
    /// Document load time
    pub document_load_time: Duration,
    /// Runtime execution breakdown
    pub runtime_execution_times: RuntimeExecutionTimes,
    /// Output write/serialize time
    pub document_write_time: Duration,
    /// Weighted index hit ratio
    pub index_hit_ratio: f64,
    /// VM execution time
    pub vm_execution_time: Duration,
}

impl From<BackendMetrics> for ServerSideMetrics {
    fn from(m: BackendMetrics) -> Self {
        ServerSideMetrics {
            total_time: m.total_time,
            retrieved_document_count: m.retrieved_document_count,
            retrieved_document_size: m.retrieved_document_size,
            output_document_count: m.output_document_count,
            output_document_size: m.output_document_size,
            query_preparation_times: m.query_preparation_times,
            index_lookup_time: m.index_lookup_time,
            document_load_time: m.document_load_time,
            runtime_execution_times: m.runtime_execution_times,
            document_write_time: m.document_write_time,
            index_hit_ratio: m.index_hit_ratio,
            vm_execution_time: m.vm_execution_time,
        }
    }
}

/// Metrics for one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionedServerSideMetrics {
    /// Partition identity (range id, or originating trace node id)
    pub partition_id: String,
    /// Partition key range id, if recorded
    pub partition_key_range_id: Option<String>,
    /// Feed range of the first datum seen for this partition
    pub feed_range: Option<String>,
    /// Request units charged across this partition's calls
    pub request_charge: f64,
    /// Aggregated metrics of this partition's calls
    pub server_side_metrics: ServerSideMetrics,
}

/// Aggregate and per-partition server-side metrics for one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSideAccumulatedMetrics {
    /// Grand total across every partition
    pub cumulative_metrics: ServerSideMetrics,
    /// Per-partition breakdown in discovery order
    pub partitioned_metrics: Vec<PartitionedServerSideMetrics>,
    /// Request units charged across all calls
    pub total_request_charge: f64,
    /// Concatenated index utilization reports in discovery order
    pub index_utilization: IndexUtilizationInfo,
}

impl ServerSideAccumulatedMetrics {
    /// Look up one partition by identity
    pub fn partition(&self, partition_id: &str) -> Option<&PartitionedServerSideMetrics> {
        self.partitioned_metrics
            .iter()
            .find(|p| p.partition_id == partition_id)
    }
}

/// One descriptor list of the index report carried by a trace node
///
/// Yields clones of the list entries one at a time, looking the datum up
/// again on every pull.
struct IndexReport<T: 'static> {
    node: TraceNode,
    list: fn(&IndexUtilizationInfo) -> &[T],
    position: usize,
}

impl<T: 'static> IndexReport<T> {
    fn new(node: &TraceNode, list: fn(&IndexUtilizationInfo) -> &[T]) -> Self {
        IndexReport {
            node: node.clone(),
            list,
            position: 0,
        }
    }
}

impl<T: Clone + 'static> Iterator for IndexReport<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = query_metrics_datum(&self.node)
            .and_then(|datum| datum.index_utilization.as_ref())
            .and_then(|info| (self.list)(info).get(self.position))
            .cloned()?;
        self.position += 1;
        Some(item)
    }
}

fn utilized_single(info: &IndexUtilizationInfo) -> &[SingleIndexUtilizationEntity] {
    &info.utilized_single_indexes
}

fn potential_single(info: &IndexUtilizationInfo) -> &[SingleIndexUtilizationEntity] {
    &info.potential_single_indexes
}

fn utilized_composite(info: &IndexUtilizationInfo) -> &[CompositeIndexUtilizationEntity] {
    &info.utilized_composite_indexes
}

fn potential_composite(info: &IndexUtilizationInfo) -> &[CompositeIndexUtilizationEntity] {
    &info.potential_composite_indexes
}

#[derive(Debug)]
struct PartitionBucket {
    partition_id: String,
    partition_key_range_id: Option<String>,
    feed_range: Option<String>,
    request_charge: f64,
    metrics: BackendMetricsAccumulator,
}

/// Folds query metrics datums into a total and a per-partition breakdown
#[derive(Debug, Default)]
pub struct ServerSideMetricsAccumulator {
    total: BackendMetricsAccumulator,
    partitions: Vec<PartitionBucket>,
    positions: FxHashMap<String, usize>,
    index_utilization: IndexUtilizationAccumulator,
    total_request_charge: f64,
}

impl ServerSideMetricsAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the query metrics datum carried by `node`
    ///
    /// A node without a query metrics datum is skipped.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the datum carries no backend metrics. Nothing is
    /// folded in that case.
    pub fn accumulate(&mut self, node: &TraceNode) -> Result<()> {
        let datum = match query_metrics_datum(node) {
            Some(datum) => datum,
            None => return Ok(()),
        };
        let backend = match datum.backend_metrics.as_ref() {
            Some(backend) => backend,
            None => {
                warn!(node = %node.id(), name = node.name(), "query metrics datum without backend metrics");
                return Err(Error::invalid_argument("backend_metrics"));
            }
        };

        let partition_id = datum
            .partition_key_range_id
            .clone()
            .unwrap_or_else(|| node.id().to_string());

        let position = match self.positions.get(&partition_id) {
            Some(&position) => position,
            None => {
                self.partitions.push(PartitionBucket {
                    partition_id: partition_id.clone(),
                    partition_key_range_id: datum.partition_key_range_id.clone(),
                    feed_range: datum.feed_range.clone(),
                    request_charge: 0.0,
                    metrics: BackendMetricsAccumulator::new(),
                });
                self.positions.insert(partition_id, self.partitions.len() - 1);
                self.partitions.len() - 1
            }
        };

        let bucket = &mut self.partitions[position];
        bucket.metrics.accumulate(backend);
        bucket.request_charge += datum.request_charge;

        self.total.accumulate(backend);
        self.total_request_charge += datum.request_charge;
        if datum.index_utilization.is_some() {
            self.index_utilization.accumulate_lazy(
                IndexReport::new(node, utilized_single),
                IndexReport::new(node, potential_single),
                IndexReport::new(node, utilized_composite),
                IndexReport::new(node, potential_composite),
            );
        }
        Ok(())
    }

    /// Number of distinct partitions seen
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Grand total so far
    pub fn server_side_metrics(&self) -> BackendMetrics {
        self.total.result()
    }

    /// Produce the accumulated result, or `None` if nothing was folded
    pub fn result(self) -> Option<ServerSideAccumulatedMetrics> {
        if self.partitions.is_empty() {
            return None;
        }

        let partitioned_metrics = self
            .partitions
            .into_iter()
            .map(|bucket| PartitionedServerSideMetrics {
                partition_id: bucket.partition_id,
                partition_key_range_id: bucket.partition_key_range_id,
                feed_range: bucket.feed_range,
                request_charge: bucket.request_charge,
                server_side_metrics: bucket.metrics.result().into(),
            })
            .collect();

        Some(ServerSideAccumulatedMetrics {
            cumulative_metrics: self.total.result().into(),
            partitioned_metrics,
            total_request_charge: self.total_request_charge,
            index_utilization: self.index_utilization.result(),
        })
    }
}

/// Walk a trace tree and accumulate every query metrics datum in it
///
/// Returns `Ok(None)` when the tree carries no query metrics.
pub fn collect_server_side_metrics(root: &TraceNode) -> Result<Option<ServerSideAccumulatedMetrics>> {
    let mut accumulator = ServerSideMetricsAccumulator::new();
    walk_for_query_metrics(root, |node, _| accumulator.accumulate(node))?;
    Ok(accumulator.result())
}
