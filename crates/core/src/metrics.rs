//! Backend query metrics value types
//!
//! These types carry the execution statistics reported by the remote query
//! backend for one sub-operation. They are produced once per backend call and
//! never mutated afterwards; aggregation happens in `qtrace-metrics`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Query preparation timings reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryPreparationTimes {
    /// Query compile time
    pub query_compilation_time: Duration,
    /// Logical plan build time
    pub logical_plan_build_time: Duration,
    /// Physical plan build time
    pub physical_plan_build_time: Duration,
    /// Query optimization time
    pub query_optimization_time: Duration,
}

impl QueryPreparationTimes {
    /// All timings zero
    pub const ZERO: QueryPreparationTimes = QueryPreparationTimes {
        query_compilation_time: Duration::ZERO,
        logical_plan_build_time: Duration::ZERO,
        physical_plan_build_time: Duration::ZERO,
        query_optimization_time: Duration::ZERO,
    };

    /// Create preparation timings
    pub fn new(
        query_compilation_time: Duration,
        logical_plan_build_time: Duration,
        physical_plan_build_time: Duration,
        query_optimization_time: Duration,
    ) -> Self {
        QueryPreparationTimes {
            query_compilation_time,
            logical_plan_build_time,
            physical_plan_build_time,
            query_optimization_time,
        }
    }
}

/// Runtime execution timings reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeExecutionTimes {
    /// Time spent in the query engine proper
    pub query_engine_execution_time: Duration,
    /// Time spent in built-in system functions
    pub system_function_execution_time: Duration,
    /// Time spent in user-defined functions
    pub user_defined_function_execution_time: Duration,
}

impl RuntimeExecutionTimes {
    /// All timings zero
    pub const ZERO: RuntimeExecutionTimes = RuntimeExecutionTimes {
        query_engine_execution_time: Duration::ZERO,
        system_function_execution_time: Duration::ZERO,
        user_defined_function_execution_time: Duration::ZERO,
    };

    /// Create runtime timings
    pub fn new(
        query_engine_execution_time: Duration,
        system_function_execution_time: Duration,
        user_defined_function_execution_time: Duration,
    ) -> Self {
        RuntimeExecutionTimes {
            query_engine_execution_time,
            system_function_execution_time,
            user_defined_function_execution_time,
        }
    }
}

/// Execution statistics for one backend call
///
/// `index_hit_ratio` is conceptually in `0.0..=1.0` but is not clamped: the
/// backend value is carried through as reported.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendMetrics {
    /// Number of documents retrieved from storage
    pub retrieved_document_count: u64,
    /// Size in bytes of the retrieved documents
    pub retrieved_document_size: u64,
    /// Number of documents returned to the client
    pub output_document_count: u64,
    /// Size in bytes of the returned documents
    pub output_document_size: u64,
    /// Fraction of index-assisted lookups
    pub index_hit_ratio: f64,
    /// Total backend execution time
    pub total_time: Duration,
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
    /// VM execution time
    pub vm_execution_time: Duration,
}

impl BackendMetrics {
    /// Metrics with every count, ratio and duration zero
    pub const EMPTY: BackendMetrics = BackendMetrics {
        retrieved_document_count: 0,
        retrieved_document_size: 0,
        output_document_count: 0,
        output_document_size: 0,
        index_hit_ratio: 0.0,
        total_time: Duration::ZERO,
        query_preparation_times: QueryPreparationTimes::ZERO,
        index_lookup_time: Duration::ZERO,
        document_load_time: Duration::ZERO,
        runtime_execution_times: RuntimeExecutionTimes::ZERO,
        document_write_time: Duration::ZERO,
        vm_execution_time: Duration::ZERO,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_constants_match_default() {
        assert_eq!(QueryPreparationTimes::ZERO, QueryPreparationTimes::default());
        assert_eq!(RuntimeExecutionTimes::ZERO, RuntimeExecutionTimes::default());
        assert_eq!(BackendMetrics::EMPTY, BackendMetrics::default());
    }

    #[test]
    fn test_backend_metrics_serde_shape() {
        let metrics = BackendMetrics {
            retrieved_document_count: 10,
            output_document_count: 4,
            index_hit_ratio: 0.5,
            ..BackendMetrics::EMPTY
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["retrieved_document_count"], 10);
        assert_eq!(json["output_document_count"], 4);
        assert_eq!(json["index_hit_ratio"], 0.5);

        let back: BackendMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(back, metrics);
    }
}
