//! Query preparation timing accumulator

use qtrace_core::QueryPreparationTimes;

/// Sums [`QueryPreparationTimes`] component-wise
#[derive(Debug, Clone, Default)]
pub struct QueryPreparationTimesAccumulator {
    running: QueryPreparationTimes,
}

impl QueryPreparationTimesAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one set of timings into the running total
    pub fn accumulate(&mut self, next: &QueryPreparationTimes) {
        self.running.query_compilation_time += next.query_compilation_time;
        self.running.logical_plan_build_time += next.logical_plan_build_time;
        self.running.physical_plan_build_time += next.physical_plan_build_time;
        self.running.query_optimization_time += next.query_optimization_time;
    }

    /// Current total
    pub fn result(&self) -> QueryPreparationTimes {
        self.running
    }
}
