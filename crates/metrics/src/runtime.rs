//! Runtime execution timing accumulator

use qtrace_core::RuntimeExecutionTimes;

/// Sums [`RuntimeExecutionTimes`] component-wise
#[derive(Debug, Clone, Default)]
pub struct RuntimeExecutionTimesAccumulator {
    running: RuntimeExecutionTimes,
}

impl RuntimeExecutionTimesAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one set of timings into the running total
    pub fn accumulate(&mut self, next: &RuntimeExecutionTimes) {
        self.running.query_engine_execution_time += next.query_engine_execution_time;
        self.running.system_function_execution_time += next.system_function_execution_time;
        self.running.user_defined_function_execution_time +=
            next.user_defined_function_execution_time;
    }

    /// Current total
    pub fn result(&self) -> RuntimeExecutionTimes {
        self.running
    }
}
