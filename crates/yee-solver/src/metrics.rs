//! Timing collected during a solve.

use std::time::Duration;

use yee_core::Operation;

/// Per-operation timing for one solve.
///
/// Only successful operations are counted; a solve that fails returns an
/// error instead of metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveMetrics {
    /// Steps whose nine operations all completed.
    pub steps_completed: usize,
    /// Accumulated time per operation, indexed by
    /// [`Operation::position`].
    pub operation_time: [Duration; 9],
}

impl SolveMetrics {
    /// Add `elapsed` to the running total for `operation`.
    pub fn record(&mut self, operation: Operation, elapsed: Duration) {
        self.operation_time[operation.position()] += elapsed;
    }

    /// Accumulated time spent in `operation`.
    pub fn time_in(&self, operation: Operation) -> Duration {
        self.operation_time[operation.position()]
    }

    /// Sum over all operations.
    pub fn operations_total(&self) -> Duration {
        self.operation_time.iter().sum()
    }

    /// The operation with the largest accumulated time, if any time was
    /// recorded.
    pub fn slowest(&self) -> Option<(Operation, Duration)> {
        Operation::SEQUENCE
            .into_iter()
            .map(|op| (op, self.time_in(op)))
            .filter(|(_, t)| !t.is_zero())
            .max_by_key(|(_, t)| *t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = SolveMetrics::default();
        assert_eq!(m.steps_completed, 0);
        assert_eq!(m.operations_total(), Duration::ZERO);
        assert_eq!(m.slowest(), None);
    }

    #[test]
    fn record_accumulates_by_operation() {
        let mut m = SolveMetrics::default();
        m.record(Operation::UpdateMagnetic, Duration::from_millis(3));
        m.record(Operation::UpdateMagnetic, Duration::from_millis(4));
        m.record(Operation::StoreOutputs, Duration::from_millis(1));
        assert_eq!(m.time_in(Operation::UpdateMagnetic), Duration::from_millis(7));
        assert_eq!(m.operations_total(), Duration::from_millis(8));
        assert_eq!(
            m.slowest(),
            Some((Operation::UpdateMagnetic, Duration::from_millis(7)))
        );
    }
}
