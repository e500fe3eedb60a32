//! Stub and wrapping update strategies.
//!
//! - [`RecordingUpdates`]: logs every `(step, operation)` and succeeds.
//! - [`FailingUpdates`]: logs like the recorder, then fails at a chosen
//!   step and operation.
//! - [`SleepingUpdates`]: spends a fixed time in every operation.
//! - [`TracedUpdates`]: logs, then forwards to a real strategy.
//!
//! Operations that take no step index are logged against the most recent
//! index seen (the one passed to `store_outputs` at the top of the step).

use std::thread;
use std::time::Duration;

use yee_core::{BackendError, Operation, UpdateError};
use yee_updates::UpdateStrategy;

use crate::{LogEntry, ManualClock};

/// Funnel all nine operations through one method.
trait Hook {
    fn hook_name(&self) -> &str;
    fn on(&mut self, operation: Operation, step: Option<usize>) -> Result<(), UpdateError>;
}

macro_rules! strategy_via_hook {
    ($ty:ty $(, $param:ident: $bound:path)?) => {
        impl$(<$param: $bound>)? UpdateStrategy for $ty {
            fn name(&self) -> &str {
                self.hook_name()
            }
            fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError> {
                self.on(Operation::StoreOutputs, Some(step))
            }
            fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError> {
                self.on(Operation::StoreSnapshots, Some(step))
            }
            fn update_magnetic(&mut self) -> Result<(), UpdateError> {
                self.on(Operation::UpdateMagnetic, None)
            }
            fn update_magnetic_pml(&mut self) -> Result<(), UpdateError> {
                self.on(Operation::UpdateMagneticPml, None)
            }
            fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError> {
                self.on(Operation::UpdateMagneticSources, Some(step))
            }
            fn update_electric_a(&mut self) -> Result<(), UpdateError> {
                self.on(Operation::UpdateElectricA, None)
            }
            fn update_electric_pml(&mut self) -> Result<(), UpdateError> {
                self.on(Operation::UpdateElectricPml, None)
            }
            fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError> {
                self.on(Operation::UpdateElectricSources, Some(step))
            }
            fn update_electric_b(&mut self) -> Result<(), UpdateError> {
                self.on(Operation::UpdateElectricB, None)
            }
        }
    };
}

/// Operation log shared by every stub.
#[derive(Clone, Debug, Default)]
struct Log {
    entries: Vec<LogEntry>,
    current: usize,
}

impl Log {
    fn step_for(&mut self, step: Option<usize>) -> usize {
        if let Some(s) = step {
            self.current = s;
        }
        self.current
    }

    fn push(&mut self, operation: Operation, step: Option<usize>) {
        let step = self.step_for(step);
        self.entries.push((step, operation));
    }
}

// ── RecordingUpdates ─────────────────────────────────────────────

/// Records every operation and always succeeds.
#[derive(Clone, Debug, Default)]
pub struct RecordingUpdates {
    log: Log,
}

impl RecordingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(step, operation)` invoked so far.
    pub fn log(&self) -> &[LogEntry] {
        &self.log.entries
    }

    /// Number of operations invoked.
    pub fn calls(&self) -> usize {
        self.log.entries.len()
    }
}

impl Hook for RecordingUpdates {
    fn hook_name(&self) -> &str {
        "recording"
    }

    fn on(&mut self, operation: Operation, step: Option<usize>) -> Result<(), UpdateError> {
        self.log.push(operation, step);
        Ok(())
    }
}

strategy_via_hook!(RecordingUpdates);

// ── FailingUpdates ───────────────────────────────────────────────

/// Records operations until `operation` at `step`, which fails with
/// `error`. The failing call is not recorded.
#[derive(Clone, Debug)]
pub struct FailingUpdates {
    log: Log,
    step: usize,
    operation: Operation,
    error: UpdateError,
}

impl FailingUpdates {
    /// Fail with [`BackendError::KernelFailed`].
    pub fn new(step: usize, operation: Operation) -> Self {
        Self::with_error(
            step,
            operation,
            BackendError::KernelFailed {
                reason: format!("deliberate failure at step {step}, {operation}"),
            }
            .into(),
        )
    }

    /// Fail with a chosen error.
    pub fn with_error(step: usize, operation: Operation, error: UpdateError) -> Self {
        Self {
            log: Log::default(),
            step,
            operation,
            error,
        }
    }

    /// The error this stub fails with.
    pub fn error(&self) -> &UpdateError {
        &self.error
    }

    /// Successful operations so far.
    pub fn log(&self) -> &[LogEntry] {
        &self.log.entries
    }

    /// Number of successful operations.
    pub fn calls(&self) -> usize {
        self.log.entries.len()
    }
}

impl Hook for FailingUpdates {
    fn hook_name(&self) -> &str {
        "failing"
    }

    fn on(&mut self, operation: Operation, step: Option<usize>) -> Result<(), UpdateError> {
        let current = self.log.step_for(step);
        if current == self.step && operation == self.operation {
            return Err(self.error.clone());
        }
        self.log.push(operation, step);
        Ok(())
    }
}

strategy_via_hook!(FailingUpdates);

// ── SleepingUpdates ──────────────────────────────────────────────

/// Spends `per_operation` in every operation.
///
/// By default each operation sleeps the thread. With
/// [`with_clock`](Self::with_clock) it advances a [`ManualClock`] instead,
/// so timing tests run instantly and exactly.
#[derive(Clone, Debug)]
pub struct SleepingUpdates {
    per_operation: Duration,
    clock: Option<ManualClock>,
    calls: usize,
}

impl SleepingUpdates {
    pub fn new(per_operation: Duration) -> Self {
        Self {
            per_operation,
            clock: None,
            calls: 0,
        }
    }

    /// Advance `clock` instead of sleeping.
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Hook for SleepingUpdates {
    fn hook_name(&self) -> &str {
        "sleeping"
    }

    fn on(&mut self, _: Operation, _: Option<usize>) -> Result<(), UpdateError> {
        match &self.clock {
            Some(clock) => clock.advance(self.per_operation),
            None => thread::sleep(self.per_operation),
        }
        self.calls += 1;
        Ok(())
    }
}

strategy_via_hook!(SleepingUpdates);

// ── TracedUpdates ────────────────────────────────────────────────

/// Forwards to `inner`, logging every operation it is asked to run.
///
/// Failed operations are logged too, so the log shows exactly what the
/// caller attempted.
#[derive(Debug)]
pub struct TracedUpdates<U> {
    inner: U,
    log: Log,
}

impl<U: UpdateStrategy> TracedUpdates<U> {
    pub fn new(inner: U) -> Self {
        Self {
            inner,
            log: Log::default(),
        }
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log.entries
    }

    pub fn inner(&self) -> &U {
        &self.inner
    }

    pub fn into_inner(self) -> U {
        self.inner
    }
}

impl<U: UpdateStrategy> Hook for TracedUpdates<U> {
    fn hook_name(&self) -> &str {
        self.inner.name()
    }

    fn on(&mut self, operation: Operation, step: Option<usize>) -> Result<(), UpdateError> {
        self.log.push(operation, step);
        let step = self.log.current;
        self.inner.execute(operation, step)
    }
}

strategy_via_hook!(TracedUpdates<U>, U: UpdateStrategy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstepped_operations_use_current_step() {
        let mut r = RecordingUpdates::new();
        r.store_outputs(7).unwrap();
        r.update_magnetic().unwrap();
        assert_eq!(
            r.log(),
            &[(7, Operation::StoreOutputs), (7, Operation::UpdateMagnetic)]
        );
    }

    #[test]
    fn failing_stub_fails_once_at_its_point() {
        let mut f = FailingUpdates::new(0, Operation::UpdateElectricA);
        f.store_outputs(0).unwrap();
        assert!(f.update_electric_a().is_err());
        assert_eq!(f.calls(), 1);
    }

    #[test]
    fn sleeping_stub_advances_manual_clock() {
        use yee_solver::Clock;
        let clock = ManualClock::new();
        let mut s = SleepingUpdates::new(Duration::from_millis(2)).with_clock(clock.clone());
        s.update_magnetic().unwrap();
        s.update_electric_b().unwrap();
        assert_eq!(clock.now(), Duration::from_millis(4));
        assert_eq!(s.calls(), 2);
    }

    #[test]
    fn traced_forwards_to_inner() {
        let mut t = TracedUpdates::new(RecordingUpdates::new());
        t.store_outputs(3).unwrap();
        t.update_electric_b().unwrap();
        assert_eq!(t.log(), t.inner().log());
        assert_eq!(t.name(), "recording");
    }
}
