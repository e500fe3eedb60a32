//! The [`UpdateStrategy`] trait.

use yee_core::{Operation, UpdateError};

/// The nine per-step operations of one FDTD backend.
///
/// # Contract
///
/// - A strategy is bound to one simulation state for its whole lifetime
///   and mutates it in place.
/// - Every operation blocks until its effect is complete. Backends that
///   run work elsewhere (a device thread, a thread pool) must still look
///   synchronous to the caller.
/// - Operations do not check their own ordering. The caller runs them in
///   [`Operation::SEQUENCE`] order once per step.
/// - Any failure is returned unchanged; no operation retries.
///
/// # Object safety
///
/// The trait is object-safe. `&mut U` and `Box<U>` implement it whenever
/// `U` does, so a solver can own a strategy, borrow one, or hold a
/// `Box<dyn UpdateStrategy>` chosen at run time.
pub trait UpdateStrategy: Send {
    /// Human-readable backend name for logs and errors.
    fn name(&self) -> &str;

    /// Record every receiver's requested components for `step`.
    fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError>;

    /// Capture every snapshot scheduled for `step`; no-op if none is.
    fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError>;

    /// Advance H by a half step from the current E.
    fn update_magnetic(&mut self) -> Result<(), UpdateError>;

    /// Absorbing-boundary correction of H.
    fn update_magnetic_pml(&mut self) -> Result<(), UpdateError>;

    /// Inject magnetic sources for `step`.
    fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError>;

    /// Advance E from the updated H, including the dispersive term from
    /// the previous step.
    fn update_electric_a(&mut self) -> Result<(), UpdateError>;

    /// Absorbing-boundary correction of E.
    fn update_electric_pml(&mut self) -> Result<(), UpdateError>;

    /// Inject electric sources for `step`.
    fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError>;

    /// Finish the E update from the fully sourced field.
    fn update_electric_b(&mut self) -> Result<(), UpdateError>;

    /// Run one operation by name.
    ///
    /// `step` is ignored by operations that do not take it.
    fn execute(&mut self, operation: Operation, step: usize) -> Result<(), UpdateError> {
        match operation {
            Operation::StoreOutputs => self.store_outputs(step),
            Operation::StoreSnapshots => self.store_snapshots(step),
            Operation::UpdateMagnetic => self.update_magnetic(),
            Operation::UpdateMagneticPml => self.update_magnetic_pml(),
            Operation::UpdateMagneticSources => self.update_magnetic_sources(step),
            Operation::UpdateElectricA => self.update_electric_a(),
            Operation::UpdateElectricPml => self.update_electric_pml(),
            Operation::UpdateElectricSources => self.update_electric_sources(step),
            Operation::UpdateElectricB => self.update_electric_b(),
        }
    }
}

macro_rules! forward_strategy {
    () => {
        fn name(&self) -> &str {
            (**self).name()
        }
        fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError> {
            (**self).store_outputs(step)
        }
        fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError> {
            (**self).store_snapshots(step)
        }
        fn update_magnetic(&mut self) -> Result<(), UpdateError> {
            (**self).update_magnetic()
        }
        fn update_magnetic_pml(&mut self) -> Result<(), UpdateError> {
            (**self).update_magnetic_pml()
        }
        fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError> {
            (**self).update_magnetic_sources(step)
        }
        fn update_electric_a(&mut self) -> Result<(), UpdateError> {
            (**self).update_electric_a()
        }
        fn update_electric_pml(&mut self) -> Result<(), UpdateError> {
            (**self).update_electric_pml()
        }
        fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError> {
            (**self).update_electric_sources(step)
        }
        fn update_electric_b(&mut self) -> Result<(), UpdateError> {
            (**self).update_electric_b()
        }
    };
}

impl<U: UpdateStrategy + ?Sized> UpdateStrategy for &mut U {
    forward_strategy!();
}

impl<U: UpdateStrategy + ?Sized> UpdateStrategy for Box<U> {
    forward_strategy!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<(usize, Operation)>);

    impl Log {
        fn push(&mut self, step: usize, op: Operation) -> Result<(), UpdateError> {
            self.0.push((step, op));
            Ok(())
        }
    }

    impl UpdateStrategy for Log {
        fn name(&self) -> &str {
            "log"
        }
        fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError> {
            self.push(step, Operation::StoreOutputs)
        }
        fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError> {
            self.push(step, Operation::StoreSnapshots)
        }
        fn update_magnetic(&mut self) -> Result<(), UpdateError> {
            self.push(usize::MAX, Operation::UpdateMagnetic)
        }
        fn update_magnetic_pml(&mut self) -> Result<(), UpdateError> {
            self.push(usize::MAX, Operation::UpdateMagneticPml)
        }
        fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError> {
            self.push(step, Operation::UpdateMagneticSources)
        }
        fn update_electric_a(&mut self) -> Result<(), UpdateError> {
            self.push(usize::MAX, Operation::UpdateElectricA)
        }
        fn update_electric_pml(&mut self) -> Result<(), UpdateError> {
            self.push(usize::MAX, Operation::UpdateElectricPml)
        }
        fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError> {
            self.push(step, Operation::UpdateElectricSources)
        }
        fn update_electric_b(&mut self) -> Result<(), UpdateError> {
            self.push(usize::MAX, Operation::UpdateElectricB)
        }
    }

    #[test]
    fn execute_dispatches_by_operation() {
        let mut log = Log::default();
        for op in Operation::SEQUENCE {
            log.execute(op, 4).unwrap();
        }
        let ops: Vec<_> = log.0.iter().map(|(_, op)| *op).collect();
        assert_eq!(ops, Operation::SEQUENCE);
        assert_eq!(log.0[0].0, 4);
        assert_eq!(log.0[2].0, usize::MAX);
    }

    #[test]
    fn boxed_and_borrowed_strategies_forward() {
        fn step_once<U: UpdateStrategy>(mut strategy: U) {
            strategy.update_magnetic().unwrap();
            assert_eq!(strategy.name(), "log");
        }

        let mut log = Log::default();
        step_once(&mut log);
        assert_eq!(log.0.len(), 1);
        let boxed: Box<dyn UpdateStrategy> = Box::new(log);
        step_once(boxed);
    }
}
