//! Host-memory backend.

use yee_core::UpdateError;
use yee_grid::FdtdGrid;

use crate::kernels::{self, Execution};
use crate::strategy::UpdateStrategy;

/// Runs every kernel directly on a grid in host memory.
///
/// Volume kernels are sequential by default;
/// [`with_execution`](Self::with_execution) switches them to one rayon
/// task per z-plane on the global pool.
#[derive(Debug)]
pub struct CpuUpdates {
    grid: FdtdGrid,
    execution: Execution,
}

impl CpuUpdates {
    /// Take ownership of `grid`.
    pub fn new(grid: FdtdGrid) -> Self {
        Self {
            grid,
            execution: Execution::Sequential,
        }
    }

    /// Choose how volume kernels walk the grid.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// The grid being stepped.
    pub fn grid(&self) -> &FdtdGrid {
        &self.grid
    }

    /// Mutable access to the grid between steps.
    pub fn grid_mut(&mut self) -> &mut FdtdGrid {
        &mut self.grid
    }

    /// Give the grid back.
    pub fn into_grid(self) -> FdtdGrid {
        self.grid
    }
}

impl UpdateStrategy for CpuUpdates {
    fn name(&self) -> &str {
        "cpu"
    }

    fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError> {
        Ok(self.grid.store_outputs(step)?)
    }

    fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError> {
        Ok(self.grid.store_snapshots(step)?)
    }

    fn update_magnetic(&mut self) -> Result<(), UpdateError> {
        kernels::update_magnetic(self.execution, &mut self.grid.kernel_parts()?);
        Ok(())
    }

    fn update_magnetic_pml(&mut self) -> Result<(), UpdateError> {
        kernels::update_magnetic_pml(&mut self.grid.kernel_parts()?);
        Ok(())
    }

    fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError> {
        kernels::update_magnetic_sources(&mut self.grid.kernel_parts()?, step);
        Ok(())
    }

    fn update_electric_a(&mut self) -> Result<(), UpdateError> {
        kernels::update_electric_a(self.execution, &mut self.grid.kernel_parts()?);
        Ok(())
    }

    fn update_electric_pml(&mut self) -> Result<(), UpdateError> {
        kernels::update_electric_pml(&mut self.grid.kernel_parts()?);
        Ok(())
    }

    fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError> {
        kernels::update_electric_sources(&mut self.grid.kernel_parts()?, step);
        Ok(())
    }

    fn update_electric_b(&mut self) -> Result<(), UpdateError> {
        kernels::update_electric_b(self.execution, &mut self.grid.kernel_parts()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yee_core::{Axis, Component, ConfigError, Operation};
    use yee_grid::{GridConfig, PmlConfig, Receiver, Source, Waveform};

    fn model() -> FdtdGrid {
        let cfg = GridConfig::cube(20, 1e-3).with_pml(PmlConfig::with_thickness(4));
        let mut g = FdtdGrid::new(cfg).unwrap();
        g.add_source(Source::hertzian_dipole(Axis::Z, [10, 10, 10], Waveform::ricker(2e10)))
            .unwrap();
        g.add_receiver(Receiver::with_components("rx", [13, 10, 10], &[Component::Ez]))
            .unwrap();
        g
    }

    fn run(strategy: &mut CpuUpdates, steps: usize) {
        for step in 0..steps {
            for op in Operation::SEQUENCE {
                strategy.execute(op, step).unwrap();
            }
        }
    }

    #[test]
    fn uninitialised_grid_fails_first_operation() {
        let mut cpu = CpuUpdates::new(model());
        assert_eq!(
            cpu.store_outputs(0),
            Err(UpdateError::Config(ConfigError::NotInitialised))
        );
        assert_eq!(
            cpu.update_magnetic(),
            Err(UpdateError::Config(ConfigError::NotInitialised))
        );
    }

    #[test]
    fn receiver_sees_the_pulse() {
        let mut g = model();
        g.initialise();
        let mut cpu = CpuUpdates::new(g);
        run(&mut cpu, 60);
        let trace = cpu.grid().receiver("rx").unwrap().trace(Component::Ez).unwrap();
        assert_eq!(trace.len(), 60);
        assert!(trace.iter().any(|v| v.abs() > 0.0));
    }

    #[test]
    fn parallel_execution_is_deterministic() {
        let mut g = model();
        g.initialise();
        let mut seq = CpuUpdates::new(g.clone());
        let mut par = CpuUpdates::new(g).with_execution(Execution::Parallel);
        run(&mut seq, 30);
        run(&mut par, 30);
        assert_eq!(seq.grid().fields(), par.grid().fields());
        assert_eq!(seq.grid().receivers(), par.grid().receivers());
    }
}
