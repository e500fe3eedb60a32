//! Choosing a backend and building a ready-to-run solver.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use yee_core::{ConfigError, UpdateError};
use yee_grid::FdtdGrid;
use yee_updates::{
    AcceleratorUpdates, CpuUpdates, DeviceConfig, NestedModel, SubGridUpdates, UpdateStrategy,
};

use crate::clock::MonotonicClock;
use crate::solver::Solver;
use crate::steps::Steps;

/// Where the update kernels run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// Sequential kernels in host memory.
    #[default]
    Cpu,
    /// Data-parallel kernels on a dedicated device thread.
    Accelerator,
    /// A coarse grid with refined sub-grids.
    SubGrid,
}

impl Target {
    /// Lower-case name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Target::Cpu => "cpu",
            Target::Accelerator => "accelerator",
            Target::SubGrid => "subgrid",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unrecognised target name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTargetError {
    input: String,
}

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown target '{}' (expected cpu, accelerator or subgrid)",
            self.input
        )
    }
}

impl Error for ParseTargetError {}

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Target::Cpu),
            "accelerator" | "gpu" => Ok(Target::Accelerator),
            "subgrid" | "sub-grid" => Ok(Target::SubGrid),
            _ => Err(ParseTargetError {
                input: s.to_owned(),
            }),
        }
    }
}

/// The simulation state handed to [`create_solver`].
#[derive(Clone, Debug)]
pub enum Model {
    /// One grid.
    Single(FdtdGrid),
    /// A coarse grid with sub-grids.
    Nested(NestedModel),
}

impl Model {
    fn kind(&self) -> &'static str {
        match self {
            Model::Single(_) => "single-grid",
            Model::Nested(_) => "nested",
        }
    }
}

impl From<FdtdGrid> for Model {
    fn from(grid: FdtdGrid) -> Self {
        Model::Single(grid)
    }
}

impl From<NestedModel> for Model {
    fn from(model: NestedModel) -> Self {
        Model::Nested(model)
    }
}

/// A solver over a backend chosen at run time.
pub type BoxedSolver = Solver<Box<dyn UpdateStrategy>, Steps, MonotonicClock>;

/// Wrap `model` in the strategy for `target` and bind it to `steps`.
///
/// Grids are not initialised here; an uninitialised grid fails at the
/// first operation of the solve.
///
/// # Errors
///
/// - [`ConfigError::TargetMismatch`] if a nested model is given to the
///   CPU or accelerator target, or a single grid to the sub-grid target.
/// - Any placement error from [`SubGridUpdates::new`].
/// - A [`BackendError`](yee_core::BackendError) if the accelerator device
///   cannot be started.
pub fn create_solver(
    target: Target,
    model: Model,
    steps: Steps,
) -> Result<BoxedSolver, UpdateError> {
    let updates: Box<dyn UpdateStrategy> = match (target, model) {
        (Target::Cpu, Model::Single(grid)) => Box::new(CpuUpdates::new(grid)),
        (Target::Accelerator, Model::Single(grid)) => {
            Box::new(AcceleratorUpdates::new(grid, DeviceConfig::default())?)
        }
        (Target::SubGrid, Model::Nested(model)) => Box::new(SubGridUpdates::new(model)?),
        (target, model) => {
            return Err(ConfigError::TargetMismatch {
                target: target.name().to_owned(),
                model: model.kind().to_owned(),
            }
            .into())
        }
    };
    tracing::debug!(backend = %target, steps = steps.len(), "solver created");
    Ok(Solver::new(updates, steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yee_grid::{GridConfig, PmlConfig};
    use yee_updates::SubGridSpec;

    fn grid() -> FdtdGrid {
        let cfg = GridConfig::cube(8, 1e-3).with_pml(PmlConfig::with_thickness(2));
        let mut g = FdtdGrid::new(cfg).unwrap();
        g.initialise();
        g
    }

    #[test]
    fn target_names_round_trip() {
        for t in [Target::Cpu, Target::Accelerator, Target::SubGrid] {
            assert_eq!(t.to_string().parse::<Target>(), Ok(t));
        }
        assert_eq!("Sub-Grid".parse::<Target>(), Ok(Target::SubGrid));
        assert!("fpga".parse::<Target>().is_err());
    }

    #[test]
    fn mismatched_model_rejected() {
        let err = create_solver(Target::SubGrid, grid().into(), Steps::new(1)).unwrap_err();
        assert_eq!(
            err,
            UpdateError::Config(ConfigError::TargetMismatch {
                target: "subgrid".into(),
                model: "single-grid".into(),
            })
        );

        let nested = NestedModel::build(
            GridConfig::cube(12, 1e-3).with_pml(PmlConfig::with_thickness(2)),
            &[SubGridSpec::new([4, 4, 4], [7, 7, 7], 2)],
        )
        .unwrap();
        assert!(matches!(
            create_solver(Target::Cpu, nested.into(), Steps::new(1)),
            Err(UpdateError::Config(ConfigError::TargetMismatch { .. }))
        ));
    }

    #[test]
    fn cpu_solver_runs() {
        let solver = create_solver(Target::Cpu, grid().into(), Steps::new(3)).unwrap();
        assert_eq!(solver.updates().name(), "cpu");
        solver.solve().unwrap();
    }
}
