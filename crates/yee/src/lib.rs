//! yee: an FDTD electromagnetic time-stepping engine.
//!
//! This is the facade crate that re-exports the public API of the yee
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use yee::prelude::*;
//!
//! // 16^3 cells of 2 mm with a 4-cell absorbing boundary.
//! let config = GridConfig::cube(16, 2e-3).with_pml(PmlConfig::with_thickness(4));
//! let mut grid = FdtdGrid::new(config).unwrap();
//! grid.add_source(Source::hertzian_dipole(Axis::Z, [8, 8, 8], Waveform::ricker(1.5e10)))
//!     .unwrap();
//! grid.add_receiver(Receiver::with_components("rx", [11, 8, 8], &[Component::Ez]))
//!     .unwrap();
//! grid.initialise();
//!
//! let mut cpu = CpuUpdates::new(grid);
//! let elapsed = Solver::new(&mut cpu, Steps::new(50)).solve().unwrap();
//! assert!(elapsed >= std::time::Duration::ZERO);
//!
//! let trace = cpu.grid().receiver("rx").unwrap().trace(Component::Ez).unwrap();
//! assert_eq!(trace.len(), 50);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `yee-core` | Components, dimensions, operations, errors |
//! | [`grid`] | `yee-grid` | Grid configuration and state, materials, CPML, sources, outputs |
//! | [`updates`] | `yee-updates` | The update-strategy trait and the three backends |
//! | [`solver`] | `yee-solver` | Step sequences, clocks, the solve loop, `create_solver` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary (`yee-core`).
///
/// Field components and axes, grid dimensions and index boxes, the nine
/// update operations, and [`types::ConfigError`] /
/// [`types::BackendError`] / [`types::UpdateError`].
pub use yee_core as types;

/// Simulation state (`yee-grid`).
///
/// [`grid::GridConfig`] describes a model; [`grid::FdtdGrid`] owns its
/// fields, materials, absorbing slabs, sources, receivers and snapshots.
pub use yee_grid as grid;

/// Update strategies (`yee-updates`).
///
/// The [`updates::UpdateStrategy`] trait and its CPU, accelerator and
/// sub-grid implementations.
pub use yee_updates as updates;

/// Time stepping (`yee-solver`).
///
/// [`solver::Solver`], [`solver::Steps`], clocks, metrics and
/// [`solver::create_solver`].
pub use yee_solver as solver;

/// Common imports for typical use.
///
/// ```rust
/// use yee::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use yee_core::{Axis, Component, Dims, Operation, Region};

    // Errors
    pub use yee_core::{BackendError, ConfigError, UpdateError};
    pub use yee_solver::SolveError;

    // Grid
    pub use yee_grid::{
        FdtdGrid, GridConfig, Material, PmlConfig, Receiver, Snapshot, SnapshotSpec, Source,
        Waveform,
    };

    // Updates
    pub use yee_updates::{
        AcceleratorUpdates, CpuUpdates, DeviceConfig, Execution, NestedModel, SubGridSpec,
        SubGridUpdates, UpdateStrategy,
    };

    // Solver
    pub use yee_solver::{
        create_solver, Clock, Model, MonotonicClock, Progress, SolveMetrics, SolveReport,
        Solver, Steps, Target,
    };
}
