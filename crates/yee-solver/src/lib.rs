//! Time-stepping driver for the yee FDTD engine.
//!
//! A [`Solver`] binds one [`UpdateStrategy`](yee_updates::UpdateStrategy),
//! one step-index sequence and one [`Clock`]. Each step runs the nine
//! update operations in the fixed leapfrog order:
//!
//! ```text
//! store_outputs -> store_snapshots
//!   -> update_magnetic -> update_magnetic_pml -> update_magnetic_sources
//!   -> update_electric_a -> update_electric_pml -> update_electric_sources
//!   -> update_electric_b
//! ```
//!
//! The first failure stops the solve and is returned as a [`SolveError`]
//! naming the step and operation. [`create_solver`] picks a backend from a
//! [`Target`] at run time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod metrics;
pub mod solver;
pub mod steps;
pub mod target;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use metrics::SolveMetrics;
pub use solver::{SolveError, SolveReport, Solver};
pub use steps::{Progress, Steps};
pub use target::{create_solver, BoxedSolver, Model, ParseTargetError, Target};
