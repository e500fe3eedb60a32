//! Update strategies for the yee FDTD engine.
//!
//! An [`UpdateStrategy`] owns the simulation state and performs the nine
//! per-step operations of the Yee leapfrog scheme on request. The solver
//! decides *when* each operation runs; a strategy decides *how*:
//!
//! - [`CpuUpdates`]: sequential kernels in host memory.
//! - [`AcceleratorUpdates`]: kernels on a dedicated device thread, run
//!   data-parallel, with host copies only at output capture.
//! - [`SubGridUpdates`]: a coarse grid and refined sub-grids stepped in
//!   lockstep with field exchange at their interfaces.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accelerator;
pub mod cpu;
pub mod kernels;
pub mod strategy;
pub mod subgrid;

pub use accelerator::{AcceleratorUpdates, DeviceConfig};
pub use cpu::CpuUpdates;
pub use kernels::Execution;
pub use strategy::UpdateStrategy;
pub use subgrid::{NestedModel, SubGrid, SubGridSpec, SubGridUpdates};
