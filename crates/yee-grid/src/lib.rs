//! Yee grid state for the yee FDTD engine.
//!
//! [`FdtdGrid`] is the simulation state an update strategy owns: the six
//! staggered field arrays, per-component material IDs and their update
//! coefficients, CPML absorbing slabs, dispersive polarisation, sources,
//! receivers, and the snapshot schedule. Construction validates a
//! [`GridConfig`]; [`FdtdGrid::initialise`] precomputes coefficients and
//! must run before any update.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod fields;
pub mod grid;
pub mod material;
pub mod pml;
pub mod receiver;
pub mod snapshot;
pub mod source;
pub mod waveform;

pub use config::{GridConfig, PmlConfig};
pub use fields::{ComponentArrays, Fields, MaterialIds};
pub use grid::{FdtdGrid, KernelParts};
pub use material::{
    DebyePole, ElectricCoeffs, MagneticCoeffs, Material, MaterialTable, UpdateCoefficients,
};
pub use pml::{PmlProfile, PmlSlab};
pub use receiver::Receiver;
pub use snapshot::{Snapshot, SnapshotSpec};
pub use source::{Source, SourceKind};
pub use waveform::{Waveform, WaveformKind};
