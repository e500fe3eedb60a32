//! Core types and error taxonomy for the yee FDTD engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: field
//! components and axes, grid dimensions and index boxes, the nine
//! per-step update operations, and the error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod dims;
pub mod error;
pub mod operation;

pub use component::{Axis, Component, Side};
pub use dims::{Dims, Region};
pub use error::{BackendError, ConfigError, UpdateError};
pub use operation::Operation;
