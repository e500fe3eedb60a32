//! Error types for the yee FDTD engine.
//!
//! Two kinds of failure exist: the simulation state was not fully or
//! correctly configured ([`ConfigError`]), or a numerical kernel failed
//! while running ([`BackendError`]). Update strategies return either
//! through [`UpdateError`]. Neither kind is recovered locally; every
//! failure aborts the current solve and reaches the caller unchanged.

use std::error::Error;
use std::fmt;

use crate::component::{Axis, Component};

/// The simulation state or strategy was not fully or correctly set up.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The grid has zero cells along some axis.
    EmptyGrid,
    /// A spatial step is NaN, infinite, zero, or negative.
    InvalidSpacing {
        /// The rejected value, in metres.
        value: f64,
    },
    /// The Courant factor is outside `(0, 1]`.
    InvalidCourant {
        /// The rejected factor.
        value: f64,
    },
    /// An explicit time step is not finite-positive or exceeds the
    /// Courant stability limit.
    InvalidTimeStep {
        /// The rejected time step, in seconds.
        value: f64,
        /// The largest stable time step for this grid.
        max_stable: f64,
    },
    /// Absorbing slabs on both faces of an axis would overlap.
    PmlTooThick {
        /// The offending axis.
        axis: Axis,
        /// Configured slab thickness in cells.
        thickness: usize,
        /// Cells available along the axis.
        cells: usize,
    },
    /// Absorbing-boundary grading parameters are invalid.
    InvalidPml {
        /// Description of the problem.
        reason: String,
    },
    /// A material has non-physical parameters.
    InvalidMaterial {
        /// Material name.
        name: String,
        /// Description of the problem.
        reason: String,
    },
    /// A material name was referenced but never defined.
    UnknownMaterial {
        /// The missing name.
        name: String,
    },
    /// A source, receiver, or geometry position lies outside the grid.
    OutOfBounds {
        /// What was being placed.
        what: String,
        /// The rejected node position.
        position: [usize; 3],
    },
    /// A box is inverted or does not fit the grid.
    InvalidRegion {
        /// Description of the problem.
        reason: String,
    },
    /// A waveform has non-physical parameters.
    InvalidWaveform {
        /// Description of the problem.
        reason: String,
    },
    /// An update operation ran on a grid whose coefficients and boundary
    /// profiles were never initialised.
    NotInitialised,
    /// The model handed to the solver factory does not match the
    /// requested execution target.
    TargetMismatch {
        /// The requested target.
        target: String,
        /// The kind of model supplied.
        model: String,
    },
    /// A sub-grid is placed outside the coarse grid, inside its absorbing
    /// boundary, or overlapping another sub-grid.
    SubGridPlacement {
        /// Description of the problem.
        reason: String,
    },
    /// Nested grids do not share one time step.
    TimeStepMismatch {
        /// Coarse-grid time step, in seconds.
        coarse: f64,
        /// Fine-grid time step, in seconds.
        fine: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has zero cells along an axis"),
            Self::InvalidSpacing { value } => {
                write!(f, "spatial step must be finite and positive, got {value}")
            }
            Self::InvalidCourant { value } => {
                write!(f, "courant factor must be in (0, 1], got {value}")
            }
            Self::InvalidTimeStep { value, max_stable } => write!(
                f,
                "time step {value} is invalid (stability limit is {max_stable})"
            ),
            Self::PmlTooThick {
                axis,
                thickness,
                cells,
            } => write!(
                f,
                "pml thickness {thickness} on both {axis} faces does not fit {cells} cells"
            ),
            Self::InvalidPml { reason } => write!(f, "invalid pml: {reason}"),
            Self::InvalidMaterial { name, reason } => {
                write!(f, "invalid material '{name}': {reason}")
            }
            Self::UnknownMaterial { name } => write!(f, "unknown material '{name}'"),
            Self::OutOfBounds { what, position } => {
                write!(f, "{what} at {position:?} is outside the grid")
            }
            Self::InvalidRegion { reason } => write!(f, "invalid region: {reason}"),
            Self::InvalidWaveform { reason } => write!(f, "invalid waveform: {reason}"),
            Self::NotInitialised => write!(f, "grid was not initialised before stepping"),
            Self::TargetMismatch { target, model } => {
                write!(f, "target '{target}' cannot run a {model} model")
            }
            Self::SubGridPlacement { reason } => write!(f, "sub-grid placement: {reason}"),
            Self::TimeStepMismatch { coarse, fine } => write!(
                f,
                "nested grids must share one time step (coarse {coarse}, fine {fine})"
            ),
        }
    }
}

impl Error for ConfigError {}

/// A numerical kernel or its execution unit failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// The finite-value sentinel found NaN or infinity in a field.
    NonFinite {
        /// The field containing the value.
        component: Component,
        /// Flat node index of the first bad value.
        index: usize,
    },
    /// The accelerator's execution unit stopped responding.
    DeviceLost,
    /// The accelerator's execution unit could not be started.
    DeviceUnavailable {
        /// Description of the failure.
        reason: String,
    },
    /// The simulation state does not fit in accelerator memory.
    OutOfDeviceMemory {
        /// Bytes the grid needs.
        required: usize,
        /// Bytes the device offers.
        available: usize,
    },
    /// Field exchange between a coarse grid and a sub-grid failed.
    ExchangeFailed {
        /// Description of the failure.
        reason: String,
    },
    /// A kernel failed for a backend-specific reason.
    KernelFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { component, index } => {
                write!(f, "non-finite value in {component} at node {index}")
            }
            Self::DeviceLost => write!(f, "accelerator device lost"),
            Self::DeviceUnavailable { reason } => {
                write!(f, "accelerator device unavailable: {reason}")
            }
            Self::OutOfDeviceMemory {
                required,
                available,
            } => write!(
                f,
                "grid needs {required} bytes but device offers {available}"
            ),
            Self::ExchangeFailed { reason } => write!(f, "sub-grid exchange failed: {reason}"),
            Self::KernelFailed { reason } => write!(f, "kernel failed: {reason}"),
        }
    }
}

impl Error for BackendError {}

/// Error returned by every update-strategy operation.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateError {
    /// The state was not correctly configured.
    Config(ConfigError),
    /// The backend failed while executing.
    Backend(BackendError),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration: {e}"),
            Self::Backend(e) => write!(f, "backend: {e}"),
        }
    }
}

impl Error for UpdateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Backend(e) => Some(e),
        }
    }
}

impl From<ConfigError> for UpdateError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<BackendError> for UpdateError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}
