//! Point sources.

use yee_core::{Axis, Component, ConfigError, Dims};

use crate::waveform::Waveform;

/// How a source couples into the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceKind {
    /// Infinitesimal electric dipole: adds a current term to E.
    HertzianDipole,
    /// Infinitesimal magnetic dipole: adds a current term to H.
    MagneticDipole,
    /// Voltage source across one cell edge. A zero resistance makes it a
    /// hard source that overwrites E.
    VoltageSource {
        /// Internal resistance, ohms.
        resistance: f64,
    },
}

/// A point source at one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    /// Coupling.
    pub kind: SourceKind,
    /// Field direction excited.
    pub polarisation: Axis,
    /// Node of the excited component.
    pub position: [usize; 3],
    /// Time signature.
    pub waveform: Waveform,
    /// Time the source switches on, seconds.
    pub start: f64,
    /// Time the source switches off, seconds.
    pub stop: f64,
}

impl Source {
    fn new(kind: SourceKind, polarisation: Axis, position: [usize; 3], waveform: Waveform) -> Self {
        Self {
            kind,
            polarisation,
            position,
            waveform,
            start: 0.0,
            stop: f64::INFINITY,
        }
    }

    /// A Hertzian (electric) dipole.
    pub fn hertzian_dipole(polarisation: Axis, position: [usize; 3], waveform: Waveform) -> Self {
        Self::new(SourceKind::HertzianDipole, polarisation, position, waveform)
    }

    /// A magnetic dipole.
    pub fn magnetic_dipole(polarisation: Axis, position: [usize; 3], waveform: Waveform) -> Self {
        Self::new(SourceKind::MagneticDipole, polarisation, position, waveform)
    }

    /// A voltage source with internal resistance.
    pub fn voltage_source(
        polarisation: Axis,
        position: [usize; 3],
        waveform: Waveform,
        resistance: f64,
    ) -> Self {
        Self::new(
            SourceKind::VoltageSource { resistance },
            polarisation,
            position,
            waveform,
        )
    }

    /// Restrict the source to `[start, stop]` seconds.
    pub fn with_window(mut self, start: f64, stop: f64) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    /// Whether this source drives the magnetic field.
    pub fn is_magnetic(&self) -> bool {
        matches!(self.kind, SourceKind::MagneticDipole)
    }

    /// The field component this source writes.
    pub fn component(&self) -> Component {
        if self.is_magnetic() {
            Component::magnetic(self.polarisation)
        } else {
            Component::electric(self.polarisation)
        }
    }

    /// Whether the source is switched on at time `t`.
    pub fn is_active(&self, t: f64) -> bool {
        t >= self.start && t <= self.stop
    }

    /// Drive value for `step`, or `None` outside the source window.
    ///
    /// The waveform clock starts at `start`. Electric currents are sampled
    /// half a step later than magnetic ones, where the leapfrog places them.
    pub fn drive(&self, step: usize, dt: f64) -> Option<f64> {
        let t = step as f64 * dt;
        if !self.is_active(t) {
            return None;
        }
        let offset = if self.is_magnetic() { 0.0 } else { 0.5 * dt };
        Some(self.waveform.evaluate(t - self.start + offset))
    }

    /// Check position, waveform, and parameters against a grid.
    ///
    /// The node must be one the kernels update for this source's
    /// component; anything else would inject into a frozen boundary value.
    pub fn validate(&self, dims: Dims) -> Result<(), ConfigError> {
        if !dims.update_region(self.component()).contains(self.position) {
            return Err(ConfigError::OutOfBounds {
                what: format!("{} source", self.component()),
                position: self.position,
            });
        }
        self.waveform.validate()?;
        if let SourceKind::VoltageSource { resistance } = self.kind {
            if !resistance.is_finite() || resistance < 0.0 {
                return Err(ConfigError::InvalidWaveform {
                    reason: format!("voltage source resistance must be >= 0, got {resistance}"),
                });
            }
        }
        if self.start.is_nan() || self.stop.is_nan() || self.stop < self.start {
            return Err(ConfigError::InvalidWaveform {
                reason: format!("source window [{}, {}] is empty", self.start, self.stop),
            });
        }
        Ok(())
    }
}
