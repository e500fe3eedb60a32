//! Grid configuration, validation, and the Courant time step.
//!
//! [`GridConfig`] is the builder input for an [`FdtdGrid`](crate::FdtdGrid).
//! [`validate()`](GridConfig::validate) checks structural invariants once,
//! before any storage is allocated.

use yee_core::{Axis, ConfigError, Dims};

use crate::constants::C0;
use crate::material::{Material, MaterialTable, FREE_SPACE_NAME};

// ── PmlConfig ──────────────────────────────────────────────────────

/// Convolutional PML applied to all six faces of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PmlConfig {
    /// Slab thickness in cells. Zero disables the absorbing boundary and
    /// leaves the outer faces as perfect electric conductors. Default: 10.
    pub thickness: usize,
    /// Polynomial grading order of the conductivity profile. Default: 3.
    pub order: f64,
    /// Peak conductivity, S/m. `None` picks the usual optimum
    /// `0.8 (order + 1) / (eta0 d)` per axis.
    pub sigma_max: Option<f64>,
}

impl PmlConfig {
    /// No absorbing boundary.
    pub fn none() -> Self {
        Self {
            thickness: 0,
            ..Self::default()
        }
    }

    /// Default grading with a chosen thickness.
    pub fn with_thickness(thickness: usize) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }
}

impl Default for PmlConfig {
    fn default() -> Self {
        Self {
            thickness: 10,
            order: 3.0,
            sigma_max: None,
        }
    }
}

// ── GridConfig ─────────────────────────────────────────────────────

/// Everything needed to allocate an [`FdtdGrid`](crate::FdtdGrid).
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Cell counts.
    pub dims: Dims,
    /// Cell size `[dx, dy, dz]`, in metres.
    pub spacing: [f64; 3],
    /// Fraction of the Courant limit used for the time step. Default: 0.99.
    pub courant: f64,
    /// Explicit time step overriding `courant`. Nested grids use this to
    /// share the finest grid's step.
    pub time_step: Option<f64>,
    /// Absorbing boundary.
    pub pml: PmlConfig,
    /// Named materials.
    pub materials: MaterialTable,
    /// Material filling the grid before any geometry is applied.
    pub background: String,
    /// Scan all fields for NaN or infinity at the end of every step.
    pub check_finite: bool,
}

impl GridConfig {
    /// A free-space grid with default boundary and time step.
    pub fn new(dims: Dims, spacing: [f64; 3]) -> Self {
        Self {
            dims,
            spacing,
            courant: 0.99,
            time_step: None,
            pml: PmlConfig::default(),
            materials: MaterialTable::new(),
            background: FREE_SPACE_NAME.to_string(),
            check_finite: false,
        }
    }

    /// A cubic grid of `n^3` cells of size `d`.
    pub fn cube(n: usize, d: f64) -> Self {
        Self::new(Dims::new(n, n, n), [d; 3])
    }

    /// Replace the absorbing boundary.
    pub fn with_pml(mut self, pml: PmlConfig) -> Self {
        self.pml = pml;
        self
    }

    /// Fix the time step explicitly.
    pub fn with_time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }

    /// Enable or disable the per-step finite-value check.
    pub fn with_check_finite(mut self, enabled: bool) -> Self {
        self.check_finite = enabled;
        self
    }

    /// Register a material.
    pub fn with_material(mut self, name: &str, material: Material) -> Result<Self, ConfigError> {
        self.materials.insert(name, material)?;
        Ok(self)
    }

    /// Set the background material by name.
    pub fn with_background(mut self, name: &str) -> Self {
        self.background = name.to_string();
        self
    }

    /// The largest stable time step, `1 / (c sqrt(1/dx^2 + 1/dy^2 + 1/dz^2))`.
    pub fn max_stable_time_step(&self) -> f64 {
        let [dx, dy, dz] = self.spacing;
        1.0 / (C0 * (1.0 / (dx * dx) + 1.0 / (dy * dy) + 1.0 / (dz * dz)).sqrt())
    }

    /// The time step the grid will use.
    pub fn time_step(&self) -> f64 {
        self.time_step
            .unwrap_or_else(|| self.courant * self.max_stable_time_step())
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: empty grid, bad spacing,
    /// Courant factor or time step, a PML that does not fit, bad PML
    /// grading, an invalid material, or an unknown background.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dims.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        for &d in &self.spacing {
            if !d.is_finite() || d <= 0.0 {
                return Err(ConfigError::InvalidSpacing { value: d });
            }
        }
        if !self.courant.is_finite() || self.courant <= 0.0 || self.courant > 1.0 {
            return Err(ConfigError::InvalidCourant {
                value: self.courant,
            });
        }
        let max_stable = self.max_stable_time_step();
        let dt = self.time_step();
        // Allow rounding noise from callers that computed dt themselves.
        if !dt.is_finite() || dt <= 0.0 || dt > max_stable * (1.0 + 1e-9) {
            return Err(ConfigError::InvalidTimeStep {
                value: dt,
                max_stable,
            });
        }
        let t = self.pml.thickness;
        if t > 0 {
            for axis in Axis::ALL {
                let cells = self.dims.cells(axis);
                if 2 * t >= cells {
                    return Err(ConfigError::PmlTooThick {
                        axis,
                        thickness: t,
                        cells,
                    });
                }
            }
            if !self.pml.order.is_finite() || self.pml.order < 0.0 {
                return Err(ConfigError::InvalidPml {
                    reason: format!("grading order must be >= 0, got {}", self.pml.order),
                });
            }
            if let Some(s) = self.pml.sigma_max {
                if !s.is_finite() || s < 0.0 {
                    return Err(ConfigError::InvalidPml {
                        reason: format!("sigma_max must be >= 0, got {s}"),
                    });
                }
            }
        }
        self.materials.validate()?;
        self.materials.require(&self.background)?;
        Ok(())
    }
}
