//! Materials and their precomputed leapfrog update coefficients.
//!
//! Materials are registered by name in an insertion-ordered table; a
//! material's position in the table is its numeric ID in the per-component
//! ID arrays. IDs 0 and 1 are always free space and a perfect electric
//! conductor.

use indexmap::IndexMap;
use yee_core::ConfigError;

use crate::constants::{EPS0, MU0};

/// ID of the built-in free-space material.
pub const FREE_SPACE: u16 = 0;

/// ID of the built-in perfect electric conductor.
pub const PEC: u16 = 1;

/// Name of the built-in free-space material.
pub const FREE_SPACE_NAME: &str = "free_space";

/// Name of the built-in perfect electric conductor.
pub const PEC_NAME: &str = "pec";

/// A single-pole Debye relaxation.
///
/// The material's `eps_r` is the infinite-frequency permittivity; the
/// static permittivity is `eps_r + delta_eps`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebyePole {
    /// Permittivity step between static and infinite frequency.
    pub delta_eps: f64,
    /// Relaxation time, in seconds.
    pub tau: f64,
}

/// Electromagnetic properties of a material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Relative permittivity (infinite-frequency value when dispersive).
    pub eps_r: f64,
    /// Electric conductivity, S/m.
    pub sigma: f64,
    /// Relative permeability.
    pub mu_r: f64,
    /// Magnetic loss, ohms/m.
    pub sigma_m: f64,
    /// Optional Debye dispersion.
    pub debye: Option<DebyePole>,
}

impl Material {
    /// Vacuum.
    pub const fn free_space() -> Self {
        Self {
            eps_r: 1.0,
            sigma: 0.0,
            mu_r: 1.0,
            sigma_m: 0.0,
            debye: None,
        }
    }

    /// A lossless dielectric.
    pub const fn dielectric(eps_r: f64) -> Self {
        Self {
            eps_r,
            sigma: 0.0,
            mu_r: 1.0,
            sigma_m: 0.0,
            debye: None,
        }
    }

    /// A conductive dielectric.
    pub const fn lossy(eps_r: f64, sigma: f64) -> Self {
        Self {
            eps_r,
            sigma,
            mu_r: 1.0,
            sigma_m: 0.0,
            debye: None,
        }
    }

    /// Attach a Debye pole.
    pub const fn with_debye(mut self, delta_eps: f64, tau: f64) -> Self {
        self.debye = Some(DebyePole { delta_eps, tau });
        self
    }

    /// Check that every parameter is physical.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidMaterial {
            name: name.to_string(),
            reason,
        };
        if !self.eps_r.is_finite() || self.eps_r < 1.0 {
            return Err(invalid(format!("eps_r must be >= 1, got {}", self.eps_r)));
        }
        if !self.mu_r.is_finite() || self.mu_r < 1.0 {
            return Err(invalid(format!("mu_r must be >= 1, got {}", self.mu_r)));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(invalid(format!("sigma must be >= 0, got {}", self.sigma)));
        }
        if !self.sigma_m.is_finite() || self.sigma_m < 0.0 {
            return Err(invalid(format!(
                "sigma_m must be >= 0, got {}",
                self.sigma_m
            )));
        }
        if let Some(pole) = self.debye {
            if !pole.delta_eps.is_finite() || pole.delta_eps <= 0.0 {
                return Err(invalid(format!(
                    "debye delta_eps must be > 0, got {}",
                    pole.delta_eps
                )));
            }
            if !pole.tau.is_finite() || pole.tau <= 0.0 {
                return Err(invalid(format!("debye tau must be > 0, got {}", pole.tau)));
            }
        }
        Ok(())
    }
}

/// Insertion-ordered table of named materials.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialTable {
    entries: IndexMap<String, Material>,
}

impl MaterialTable {
    /// A table holding only the built-in materials.
    pub fn new() -> Self {
        let mut entries = IndexMap::new();
        entries.insert(FREE_SPACE_NAME.to_string(), Material::free_space());
        // PEC coefficients are special-cased; the stored properties are
        // only a placeholder.
        entries.insert(PEC_NAME.to_string(), Material::free_space());
        Self { entries }
    }

    /// Register or replace a material. Returns its ID.
    ///
    /// The built-in names cannot be redefined.
    pub fn insert(&mut self, name: impl Into<String>, material: Material) -> Result<u16, ConfigError> {
        let name = name.into();
        if name == FREE_SPACE_NAME || name == PEC_NAME {
            return Err(ConfigError::InvalidMaterial {
                name,
                reason: "built-in materials cannot be redefined".to_string(),
            });
        }
        material.validate(&name)?;
        let (index, _) = self.entries.insert_full(name, material);
        u16::try_from(index).map_err(|_| ConfigError::InvalidMaterial {
            name: self
                .entries
                .get_index(index)
                .map(|(n, _)| n.clone())
                .unwrap_or_default(),
            reason: "more than u16::MAX materials".to_string(),
        })
    }

    /// ID of a named material.
    pub fn id(&self, name: &str) -> Option<u16> {
        self.entries
            .get_index_of(name)
            .and_then(|i| u16::try_from(i).ok())
    }

    /// ID of a named material, or `UnknownMaterial`.
    pub fn require(&self, name: &str) -> Result<u16, ConfigError> {
        self.id(name).ok_or_else(|| ConfigError::UnknownMaterial {
            name: name.to_string(),
        })
    }

    /// Material by ID.
    pub fn get(&self, id: u16) -> Option<&Material> {
        self.entries.get_index(id as usize).map(|(_, m)| m)
    }

    /// Number of registered materials, built-ins included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the built-ins are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, material)` in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.entries.iter().map(|(n, m)| (n.as_str(), m))
    }

    /// Whether any material carries a Debye pole.
    pub fn has_dispersion(&self) -> bool {
        self.entries.values().any(|m| m.debye.is_some())
    }

    /// Validate every registered material.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, material) in &self.entries {
            material.validate(name)?;
        }
        Ok(())
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Electric update coefficients for one material.
///
/// Phase A computes `E = ca E + cb curl(H) / d + ce psi`; phase B advances
/// the Debye accumulator `psi = decay psi + dchi E`. The `1/d` spatial
/// factor is applied per axis by the kernels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ElectricCoeffs {
    /// Self term.
    pub ca: f32,
    /// Curl term (and source scaling), without the spatial factor.
    pub cb: f32,
    /// Weight of the dispersive accumulator.
    pub ce: f32,
    /// Per-step decay of the dispersive accumulator.
    pub decay: f32,
    /// Susceptibility increment fed into the accumulator.
    pub dchi: f32,
}

/// Magnetic update coefficients for one material.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MagneticCoeffs {
    /// Self term.
    pub da: f32,
    /// Curl term (and source scaling), without the spatial factor.
    pub db: f32,
}

/// Coefficient tables indexed by material ID.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateCoefficients {
    /// Electric coefficients per material.
    pub electric: Vec<ElectricCoeffs>,
    /// Magnetic coefficients per material.
    pub magnetic: Vec<MagneticCoeffs>,
    /// `1 / dx`, `1 / dy`, `1 / dz`.
    pub inv_spacing: [f32; 3],
    /// Whether any material is dispersive.
    pub dispersive: bool,
}

impl UpdateCoefficients {
    /// Precompute coefficients for every material in `table`.
    ///
    /// Conductive loss is treated semi-implicitly; Debye poles use
    /// piecewise-constant recursive convolution.
    pub fn compute(table: &MaterialTable, dt: f64, spacing: [f64; 3]) -> Self {
        let mut electric = Vec::with_capacity(table.len());
        let mut magnetic = Vec::with_capacity(table.len());
        for (id, (_, m)) in table.iter().enumerate() {
            if id == PEC as usize {
                electric.push(ElectricCoeffs::default());
                magnetic.push(magnetic_coeffs(&Material::free_space(), dt));
                continue;
            }
            electric.push(electric_coeffs(m, dt));
            magnetic.push(magnetic_coeffs(m, dt));
        }
        Self {
            electric,
            magnetic,
            inv_spacing: [
                (1.0 / spacing[0]) as f32,
                (1.0 / spacing[1]) as f32,
                (1.0 / spacing[2]) as f32,
            ],
            dispersive: table.has_dispersion(),
        }
    }
}

fn electric_coeffs(m: &Material, dt: f64) -> ElectricCoeffs {
    let loss = m.sigma * dt / (2.0 * EPS0);
    let (chi0, dchi, decay) = match m.debye {
        Some(pole) => {
            let decay = (-dt / pole.tau).exp();
            let chi0 = pole.delta_eps * (1.0 - decay);
            (chi0, pole.delta_eps * (1.0 - decay).powi(2), decay)
        }
        None => (0.0, 0.0, 0.0),
    };
    let denom = m.eps_r + chi0 + loss;
    ElectricCoeffs {
        ca: ((m.eps_r - loss) / denom) as f32,
        cb: (dt / (EPS0 * denom)) as f32,
        ce: if m.debye.is_some() {
            (1.0 / denom) as f32
        } else {
            0.0
        },
        decay: decay as f32,
        dchi: dchi as f32,
    }
}

fn magnetic_coeffs(m: &Material, dt: f64) -> MagneticCoeffs {
    let mu = MU0 * m.mu_r;
    let loss = m.sigma_m * dt / (2.0 * mu);
    MagneticCoeffs {
        da: ((1.0 - loss) / (1.0 + loss)) as f32,
        db: ((dt / mu) / (1.0 + loss)) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_have_fixed_ids() {
        let table = MaterialTable::new();
        assert_eq!(table.id(FREE_SPACE_NAME), Some(FREE_SPACE));
        assert_eq!(table.id(PEC_NAME), Some(PEC));
    }

    #[test]
    fn builtins_cannot_be_redefined() {
        let mut table = MaterialTable::new();
        let err = table.insert("pec", Material::dielectric(4.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaterial { .. }));
    }

    #[test]
    fn insertion_order_defines_ids() {
        let mut table = MaterialTable::new();
        assert_eq!(table.insert("sand", Material::dielectric(3.0)).unwrap(), 2);
        assert_eq!(table.insert("water", Material::lossy(80.0, 0.01)).unwrap(), 3);
        // Replacing keeps the original slot.
        assert_eq!(table.insert("sand", Material::dielectric(5.0)).unwrap(), 2);
        assert_eq!(table.get(2).unwrap().eps_r, 5.0);
    }

    #[test]
    fn unphysical_material_rejected() {
        assert!(Material::dielectric(0.5).validate("x").is_err());
        assert!(Material::lossy(2.0, -1.0).validate("x").is_err());
        assert!(Material::dielectric(2.0)
            .with_debye(1.0, 0.0)
            .validate("x")
            .is_err());
    }

    #[test]
    fn free_space_coefficients() {
        let dt = 1e-12;
        let c = UpdateCoefficients::compute(&MaterialTable::new(), dt, [1e-3; 3]);
        let e = c.electric[FREE_SPACE as usize];
        assert!((e.ca - 1.0).abs() < 1e-6);
        assert!(((e.cb as f64) - dt / EPS0).abs() / (dt / EPS0) < 1e-6);
        assert_eq!(e.ce, 0.0);
        let h = c.magnetic[FREE_SPACE as usize];
        assert!((h.da - 1.0).abs() < 1e-6);
        assert!(!c.dispersive);
    }

    #[test]
    fn pec_freezes_electric_field() {
        let c = UpdateCoefficients::compute(&MaterialTable::new(), 1e-12, [1e-3; 3]);
        let pec = c.electric[PEC as usize];
        assert_eq!(pec.ca, 0.0);
        assert_eq!(pec.cb, 0.0);
    }

    #[test]
    fn loss_damps_self_term() {
        let mut table = MaterialTable::new();
        let id = table.insert("lossy", Material::lossy(4.0, 0.1)).unwrap();
        let c = UpdateCoefficients::compute(&table, 1e-11, [1e-3; 3]);
        let e = c.electric[id as usize];
        assert!(e.ca < 1.0 && e.ca > 0.0);
    }

    #[test]
    fn debye_material_marks_table_dispersive() {
        let mut table = MaterialTable::new();
        let id = table
            .insert("soil", Material::dielectric(4.0).with_debye(6.0, 1e-9))
            .unwrap();
        let c = UpdateCoefficients::compute(&table, 1e-12, [1e-3; 3]);
        assert!(c.dispersive);
        let e = c.electric[id as usize];
        assert!(e.ce > 0.0);
        assert!(e.decay > 0.0 && e.decay < 1.0);
        assert!(e.dchi > 0.0);
    }
}
