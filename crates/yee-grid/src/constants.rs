//! Physical constants in SI units.

/// Speed of light in vacuum (m/s).
pub const C0: f64 = 299_792_458.0;

/// Permeability of free space (H/m).
pub const MU0: f64 = 1.256_637_062_12e-6;

/// Permittivity of free space (F/m), `1 / (mu0 c0^2)`.
pub const EPS0: f64 = 1.0 / (MU0 * C0 * C0);

/// Impedance of free space (ohms), `mu0 c0`.
pub const ETA0: f64 = MU0 * C0;
