//! Benchmark profiles for the yee FDTD engine.
//!
//! - [`reference_profile`]: 48^3 cells, lossy soil half-space with a Debye
//!   pole, 10-cell CPML, one dipole and one receiver.
//! - [`stress_profile`]: the same model at 96^3 cells.
//! - [`nested_profile`]: 32^3 coarse cells with one 2x sub-grid.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use yee_core::{Axis, Component, ConfigError, Region};
use yee_grid::{FdtdGrid, GridConfig, Material, PmlConfig, Receiver, Source, Waveform};
use yee_updates::{NestedModel, SubGridSpec};

/// Cell size of every profile, in metres.
pub const CELL: f64 = 2e-3;

fn half_space(n: usize) -> Result<GridConfig, ConfigError> {
    GridConfig::cube(n, CELL)
        .with_pml(PmlConfig::with_thickness(10))
        .with_material("soil", Material::lossy(6.0, 5e-3).with_debye(4.0, 1e-9))
}

fn populate(grid: &mut FdtdGrid) -> Result<(), ConfigError> {
    let n = grid.dims().nx;
    grid.fill_box(Region::new([0, 0, 0], [n, n, n / 2]), "soil")?;
    let c = n / 2;
    grid.add_source(Source::hertzian_dipole(
        Axis::Z,
        [c, c, c + 2],
        Waveform::ricker(1.5e9),
    ))?;
    grid.add_receiver(Receiver::with_components(
        "rx",
        [c + 5, c, c + 2],
        &[Component::Ez],
    ))?;
    Ok(())
}

/// Initialised 48^3 reference model.
pub fn reference_profile() -> Result<FdtdGrid, ConfigError> {
    profile(48)
}

/// Initialised 96^3 stress model.
pub fn stress_profile() -> Result<FdtdGrid, ConfigError> {
    profile(96)
}

fn profile(n: usize) -> Result<FdtdGrid, ConfigError> {
    let mut grid = FdtdGrid::new(half_space(n)?)?;
    populate(&mut grid)?;
    grid.initialise();
    Ok(grid)
}

/// Initialised 32^3 coarse model with a 2x sub-grid over cells `12..20`.
pub fn nested_profile() -> Result<NestedModel, ConfigError> {
    let spec = SubGridSpec::new([12, 12, 12], [20, 20, 20], 2);
    let mut model = NestedModel::build(half_space(32)?, &[spec])?;
    model.fill_box(Region::new([0, 0, 0], [32, 32, 16]), "soil")?;
    model.coarse_mut().add_source(Source::hertzian_dipole(
        Axis::Z,
        [16, 16, 21],
        Waveform::ricker(1.5e9),
    ))?;
    model.initialise();
    Ok(model)
}
