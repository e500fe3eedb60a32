//! Ready-made grids and nested models.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use yee_core::{Axis, Component};
use yee_grid::{FdtdGrid, GridConfig, PmlConfig, Receiver, Source, Waveform};
use yee_updates::{NestedModel, SubGridSpec};

/// Cell size of every fixture, in metres.
pub const CELL: f64 = 2e-3;

/// Centre frequency of the fixture pulses, in hertz.
pub const FREQUENCY: f64 = 1.5e10;

/// An `n^3` free-space grid with a `pml`-cell absorbing boundary, a
/// z-polarised Ricker dipole at the centre and an `Ez` receiver named
/// `"rx"` three cells along x. Initialised.
pub fn dipole_grid(n: usize, pml: usize) -> FdtdGrid {
    let cfg = GridConfig::cube(n, CELL).with_pml(PmlConfig::with_thickness(pml));
    let mut grid = FdtdGrid::new(cfg).expect("fixture config is valid");
    let c = n / 2;
    grid.add_source(Source::hertzian_dipole(
        Axis::Z,
        [c, c, c],
        Waveform::ricker(FREQUENCY),
    ))
    .expect("fixture source is inside the grid");
    grid.add_receiver(Receiver::with_components(
        "rx",
        [c + 3, c, c],
        &[Component::Ez],
    ))
    .expect("fixture receiver is inside the grid");
    grid.initialise();
    grid
}

/// An initialised `n^3` grid without sources whose fields hold small
/// random values drawn from a ChaCha8 stream seeded with `seed`.
pub fn seeded_grid(n: usize, pml: usize, seed: u64) -> FdtdGrid {
    let cfg = GridConfig::cube(n, CELL).with_pml(PmlConfig::with_thickness(pml));
    let mut grid = FdtdGrid::new(cfg).expect("fixture config is valid");
    grid.initialise();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for component in Component::ALL {
        for v in grid.fields_mut().get_mut(component) {
            *v = rng.random::<f32>() * 2e-3 - 1e-3;
        }
    }
    grid
}

/// A 24-cell coarse grid with a 4-cell boundary and one 2x sub-grid over
/// coarse cells `9..15`. A dipole sits in the coarse grid at `(7, 12, 12)`;
/// receiver `"coarse"` is at the coarse centre and receiver `"fine"` at the
/// centre of the sub-grid. Initialised.
pub fn nested_model() -> NestedModel {
    let cfg = GridConfig::cube(24, CELL).with_pml(PmlConfig::with_thickness(4));
    let spec = SubGridSpec::new([9, 9, 9], [15, 15, 15], 2);
    let mut model = NestedModel::build(cfg, &[spec])
        .expect("fixture sub-grid placement is valid");
    model
        .coarse_mut()
        .add_source(Source::hertzian_dipole(
            Axis::Z,
            [7, 12, 12],
            Waveform::ricker(FREQUENCY),
        ))
        .expect("fixture source is inside the grid");
    model
        .coarse_mut()
        .add_receiver(Receiver::with_components("coarse", [12, 12, 12], &[Component::Ez]))
        .expect("fixture receiver is inside the grid");
    model.subgrids_mut()[0]
        .grid_mut()
        .add_receiver(Receiver::with_components("fine", [6, 6, 6], &[Component::Ez]))
        .expect("fixture receiver is inside the grid");
    model.initialise();
    model
}
