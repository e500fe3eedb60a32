//! The solver driving real strategies.

use yee_core::{BackendError, Component, ConfigError, Operation, UpdateError};
use yee_grid::{FdtdGrid, GridConfig, PmlConfig};
use yee_solver::{create_solver, Model, Solver, Steps, Target};
use yee_test_utils::fixtures::{dipole_grid, nested_model, seeded_grid};
use yee_test_utils::{expected_log, TracedUpdates};
use yee_updates::{
    AcceleratorUpdates, CpuUpdates, DeviceConfig, SubGridUpdates, UpdateStrategy,
};

fn assert_ordered<U: UpdateStrategy>(updates: U) {
    let mut traced = TracedUpdates::new(updates);
    Solver::new(&mut traced, Steps::new(3)).solve().unwrap();
    assert_eq!(traced.log(), expected_log(3).as_slice());
}

#[test]
fn every_backend_sees_the_fixed_order() {
    assert_ordered(CpuUpdates::new(dipole_grid(12, 2)));
    assert_ordered(AcceleratorUpdates::new(dipole_grid(12, 2), DeviceConfig::default()).unwrap());
    assert_ordered(SubGridUpdates::new(nested_model()).unwrap());
}

#[test]
fn create_solver_covers_every_target() {
    for target in [Target::Cpu, Target::Accelerator] {
        let solver = create_solver(target, dipole_grid(12, 2).into(), Steps::new(5)).unwrap();
        assert_eq!(solver.updates().name(), target.name());
        solver.solve().unwrap();
    }
    let solver = create_solver(Target::SubGrid, nested_model().into(), Steps::new(5)).unwrap();
    assert_eq!(solver.updates().name(), "subgrid");
    solver.solve().unwrap();
}

#[test]
fn identical_models_give_identical_traces() {
    let run = || {
        let mut cpu = CpuUpdates::new(dipole_grid(14, 3));
        Solver::new(&mut cpu, Steps::new(40)).solve().unwrap();
        cpu.into_grid()
    };
    let (a, b) = (run(), run());
    assert_eq!(a.receivers(), b.receivers());
    assert_eq!(a.fields(), b.fields());
}

#[test]
fn uninitialised_grid_fails_at_first_operation() {
    let cfg = GridConfig::cube(10, 1e-3).with_pml(PmlConfig::with_thickness(2));
    for target in [Target::Cpu, Target::Accelerator] {
        let grid = FdtdGrid::new(cfg.clone()).unwrap();
        let err = create_solver(target, Model::Single(grid), Steps::new(3))
            .unwrap()
            .solve()
            .unwrap_err();
        assert_eq!(err.step, 0);
        assert_eq!(err.operation, Operation::StoreOutputs);
        assert_eq!(err.source, UpdateError::Config(ConfigError::NotInitialised));
    }
}

#[test]
fn sentinel_reports_injected_nan() {
    let mut grid = seeded_grid(10, 2, 7);
    grid.set_check_finite(true);
    let dims = grid.dims();
    grid.fields_mut().ex[dims.index(5, 5, 5)] = f32::NAN;

    let mut cpu = CpuUpdates::new(grid);
    let err = Solver::new(&mut cpu, Steps::new(4)).solve().unwrap_err();
    assert_eq!(err.step, 0);
    assert_eq!(err.operation, Operation::UpdateElectricB);
    assert!(matches!(
        err.source,
        UpdateError::Backend(BackendError::NonFinite {
            component: Component::Ex,
            ..
        })
    ));
}

#[test]
fn sentinel_off_lets_nan_through() {
    let mut grid = seeded_grid(10, 2, 7);
    let dims = grid.dims();
    grid.fields_mut().ex[dims.index(5, 5, 5)] = f32::NAN;
    let mut cpu = CpuUpdates::new(grid);
    Solver::new(&mut cpu, Steps::new(2)).solve().unwrap();
    assert!(cpu.grid().fields().first_non_finite().is_some());
}

#[test]
fn snapshots_reach_the_host_on_both_backends() {
    let mut grid = dipole_grid(12, 2);
    let dims = grid.dims();
    let spec = yee_grid::SnapshotSpec::new(4, yee_core::Region::full(dims))
        .with_components(&[Component::Ez, Component::Hx]);
    grid.add_snapshot(spec).unwrap();

    let mut cpu = CpuUpdates::new(grid.clone());
    Solver::new(&mut cpu, Steps::new(8)).solve().unwrap();

    let mut device = AcceleratorUpdates::new(grid, DeviceConfig::default()).unwrap();
    Solver::new(&mut device, Steps::new(8)).solve().unwrap();
    assert_eq!(device.snapshots().len(), 1);
    let device_grid = device.into_grid().unwrap();

    assert_eq!(cpu.grid().snapshots(), device_grid.snapshots());
    let snap = &cpu.grid().snapshots()[0];
    assert_eq!(snap.step, 4);
    assert_eq!(snap.get(Component::Ez).map(<[f32]>::len), Some(dims.node_count()));
    assert!(snap.get(Component::Ey).is_none());
}
