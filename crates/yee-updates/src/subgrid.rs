//! Nested sub-grids stepped in lockstep with a coarse grid.
//!
//! Each [`SubGrid`] refines a box of coarse cells by an integer ratio.
//! Every grid shares one time step (the finest grid's Courant step), so
//! one call of each operation advances all of them by the same interval.
//! The grids exchange electric field once per step, inside phase B:
//!
//! ```text
//! children phase B
//! restriction    coarse E strictly inside each box  <- mean of the r
//!                                                      coincident fine edges
//! parent phase B
//! prolongation   fine tangential E on each box face <- nearest coarse E
//! ```
//!
//! Every other operation runs on the parent first, then on each child.

use yee_core::{
    Axis, BackendError, Component, ConfigError, Dims, Operation, Region, UpdateError,
};
use yee_grid::{FdtdGrid, GridConfig, PmlConfig};

use crate::kernels::{self, Execution};
use crate::strategy::UpdateStrategy;

// ── SubGridSpec ──────────────────────────────────────────────────

/// Placement of one refined region, in coarse cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubGridSpec {
    /// First coarse cell covered, inclusive.
    pub lower: [usize; 3],
    /// Last coarse cell covered, exclusive.
    pub upper: [usize; 3],
    /// Fine cells per coarse cell along every axis.
    pub ratio: usize,
}

impl SubGridSpec {
    /// Refine coarse cells `lower..upper` by `ratio`.
    pub const fn new(lower: [usize; 3], upper: [usize; 3], ratio: usize) -> Self {
        Self {
            lower,
            upper,
            ratio,
        }
    }

    /// The covered coarse cells.
    pub const fn cells(&self) -> Region {
        Region::new(self.lower, self.upper)
    }

    /// Cell counts of the fine grid.
    pub fn fine_dims(&self) -> Dims {
        let n = |a: usize| {
            self.upper[a]
                .saturating_sub(self.lower[a])
                .saturating_mul(self.ratio)
        };
        Dims::new(n(0), n(1), n(2))
    }

    /// Map a box of coarse cells inside this sub-grid to fine cells.
    fn to_fine(&self, cells: Region) -> Region {
        let scale = |v: usize, a: usize| (v - self.lower[a]) * self.ratio;
        Region::new(
            [0, 1, 2].map(|a| scale(cells.lower[a], a)),
            [0, 1, 2].map(|a| scale(cells.upper[a], a)),
        )
    }
}

/// Check ratios, extents, clearance from the boundary, and overlap.
fn validate_placement(dims: Dims, pml: usize, specs: &[SubGridSpec]) -> Result<(), ConfigError> {
    let n = dims.as_array();
    for (i, spec) in specs.iter().enumerate() {
        if spec.ratio < 2 {
            return Err(ConfigError::SubGridPlacement {
                reason: format!("sub-grid {i}: ratio must be >= 2, got {}", spec.ratio),
            });
        }
        for axis in Axis::ALL {
            let a = axis.index();
            if spec.lower[a] >= spec.upper[a] {
                return Err(ConfigError::SubGridPlacement {
                    reason: format!("sub-grid {i}: empty along {axis}"),
                });
            }
            // At least one ordinary coarse cell between the box and the
            // absorbing layer (or the outer face when there is none).
            if spec.lower[a] <= pml || spec.upper[a] >= n[a].saturating_sub(pml) {
                return Err(ConfigError::SubGridPlacement {
                    reason: format!(
                        "sub-grid {i}: cells {}..{} along {axis} reach the boundary layer ({pml} of {} cells)",
                        spec.lower[a], spec.upper[a], n[a]
                    ),
                });
            }
        }
        let fine_nodes = (0..3).try_fold(1usize, |acc, a| {
            (spec.upper[a] - spec.lower[a])
                .checked_mul(spec.ratio)
                .and_then(|cells| cells.checked_add(1))
                .and_then(|nodes| acc.checked_mul(nodes))
        });
        if fine_nodes.is_none() {
            return Err(ConfigError::SubGridPlacement {
                reason: format!("sub-grid {i}: ratio {} is too large", spec.ratio),
            });
        }
        for (j, other) in specs.iter().enumerate().skip(i + 1) {
            let overlap = (0..3).all(|a| spec.lower[a] < other.upper[a] && other.lower[a] < spec.upper[a]);
            if overlap {
                return Err(ConfigError::SubGridPlacement {
                    reason: format!("sub-grids {i} and {j} overlap"),
                });
            }
        }
    }
    Ok(())
}

// ── SubGrid / NestedModel ────────────────────────────────────────

/// A fine grid and where it sits in the coarse grid.
#[derive(Clone, Debug)]
pub struct SubGrid {
    spec: SubGridSpec,
    grid: FdtdGrid,
}

impl SubGrid {
    /// Pair a fine grid with its placement. Consistency is checked when
    /// the sub-grid is handed to [`SubGridUpdates::new`].
    pub fn new(spec: SubGridSpec, grid: FdtdGrid) -> Self {
        Self { spec, grid }
    }

    /// Placement.
    pub fn spec(&self) -> &SubGridSpec {
        &self.spec
    }

    /// The fine grid.
    pub fn grid(&self) -> &FdtdGrid {
        &self.grid
    }

    /// Mutable access to the fine grid, e.g. to add sources or receivers
    /// in fine-grid coordinates.
    pub fn grid_mut(&mut self) -> &mut FdtdGrid {
        &mut self.grid
    }
}

/// A coarse grid with its sub-grids, before or after stepping.
#[derive(Clone, Debug)]
pub struct NestedModel {
    coarse: FdtdGrid,
    subgrids: Vec<SubGrid>,
}

impl NestedModel {
    /// Build a coarse grid from `config` and one fine grid per spec.
    ///
    /// All grids take the time step of the finest grid: the coarse
    /// step divided by the largest ratio. Fine grids inherit the coarse
    /// materials and background and carry no absorbing layer.
    pub fn build(config: GridConfig, specs: &[SubGridSpec]) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_placement(config.dims, config.pml.thickness, specs)?;
        let finest = specs.iter().map(|s| s.ratio).max().unwrap_or(1);
        let dt = config.time_step() / finest as f64;

        let subgrids = specs
            .iter()
            .map(|spec| {
                let mut fine = config.clone().with_pml(PmlConfig::none()).with_time_step(dt);
                fine.dims = spec.fine_dims();
                fine.spacing = config.spacing.map(|d| d / spec.ratio as f64);
                Ok(SubGrid::new(*spec, FdtdGrid::new(fine)?))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let coarse = FdtdGrid::new(config.with_time_step(dt))?;
        Ok(Self { coarse, subgrids })
    }

    /// Assemble a model from grids built elsewhere.
    pub fn from_parts(coarse: FdtdGrid, subgrids: Vec<SubGrid>) -> Self {
        Self { coarse, subgrids }
    }

    /// Split into the coarse grid and its sub-grids.
    pub fn into_parts(self) -> (FdtdGrid, Vec<SubGrid>) {
        (self.coarse, self.subgrids)
    }

    /// The coarse grid.
    pub fn coarse(&self) -> &FdtdGrid {
        &self.coarse
    }

    /// Mutable access to the coarse grid.
    pub fn coarse_mut(&mut self) -> &mut FdtdGrid {
        &mut self.coarse
    }

    /// The sub-grids.
    pub fn subgrids(&self) -> &[SubGrid] {
        &self.subgrids
    }

    /// Mutable access to the sub-grids.
    pub fn subgrids_mut(&mut self) -> &mut [SubGrid] {
        &mut self.subgrids
    }

    /// Shared time step.
    pub fn dt(&self) -> f64 {
        self.coarse.dt()
    }

    /// Fill coarse cells with `material`, refining the part of the box
    /// that falls inside each sub-grid.
    pub fn fill_box(&mut self, cells: Region, material: &str) -> Result<(), ConfigError> {
        self.coarse.fill_box(cells, material)?;
        for subgrid in &mut self.subgrids {
            let overlap = cells.intersect(&subgrid.spec.cells());
            if !overlap.is_empty() {
                let fine = subgrid.spec.to_fine(overlap);
                subgrid.grid.fill_box(fine, material)?;
            }
        }
        Ok(())
    }

    /// Initialise every grid.
    pub fn initialise(&mut self) {
        self.coarse.initialise();
        for subgrid in &mut self.subgrids {
            subgrid.grid.initialise();
        }
    }
}

// ── SubGridUpdates ───────────────────────────────────────────────

/// Steps a coarse grid and its sub-grids in lockstep.
#[derive(Debug)]
pub struct SubGridUpdates {
    coarse: FdtdGrid,
    subgrids: Vec<SubGrid>,
    execution: Execution,
}

impl SubGridUpdates {
    /// Take ownership of a nested model.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SubGridPlacement`] if a sub-grid is outside the
    /// coarse grid, inside its absorbing layer, overlapping another,
    /// sized or spaced inconsistently with its ratio, or carries an
    /// absorbing layer of its own;
    /// [`ConfigError::TimeStepMismatch`] if the grids do not share one
    /// time step.
    pub fn new(model: NestedModel) -> Result<Self, ConfigError> {
        let (coarse, subgrids) = model.into_parts();
        let specs: Vec<SubGridSpec> = subgrids.iter().map(|s| s.spec).collect();
        validate_placement(coarse.dims(), coarse.pml_thickness(), &specs)?;
        for (i, subgrid) in subgrids.iter().enumerate() {
            let fine = &subgrid.grid;
            if fine.pml_thickness() > 0 {
                return Err(ConfigError::SubGridPlacement {
                    reason: format!(
                        "sub-grid {i}: fine grid has a {}-cell absorbing layer",
                        fine.pml_thickness()
                    ),
                });
            }
            if fine.dims() != subgrid.spec.fine_dims() {
                return Err(ConfigError::SubGridPlacement {
                    reason: format!(
                        "sub-grid {i}: fine grid is {:?}, placement needs {:?}",
                        fine.dims(),
                        subgrid.spec.fine_dims()
                    ),
                });
            }
            let r = subgrid.spec.ratio as f64;
            let spacing_ok = (0..3).all(|a| {
                let expected = coarse.spacing()[a] / r;
                (fine.spacing()[a] - expected).abs() <= expected * 1e-9
            });
            if !spacing_ok {
                return Err(ConfigError::SubGridPlacement {
                    reason: format!("sub-grid {i}: spacing is not the coarse spacing / {r}"),
                });
            }
            if (fine.dt() - coarse.dt()).abs() > coarse.dt() * 1e-9 {
                return Err(ConfigError::TimeStepMismatch {
                    coarse: coarse.dt(),
                    fine: fine.dt(),
                });
            }
        }
        tracing::debug!(subgrids = subgrids.len(), dt = coarse.dt(), "nested grids ready");
        Ok(Self {
            coarse,
            subgrids,
            execution: Execution::Sequential,
        })
    }

    /// Choose how volume kernels walk each grid.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// The coarse grid.
    pub fn coarse(&self) -> &FdtdGrid {
        &self.coarse
    }

    /// The sub-grids.
    pub fn subgrids(&self) -> &[SubGrid] {
        &self.subgrids
    }

    /// Give the grids back.
    pub fn into_model(self) -> NestedModel {
        NestedModel::from_parts(self.coarse, self.subgrids)
    }

    /// Run `f` on the coarse grid, then on every fine grid.
    fn each_grid<F>(&mut self, mut f: F) -> Result<(), UpdateError>
    where
        F: FnMut(&mut FdtdGrid) -> Result<(), UpdateError>,
    {
        f(&mut self.coarse)?;
        for subgrid in &mut self.subgrids {
            f(&mut subgrid.grid)?;
        }
        Ok(())
    }

    fn kernel(&mut self, operation: Operation, step: usize) -> Result<(), UpdateError> {
        let exec = self.execution;
        self.each_grid(|grid| {
            let mut parts = grid.kernel_parts()?;
            match operation {
                Operation::UpdateMagnetic => kernels::update_magnetic(exec, &mut parts),
                Operation::UpdateMagneticPml => kernels::update_magnetic_pml(&mut parts),
                Operation::UpdateMagneticSources => {
                    kernels::update_magnetic_sources(&mut parts, step)
                }
                Operation::UpdateElectricA => kernels::update_electric_a(exec, &mut parts),
                Operation::UpdateElectricPml => kernels::update_electric_pml(&mut parts),
                Operation::UpdateElectricSources => {
                    kernels::update_electric_sources(&mut parts, step)
                }
                Operation::StoreOutputs
                | Operation::StoreSnapshots
                | Operation::UpdateElectricB => {}
            }
            Ok(())
        })
    }
}

/// Replace coarse E strictly inside the sub-grid box by the mean of the
/// coincident fine edges.
fn restrict(coarse: &mut FdtdGrid, subgrid: &SubGrid) -> Result<(), BackendError> {
    let spec = subgrid.spec;
    let r = spec.ratio;
    let cd = coarse.dims();
    let fd = subgrid.grid.dims();
    check_exchange(cd, fd, &spec)?;
    for axis in Axis::ALL {
        let a = axis.index();
        let component = Component::electric(axis);
        // Own axis: every edge in the box. Transverse: interior nodes only.
        let mut lower = spec.lower.map(|v| v + 1);
        lower[a] = spec.lower[a];
        let fine = subgrid.grid.fields().get(component);
        let target = coarse.fields_mut().get_mut(component);
        for p in Region::new(lower, spec.upper).nodes() {
            let q: [usize; 3] = [0, 1, 2].map(|t| (p[t] - spec.lower[t]) * r);
            let sum: f64 = (0..r)
                .map(|s| {
                    let mut edge = q;
                    edge[a] += s;
                    f64::from(fine[fd.index_of(edge)])
                })
                .sum();
            target[cd.index_of(p)] = (sum / r as f64) as f32;
        }
    }
    Ok(())
}

/// Set fine tangential E on every outer face of the sub-grid from the
/// nearest coarse E.
fn prolong(coarse: &FdtdGrid, subgrid: &mut SubGrid) -> Result<(), BackendError> {
    let spec = subgrid.spec;
    let r = spec.ratio;
    let cd = coarse.dims();
    let fd = subgrid.grid.dims();
    check_exchange(cd, fd, &spec)?;
    let n = fd.as_array();
    for axis in Axis::ALL {
        let a = axis.index();
        let component = Component::electric(axis);
        let source = coarse.fields().get(component);
        let fine = subgrid.grid.fields_mut().get_mut(component);
        let (b, c) = axis.cyclic();
        for normal in [b.index(), c.index()] {
            for face in [0, n[normal]] {
                let mut lower = [0; 3];
                let mut upper = fd.node_shape();
                upper[a] = n[a];
                lower[normal] = face;
                upper[normal] = face + 1;
                for q in Region::new(lower, upper).nodes() {
                    let p: [usize; 3] = [0, 1, 2].map(|t| {
                        if t == a {
                            spec.lower[t] + q[t] / r
                        } else {
                            spec.lower[t] + (q[t] + r / 2) / r
                        }
                    });
                    fine[fd.index_of(q)] = source[cd.index_of(p)];
                }
            }
        }
    }
    Ok(())
}

fn check_exchange(coarse: Dims, fine: Dims, spec: &SubGridSpec) -> Result<(), BackendError> {
    if fine != spec.fine_dims() || !spec.cells().fits(coarse) {
        return Err(BackendError::ExchangeFailed {
            reason: format!(
                "sub-grid {:?}..{:?} x{} does not match fine grid {:?} in coarse grid {:?}",
                spec.lower, spec.upper, spec.ratio, fine, coarse
            ),
        });
    }
    Ok(())
}

impl UpdateStrategy for SubGridUpdates {
    fn name(&self) -> &str {
        "subgrid"
    }

    fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError> {
        self.each_grid(|grid| Ok(grid.store_outputs(step)?))
    }

    fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError> {
        self.each_grid(|grid| Ok(grid.store_snapshots(step)?))
    }

    fn update_magnetic(&mut self) -> Result<(), UpdateError> {
        self.kernel(Operation::UpdateMagnetic, 0)
    }

    fn update_magnetic_pml(&mut self) -> Result<(), UpdateError> {
        self.kernel(Operation::UpdateMagneticPml, 0)
    }

    fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError> {
        self.kernel(Operation::UpdateMagneticSources, step)
    }

    fn update_electric_a(&mut self) -> Result<(), UpdateError> {
        self.kernel(Operation::UpdateElectricA, 0)
    }

    fn update_electric_pml(&mut self) -> Result<(), UpdateError> {
        self.kernel(Operation::UpdateElectricPml, 0)
    }

    fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError> {
        self.kernel(Operation::UpdateElectricSources, step)
    }

    fn update_electric_b(&mut self) -> Result<(), UpdateError> {
        let exec = self.execution;
        for subgrid in &mut self.subgrids {
            kernels::update_electric_b(exec, &mut subgrid.grid.kernel_parts()?)?;
        }
        for subgrid in &self.subgrids {
            restrict(&mut self.coarse, subgrid)?;
        }
        kernels::update_electric_b(exec, &mut self.coarse.kernel_parts()?)?;
        for subgrid in &mut self.subgrids {
            prolong(&self.coarse, subgrid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coarse_config() -> GridConfig {
        GridConfig::cube(20, 2e-3).with_pml(PmlConfig::with_thickness(3))
    }

    fn spec() -> SubGridSpec {
        SubGridSpec::new([7, 7, 7], [12, 12, 12], 3)
    }

    fn initialised() -> NestedModel {
        let mut model = NestedModel::build(coarse_config(), &[spec()]).unwrap();
        model.initialise();
        model
    }

    #[test]
    fn build_shares_the_finest_time_step() {
        let model = NestedModel::build(coarse_config(), &[spec()]).unwrap();
        let fine = model.subgrids()[0].grid();
        assert_eq!(fine.dims(), Dims::new(15, 15, 15));
        assert_eq!(fine.dt(), model.coarse().dt());
        let expected = coarse_config().time_step() / 3.0;
        assert!((model.dt() - expected).abs() < expected * 1e-12);
        assert_eq!(fine.pml_thickness(), 0);
    }

    #[test]
    fn placement_rules() {
        let dims = Dims::new(20, 20, 20);
        let inside_pml = SubGridSpec::new([2, 7, 7], [8, 12, 12], 2);
        assert!(validate_placement(dims, 3, &[inside_pml]).is_err());
        let unit_ratio = SubGridSpec::new([7, 7, 7], [9, 9, 9], 1);
        assert!(validate_placement(dims, 3, &[unit_ratio]).is_err());
        let a = SubGridSpec::new([5, 5, 5], [10, 10, 10], 2);
        let b = SubGridSpec::new([9, 9, 9], [12, 12, 12], 2);
        assert!(validate_placement(dims, 3, &[a, b]).is_err());
        let touching = SubGridSpec::new([10, 5, 5], [13, 10, 10], 2);
        assert!(validate_placement(dims, 3, &[a, touching]).is_ok());
    }

    #[test]
    fn oversized_placement_is_an_error() {
        let dims = Dims::new(20, 20, 20);
        let past_the_end = SubGridSpec::new([12, 12, 12], [usize::MAX, 14, 14], 2);
        assert!(matches!(
            validate_placement(dims, 2, &[past_the_end]),
            Err(ConfigError::SubGridPlacement { .. })
        ));
        let huge_ratio = SubGridSpec::new([7, 7, 7], [12, 12, 12], usize::MAX / 2);
        assert!(matches!(
            validate_placement(dims, 3, &[huge_ratio]),
            Err(ConfigError::SubGridPlacement { .. })
        ));
        let cfg = GridConfig::cube(20, 2e-3).with_pml(PmlConfig::with_thickness(2));
        assert!(matches!(
            NestedModel::build(cfg, &[past_the_end]),
            Err(ConfigError::SubGridPlacement { .. })
        ));
    }

    #[test]
    fn fine_grid_with_absorbing_layer_rejected() {
        let (coarse, _) = NestedModel::build(coarse_config(), &[spec()])
            .unwrap()
            .into_parts();
        let fine_cfg = GridConfig::new(spec().fine_dims(), [2e-3 / 3.0; 3])
            .with_pml(PmlConfig::with_thickness(2))
            .with_time_step(coarse.dt());
        let fine = FdtdGrid::new(fine_cfg).unwrap();
        let model = NestedModel::from_parts(coarse, vec![SubGrid::new(spec(), fine)]);
        assert!(matches!(
            SubGridUpdates::new(model),
            Err(ConfigError::SubGridPlacement { .. })
        ));
    }

    #[test]
    fn mismatched_time_step_rejected() {
        let (coarse, _) = NestedModel::build(coarse_config(), &[spec()])
            .unwrap()
            .into_parts();
        let fine_cfg = GridConfig::new(spec().fine_dims(), [2e-3 / 3.0; 3])
            .with_pml(PmlConfig::none())
            .with_time_step(coarse.dt() * 0.5);
        let fine = FdtdGrid::new(fine_cfg).unwrap();
        let model = NestedModel::from_parts(coarse, vec![SubGrid::new(spec(), fine)]);
        assert!(matches!(
            SubGridUpdates::new(model),
            Err(ConfigError::TimeStepMismatch { .. })
        ));
    }

    #[test]
    fn fill_box_refines_into_subgrid() {
        let mut model = NestedModel::build(
            coarse_config()
                .with_material("rock", yee_grid::Material::dielectric(7.0))
                .unwrap(),
            &[spec()],
        )
        .unwrap();
        model
            .fill_box(Region::new([4, 4, 4], [9, 16, 16]), "rock")
            .unwrap();
        let rock = model.coarse().materials().id("rock").unwrap();
        let fine = model.subgrids()[0].grid();
        let fd = fine.dims();
        // Coarse cells 7..9 along x map to fine cells 0..6; Ey edges on
        // the x = 6 face belong to the box too.
        assert_eq!(fine.material_ids().ey[fd.index(6, 3, 3)], rock);
        assert_ne!(fine.material_ids().ey[fd.index(7, 3, 3)], rock);
    }

    #[test]
    fn restriction_averages_fine_edges() {
        let mut model = initialised();
        let s = spec();
        let fd = model.subgrids()[0].grid().dims();
        {
            let fine = model.subgrids_mut()[0].grid_mut().fields_mut();
            for i in 0..fd.nx {
                for j in 0..=fd.ny {
                    for k in 0..=fd.nz {
                        fine.ex[fd.index(i, j, k)] = (i % 3) as f32;
                    }
                }
            }
        }
        let (mut coarse, subgrids) = model.into_parts();
        restrict(&mut coarse, &subgrids[0]).unwrap();
        let cd = coarse.dims();
        // Mean of 0, 1, 2.
        assert_eq!(coarse.fields().ex[cd.index(9, 9, 9)], 1.0);
        // Nodes on the box faces are left alone.
        assert_eq!(coarse.fields().ex[cd.index(9, s.lower[1], 9)], 0.0);
    }

    #[test]
    fn prolongation_copies_nearest_coarse_value() {
        let model = initialised();
        let (mut coarse, mut subgrids) = model.into_parts();
        let cd = coarse.dims();
        for (n, v) in coarse.fields_mut().ez.iter_mut().enumerate() {
            *v = n as f32;
        }
        prolong(&coarse, &mut subgrids[0]).unwrap();
        let fine = subgrids[0].grid();
        let fd = fine.dims();
        // Face x = 0 of the fine grid, fine node (0, 4, 5): coarse
        // (7, 7 + round(4/3), 7 + 5/3) = (7, 8, 8).
        assert_eq!(
            fine.fields().ez[fd.index(0, 4, 5)],
            coarse.fields().ez[cd.index(7, 8, 8)]
        );
        // Interior fine nodes are untouched.
        assert_eq!(fine.fields().ez[fd.index(4, 4, 5)], 0.0);
    }

    #[test]
    fn uniform_field_survives_exchange() {
        let mut model = initialised();
        for c in Component::ALL.into_iter().filter(|c| c.is_electric()) {
            model.coarse_mut().fields_mut().get_mut(c).fill(2.5);
            model.subgrids_mut()[0].grid_mut().fields_mut().get_mut(c).fill(2.5);
        }
        let (mut coarse, mut subgrids) = model.into_parts();
        restrict(&mut coarse, &subgrids[0]).unwrap();
        prolong(&coarse, &mut subgrids[0]).unwrap();
        for c in Component::ALL.into_iter().filter(|c| c.is_electric()) {
            assert!(coarse.fields().get(c).iter().all(|&v| v == 2.5));
            assert!(subgrids[0].grid().fields().get(c).iter().all(|&v| v == 2.5));
        }
    }
}
