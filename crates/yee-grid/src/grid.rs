//! The simulation state owned by an update strategy.

use smallvec::SmallVec;
use yee_core::{Component, ConfigError, Dims, Region};

use crate::config::{GridConfig, PmlConfig};
use crate::fields::{Fields, MaterialIds};
use crate::material::{MaterialTable, UpdateCoefficients};
use crate::pml::PmlSlab;
use crate::receiver::Receiver;
use crate::snapshot::{Snapshot, SnapshotSpec};
use crate::source::Source;

/// A Yee grid with its materials, boundaries, sources, and outputs.
///
/// Built from a validated [`GridConfig`]. Geometry, sources, receivers,
/// and snapshots are added next; [`initialise`](Self::initialise) then
/// precomputes coefficients and absorbing layers. Kernels reach the
/// mutable state through [`kernel_parts`](Self::kernel_parts), which fails
/// until the grid has been initialised.
#[derive(Clone, Debug)]
pub struct FdtdGrid {
    dims: Dims,
    spacing: [f64; 3],
    dt: f64,
    check_finite: bool,
    materials: MaterialTable,
    pml_config: PmlConfig,
    fields: Fields,
    ids: MaterialIds,
    coefficients: Option<UpdateCoefficients>,
    slabs: Vec<PmlSlab>,
    polarisation: [Vec<f32>; 3],
    sources: Vec<Source>,
    receivers: Vec<Receiver>,
    snapshot_specs: Vec<SnapshotSpec>,
    snapshots: Vec<Snapshot>,
}

/// Disjoint borrows of everything a kernel touches in one operation.
pub struct KernelParts<'a> {
    /// Cell counts.
    pub dims: Dims,
    /// Time step, seconds.
    pub dt: f64,
    /// Cell size, metres.
    pub spacing: [f64; 3],
    /// Field values.
    pub fields: &'a mut Fields,
    /// Material ID per component node.
    pub ids: &'a MaterialIds,
    /// Coefficient tables indexed by material ID.
    pub coefficients: &'a UpdateCoefficients,
    /// Absorbing slabs and their psi arrays.
    pub slabs: &'a mut [PmlSlab],
    /// Debye accumulators for Ex, Ey, Ez. Empty when no material is
    /// dispersive.
    pub polarisation: &'a mut [Vec<f32>; 3],
    /// Point sources.
    pub sources: &'a [Source],
    /// Whether phase B scans for non-finite values.
    pub check_finite: bool,
}

impl FdtdGrid {
    /// Validate `config` and allocate zeroed fields filled with the
    /// background material.
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let background = config.materials.require(&config.background)?;
        let dt = config.time_step();
        Ok(Self {
            dims: config.dims,
            spacing: config.spacing,
            dt,
            check_finite: config.check_finite,
            fields: Fields::zeros(config.dims),
            ids: MaterialIds::filled(config.dims, background),
            materials: config.materials,
            pml_config: config.pml,
            coefficients: None,
            slabs: Vec::new(),
            polarisation: [Vec::new(), Vec::new(), Vec::new()],
            sources: Vec::new(),
            receivers: Vec::new(),
            snapshot_specs: Vec::new(),
            snapshots: Vec::new(),
        })
    }

    /// Cell counts.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Cell size `[dx, dy, dz]`.
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Time step, seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Absorbing boundary thickness in cells.
    pub fn pml_thickness(&self) -> usize {
        self.pml_config.thickness
    }

    /// Registered materials.
    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    /// Field values.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Mutable field values, e.g. for setting an initial condition.
    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    /// Material IDs per component node.
    pub fn material_ids(&self) -> &MaterialIds {
        &self.ids
    }

    /// Absorbing slabs (empty before initialisation).
    pub fn slabs(&self) -> &[PmlSlab] {
        &self.slabs
    }

    /// Point sources.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Receivers and their traces.
    pub fn receivers(&self) -> &[Receiver] {
        &self.receivers
    }

    /// Receiver by name.
    pub fn receiver(&self, name: &str) -> Option<&Receiver> {
        self.receivers.iter().find(|r| r.name == name)
    }

    /// Scheduled snapshots.
    pub fn snapshot_specs(&self) -> &[SnapshotSpec] {
        &self.snapshot_specs
    }

    /// Snapshots captured so far, in capture order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Whether phase B runs the finite-value check.
    pub fn check_finite(&self) -> bool {
        self.check_finite
    }

    /// Toggle the finite-value check.
    pub fn set_check_finite(&mut self, enabled: bool) {
        self.check_finite = enabled;
    }

    /// Physical time at the start of `step`.
    pub fn time(&self, step: usize) -> f64 {
        step as f64 * self.dt
    }

    /// Assign `material` to every component node touching the cells
    /// `cells.lower .. cells.upper`.
    ///
    /// Electric edges are claimed along the box's own axis span and on both
    /// bounding faces transversely; magnetic face normals the dual way.
    /// Later boxes overwrite earlier ones.
    pub fn fill_box(&mut self, cells: Region, material: &str) -> Result<(), ConfigError> {
        let id = self.materials.require(material)?;
        let n = self.dims.as_array();
        if (0..3).any(|a| cells.lower[a] >= cells.upper[a] || cells.upper[a] > n[a]) {
            return Err(ConfigError::InvalidRegion {
                reason: format!(
                    "cell box {:?}..{:?} is empty or outside {:?}",
                    cells.lower, cells.upper, self.dims
                ),
            });
        }
        for component in Component::ALL {
            let own = component.axis().index();
            let mut upper = cells.upper;
            for (a, u) in upper.iter_mut().enumerate() {
                // Electric: +1 on transverse axes; magnetic: +1 on own axis.
                if (a == own) != component.is_electric() {
                    *u += 1;
                }
            }
            let region = Region::new(cells.lower, upper);
            let dims = self.dims;
            let ids = self.ids.get_mut(component);
            for p in region.nodes() {
                ids[dims.index_of(p)] = id;
            }
        }
        Ok(())
    }

    /// Add a point source.
    pub fn add_source(&mut self, source: Source) -> Result<(), ConfigError> {
        source.validate(self.dims)?;
        self.sources.push(source);
        Ok(())
    }

    /// Add a receiver.
    pub fn add_receiver(&mut self, receiver: Receiver) -> Result<(), ConfigError> {
        receiver.validate(self.dims)?;
        self.receivers.push(receiver);
        Ok(())
    }

    /// Schedule a snapshot.
    pub fn add_snapshot(&mut self, spec: SnapshotSpec) -> Result<(), ConfigError> {
        spec.validate(self.dims)?;
        self.snapshot_specs.push(spec);
        Ok(())
    }

    /// Precompute update coefficients, build the absorbing slabs, and
    /// allocate dispersive accumulators. Resets any auxiliary state.
    pub fn initialise(&mut self) {
        let coefficients = UpdateCoefficients::compute(&self.materials, self.dt, self.spacing);
        self.slabs = PmlSlab::build_all(self.dims, &self.pml_config, self.spacing, self.dt);
        self.polarisation = if coefficients.dispersive {
            let n = self.dims.node_count();
            [vec![0.0; n], vec![0.0; n], vec![0.0; n]]
        } else {
            [Vec::new(), Vec::new(), Vec::new()]
        };
        self.coefficients = Some(coefficients);
        tracing::debug!(
            dims = ?self.dims,
            dt = self.dt,
            materials = self.materials.len(),
            pml_slabs = self.slabs.len(),
            dispersive = !self.polarisation[0].is_empty(),
            memory_bytes = self.memory_bytes(),
            "grid initialised"
        );
    }

    /// Whether [`initialise`](Self::initialise) has run.
    pub fn is_initialised(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Update coefficients, once initialised.
    pub fn coefficients(&self) -> Option<&UpdateCoefficients> {
        self.coefficients.as_ref()
    }

    fn require_initialised(&self) -> Result<(), ConfigError> {
        if self.is_initialised() {
            Ok(())
        } else {
            Err(ConfigError::NotInitialised)
        }
    }

    /// Split the grid into the borrows a kernel needs.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotInitialised`] before [`initialise`](Self::initialise).
    pub fn kernel_parts(&mut self) -> Result<KernelParts<'_>, ConfigError> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(ConfigError::NotInitialised)?;
        Ok(KernelParts {
            dims: self.dims,
            dt: self.dt,
            spacing: self.spacing,
            fields: &mut self.fields,
            ids: &self.ids,
            coefficients,
            slabs: &mut self.slabs,
            polarisation: &mut self.polarisation,
            sources: &self.sources,
            check_finite: self.check_finite,
        })
    }

    /// Current values at every receiver, in receiver order.
    pub fn sample_receivers(&self) -> Result<Vec<SmallVec<[f32; 6]>>, ConfigError> {
        self.require_initialised()?;
        Ok(self
            .receivers
            .iter()
            .map(|r| r.sample(&self.fields, self.dims))
            .collect())
    }

    /// Record every receiver for `step`.
    pub fn store_outputs(&mut self, step: usize) -> Result<(), ConfigError> {
        let samples = self.sample_receivers()?;
        for (receiver, values) in self.receivers.iter_mut().zip(&samples) {
            receiver.record(step, values);
        }
        Ok(())
    }

    /// Copies of every snapshot scheduled for `step`, without storing them.
    pub fn capture_snapshots(&self, step: usize) -> Result<Vec<Snapshot>, ConfigError> {
        self.require_initialised()?;
        Ok(self
            .snapshot_specs
            .iter()
            .filter(|s| s.step == step)
            .map(|s| s.capture(&self.fields, self.dims))
            .collect())
    }

    /// Capture and keep every snapshot scheduled for `step`.
    pub fn store_snapshots(&mut self, step: usize) -> Result<(), ConfigError> {
        let captured = self.capture_snapshots(step)?;
        self.snapshots.extend(captured);
        Ok(())
    }

    /// Replace the receivers, e.g. with traces recorded elsewhere.
    pub fn replace_receivers(&mut self, receivers: Vec<Receiver>) {
        self.receivers = receivers;
    }

    /// Append snapshots captured elsewhere.
    pub fn extend_snapshots(&mut self, snapshots: impl IntoIterator<Item = Snapshot>) {
        self.snapshots.extend(snapshots);
    }

    /// Bytes held by field, ID, slab, and accumulator storage.
    pub fn memory_bytes(&self) -> usize {
        self.fields.memory_bytes()
            + self.ids.memory_bytes()
            + self.slabs.iter().map(PmlSlab::memory_bytes).sum::<usize>()
            + self
                .polarisation
                .iter()
                .map(|p| p.len() * std::mem::size_of::<f32>())
                .sum::<usize>()
    }
}
