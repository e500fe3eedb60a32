//! Device-thread backend.
//!
//! The grid is moved onto a dedicated worker thread (the "device") that
//! owns it for the strategy's lifetime. Every operation is a command sent
//! over a bounded channel, and the caller blocks on a per-command reply,
//! so the solver sees ordinary synchronous calls. Kernels on the device
//! run on a private rayon pool, one task per z-plane.
//!
//! ```text
//! Solver thread                      Device thread ("yee-device")
//!     |                                   |
//!     |--Execute { op, step, reply }----->| grid.kernel_parts()
//!     |   [cmd_tx: bounded(1)]            | pool.install(kernel)
//!     |<--Ok(Readback) via reply----------|
//!     |                                   |
//!     |  drop(cmd_tx)                     | loop ends
//!     |<--JoinHandle<FdtdGrid>------------|
//! ```
//!
//! Field data stays on the device between steps. Only
//! [`store_outputs`](UpdateStrategy::store_outputs) and
//! [`store_snapshots`](UpdateStrategy::store_snapshots) copy anything back:
//! receiver samples and snapshot boxes land in host-side mirrors.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use smallvec::SmallVec;
use yee_core::{BackendError, Operation, UpdateError};
use yee_grid::{FdtdGrid, Receiver as FieldReceiver, Snapshot};

use crate::kernels::{self, Execution};
use crate::strategy::UpdateStrategy;

// ── DeviceConfig ─────────────────────────────────────────────────

/// Resources of the device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Worker threads in the device's kernel pool. `None` lets rayon pick.
    pub threads: Option<usize>,
    /// Bytes of device memory. `None` means unlimited.
    pub memory_limit: Option<usize>,
}

// ── Protocol ─────────────────────────────────────────────────────

/// Data copied back to the host by a command.
enum Readback {
    Nothing,
    Samples(Vec<SmallVec<[f32; 6]>>),
    Snapshots(Vec<Snapshot>),
}

struct DeviceCommand {
    operation: Operation,
    step: usize,
    reply: Sender<Result<Readback, UpdateError>>,
}

fn run_device(
    mut grid: FdtdGrid,
    pool: rayon::ThreadPool,
    commands: Receiver<DeviceCommand>,
) -> FdtdGrid {
    tracing::debug!(threads = pool.current_num_threads(), "device started");
    while let Ok(command) = commands.recv() {
        let result = pool.install(|| execute(&mut grid, command.operation, command.step));
        if command.reply.send(result).is_err() {
            // Host side gone mid-command; nothing left to serve.
            break;
        }
    }
    tracing::debug!("device stopped");
    grid
}

fn execute(
    grid: &mut FdtdGrid,
    operation: Operation,
    step: usize,
) -> Result<Readback, UpdateError> {
    let exec = Execution::Parallel;
    match operation {
        Operation::StoreOutputs => return Ok(Readback::Samples(grid.sample_receivers()?)),
        Operation::StoreSnapshots => return Ok(Readback::Snapshots(grid.capture_snapshots(step)?)),
        _ => {}
    }
    let mut parts = grid.kernel_parts()?;
    match operation {
        Operation::UpdateMagnetic => kernels::update_magnetic(exec, &mut parts),
        Operation::UpdateMagneticPml => kernels::update_magnetic_pml(&mut parts),
        Operation::UpdateMagneticSources => kernels::update_magnetic_sources(&mut parts, step),
        Operation::UpdateElectricA => kernels::update_electric_a(exec, &mut parts),
        Operation::UpdateElectricPml => kernels::update_electric_pml(&mut parts),
        Operation::UpdateElectricSources => kernels::update_electric_sources(&mut parts, step),
        Operation::UpdateElectricB => kernels::update_electric_b(exec, &mut parts)?,
        Operation::StoreOutputs | Operation::StoreSnapshots => {}
    }
    Ok(Readback::Nothing)
}

// ── AcceleratorUpdates ───────────────────────────────────────────

/// Runs kernels on a device thread that owns the grid.
///
/// Receivers and snapshots are mirrored on the host; read them with
/// [`receivers`](Self::receivers) and [`snapshots`](Self::snapshots) or
/// get the whole grid back, mirrors included, with
/// [`into_grid`](Self::into_grid). Dropping the strategy shuts the device
/// down and joins it.
pub struct AcceleratorUpdates {
    cmd_tx: Option<Sender<DeviceCommand>>,
    device: Option<JoinHandle<FdtdGrid>>,
    receivers: Vec<FieldReceiver>,
    snapshots: Vec<Snapshot>,
}

impl AcceleratorUpdates {
    /// Move `grid` onto a new device thread.
    ///
    /// # Errors
    ///
    /// [`BackendError::OutOfDeviceMemory`] if the grid exceeds
    /// `config.memory_limit`, or [`BackendError::DeviceUnavailable`] if the
    /// device thread or its kernel pool cannot be started.
    pub fn new(grid: FdtdGrid, config: DeviceConfig) -> Result<Self, BackendError> {
        let required = grid.memory_bytes();
        if let Some(available) = config.memory_limit {
            if required > available {
                return Err(BackendError::OutOfDeviceMemory {
                    required,
                    available,
                });
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads.unwrap_or(0))
            .thread_name(|i| format!("yee-device-{i}"))
            .build()
            .map_err(|e| BackendError::DeviceUnavailable {
                reason: e.to_string(),
            })?;

        let receivers = grid.receivers().to_vec();
        let snapshots = grid.snapshots().to_vec();

        // One command in flight at a time: every call waits for its reply.
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(1);
        let device = thread::Builder::new()
            .name("yee-device".into())
            .spawn(move || run_device(grid, pool, cmd_rx))
            .map_err(|e| BackendError::DeviceUnavailable {
                reason: e.to_string(),
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            device: Some(device),
            receivers,
            snapshots,
        })
    }

    /// Host mirror of the receivers, complete up to the last
    /// [`store_outputs`](UpdateStrategy::store_outputs).
    pub fn receivers(&self) -> &[FieldReceiver] {
        &self.receivers
    }

    /// Host mirror of the captured snapshots.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Stop the device and return its grid with the host mirrors attached.
    ///
    /// # Errors
    ///
    /// [`BackendError::DeviceLost`] if the device thread panicked.
    pub fn into_grid(mut self) -> Result<FdtdGrid, BackendError> {
        let mut grid = self.shutdown().ok_or(BackendError::DeviceLost)?;
        grid.replace_receivers(std::mem::take(&mut self.receivers));
        let stored = grid.snapshots().len();
        grid.extend_snapshots(self.snapshots.drain(..).skip(stored));
        Ok(grid)
    }

    fn shutdown(&mut self) -> Option<FdtdGrid> {
        drop(self.cmd_tx.take());
        self.device.take().and_then(|handle| handle.join().ok())
    }

    fn call(&mut self, operation: Operation, step: usize) -> Result<Readback, UpdateError> {
        let cmd_tx = self.cmd_tx.as_ref().ok_or(BackendError::DeviceLost)?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        cmd_tx
            .send(DeviceCommand {
                operation,
                step,
                reply: reply_tx,
            })
            .map_err(|_| BackendError::DeviceLost)?;
        reply_rx.recv().map_err(|_| BackendError::DeviceLost)?
    }

    fn run(&mut self, operation: Operation, step: usize) -> Result<(), UpdateError> {
        self.call(operation, step).map(|_| ())
    }
}

impl UpdateStrategy for AcceleratorUpdates {
    fn name(&self) -> &str {
        "accelerator"
    }

    /// Samples every receiver on the device and copies the values back
    /// before returning. This is one of the two points per step where the
    /// host and device synchronise; the host mirror is current once the
    /// call returns.
    fn store_outputs(&mut self, step: usize) -> Result<(), UpdateError> {
        if let Readback::Samples(samples) = self.call(Operation::StoreOutputs, step)? {
            for (receiver, values) in self.receivers.iter_mut().zip(&samples) {
                receiver.record(step, values);
            }
        }
        Ok(())
    }

    /// Copies any snapshots scheduled for `step` back to the host. Steps
    /// without a scheduled snapshot transfer nothing.
    fn store_snapshots(&mut self, step: usize) -> Result<(), UpdateError> {
        if let Readback::Snapshots(captured) = self.call(Operation::StoreSnapshots, step)? {
            self.snapshots.extend(captured);
        }
        Ok(())
    }

    fn update_magnetic(&mut self) -> Result<(), UpdateError> {
        self.run(Operation::UpdateMagnetic, 0)
    }

    fn update_magnetic_pml(&mut self) -> Result<(), UpdateError> {
        self.run(Operation::UpdateMagneticPml, 0)
    }

    fn update_magnetic_sources(&mut self, step: usize) -> Result<(), UpdateError> {
        self.run(Operation::UpdateMagneticSources, step)
    }

    fn update_electric_a(&mut self) -> Result<(), UpdateError> {
        self.run(Operation::UpdateElectricA, 0)
    }

    fn update_electric_pml(&mut self) -> Result<(), UpdateError> {
        self.run(Operation::UpdateElectricPml, 0)
    }

    fn update_electric_sources(&mut self, step: usize) -> Result<(), UpdateError> {
        self.run(Operation::UpdateElectricSources, step)
    }

    fn update_electric_b(&mut self) -> Result<(), UpdateError> {
        self.run(Operation::UpdateElectricB, 0)
    }
}

impl std::fmt::Debug for AcceleratorUpdates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceleratorUpdates")
            .field("running", &self.device.is_some())
            .field("receivers", &self.receivers.len())
            .field("snapshots", &self.snapshots.len())
            .finish()
    }
}

impl Drop for AcceleratorUpdates {
    fn drop(&mut self) {
        if self.device.is_some() && self.shutdown().is_none() {
            tracing::warn!("device thread panicked before shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yee_core::{Axis, Component, ConfigError};
    use yee_grid::{GridConfig, PmlConfig, Source, Waveform};

    fn model() -> FdtdGrid {
        let cfg = GridConfig::cube(12, 1e-3).with_pml(PmlConfig::with_thickness(3));
        let mut g = FdtdGrid::new(cfg).unwrap();
        g.add_source(Source::hertzian_dipole(Axis::Y, [6, 6, 6], Waveform::ricker(3e10)))
            .unwrap();
        g.add_receiver(FieldReceiver::with_components("rx", [7, 6, 6], &[Component::Ey]))
            .unwrap();
        g
    }

    fn run(strategy: &mut AcceleratorUpdates, steps: usize) {
        for step in 0..steps {
            for op in Operation::SEQUENCE {
                strategy.execute(op, step).unwrap();
            }
        }
    }

    #[test]
    fn memory_limit_enforced() {
        let grid = model();
        let required = grid.memory_bytes();
        let err = AcceleratorUpdates::new(
            grid,
            DeviceConfig {
                memory_limit: Some(required - 1),
                ..DeviceConfig::default()
            },
        )
        .err();
        assert_eq!(
            err,
            Some(BackendError::OutOfDeviceMemory {
                required,
                available: required - 1,
            })
        );
    }

    #[test]
    fn uninitialised_grid_reported_from_device() {
        let mut acc = AcceleratorUpdates::new(model(), DeviceConfig::default()).unwrap();
        assert_eq!(
            acc.update_magnetic(),
            Err(UpdateError::Config(ConfigError::NotInitialised))
        );
        // The device survives a failed command.
        assert_eq!(
            acc.store_outputs(0),
            Err(UpdateError::Config(ConfigError::NotInitialised))
        );
    }

    #[test]
    fn host_mirror_is_returned_with_the_grid() {
        let mut g = model();
        g.initialise();
        let mut acc = AcceleratorUpdates::new(
            g,
            DeviceConfig {
                threads: Some(2),
                memory_limit: None,
            },
        )
        .unwrap();
        run(&mut acc, 20);
        assert_eq!(acc.receivers()[0].len(), 20);
        let grid = acc.into_grid().unwrap();
        let trace = grid.receiver("rx").unwrap().trace(Component::Ey).unwrap();
        assert_eq!(trace.len(), 20);
    }

    #[test]
    fn panicked_device_is_reported_lost() {
        let mut g = model();
        g.initialise();
        // A short field array makes the curl kernel index out of bounds.
        g.fields_mut().ez.truncate(3);
        let mut acc = AcceleratorUpdates::new(g, DeviceConfig::default()).unwrap();
        let lost = Err(UpdateError::Backend(BackendError::DeviceLost));
        assert_eq!(acc.update_magnetic(), lost);
        assert_eq!(acc.update_magnetic(), lost);
        assert_eq!(acc.store_outputs(1), lost);
        assert_eq!(acc.into_grid().err(), Some(BackendError::DeviceLost));
    }
}
