//! Field-update kernels shared by every backend.
//!
//! Each kernel works on a [`KernelParts`] borrow of one grid. The volume
//! updates (both curls and the dispersive accumulator) visit nodes one
//! constant-z plane at a time, either in order or as one rayon task per
//! plane; a node's new value depends only on the other field family, so
//! both orders produce bit-identical results. Boundary corrections and
//! source injection touch few nodes and always run in order.
//!
//! ```text
//! H_a = da H_a - db (dE_c/db) + db (dE_b/dc)      forward differences
//! E_a = ca E_a + cb (dH_c/db) - cb (dH_b/dc)      backward differences
//!       + ce psi_a
//! ```
//!
//! where `(b, c)` are the axes following `a` cyclically.

use rayon::prelude::*;
use yee_core::{Axis, BackendError, Component, Dims, Region, UpdateError};
use yee_grid::{ComponentArrays, Fields, KernelParts, SourceKind};

/// How volume kernels walk the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// One plane after another on the calling thread.
    #[default]
    Sequential,
    /// One rayon task per z-plane on the current thread pool.
    Parallel,
}

impl Execution {
    /// Apply `f(flat_index, &mut value)` to every node of `region` in `out`.
    fn for_each_node<F>(self, out: &mut [f32], dims: Dims, region: Region, f: F)
    where
        F: Fn(usize, &mut f32) + Sync,
    {
        let plane = dims.plane_len();
        let row = dims.nx + 1;
        let body = |(k, slab): (usize, &mut [f32])| {
            if k < region.lower[2] || k >= region.upper[2] {
                return;
            }
            for j in region.lower[1]..region.upper[1] {
                for i in region.lower[0]..region.upper[0] {
                    let local = j * row + i;
                    f(k * plane + local, &mut slab[local]);
                }
            }
        };
        match self {
            Execution::Sequential => out.chunks_mut(plane).enumerate().for_each(body),
            Execution::Parallel => out.par_chunks_mut(plane).enumerate().for_each(body),
        }
    }
}

type Families<'a> = ([&'a mut [f32]; 3], [&'a mut [f32]; 3]);

/// Split the fields into electric and magnetic families, indexed by axis.
fn families(fields: &mut Fields) -> Families<'_> {
    let ComponentArrays {
        ex,
        ey,
        ez,
        hx,
        hy,
        hz,
    } = fields;
    (
        [ex.as_mut_slice(), ey.as_mut_slice(), ez.as_mut_slice()],
        [hx.as_mut_slice(), hy.as_mut_slice(), hz.as_mut_slice()],
    )
}

/// Advance H by a half step.
pub fn update_magnetic(exec: Execution, parts: &mut KernelParts<'_>) {
    let dims = parts.dims;
    let ids = parts.ids;
    let coefficients = parts.coefficients;
    let (e, mut h) = families(parts.fields);
    for axis in Axis::ALL {
        let component = Component::magnetic(axis);
        let (b, c) = axis.cyclic();
        let (sb, sc) = (dims.stride(b), dims.stride(c));
        let inv_b = coefficients.inv_spacing[b.index()];
        let inv_c = coefficients.inv_spacing[c.index()];
        let id = ids.get(component);
        let table = &coefficients.magnetic;
        let eb: &[f32] = &e[b.index()];
        let ec: &[f32] = &e[c.index()];
        exec.for_each_node(
            &mut h[axis.index()],
            dims,
            dims.update_region(component),
            |n, value| {
                let m = table[id[n] as usize];
                *value = m.da * *value - m.db * inv_b * (ec[n + sb] - ec[n])
                    + m.db * inv_c * (eb[n + sc] - eb[n]);
            },
        );
    }
}

/// Advance E from the updated H, adding the dispersive accumulator from
/// the previous step.
pub fn update_electric_a(exec: Execution, parts: &mut KernelParts<'_>) {
    let dims = parts.dims;
    let ids = parts.ids;
    let coefficients = parts.coefficients;
    let polarisation = &*parts.polarisation;
    let (mut e, h) = families(parts.fields);
    for axis in Axis::ALL {
        let component = Component::electric(axis);
        let (b, c) = axis.cyclic();
        let (sb, sc) = (dims.stride(b), dims.stride(c));
        let inv_b = coefficients.inv_spacing[b.index()];
        let inv_c = coefficients.inv_spacing[c.index()];
        let id = ids.get(component);
        let table = &coefficients.electric;
        let hb: &[f32] = &h[b.index()];
        let hc: &[f32] = &h[c.index()];
        let psi: &[f32] = &polarisation[axis.index()];
        let dispersive = !psi.is_empty();
        exec.for_each_node(
            &mut e[axis.index()],
            dims,
            dims.update_region(component),
            |n, value| {
                let m = table[id[n] as usize];
                let mut next = m.ca * *value + m.cb * inv_b * (hc[n] - hc[n - sb])
                    - m.cb * inv_c * (hb[n] - hb[n - sc]);
                if dispersive {
                    next += m.ce * psi[n];
                }
                *value = next;
            },
        );
    }
}

/// Advance the dispersive accumulators from the final E, then run the
/// finite-value check if enabled.
///
/// # Errors
///
/// [`BackendError::NonFinite`] naming the first NaN or infinity found.
pub fn update_electric_b(exec: Execution, parts: &mut KernelParts<'_>) -> Result<(), UpdateError> {
    let dims = parts.dims;
    let coefficients = parts.coefficients;
    if coefficients.dispersive {
        for axis in Axis::ALL {
            let component = Component::electric(axis);
            let id = parts.ids.get(component);
            let table = &coefficients.electric;
            let field: &[f32] = parts.fields.get(component);
            exec.for_each_node(
                &mut parts.polarisation[axis.index()],
                dims,
                dims.update_region(component),
                |n, psi| {
                    let m = table[id[n] as usize];
                    *psi = m.decay * *psi + m.dchi * field[n];
                },
            );
        }
    }
    if parts.check_finite {
        if let Some((component, index)) = parts.fields.first_non_finite() {
            return Err(BackendError::NonFinite { component, index }.into());
        }
    }
    Ok(())
}

/// CPML correction of H inside every slab.
pub fn update_magnetic_pml(parts: &mut KernelParts<'_>) {
    let dims = parts.dims;
    let ids = parts.ids;
    let coefficients = parts.coefficients;
    let (e, mut h) = families(parts.fields);
    for slab in parts.slabs.iter_mut() {
        let a = slab.axis;
        let (b, c) = a.cyclic();
        let stride = dims.stride(a);
        let inv_a = coefficients.inv_spacing[a.index()];
        let region = slab.region(dims, false);
        // H_b carries +dE_c/da, H_c carries -dE_b/da.
        for (slot, (target, source, sign)) in [(b, c, 1.0f32), (c, b, -1.0f32)]
            .into_iter()
            .enumerate()
        {
            let component = Component::magnetic(target);
            let id = ids.get(component);
            let out = &mut *h[target.index()];
            let src: &[f32] = &e[source.index()];
            for p in region.intersect(&dims.update_region(component)).nodes() {
                let n = dims.index_of(p);
                let (local, depth) = slab.local(p, false);
                let psi = &mut slab.psi_magnetic[slot][local];
                *psi = slab.magnetic.b[depth] * *psi
                    + slab.magnetic.c[depth] * (src[n + stride] - src[n]);
                let db = coefficients.magnetic[id[n] as usize].db;
                out[n] += sign * db * inv_a * *psi;
            }
        }
    }
}

/// CPML correction of E inside every slab.
pub fn update_electric_pml(parts: &mut KernelParts<'_>) {
    let dims = parts.dims;
    let ids = parts.ids;
    let coefficients = parts.coefficients;
    let (mut e, h) = families(parts.fields);
    for slab in parts.slabs.iter_mut() {
        let a = slab.axis;
        let (b, c) = a.cyclic();
        let stride = dims.stride(a);
        let inv_a = coefficients.inv_spacing[a.index()];
        let region = slab.region(dims, true);
        // E_b carries -dH_c/da, E_c carries +dH_b/da.
        for (slot, (target, source, sign)) in [(b, c, -1.0f32), (c, b, 1.0f32)]
            .into_iter()
            .enumerate()
        {
            let component = Component::electric(target);
            let id = ids.get(component);
            let out = &mut *e[target.index()];
            let src: &[f32] = &h[source.index()];
            for p in region.intersect(&dims.update_region(component)).nodes() {
                let n = dims.index_of(p);
                let (local, depth) = slab.local(p, true);
                let psi = &mut slab.psi_electric[slot][local];
                *psi = slab.electric.b[depth] * *psi
                    + slab.electric.c[depth] * (src[n] - src[n - stride]);
                let cb = coefficients.electric[id[n] as usize].cb;
                out[n] += sign * cb * inv_a * *psi;
            }
        }
    }
}

/// Inject magnetic dipoles for `step`.
pub fn update_magnetic_sources(parts: &mut KernelParts<'_>, step: usize) {
    let [dx, dy, dz] = parts.spacing;
    let volume = dx * dy * dz;
    for source in parts.sources.iter().filter(|s| s.is_magnetic()) {
        let Some(w) = source.drive(step, parts.dt) else {
            continue;
        };
        let component = source.component();
        let n = parts.dims.index_of(source.position);
        let db = f64::from(parts.coefficients.magnetic[parts.ids.get(component)[n] as usize].db);
        let dl = parts.spacing[source.polarisation.index()];
        parts.fields.get_mut(component)[n] -= (db * w * dl / volume) as f32;
    }
}

/// Inject Hertzian dipoles and voltage sources for `step`.
pub fn update_electric_sources(parts: &mut KernelParts<'_>, step: usize) {
    let [dx, dy, dz] = parts.spacing;
    let volume = dx * dy * dz;
    for source in parts.sources.iter().filter(|s| !s.is_magnetic()) {
        let Some(w) = source.drive(step, parts.dt) else {
            continue;
        };
        let component = source.component();
        let n = parts.dims.index_of(source.position);
        let cb = f64::from(parts.coefficients.electric[parts.ids.get(component)[n] as usize].cb);
        let dl = parts.spacing[source.polarisation.index()];
        let field = &mut parts.fields.get_mut(component)[n];
        match source.kind {
            SourceKind::HertzianDipole => *field -= (cb * w * dl / volume) as f32,
            SourceKind::VoltageSource { resistance } if resistance > 0.0 => {
                // Current through the resistor spread over the cell face.
                *field -= (cb * w * dl / (resistance * volume)) as f32;
            }
            SourceKind::VoltageSource { .. } => *field = (-w / dl) as f32,
            SourceKind::MagneticDipole => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yee_grid::{FdtdGrid, GridConfig, Material, PmlConfig, Source, Waveform};

    fn grid(pml: usize) -> FdtdGrid {
        let cfg = GridConfig::cube(16, 1e-3)
            .with_pml(PmlConfig::with_thickness(pml))
            .with_material("dielectric", Material::lossy(4.0, 0.01).with_debye(2.0, 1e-11))
            .unwrap();
        let mut g = FdtdGrid::new(cfg).unwrap();
        g.fill_box(Region::new([10, 2, 2], [14, 14, 14]), "dielectric")
            .unwrap();
        g.add_source(Source::hertzian_dipole(Axis::Z, [6, 8, 8], Waveform::ricker(3e10)))
            .unwrap();
        g.initialise();
        g
    }

    fn step(g: &mut FdtdGrid, exec: Execution, n: usize) {
        let mut parts = g.kernel_parts().unwrap();
        update_magnetic(exec, &mut parts);
        update_magnetic_pml(&mut parts);
        update_magnetic_sources(&mut parts, n);
        update_electric_a(exec, &mut parts);
        update_electric_pml(&mut parts);
        update_electric_sources(&mut parts, n);
        update_electric_b(exec, &mut parts).unwrap();
    }

    #[test]
    fn curl_of_point_ez_has_expected_signs() {
        let cfg = GridConfig::cube(10, 1e-3).with_pml(PmlConfig::none());
        let mut g = FdtdGrid::new(cfg).unwrap();
        g.initialise();
        let dims = g.dims();
        g.fields_mut().ez[dims.index(5, 5, 5)] = 1.0;
        update_magnetic(Execution::Sequential, &mut g.kernel_parts().unwrap());
        let f = g.fields();
        // Hx = -db dEz/dy: positive below the spike, negative above.
        assert!(f.hx[dims.index(5, 5, 5)] > 0.0);
        assert!(f.hx[dims.index(5, 4, 5)] < 0.0);
        // Hy = +db dEz/dx.
        assert!(f.hy[dims.index(5, 5, 5)] < 0.0);
        assert!(f.hy[dims.index(4, 5, 5)] > 0.0);
        assert_eq!(f.max_abs(Component::Hz), 0.0);
    }

    #[test]
    fn parallel_matches_sequential_bitwise() {
        let mut seq = grid(4);
        let mut par = seq.clone();
        for n in 0..25 {
            step(&mut seq, Execution::Sequential, n);
            step(&mut par, Execution::Parallel, n);
        }
        assert!(seq.fields().max_abs(Component::Ez) > 0.0);
        assert_eq!(seq.fields(), par.fields());
    }

    #[test]
    fn outer_faces_stay_perfectly_conducting() {
        let mut g = grid(0);
        for n in 0..40 {
            step(&mut g, Execution::Sequential, n);
        }
        let dims = g.dims();
        for j in 0..=dims.ny {
            for k in 0..dims.nz {
                assert_eq!(g.fields().ez[dims.index(0, j, k)], 0.0);
                assert_eq!(g.fields().ez[dims.index(dims.nx, j, k)], 0.0);
            }
        }
    }

    #[test]
    fn hard_voltage_source_overwrites_field() {
        let cfg = GridConfig::cube(8, 1e-3).with_pml(PmlConfig::none());
        let mut g = FdtdGrid::new(cfg).unwrap();
        let w = Waveform::gaussian(1e10);
        g.add_source(Source::voltage_source(Axis::X, [3, 4, 4], w, 0.0))
            .unwrap();
        g.initialise();
        let dims = g.dims();
        g.fields_mut().ex[dims.index(3, 4, 4)] = 123.0;
        let dt = g.dt();
        update_electric_sources(&mut g.kernel_parts().unwrap(), 40);
        let expected = (-w.evaluate(40.5 * dt) / 1e-3) as f32;
        let got = g.fields().ex[dims.index(3, 4, 4)];
        assert!((got - expected).abs() <= expected.abs() * 1e-5);
    }

    #[test]
    fn sentinel_reports_non_finite() {
        let mut g = grid(0);
        g.set_check_finite(true);
        let dims = g.dims();
        g.fields_mut().hy[dims.index(3, 3, 3)] = f32::NAN;
        let err = update_electric_b(Execution::Sequential, &mut g.kernel_parts().unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            UpdateError::Backend(BackendError::NonFinite {
                component: Component::Hy,
                index: dims.index(3, 3, 3),
            })
        );
    }

    #[test]
    fn dispersive_accumulator_tracks_field() {
        let mut g = grid(0);
        for n in 0..30 {
            step(&mut g, Execution::Sequential, n);
        }
        let parts = g.kernel_parts().unwrap();
        let psi_energy: f32 = parts.polarisation[2].iter().map(|v| v.abs()).sum();
        assert!(psi_energy > 0.0);
    }
}
