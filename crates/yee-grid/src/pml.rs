//! Convolutional PML slabs.
//!
//! One slab per grid face. Inside a slab, each field component whose update
//! contains a derivative along the slab's axis carries an auxiliary psi
//! array that recursively accumulates that derivative:
//!
//! ```text
//! psi = b psi + c dF
//! F  += sign coef psi
//! ```
//!
//! with `b = exp(-sigma dt / eps0)` and `c = b - 1` (unit stretching, zero
//! frequency shift). Electric and magnetic sides use profiles sampled at
//! the integer and half-integer depths respectively.

use yee_core::{Axis, Dims, Region, Side};

use crate::config::PmlConfig;
use crate::constants::{EPS0, ETA0};

/// Recursion coefficients for one side (electric or magnetic) of a slab.
#[derive(Clone, Debug, PartialEq)]
pub struct PmlProfile {
    /// First node index along the slab axis covered by this profile.
    pub start: usize,
    /// Per-depth decay `b`.
    pub b: Vec<f32>,
    /// Per-depth gain `c`.
    pub c: Vec<f32>,
}

/// The absorbing layer on one face of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PmlSlab {
    /// Axis normal to the face.
    pub axis: Axis,
    /// Which face.
    pub side: Side,
    /// Thickness in cells.
    pub thickness: usize,
    /// Profile for electric corrections.
    pub electric: PmlProfile,
    /// Profile for magnetic corrections.
    pub magnetic: PmlProfile,
    /// Psi arrays for the two electric components transverse to `axis`,
    /// in cyclic order.
    pub psi_electric: [Vec<f32>; 2],
    /// Psi arrays for the two magnetic components transverse to `axis`,
    /// in cyclic order.
    pub psi_magnetic: [Vec<f32>; 2],
    shape: [usize; 3],
}

impl PmlSlab {
    /// Build one slab with zeroed psi arrays.
    pub fn new(
        dims: Dims,
        axis: Axis,
        side: Side,
        config: &PmlConfig,
        spacing: [f64; 3],
        dt: f64,
    ) -> Self {
        let d = config.thickness;
        let n = dims.cells(axis);
        let delta = spacing[axis.index()];
        let sigma_max = config
            .sigma_max
            .unwrap_or(0.8 * (config.order + 1.0) / (ETA0 * delta));

        let (e_start, h_start) = match side {
            Side::Low => (0, 0),
            Side::High => (n + 1 - d, n - d),
        };
        // Normalised depth into the layer: 1 at the outer face, 0 at the
        // interface with the interior.
        let e_depth = |l: usize| -> f64 {
            match side {
                Side::Low => (d - l) as f64 / d as f64,
                Side::High => (l + 1) as f64 / d as f64,
            }
        };
        let h_depth = |l: usize| -> f64 {
            match side {
                Side::Low => (d as f64 - l as f64 - 0.5) / d as f64,
                Side::High => (l as f64 + 0.5) / d as f64,
            }
        };
        let profile = |start: usize, depth: &dyn Fn(usize) -> f64| {
            let mut b = Vec::with_capacity(d);
            let mut c = Vec::with_capacity(d);
            for l in 0..d {
                let sigma = sigma_max * depth(l).powf(config.order);
                let bl = (-sigma * dt / EPS0).exp();
                b.push(bl as f32);
                c.push((bl - 1.0) as f32);
            }
            PmlProfile { start, b, c }
        };

        let mut shape = dims.node_shape();
        shape[axis.index()] = d;
        let len = shape[0] * shape[1] * shape[2];

        Self {
            axis,
            side,
            thickness: d,
            electric: profile(e_start, &e_depth),
            magnetic: profile(h_start, &h_depth),
            psi_electric: [vec![0.0; len], vec![0.0; len]],
            psi_magnetic: [vec![0.0; len], vec![0.0; len]],
            shape,
        }
    }

    /// Build the six slabs of a grid, or none when the thickness is zero.
    pub fn build_all(dims: Dims, config: &PmlConfig, spacing: [f64; 3], dt: f64) -> Vec<Self> {
        if config.thickness == 0 {
            return Vec::new();
        }
        Axis::ALL
            .iter()
            .flat_map(|&axis| [Side::Low, Side::High].map(|side| (axis, side)))
            .map(|(axis, side)| Self::new(dims, axis, side, config, spacing, dt))
            .collect()
    }

    /// The nodes covered by the electric (`true`) or magnetic profile.
    pub fn region(&self, dims: Dims, electric: bool) -> Region {
        let a = self.axis.index();
        let start = if electric {
            self.electric.start
        } else {
            self.magnetic.start
        };
        let mut full = Region::full(dims);
        full.lower[a] = start;
        full.upper[a] = start + self.thickness;
        full
    }

    /// Position of global node `p` in the psi arrays, and its depth index
    /// into the profile.
    ///
    /// `p` must lie inside [`region`](Self::region) for the same side.
    #[inline]
    pub fn local(&self, p: [usize; 3], electric: bool) -> (usize, usize) {
        let a = self.axis.index();
        let start = if electric {
            self.electric.start
        } else {
            self.magnetic.start
        };
        let mut q = p;
        q[a] -= start;
        let index = (q[2] * self.shape[1] + q[1]) * self.shape[0] + q[0];
        (index, q[a])
    }

    /// Size of the psi arrays, in bytes.
    pub fn memory_bytes(&self) -> usize {
        4 * self.psi_electric[0].len() * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab(side: Side) -> PmlSlab {
        let dims = Dims::new(30, 20, 20);
        PmlSlab::new(dims, Axis::X, side, &PmlConfig::with_thickness(8), [1e-3; 3], 1e-12)
    }

    #[test]
    fn six_slabs_when_enabled() {
        let dims = Dims::new(30, 30, 30);
        let slabs = PmlSlab::build_all(dims, &PmlConfig::default(), [1e-3; 3], 1e-12);
        assert_eq!(slabs.len(), 6);
        assert!(PmlSlab::build_all(dims, &PmlConfig::none(), [1e-3; 3], 1e-12).is_empty());
    }

    #[test]
    fn attenuation_grows_toward_outer_face() {
        let low = slab(Side::Low);
        // Low side: depth index 0 is the outer face.
        assert!(low.electric.b[0] < low.electric.b[7]);
        let high = slab(Side::High);
        // High side: the last depth index is the outer face.
        assert!(high.electric.b[7] < high.electric.b[0]);
        for (b, c) in low.magnetic.b.iter().zip(&low.magnetic.c) {
            assert!(*b > 0.0 && *b <= 1.0);
            assert!((c - (b - 1.0)).abs() < 1e-7);
        }
    }

    #[test]
    fn high_side_ends_on_boundary_node() {
        let high = slab(Side::High);
        let dims = Dims::new(30, 20, 20);
        let e = high.region(dims, true);
        assert_eq!(e.upper[0], 31);
        let h = high.region(dims, false);
        assert_eq!(h.upper[0], 30);
    }

    #[test]
    fn local_index_stays_inside_psi() {
        let dims = Dims::new(30, 20, 20);
        let s = slab(Side::High);
        for electric in [true, false] {
            for p in s.region(dims, electric).nodes() {
                let (idx, depth) = s.local(p, electric);
                assert!(idx < s.psi_electric[0].len());
                assert!(depth < s.thickness);
            }
        }
    }
}
