//! Grid dimensions, flat node indexing, and index boxes.
//!
//! Every field component is stored on the same `(nx+1) x (ny+1) x (nz+1)`
//! node lattice with x varying fastest. The staggering of the Yee cell is
//! expressed purely through which index ranges each component updates
//! (see [`Dims::update_region`]).

use crate::component::{Axis, Component};

/// Number of cells along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Cells along x.
    pub nx: usize,
    /// Cells along y.
    pub ny: usize,
    /// Cells along z.
    pub nz: usize,
}

impl Dims {
    /// Create dimensions from cell counts.
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Cell count along `axis`.
    pub const fn cells(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
            Axis::Z => self.nz,
        }
    }

    /// Cell counts as an array.
    pub const fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Node counts per axis (`n + 1`).
    pub const fn node_shape(&self) -> [usize; 3] {
        [self.nx + 1, self.ny + 1, self.nz + 1]
    }

    /// Total number of nodes, i.e. the length of each field array.
    pub const fn node_count(&self) -> usize {
        (self.nx + 1) * (self.ny + 1) * (self.nz + 1)
    }

    /// Number of nodes in one constant-z plane.
    pub const fn plane_len(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    /// Whether any axis has zero cells.
    pub const fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0 || self.nz == 0
    }

    /// Flat index of node `(i, j, k)`.
    #[inline]
    pub const fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * (self.ny + 1) + j) * (self.nx + 1) + i
    }

    /// Flat index of a node given as an array.
    #[inline]
    pub const fn index_of(&self, p: [usize; 3]) -> usize {
        self.index(p[0], p[1], p[2])
    }

    /// Flat stride of one step along `axis`.
    #[inline]
    pub const fn stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => 1,
            Axis::Y => self.nx + 1,
            Axis::Z => (self.nx + 1) * (self.ny + 1),
        }
    }

    /// Whether `p` is a valid node of this lattice.
    pub const fn contains_node(&self, p: [usize; 3]) -> bool {
        p[0] <= self.nx && p[1] <= self.ny && p[2] <= self.nz
    }

    /// The nodes that the leapfrog kernels update for `component`.
    ///
    /// Electric components are updated on `[0, n)` along their own axis and
    /// on interior nodes `[1, n)` transversely, so tangential E on the outer
    /// faces stays zero (a perfect electric conductor). Magnetic components
    /// are the dual: `[1, n)` along their own axis and `[0, n)` transversely.
    pub fn update_region(&self, component: Component) -> Region {
        let along = component.axis();
        let n = self.as_array();
        let mut lower = [0; 3];
        let mut upper = [0; 3];
        for axis in Axis::ALL {
            let a = axis.index();
            let own = axis == along;
            let (lo, hi) = match (component.is_electric(), own) {
                (true, true) | (false, false) => (0, n[a]),
                (true, false) | (false, true) => (1, n[a]),
            };
            lower[a] = lo;
            upper[a] = hi;
        }
        Region::new(lower, upper)
    }
}

/// A box of nodes, `lower` inclusive and `upper` exclusive on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    /// Inclusive lower corner.
    pub lower: [usize; 3],
    /// Exclusive upper corner.
    pub upper: [usize; 3],
}

impl Region {
    /// Create a region from its corners.
    pub const fn new(lower: [usize; 3], upper: [usize; 3]) -> Self {
        Self { lower, upper }
    }

    /// Every node of `dims`.
    pub const fn full(dims: Dims) -> Self {
        Self {
            lower: [0; 3],
            upper: dims.node_shape(),
        }
    }

    /// Extent along each axis (zero when the box is inverted).
    pub fn shape(&self) -> [usize; 3] {
        [
            self.upper[0].saturating_sub(self.lower[0]),
            self.upper[1].saturating_sub(self.lower[1]),
            self.upper[2].saturating_sub(self.lower[2]),
        ]
    }

    /// Number of nodes inside the box.
    pub fn len(&self) -> usize {
        let s = self.shape();
        s[0] * s[1] * s[2]
    }

    /// Whether the box contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `p` lies inside the box.
    pub fn contains(&self, p: [usize; 3]) -> bool {
        (0..3).all(|a| p[a] >= self.lower[a] && p[a] < self.upper[a])
    }

    /// Whether the box fits inside the node lattice of `dims`.
    pub fn fits(&self, dims: Dims) -> bool {
        let shape = dims.node_shape();
        (0..3).all(|a| self.lower[a] <= self.upper[a] && self.upper[a] <= shape[a])
    }

    /// Intersection of two boxes (possibly empty).
    pub fn intersect(&self, other: &Region) -> Region {
        let mut lower = [0; 3];
        let mut upper = [0; 3];
        for a in 0..3 {
            lower[a] = self.lower[a].max(other.lower[a]);
            upper[a] = self.upper[a].min(other.upper[a]).max(lower[a]);
        }
        Region { lower, upper }
    }

    /// Iterate over the nodes of the box, x fastest.
    pub fn nodes(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let r = *self;
        let empty = r.is_empty();
        (r.lower[2]..r.upper[2])
            .flat_map(move |k| (r.lower[1]..r.upper[1]).map(move |j| (j, k)))
            .flat_map(move |(j, k)| (r.lower[0]..r.upper[0]).map(move |i| [i, j, k]))
            .filter(move |_| !empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn electric_update_region_excludes_tangential_faces() {
        let dims = Dims::new(4, 5, 6);
        let ex = dims.update_region(Component::Ex);
        assert_eq!(ex.lower, [0, 1, 1]);
        assert_eq!(ex.upper, [4, 5, 6]);
        let hz = dims.update_region(Component::Hz);
        assert_eq!(hz.lower, [0, 0, 1]);
        assert_eq!(hz.upper, [4, 5, 6]);
    }

    #[test]
    fn region_iterates_x_fastest() {
        let r = Region::new([0, 0, 0], [2, 2, 1]);
        let nodes: Vec<_> = r.nodes().collect();
        assert_eq!(nodes, vec![[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]]);
    }

    #[test]
    fn inverted_region_is_empty() {
        let r = Region::new([3, 0, 0], [1, 2, 2]);
        assert!(r.is_empty());
        assert_eq!(r.nodes().count(), 0);
    }

    #[test]
    fn intersection_clamps() {
        let a = Region::new([0, 0, 0], [5, 5, 5]);
        let b = Region::new([3, 4, 6], [8, 8, 8]);
        let c = a.intersect(&b);
        assert_eq!(c.lower, [3, 4, 6]);
        assert!(c.is_empty());
    }

    proptest! {
        #[test]
        fn index_is_a_bijection_onto_node_range(
            nx in 1usize..6, ny in 1usize..6, nz in 1usize..6,
        ) {
            let dims = Dims::new(nx, ny, nz);
            let mut seen = vec![false; dims.node_count()];
            for p in Region::full(dims).nodes() {
                let idx = dims.index_of(p);
                prop_assert!(!seen[idx]);
                seen[idx] = true;
            }
            prop_assert!(seen.iter().all(|&s| s));
        }

        #[test]
        fn stride_moves_one_node(
            nx in 1usize..6, ny in 1usize..6, nz in 1usize..6,
            i in 0usize..5, j in 0usize..5, k in 0usize..5,
        ) {
            let dims = Dims::new(nx, ny, nz);
            let (i, j, k) = (i % nx, j % ny, k % nz);
            let base = dims.index(i, j, k);
            prop_assert_eq!(base + dims.stride(Axis::X), dims.index(i + 1, j, k));
            prop_assert_eq!(base + dims.stride(Axis::Y), dims.index(i, j + 1, k));
            prop_assert_eq!(base + dims.stride(Axis::Z), dims.index(i, j, k + 1));
        }
    }
}
