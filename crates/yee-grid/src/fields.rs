//! Per-component storage.

use yee_core::{Component, Dims};

/// One flat array per field component, each `dims.node_count()` long.
///
/// The arrays are separate fields so kernels can borrow the component they
/// write mutably while reading the others.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentArrays<T> {
    /// Ex storage.
    pub ex: Vec<T>,
    /// Ey storage.
    pub ey: Vec<T>,
    /// Ez storage.
    pub ez: Vec<T>,
    /// Hx storage.
    pub hx: Vec<T>,
    /// Hy storage.
    pub hy: Vec<T>,
    /// Hz storage.
    pub hz: Vec<T>,
}

/// Field values.
pub type Fields = ComponentArrays<f32>;

/// Material ID per component node.
pub type MaterialIds = ComponentArrays<u16>;

impl<T: Copy> ComponentArrays<T> {
    /// Six arrays of `dims.node_count()` copies of `value`.
    pub fn filled(dims: Dims, value: T) -> Self {
        let n = dims.node_count();
        Self {
            ex: vec![value; n],
            ey: vec![value; n],
            ez: vec![value; n],
            hx: vec![value; n],
            hy: vec![value; n],
            hz: vec![value; n],
        }
    }

    /// Read access to one component.
    pub fn get(&self, component: Component) -> &[T] {
        match component {
            Component::Ex => &self.ex,
            Component::Ey => &self.ey,
            Component::Ez => &self.ez,
            Component::Hx => &self.hx,
            Component::Hy => &self.hy,
            Component::Hz => &self.hz,
        }
    }

    /// Write access to one component.
    pub fn get_mut(&mut self, component: Component) -> &mut [T] {
        match component {
            Component::Ex => &mut self.ex,
            Component::Ey => &mut self.ey,
            Component::Ez => &mut self.ez,
            Component::Hx => &mut self.hx,
            Component::Hy => &mut self.hy,
            Component::Hz => &mut self.hz,
        }
    }

    /// Size of the six arrays, in bytes.
    pub fn memory_bytes(&self) -> usize {
        6 * self.ex.len() * std::mem::size_of::<T>()
    }
}

impl ComponentArrays<f32> {
    /// Zero-initialised fields.
    pub fn zeros(dims: Dims) -> Self {
        Self::filled(dims, 0.0)
    }

    /// Largest absolute value of one component.
    pub fn max_abs(&self, component: Component) -> f32 {
        self.get(component)
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()))
    }

    /// Sum of squares over all six components, a cheap proxy for total
    /// energy when comparing a run against itself over time.
    pub fn sum_squares(&self) -> f64 {
        Component::ALL
            .iter()
            .map(|&c| {
                self.get(c)
                    .iter()
                    .map(|&v| f64::from(v) * f64::from(v))
                    .sum::<f64>()
            })
            .sum()
    }

    /// First non-finite value, if any, as `(component, flat index)`.
    pub fn first_non_finite(&self) -> Option<(Component, usize)> {
        Component::ALL.iter().find_map(|&c| {
            self.get(c)
                .iter()
                .position(|v| !v.is_finite())
                .map(|i| (c, i))
        })
    }
}
