//! Cartesian axes and the six Yee field components.

use std::fmt;

/// A Cartesian axis of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis (fastest-varying index).
    X,
    /// The y axis.
    Y,
    /// The z axis (slowest-varying index).
    Z,
}

impl Axis {
    /// All three axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in `[x, y, z]` arrays.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two remaining axes in cyclic order: `x -> (y, z)`,
    /// `y -> (z, x)`, `z -> (x, y)`.
    ///
    /// The curl terms of Maxwell's equations follow this ordering, so the
    /// kernels and the absorbing boundary use it to pick sign conventions.
    pub const fn cyclic(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Which end of an axis a boundary slab sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The face at index 0.
    Low,
    /// The face at index `n`.
    High,
}

/// One of the six staggered field components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    /// Electric field, x component.
    Ex,
    /// Electric field, y component.
    Ey,
    /// Electric field, z component.
    Ez,
    /// Magnetic field, x component.
    Hx,
    /// Magnetic field, y component.
    Hy,
    /// Magnetic field, z component.
    Hz,
}

impl Component {
    /// All six components, electric first.
    pub const ALL: [Component; 6] = [
        Component::Ex,
        Component::Ey,
        Component::Ez,
        Component::Hx,
        Component::Hy,
        Component::Hz,
    ];

    /// The electric component along `axis`.
    pub const fn electric(axis: Axis) -> Self {
        match axis {
            Axis::X => Component::Ex,
            Axis::Y => Component::Ey,
            Axis::Z => Component::Ez,
        }
    }

    /// The magnetic component along `axis`.
    pub const fn magnetic(axis: Axis) -> Self {
        match axis {
            Axis::X => Component::Hx,
            Axis::Y => Component::Hy,
            Axis::Z => Component::Hz,
        }
    }

    /// The axis this component points along.
    pub const fn axis(self) -> Axis {
        match self {
            Component::Ex | Component::Hx => Axis::X,
            Component::Ey | Component::Hy => Axis::Y,
            Component::Ez | Component::Hz => Axis::Z,
        }
    }

    /// Whether this is an electric-field component.
    pub const fn is_electric(self) -> bool {
        matches!(self, Component::Ex | Component::Ey | Component::Ez)
    }

    /// Position of this component in `[Ex, Ey, Ez, Hx, Hy, Hz]` arrays.
    pub const fn index(self) -> usize {
        match self {
            Component::Ex => 0,
            Component::Ey => 1,
            Component::Ez => 2,
            Component::Hx => 3,
            Component::Hy => 4,
            Component::Hz => 5,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Ex => "Ex",
            Component::Ey => "Ey",
            Component::Ez => "Ez",
            Component::Hx => "Hx",
            Component::Hy => "Hy",
            Component::Hz => "Hz",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_axes_are_distinct() {
        for axis in Axis::ALL {
            let (b, c) = axis.cyclic();
            assert_ne!(axis, b);
            assert_ne!(axis, c);
            assert_ne!(b, c);
        }
    }

    #[test]
    fn component_axis_round_trips() {
        for axis in Axis::ALL {
            assert_eq!(Component::electric(axis).axis(), axis);
            assert_eq!(Component::magnetic(axis).axis(), axis);
            assert!(Component::electric(axis).is_electric());
            assert!(!Component::magnetic(axis).is_electric());
        }
    }

    #[test]
    fn component_index_matches_all_order() {
        for (i, c) in Component::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
