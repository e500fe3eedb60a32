//! Volume snapshots of the field at chosen steps.

use smallvec::SmallVec;
use yee_core::{Component, ConfigError, Dims, Region};

use crate::fields::Fields;

/// A request to copy a box of the field at one step.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotSpec {
    /// Step at which to capture.
    pub step: usize,
    /// Node box to copy.
    pub region: Region,
    /// Components to copy.
    pub components: SmallVec<[Component; 6]>,
}

impl SnapshotSpec {
    /// Capture all six components over `region` at `step`.
    pub fn new(step: usize, region: Region) -> Self {
        Self {
            step,
            region,
            components: Component::ALL.into_iter().collect(),
        }
    }

    /// Restrict the captured components.
    pub fn with_components(mut self, components: &[Component]) -> Self {
        self.components = components.iter().copied().collect();
        self
    }

    /// Check the box lies on the lattice and is non-empty.
    pub fn validate(&self, dims: Dims) -> Result<(), ConfigError> {
        if !self.region.fits(dims) || self.region.is_empty() {
            return Err(ConfigError::InvalidRegion {
                reason: format!(
                    "snapshot box {:?}..{:?} does not fit {:?}",
                    self.region.lower, self.region.upper, dims
                ),
            });
        }
        Ok(())
    }

    /// Copy the requested components out of `fields`.
    pub fn capture(&self, fields: &Fields, dims: Dims) -> Snapshot {
        let data = self
            .components
            .iter()
            .map(|&c| {
                let src = fields.get(c);
                let values = self
                    .region
                    .nodes()
                    .map(|p| src[dims.index_of(p)])
                    .collect();
                (c, values)
            })
            .collect();
        Snapshot {
            step: self.step,
            region: self.region,
            data,
        }
    }
}

/// Field values over a box at one step, x fastest within the box.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Step captured.
    pub step: usize,
    /// Box captured.
    pub region: Region,
    data: Vec<(Component, Vec<f32>)>,
}

impl Snapshot {
    /// Values of one component, if captured.
    pub fn get(&self, component: Component) -> Option<&[f32]> {
        self.data
            .iter()
            .find(|(c, _)| *c == component)
            .map(|(_, v)| v.as_slice())
    }

    /// Components present, in capture order.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.data.iter().map(|(c, _)| *c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_box_in_x_fastest_order() {
        let dims = Dims::new(3, 3, 3);
        let mut fields = Fields::zeros(dims);
        for (n, v) in fields.ey.iter_mut().enumerate() {
            *v = n as f32;
        }
        let spec = SnapshotSpec::new(7, Region::new([1, 1, 1], [3, 2, 2]))
            .with_components(&[Component::Ey]);
        let snap = spec.capture(&fields, dims);
        assert_eq!(snap.step, 7);
        let expected = [dims.index(1, 1, 1) as f32, dims.index(2, 1, 1) as f32];
        assert_eq!(snap.get(Component::Ey), Some(&expected[..]));
        assert!(snap.get(Component::Ex).is_none());
    }

    #[test]
    fn oversized_box_rejected() {
        let spec = SnapshotSpec::new(0, Region::new([0, 0, 0], [5, 5, 5]));
        assert!(spec.validate(Dims::new(3, 3, 3)).is_err());
        assert!(spec.validate(Dims::new(4, 4, 4)).is_ok());
    }
}
