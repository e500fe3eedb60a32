//! Point receivers: per-step field samples at one node.

use smallvec::SmallVec;
use yee_core::{Component, ConfigError, Dims};

use crate::fields::Fields;

/// Records selected field components at one node, once per step.
#[derive(Clone, Debug, PartialEq)]
pub struct Receiver {
    /// Label used in output.
    pub name: String,
    /// Node sampled.
    pub position: [usize; 3],
    components: SmallVec<[Component; 6]>,
    samples: Vec<Vec<f32>>,
}

impl Receiver {
    /// A receiver recording all six components.
    pub fn new(name: impl Into<String>, position: [usize; 3]) -> Self {
        Self::with_components(name, position, &Component::ALL)
    }

    /// A receiver recording a chosen subset of components.
    pub fn with_components(
        name: impl Into<String>,
        position: [usize; 3],
        components: &[Component],
    ) -> Self {
        Self {
            name: name.into(),
            position,
            components: components.iter().copied().collect(),
            samples: vec![Vec::new(); components.len()],
        }
    }

    /// Components this receiver records, in trace order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Recorded time series for `component`, indexed by step.
    pub fn trace(&self, component: Component) -> Option<&[f32]> {
        self.components
            .iter()
            .position(|&c| c == component)
            .map(|i| self.samples[i].as_slice())
    }

    /// Number of steps recorded so far.
    pub fn len(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the node lies on the lattice.
    pub fn validate(&self, dims: Dims) -> Result<(), ConfigError> {
        if !dims.contains_node(self.position) {
            return Err(ConfigError::OutOfBounds {
                what: format!("receiver {}", self.name),
                position: self.position,
            });
        }
        Ok(())
    }

    /// Read the recorded components from `fields`, in trace order.
    pub fn sample(&self, fields: &Fields, dims: Dims) -> SmallVec<[f32; 6]> {
        let idx = dims.index_of(self.position);
        self.components
            .iter()
            .map(|&c| fields.get(c)[idx])
            .collect()
    }

    /// Store `values` (in trace order) as the sample for `step`.
    ///
    /// Traces grow to cover `step`; a repeated step overwrites.
    pub fn record(&mut self, step: usize, values: &[f32]) {
        for (trace, &v) in self.samples.iter_mut().zip(values) {
            if trace.len() <= step {
                trace.resize(step + 1, 0.0);
            }
            trace[step] = v;
        }
    }
}
