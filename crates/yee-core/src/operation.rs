//! The nine per-step update operations and their fixed order.

use std::fmt;

/// One of the nine operations an update strategy performs per time step.
///
/// [`Operation::SEQUENCE`] is the leapfrog order every solver must follow.
/// Reordering it does not raise any error; it silently produces wrong
/// fields, which is why the order lives in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Record receiver outputs for the current step.
    StoreOutputs,
    /// Capture any snapshots scheduled for the current step.
    StoreSnapshots,
    /// Advance H by a half step from E.
    UpdateMagnetic,
    /// Absorbing-boundary correction of H.
    UpdateMagneticPml,
    /// Inject magnetic sources.
    UpdateMagneticSources,
    /// Advance E from the updated H (phase A).
    UpdateElectricA,
    /// Absorbing-boundary correction of E.
    UpdateElectricPml,
    /// Inject electric sources.
    UpdateElectricSources,
    /// Complete the E update from the fully sourced field (phase B).
    UpdateElectricB,
}

impl Operation {
    /// The per-step execution order.
    pub const SEQUENCE: [Operation; 9] = [
        Operation::StoreOutputs,
        Operation::StoreSnapshots,
        Operation::UpdateMagnetic,
        Operation::UpdateMagneticPml,
        Operation::UpdateMagneticSources,
        Operation::UpdateElectricA,
        Operation::UpdateElectricPml,
        Operation::UpdateElectricSources,
        Operation::UpdateElectricB,
    ];

    /// Zero-based position of this operation within [`Operation::SEQUENCE`].
    pub const fn position(self) -> usize {
        match self {
            Operation::StoreOutputs => 0,
            Operation::StoreSnapshots => 1,
            Operation::UpdateMagnetic => 2,
            Operation::UpdateMagneticPml => 3,
            Operation::UpdateMagneticSources => 4,
            Operation::UpdateElectricA => 5,
            Operation::UpdateElectricPml => 6,
            Operation::UpdateElectricSources => 7,
            Operation::UpdateElectricB => 8,
        }
    }

    /// Snake-case name used in logs and metrics.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::StoreOutputs => "store_outputs",
            Operation::StoreSnapshots => "store_snapshots",
            Operation::UpdateMagnetic => "update_magnetic",
            Operation::UpdateMagneticPml => "update_magnetic_pml",
            Operation::UpdateMagneticSources => "update_magnetic_sources",
            Operation::UpdateElectricA => "update_electric_a",
            Operation::UpdateElectricPml => "update_electric_pml",
            Operation::UpdateElectricSources => "update_electric_sources",
            Operation::UpdateElectricB => "update_electric_b",
        }
    }

    /// Whether the operation depends on the current step index.
    pub const fn takes_step(self) -> bool {
        matches!(
            self,
            Operation::StoreOutputs
                | Operation::StoreSnapshots
                | Operation::UpdateMagneticSources
                | Operation::UpdateElectricSources
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_match_sequence() {
        for (i, op) in Operation::SEQUENCE.iter().enumerate() {
            assert_eq!(op.position(), i);
        }
    }

    #[test]
    fn magnetic_chain_precedes_electric() {
        let pos = |op: Operation| op.position();
        assert!(pos(Operation::UpdateMagnetic) < pos(Operation::UpdateMagneticPml));
        assert!(pos(Operation::UpdateMagneticPml) < pos(Operation::UpdateMagneticSources));
        assert!(pos(Operation::UpdateMagneticSources) < pos(Operation::UpdateElectricA));
        assert!(pos(Operation::UpdateElectricA) < pos(Operation::UpdateElectricPml));
        assert!(pos(Operation::UpdateElectricPml) < pos(Operation::UpdateElectricSources));
        assert!(pos(Operation::UpdateElectricSources) < pos(Operation::UpdateElectricB));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Operation::SEQUENCE.iter().map(|o| o.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 9);
    }
}
