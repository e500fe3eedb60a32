//! Test utilities and stub strategies for yee development.
//!
//! - Stub strategies in [`strategies`]: record, fail, or sleep instead of
//!   touching a grid.
//! - [`TracedUpdates`] wraps a real strategy and records the operations it
//!   is asked to run.
//! - Grid fixtures in [`fixtures`], including seeded random fields.
//! - [`ManualClock`] for deterministic solve timing.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod strategies;

pub use strategies::{FailingUpdates, RecordingUpdates, SleepingUpdates, TracedUpdates};
pub use yee_solver::ManualClock;

use yee_core::Operation;

/// One entry of an operation log.
pub type LogEntry = (usize, Operation);

/// The log a correct solve of `n` steps produces.
pub fn expected_log(n: usize) -> Vec<LogEntry> {
    (0..n)
        .flat_map(|step| Operation::SEQUENCE.into_iter().map(move |op| (step, op)))
        .collect()
}
