//! The time-stepping loop.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use yee_core::{Operation, UpdateError};
use yee_updates::UpdateStrategy;

use crate::clock::{Clock, MonotonicClock};
use crate::metrics::SolveMetrics;

// ── SolveError ───────────────────────────────────────────────────

/// A solve stopped because an operation failed.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveError {
    /// Step index that was running.
    pub step: usize,
    /// Operation that failed.
    pub operation: Operation,
    /// The strategy's error, unmodified.
    pub source: UpdateError,
}

impl SolveError {
    /// The strategy's error, as it was returned.
    pub fn into_source(self) -> UpdateError {
        self.source
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}, {}: {}",
            self.step, self.operation, self.source
        )
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

// ── SolveReport ──────────────────────────────────────────────────

/// Everything a successful [`Solver::run`] produces.
#[derive(Debug)]
pub struct SolveReport<U> {
    /// Time from the first to the last clock reading of the solve.
    pub elapsed: Duration,
    /// Per-operation timing.
    pub metrics: SolveMetrics,
    /// The strategy, handed back so its state can be read.
    pub updates: U,
}

// ── Solver ───────────────────────────────────────────────────────

/// Runs the nine update operations for every index of a step sequence.
///
/// `U` may be an owned strategy, a `&mut` borrow of one, or a
/// `Box<dyn UpdateStrategy>`. `I` is consumed by the solve, so a solver
/// runs at most once.
///
/// # Examples
///
/// ```rust,ignore
/// let mut cpu = CpuUpdates::new(grid);
/// let elapsed = Solver::new(&mut cpu, Steps::new(500)).solve()?;
/// let trace = cpu.grid().receiver("rx").and_then(|r| r.trace(Component::Ez));
/// ```
pub struct Solver<U, I, C = MonotonicClock> {
    updates: U,
    steps: I,
    clock: C,
}

impl<U, I> Solver<U, I, MonotonicClock>
where
    U: UpdateStrategy,
    I: Iterator<Item = usize>,
{
    /// Bind a strategy and a step sequence, timed by wall clock.
    pub fn new(updates: U, steps: I) -> Self {
        Self {
            updates,
            steps,
            clock: MonotonicClock::new(),
        }
    }
}

impl<U, I, C> Solver<U, I, C>
where
    U: UpdateStrategy,
    I: Iterator<Item = usize>,
    C: Clock,
{
    /// Replace the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Solver<U, I, C2> {
        Solver {
            updates: self.updates,
            steps: self.steps,
            clock,
        }
    }

    /// The bound strategy.
    pub fn updates(&self) -> &U {
        &self.updates
    }

    /// Run every step and return the elapsed time.
    ///
    /// # Errors
    ///
    /// The first failing operation stops the solve; its error is returned
    /// inside a [`SolveError`] naming the step and operation. Nothing after
    /// it runs and no duration is reported.
    pub fn solve(self) -> Result<Duration, SolveError> {
        self.run().map(|report| report.elapsed)
    }

    /// Run every step and return the elapsed time, metrics, and the
    /// strategy.
    ///
    /// # Errors
    ///
    /// As for [`solve`](Self::solve).
    pub fn run(self) -> Result<SolveReport<U>, SolveError> {
        let Solver {
            mut updates,
            steps,
            clock,
        } = self;
        let backend = updates.name().to_owned();
        let (expected, _) = steps.size_hint();
        tracing::info!(backend = %backend, steps = expected, "solve started");

        let mut metrics = SolveMetrics::default();
        let start = clock.now();
        for step in steps {
            for operation in Operation::SEQUENCE {
                let t0 = clock.now();
                if let Err(source) = updates.execute(operation, step) {
                    tracing::warn!(
                        backend = %backend,
                        step,
                        operation = %operation,
                        error = %source,
                        "solve aborted"
                    );
                    return Err(SolveError {
                        step,
                        operation,
                        source,
                    });
                }
                metrics.record(operation, clock.since(t0));
            }
            metrics.steps_completed += 1;
        }
        let elapsed = clock.since(start);

        tracing::info!(
            backend = %backend,
            steps = metrics.steps_completed,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "solve finished"
        );
        Ok(SolveReport {
            elapsed,
            metrics,
            updates,
        })
    }
}

impl<U, I, C> fmt::Debug for Solver<U, I, C>
where
    U: UpdateStrategy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("updates", &self.updates.name())
            .finish_non_exhaustive()
    }
}
