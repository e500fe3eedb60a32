//! Step-index sequences.

use std::iter::FusedIterator;

/// The step indices `0..n`, in order, once each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Steps {
    next: usize,
    end: usize,
}

impl Steps {
    /// Indices `0..n`.
    pub const fn new(n: usize) -> Self {
        Self { next: 0, end: n }
    }

    /// Total number of steps the sequence was created with, including any
    /// already consumed.
    pub const fn total(&self) -> usize {
        self.end
    }

    /// Report every index to `callback` as it is produced.
    pub fn with_progress<F>(self, callback: F) -> Progress<Self, F>
    where
        F: FnMut(usize, usize),
    {
        let total = self.end;
        Progress::new(self, total, callback)
    }
}

impl Iterator for Steps {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.end {
            return None;
        }
        let step = self.next;
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Steps {}

impl FusedIterator for Steps {}

/// An index sequence that calls `callback(index, total)` for every index
/// it yields, without changing the sequence.
///
/// This is the hook for progress display; the solver sees the wrapped
/// iterator's values unchanged.
#[derive(Clone, Debug)]
pub struct Progress<I, F> {
    inner: I,
    total: usize,
    callback: F,
}

impl<I, F> Progress<I, F>
where
    I: Iterator<Item = usize>,
    F: FnMut(usize, usize),
{
    /// Wrap `inner`; `total` is passed through to the callback.
    pub fn new(inner: I, total: usize, callback: F) -> Self {
        Self {
            inner,
            total,
            callback,
        }
    }

    /// Unwrap the inner sequence.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I, F> Iterator for Progress<I, F>
where
    I: Iterator<Item = usize>,
    F: FnMut(usize, usize),
{
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let step = self.inner.next()?;
        (self.callback)(step, self.total);
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I, F> ExactSizeIterator for Progress<I, F>
where
    I: ExactSizeIterator<Item = usize>,
    F: FnMut(usize, usize),
{
}

impl<I, F> FusedIterator for Progress<I, F>
where
    I: FusedIterator<Item = usize>,
    F: FnMut(usize, usize),
{
}
