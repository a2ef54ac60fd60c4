//! Progress reporting over batch evaluation.
//!
//! Reporting is a decorator over the batch sequence: [`Observed`] wraps
//! the iterator of batches, yields every batch unmodified, and notifies
//! an observer after each one. The numeric path is identical with or
//! without an observer attached.

use serde::{Deserialize, Serialize};

use crate::sampler::batch::Batch;

/// Snapshot of batch-evaluation progress, delivered once per batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgress {
    /// One-based index of the batch just evaluated.
    pub batch_index: usize,
    /// Total number of batches in this evaluation.
    pub n_batches: usize,
    /// Sample rows evaluated so far, including the current batch.
    pub rows_done: usize,
    /// Total sample rows in this evaluation.
    pub total_rows: usize,
}

impl BatchProgress {
    /// Fraction of rows evaluated so far, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total_rows == 0 {
            1.0
        } else {
            self.rows_done as f64 / self.total_rows as f64
        }
    }
}

/// Observes batch evaluation without altering it.
pub trait ProgressObserver {
    /// Called after each batch has been evaluated.
    fn on_batch(&mut self, progress: &BatchProgress);
}

impl<F: FnMut(&BatchProgress)> ProgressObserver for F {
    fn on_batch(&mut self, progress: &BatchProgress) {
        self(progress)
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_batch(&mut self, _progress: &BatchProgress) {}
}

/// Iterator decorator that forwards batches and reports each one.
pub(crate) struct Observed<'o, I> {
    inner: I,
    observer: &'o mut dyn ProgressObserver,
    batch_index: usize,
    n_batches: usize,
    rows_done: usize,
    total_rows: usize,
}

impl<'o, I> Observed<'o, I> {
    pub(crate) fn new(
        inner: I,
        n_batches: usize,
        total_rows: usize,
        observer: &'o mut dyn ProgressObserver,
    ) -> Self {
        Self {
            inner,
            observer,
            batch_index: 0,
            n_batches,
            rows_done: 0,
            total_rows,
        }
    }
}

impl<I: Iterator<Item = Batch>> Iterator for Observed<'_, I> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let batch = self.inner.next()?;
        self.batch_index += 1;
        self.rows_done += batch.points.nrows();
        self.observer.on_batch(&BatchProgress {
            batch_index: self.batch_index,
            n_batches: self.n_batches,
            rows_done: self.rows_done,
            total_rows: self.total_rows,
        });
        Some(batch)
    }
}
