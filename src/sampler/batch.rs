//! Batch evaluation of sample points against an emulator.
//!
//! Sample points stream through the emulator in consecutive batches of
//! at most `batch_size` rows, preserving row order. Batches are
//! processed strictly sequentially; the only state carried across
//! batches is the accumulating result buffer.

use log::debug;

use crate::emulator::Emulator;
use crate::error::{Error, Result};
use crate::implausibility::{constrain, implausibility, total_sd};
use crate::progress::{Observed, ProgressObserver};
use crate::types::{Matrix, Vector};

/// One batch of sample points, tagged with its row offset into the
/// original matrix.
pub(crate) struct Batch {
    pub(crate) offset: usize,
    pub(crate) points: Matrix,
}

/// Iterator over consecutive row chunks of a sample-point matrix.
pub(crate) struct Batches<'a> {
    points: &'a Matrix,
    batch_size: usize,
    offset: usize,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(points: &'a Matrix, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0);
        Self {
            points,
            batch_size,
            offset: 0,
        }
    }

    pub(crate) fn n_batches(&self) -> usize {
        self.points.nrows().div_ceil(self.batch_size)
    }
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let remaining = self.points.nrows() - self.offset;
        if remaining == 0 {
            return None;
        }
        let len = remaining.min(self.batch_size);
        let batch = Batch {
            offset: self.offset,
            points: self.points.rows(self.offset, len).into_owned(),
        };
        self.offset += len;
        Some(batch)
    }
}

/// Implausibility of one batch of points: predict, combine variances,
/// standardize.
pub(crate) fn batch_implausibility<M: Emulator + ?Sized>(
    model: &M,
    obs: &Vector,
    points: &Matrix,
    total_variance: &Vector,
) -> Result<Matrix> {
    let (mean, var) = model.predict(points)?;
    if mean.nrows() != points.nrows() {
        return Err(Error::ShapeMismatch {
            context: "emulator mean rows vs batch rows",
            expected: points.nrows(),
            actual: mean.nrows(),
        });
    }
    if mean.shape() != var.shape() {
        return Err(Error::ShapeMismatch {
            context: "emulator mean vs emulator variance",
            expected: mean.ncols(),
            actual: var.ncols(),
        });
    }
    let sd = total_sd(&var, total_variance)?;
    implausibility(&mean, obs, &sd)
}

/// Evaluate the full implausibility matrix for `points`.
pub(crate) fn evaluate_implausibility<M: Emulator + ?Sized>(
    model: &M,
    obs: &Vector,
    points: &Matrix,
    total_variance: &Vector,
    batch_size: usize,
    observer: &mut dyn ProgressObserver,
) -> Result<Matrix> {
    if batch_size == 0 {
        return Err(Error::InvalidConfig("batch_size must be positive"));
    }

    let batches = Batches::new(points, batch_size);
    let n_batches = batches.n_batches();
    let mut out = Matrix::zeros(points.nrows(), obs.len());
    for batch in Observed::new(batches, n_batches, points.nrows(), observer) {
        let imp = batch_implausibility(model, obs, &batch.points, total_variance)?;
        out.rows_mut(batch.offset, imp.nrows()).copy_from(&imp);
    }
    debug!(
        "evaluated implausibility for {} points in {} batches",
        points.nrows(),
        n_batches
    );
    Ok(out)
}

/// Evaluate the acceptance mask for `points` under the constraint rule.
pub(crate) fn evaluate_constrain<M: Emulator + ?Sized>(
    model: &M,
    obs: &Vector,
    points: &Matrix,
    total_variance: &Vector,
    tolerance: f64,
    threshold: f64,
    batch_size: usize,
    observer: &mut dyn ProgressObserver,
) -> Result<Vec<bool>> {
    if batch_size == 0 {
        return Err(Error::InvalidConfig("batch_size must be positive"));
    }

    let batches = Batches::new(points, batch_size);
    let n_batches = batches.n_batches();
    let mut mask = Vec::with_capacity(points.nrows());
    for batch in Observed::new(batches, n_batches, points.nrows(), observer) {
        let imp = batch_implausibility(model, obs, &batch.points, total_variance)?;
        mask.extend(constrain(&imp, tolerance, threshold));
    }
    debug!(
        "constrained {} points: {} accepted",
        mask.len(),
        mask.iter().filter(|&&a| a).count()
    );
    Ok(mask)
}
