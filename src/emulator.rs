//! The emulator collaborator boundary.

use std::ops::Deref;

use crate::error::Result;
use crate::types::Matrix;

/// A trained statistical surrogate for an expensive simulator.
///
/// The constraint engine consumes an emulator purely through this
/// contract: a batch of parameter vectors in, a predictive mean and
/// variance out. Training, kernel choice, and any hardware placement are
/// the implementor's business; `predict` is treated as a single atomic
/// call whether or not it parallelizes internally.
pub trait Emulator {
    /// Number of free parameters the emulator was trained over.
    fn n_params(&self) -> usize;

    /// Predict mean and variance for a batch of parameter vectors.
    ///
    /// `points` has one row per sample and `n_params` columns. The
    /// returned matrices share the batch's row count and have one
    /// column per observation point. Failures propagate unchanged to
    /// the evaluation or sampling entry point that issued the call.
    fn predict(&self, points: &Matrix) -> Result<(Matrix, Matrix)>;

    /// Attach a human-readable name to a raw output matrix.
    ///
    /// Purely cosmetic; the numeric core never reads the label.
    fn post_process(&self, data: Matrix, name: &str) -> Decorated {
        Decorated::new(name, data)
    }
}

/// An output matrix decorated with a human-readable name.
#[derive(Debug, Clone)]
pub struct Decorated {
    name: String,
    data: Matrix,
}

impl Decorated {
    /// Wrap `data` under `name`.
    pub fn new(name: impl Into<String>, data: Matrix) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// The attached label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped matrix.
    pub fn data(&self) -> &Matrix {
        &self.data
    }

    /// Discard the label and keep the matrix.
    pub fn into_inner(self) -> Matrix {
        self.data
    }
}

impl Deref for Decorated {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        &self.data
    }
}
