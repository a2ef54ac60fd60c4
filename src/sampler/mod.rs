//! Sampler strategies over emulated parameter spaces.
//!
//! [`Sampler`] is the strategy seam: a sampler can evaluate a set of
//! candidate points against its acceptance rule and draw accepted
//! points from a prior. [`AbcSampler`] is the threshold/tolerance
//! (history-matching) strategy; likelihood-based strategies would
//! implement the same trait without touching the batching machinery in
//! [`batch`].

mod abc;
pub(crate) mod batch;

pub use abc::AbcSampler;

use crate::error::Result;
use crate::types::Matrix;

/// A strategy for deciding which parameter vectors are consistent with
/// an observation.
pub trait Sampler {
    /// Acceptance decision for each row of `points`.
    fn evaluate(&self, points: &Matrix) -> Result<Vec<bool>>;

    /// Draw the configured number of accepted parameter vectors.
    fn sample(&self) -> Result<Matrix>;
}
