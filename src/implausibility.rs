//! Implausibility computation and the acceptance rule.
//!
//! Implausibility is the standardized distance between an emulated
//! prediction and an observation:
//!
//! ```text
//! I[i][j] = |mean[i][j] - obs[j]| / sqrt(var[i][j] + total_variance[j])
//! ```
//!
//! A sample (row) is accepted when the number of observation points whose
//! implausibility exceeds a threshold stays within a tolerated fraction
//! of the points. Both operations are pure functions over matrices.

use crate::error::{Error, Result};
use crate::types::{Matrix, Vector};

/// Total standard deviation of an observational comparison.
///
/// Combines the emulator's predictive variance with the precomputed
/// total observational variance: `sqrt(var[i][j] + total_variance[j])`.
///
/// # Errors
///
/// Returns a shape-mismatch error when the variance matrix's column
/// count differs from the total-variance length.
pub fn total_sd(emulator_var: &Matrix, total_variance: &Vector) -> Result<Matrix> {
    if emulator_var.ncols() != total_variance.len() {
        return Err(Error::ShapeMismatch {
            context: "emulator variance columns vs total variance",
            expected: total_variance.len(),
            actual: emulator_var.ncols(),
        });
    }
    Ok(Matrix::from_fn(
        emulator_var.nrows(),
        emulator_var.ncols(),
        |i, j| (emulator_var[(i, j)] + total_variance[j]).sqrt(),
    ))
}

/// Standardized distance of each prediction from each observation.
///
/// Computes `|emulator_mean - obs| / total_sd` elementwise. Where
/// `total_sd` is zero (zero emulator variance and zero observational
/// uncertainty at that point), the result is NaN. That is accepted
/// behavior, not an error: NaN propagates to [`constrain`], which
/// tolerates it.
///
/// # Errors
///
/// Returns a shape-mismatch error when `obs` does not match the mean's
/// column count, or when mean and sd differ in shape.
pub fn implausibility(emulator_mean: &Matrix, obs: &Vector, total_sd: &Matrix) -> Result<Matrix> {
    if emulator_mean.ncols() != obs.len() {
        return Err(Error::ShapeMismatch {
            context: "emulator mean columns vs observations",
            expected: obs.len(),
            actual: emulator_mean.ncols(),
        });
    }
    if emulator_mean.nrows() != total_sd.nrows() {
        return Err(Error::ShapeMismatch {
            context: "emulator mean rows vs total standard deviation rows",
            expected: emulator_mean.nrows(),
            actual: total_sd.nrows(),
        });
    }
    if emulator_mean.ncols() != total_sd.ncols() {
        return Err(Error::ShapeMismatch {
            context: "emulator mean columns vs total standard deviation columns",
            expected: emulator_mean.ncols(),
            actual: total_sd.ncols(),
        });
    }
    Ok(Matrix::from_fn(
        emulator_mean.nrows(),
        emulator_mean.ncols(),
        |i, j| (emulator_mean[(i, j)] - obs[j]).abs() / total_sd[(i, j)],
    ))
}

/// Acceptance mask over a matrix of implausibility values.
///
/// A row is accepted when the count of entries strictly greater than
/// `threshold` is at most `tolerance` times the number of observation
/// points.
///
/// NaN entries never compare greater than the threshold, so degenerate
/// observation points count as compliant and cannot reject a sample.
/// This preserves existing behavior; whether it is the intended
/// statistical policy is an open question recorded in DESIGN.md.
pub fn constrain(implausibility: &Matrix, tolerance: f64, threshold: f64) -> Vec<bool> {
    let budget = tolerance * implausibility.ncols() as f64;
    (0..implausibility.nrows())
        .map(|i| {
            let over = implausibility
                .row(i)
                .iter()
                .filter(|&&value| value > threshold)
                .count();
            over as f64 <= budget
        })
        .collect()
}
