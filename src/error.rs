//! Error types for constraint and sampling operations.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by constraint evaluation and sampling.
///
/// Numeric degeneracy (a zero total standard deviation at an observation
/// point) is deliberately *not* an error: it surfaces as NaN in the
/// implausibility output and propagates silently.
#[derive(Debug, Error)]
pub enum Error {
    /// Two collaborating arrays disagreed about a dimension.
    ///
    /// Raised at construction time for uncertainty vectors and at call
    /// time for sample points and emulator predictions.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which combination step detected the mismatch.
        context: &'static str,
        /// The dimension required by the other operand.
        expected: usize,
        /// The dimension actually supplied.
        actual: usize,
    },

    /// The emulator's predict call failed.
    ///
    /// Propagated unchanged to the caller of the evaluation or sampling
    /// entry point; no retry is attempted and no partial results are
    /// returned.
    #[error("emulator prediction failed: {0}")]
    Emulator(String),

    /// A rejection-sampling slot exhausted its attempt budget.
    ///
    /// Only raised when [`Config::max_attempts`](crate::Config) is set;
    /// the default configuration retries forever, as the acceptance loop
    /// has no inherent bound.
    #[error("rejection sampling for slot {slot} exceeded {attempts} attempts without acceptance")]
    RetryLimit {
        /// Zero-based index of the output slot being filled.
        slot: usize,
        /// The configured attempt budget that was exhausted.
        attempts: u64,
    },

    /// A configuration value is outside its documented domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
