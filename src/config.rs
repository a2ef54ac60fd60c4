//! Configuration for constraint evaluation and rejection sampling.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration options for an [`AbcSampler`](crate::AbcSampler).
///
/// The acceptance rule and batching behavior are controlled here; the
/// observational uncertainty budget lives on
/// [`UncertaintyBudget`](crate::UncertaintyBudget) since it is fixed at
/// sampler construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fraction of observation points allowed to exceed `threshold`
    /// while still accepting a sample.
    ///
    /// Must lie in [0, 1]. Default: 0.0 (every point must comply).
    pub tolerance: f64,

    /// Number of standard deviations a prediction may sit from an
    /// observation before that point counts against the tolerance.
    ///
    /// Must be non-negative. Default: 3.0.
    pub threshold: f64,

    /// Number of sample points sent through the emulator per predict
    /// call during batch evaluation.
    ///
    /// Batches are processed strictly in order; results are invariant to
    /// the choice of batch size. Default: 1.
    pub batch_size: usize,

    /// Number of accepted parameter vectors produced by
    /// [`AbcSampler::sample`](crate::AbcSampler::sample).
    ///
    /// Default: 1.
    pub n_samples: usize,

    /// Optional cap on rejected draws per output slot.
    ///
    /// When `None`, each slot redraws until a candidate is accepted; an
    /// unsatisfiable tolerance/threshold combination then never
    /// terminates. When set, exceeding the cap returns
    /// [`Error::RetryLimit`](crate::Error::RetryLimit).
    ///
    /// Default: `None`.
    pub max_attempts: Option<u64>,

    /// Optional deterministic seed for the sampling RNG.
    ///
    /// When set, repeated `sample` calls draw identical candidates,
    /// which helps with debugging and reproducibility.
    ///
    /// Default: `None` (seed drawn from the thread RNG).
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            threshold: 3.0,
            batch_size: 1,
            n_samples: 1,
            max_attempts: None,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&tolerance),
            "tolerance must be in [0, 1]"
        );
        self.tolerance = tolerance;
        self
    }

    /// Set the implausibility threshold in standard deviations.
    pub fn threshold(mut self, threshold: f64) -> Self {
        assert!(threshold >= 0.0, "threshold must be non-negative");
        self.threshold = threshold;
        self
    }

    /// Set the batch size for batch evaluation.
    pub fn batch_size(mut self, size: usize) -> Self {
        assert!(size > 0, "batch_size must be positive");
        self.batch_size = size;
        self
    }

    /// Set the number of accepted samples to produce.
    pub fn n_samples(mut self, n: usize) -> Self {
        assert!(n > 0, "n_samples must be positive");
        self.n_samples = n;
        self
    }

    /// Bound the rejection loop to at most `attempts` draws per slot.
    pub fn max_attempts(mut self, attempts: u64) -> Self {
        assert!(attempts > 0, "max_attempts must be positive");
        self.max_attempts = Some(attempts);
        self
    }

    /// Set a deterministic seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every field is inside its documented domain.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(Error::InvalidConfig("tolerance must be in [0, 1]"));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::InvalidConfig("threshold must be finite and non-negative"));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be positive"));
        }
        if self.n_samples == 0 {
            return Err(Error::InvalidConfig("n_samples must be positive"));
        }
        if self.max_attempts == Some(0) {
            return Err(Error::InvalidConfig("max_attempts must be positive when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tolerance, 0.0);
        assert_eq!(config.threshold, 3.0);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.n_samples, 1);
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new()
            .tolerance(0.4)
            .threshold(2.0)
            .batch_size(100)
            .n_samples(50)
            .max_attempts(10_000)
            .seed(7);

        assert_eq!(config.tolerance, 0.4);
        assert_eq!(config.threshold, 2.0);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.n_samples, 50);
        assert_eq!(config.max_attempts, Some(10_000));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validation() {
        assert!(Config::default().validate().is_ok());

        let mut invalid = Config::default();
        invalid.tolerance = 1.5;
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.threshold = -1.0;
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.batch_size = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.n_samples = 0;
        assert!(invalid.validate().is_err());
    }

    #[test]
    #[should_panic]
    fn test_invalid_tolerance() {
        Config::new().tolerance(1.1);
    }

    #[test]
    #[should_panic]
    fn test_invalid_batch_size() {
        Config::new().batch_size(0);
    }
}
