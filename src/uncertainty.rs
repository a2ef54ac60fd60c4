//! Observational uncertainty sources and variance aggregation.
//!
//! Each source is a fractional (relative, 1-sigma) uncertainty, applied
//! either uniformly or per observation point. A source's contribution to
//! the comparison variance is `(obs * unc)^2`; the total variance is the
//! elementwise sum over all four sources. Zero uncertainty is valid and
//! contributes nothing — if every source is zero at a point, the total
//! variance is zero there, which yields NaN implausibility downstream
//! when the emulator variance is also zero.

use crate::error::{Error, Result};
use crate::types::Vector;

/// A fractional 1-sigma uncertainty, uniform or per observation point.
#[derive(Debug, Clone)]
pub enum Uncertainty {
    /// One fraction applied to every observation point.
    Scalar(f64),
    /// One fraction per observation point; length must equal the
    /// observation vector's.
    PerPoint(Vector),
}

impl Default for Uncertainty {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl From<f64> for Uncertainty {
    fn from(fraction: f64) -> Self {
        Self::Scalar(fraction)
    }
}

impl From<Vector> for Uncertainty {
    fn from(fractions: Vector) -> Self {
        Self::PerPoint(fractions)
    }
}

impl From<Vec<f64>> for Uncertainty {
    fn from(fractions: Vec<f64>) -> Self {
        Self::PerPoint(Vector::from_vec(fractions))
    }
}

impl Uncertainty {
    /// Absolute variance contribution of this source: `(obs * unc)^2`.
    fn variance(&self, obs: &Vector, context: &'static str) -> Result<Vector> {
        match self {
            Self::Scalar(fraction) => Ok(obs.map(|o| (o * fraction).powi(2))),
            Self::PerPoint(fractions) => {
                if fractions.len() != obs.len() {
                    return Err(Error::ShapeMismatch {
                        context,
                        expected: obs.len(),
                        actual: fractions.len(),
                    });
                }
                Ok(obs.zip_map(fractions, |o, f| (o * f).powi(2)))
            }
        }
    }
}

/// The four independent uncertainty sources entering an observational
/// comparison.
///
/// All sources default to zero. The budget is fixed at sampler
/// construction; the derived total variance is computed once and reused
/// for every sample evaluated afterwards.
#[derive(Debug, Clone, Default)]
pub struct UncertaintyBudget {
    /// Uncertainty in the observations themselves.
    pub observational: Uncertainty,
    /// Uncertainty from the spatial and temporal representativeness of
    /// the observations.
    pub representativeness: Uncertainty,
    /// Uncertainty from comparing against a model year other than the
    /// one the observations were measured in.
    pub interannual: Uncertainty,
    /// Structural uncertainty in the model itself.
    pub structural: Uncertainty,
}

impl UncertaintyBudget {
    /// Create a budget with all four sources at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the observational uncertainty.
    pub fn observational(mut self, unc: impl Into<Uncertainty>) -> Self {
        self.observational = unc.into();
        self
    }

    /// Set the representativeness uncertainty.
    pub fn representativeness(mut self, unc: impl Into<Uncertainty>) -> Self {
        self.representativeness = unc.into();
        self
    }

    /// Set the inter-annual uncertainty.
    pub fn interannual(mut self, unc: impl Into<Uncertainty>) -> Self {
        self.interannual = unc.into();
        self
    }

    /// Set the structural uncertainty.
    pub fn structural(mut self, unc: impl Into<Uncertainty>) -> Self {
        self.structural = unc.into();
        self
    }

    /// Total comparison variance per observation point.
    ///
    /// Sums `(obs * unc)^2` over the four sources. Every entry of the
    /// result is non-negative. Vector-valued sources whose length does
    /// not match `obs` fail with a shape-mismatch error naming the
    /// source.
    pub fn total_variance(&self, obs: &Vector) -> Result<Vector> {
        let sources: [(&Uncertainty, &'static str); 4] = [
            (&self.observational, "observational uncertainty"),
            (&self.representativeness, "representativeness uncertainty"),
            (&self.interannual, "inter-annual uncertainty"),
            (&self.structural, "structural uncertainty"),
        ];

        let mut total = Vector::zeros(obs.len());
        for (source, context) in sources {
            total += source.variance(obs, context)?;
        }
        Ok(total)
    }
}
