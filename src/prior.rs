//! Prior distributions over parameter space.

use rand::RngCore;
use rand_distr::{Distribution, Uniform};

use crate::error::{Error, Result};
use crate::types::Vector;

/// A prior distribution candidates are drawn from during rejection
/// sampling.
pub trait Prior {
    /// Dimensionality of a single draw.
    fn n_params(&self) -> usize;

    /// Draw one candidate parameter vector.
    fn draw(&self, rng: &mut dyn RngCore) -> Vector;
}

/// Independent uniform distribution per parameter.
///
/// The default prior when none is supplied: uniform over the unit
/// hypercube, one independent component per free parameter.
#[derive(Debug, Clone)]
pub struct IndependentUniform {
    components: Vec<Uniform<f64>>,
}

impl IndependentUniform {
    /// Uniform over `[low[i], high[i])` per component.
    ///
    /// # Errors
    ///
    /// Fails when the bound vectors differ in length or any component
    /// has `low >= high`.
    pub fn new(low: &Vector, high: &Vector) -> Result<Self> {
        if low.len() != high.len() {
            return Err(Error::ShapeMismatch {
                context: "uniform prior bounds",
                expected: low.len(),
                actual: high.len(),
            });
        }
        if low.iter().zip(high.iter()).any(|(l, h)| l >= h) {
            return Err(Error::InvalidConfig(
                "uniform prior requires low < high for every parameter",
            ));
        }
        Ok(Self {
            components: low
                .iter()
                .zip(high.iter())
                .map(|(&l, &h)| Uniform::new(l, h))
                .collect(),
        })
    }

    /// Uniform over the unit hypercube `[0, 1)^n_params`.
    pub fn unit(n_params: usize) -> Self {
        Self {
            components: (0..n_params).map(|_| Uniform::new(0.0, 1.0)).collect(),
        }
    }
}

impl Prior for IndependentUniform {
    fn n_params(&self) -> usize {
        self.components.len()
    }

    fn draw(&self, rng: &mut dyn RngCore) -> Vector {
        Vector::from_fn(self.components.len(), |i, _| {
            self.components[i].sample(&mut *rng)
        })
    }
}
