//! Approximate-Bayesian-Computation constraint of a parameter space.

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::Config;
use crate::emulator::{Decorated, Emulator};
use crate::error::{Error, Result};
use crate::implausibility::constrain;
use crate::observations::Observations;
use crate::prior::{IndependentUniform, Prior};
use crate::progress::{NullProgress, ProgressObserver};
use crate::sampler::batch;
use crate::sampler::Sampler;
use crate::types::{Matrix, Vector};
use crate::uncertainty::UncertaintyBudget;

/// Samples an emulated model for parameter vectors consistent with an
/// observation, using a tolerance/threshold acceptance rule rather than
/// a likelihood.
///
/// The sampler owns the observation, the uncertainty configuration, and
/// the derived total-variance vector for its lifetime; none of these
/// mutate after construction. The total variance is computed once and
/// reused for every sample evaluated.
///
/// # Example
///
/// ```ignore
/// use histmatch::{AbcSampler, Config, Observations, UncertaintyBudget};
///
/// let budget = UncertaintyBudget::new().observational(0.05);
/// let sampler = AbcSampler::new(&emulator, obs, &budget)?
///     .with_config(Config::new().threshold(3.0).batch_size(500).n_samples(100))?;
///
/// let kept = sampler.batch_constrain(&candidate_points)?;
/// let posterior_points = sampler.sample()?;
/// ```
pub struct AbcSampler<'m, M: Emulator> {
    model: &'m M,
    observations: Observations,
    total_variance: Vector,
    config: Config,
}

impl<'m, M: Emulator> AbcSampler<'m, M> {
    /// Create a sampler for `model` against `observations`.
    ///
    /// Aggregates the uncertainty budget into the cached total-variance
    /// vector; vector-valued sources that do not match the observation
    /// length fail here rather than at evaluation time.
    pub fn new(
        model: &'m M,
        observations: Observations,
        uncertainty: &UncertaintyBudget,
    ) -> Result<Self> {
        let total_variance = uncertainty.total_variance(observations.values())?;
        Ok(Self {
            model,
            observations,
            total_variance,
            config: Config::default(),
        })
    }

    /// Replace the configuration, validating it first.
    pub fn with_config(mut self, config: Config) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The observations this sampler constrains against.
    pub fn observations(&self) -> &Observations {
        &self.observations
    }

    /// The cached total observational variance per observation point.
    pub fn total_variance(&self) -> &Vector {
        &self.total_variance
    }

    /// Implausibility of each sample point against each observation.
    ///
    /// Streams `points` through the emulator in configured batches and
    /// returns the N×O implausibility matrix, decorated with a label by
    /// the emulator's post-processing hook. Entries where both the
    /// emulator variance and the observational uncertainty vanish are
    /// NaN.
    pub fn get_implausibility(&self, points: &Matrix) -> Result<Decorated> {
        self.get_implausibility_with_progress(points, &mut NullProgress)
    }

    /// [`get_implausibility`](Self::get_implausibility), reporting each
    /// batch to `observer`.
    pub fn get_implausibility_with_progress(
        &self,
        points: &Matrix,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Decorated> {
        self.check_points(points)?;
        let raw = batch::evaluate_implausibility(
            self.model,
            self.observations.values(),
            points,
            &self.total_variance,
            self.config.batch_size,
            observer,
        )?;
        let label = match self.observations.name() {
            Some(name) => format!("Implausibility in emulated {name}"),
            None => String::from("Implausibility"),
        };
        Ok(self.model.post_process(raw, &label))
    }

    /// Acceptance mask for each sample point under the configured
    /// tolerance and threshold.
    pub fn batch_constrain(&self, points: &Matrix) -> Result<Vec<bool>> {
        self.batch_constrain_with_progress(points, &mut NullProgress)
    }

    /// [`batch_constrain`](Self::batch_constrain), reporting each batch
    /// to `observer`.
    pub fn batch_constrain_with_progress(
        &self,
        points: &Matrix,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Vec<bool>> {
        self.check_points(points)?;
        batch::evaluate_constrain(
            self.model,
            self.observations.values(),
            points,
            &self.total_variance,
            self.config.tolerance,
            self.config.threshold,
            self.config.batch_size,
            observer,
        )
    }

    /// Draw `n_samples` accepted parameter vectors from the unit
    /// hypercube prior.
    pub fn sample(&self) -> Result<Matrix> {
        let prior = IndependentUniform::unit(self.model.n_params());
        self.sample_with_prior(&prior)
    }

    /// Draw `n_samples` accepted parameter vectors from `prior`.
    ///
    /// Each output slot redraws until a candidate passes the constraint
    /// rule; candidates are evaluated one at a time, never batched
    /// across slots. With `max_attempts` unset an unsatisfiable
    /// configuration never terminates — choose a satisfiable
    /// tolerance/threshold or set the guard.
    pub fn sample_with_prior(&self, prior: &dyn Prior) -> Result<Matrix> {
        if prior.n_params() != self.model.n_params() {
            return Err(Error::ShapeMismatch {
                context: "prior parameter count vs emulator",
                expected: self.model.n_params(),
                actual: prior.n_params(),
            });
        }

        let n_samples = self.config.n_samples;
        let n_params = prior.n_params();
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let mut accepted = Matrix::zeros(n_samples, n_params);
        for slot in 0..n_samples {
            let mut attempts: u64 = 0;
            loop {
                if let Some(max) = self.config.max_attempts {
                    if attempts >= max {
                        return Err(Error::RetryLimit {
                            slot,
                            attempts: max,
                        });
                    }
                }
                attempts += 1;

                let candidate = prior.draw(&mut rng);
                if self.accepts(&candidate)? {
                    accepted.row_mut(slot).copy_from(&candidate.transpose());
                    trace!("slot {slot} accepted after {attempts} draws");
                    break;
                }
            }
        }
        debug!("drew {n_samples} accepted samples (seed {seed})");
        Ok(accepted)
    }

    /// Evaluate a single candidate against the constraint rule.
    fn accepts(&self, candidate: &Vector) -> Result<bool> {
        let point = Matrix::from_row_slice(1, candidate.len(), candidate.as_slice());
        let imp = batch::batch_implausibility(
            self.model,
            self.observations.values(),
            &point,
            &self.total_variance,
        )?;
        Ok(constrain(&imp, self.config.tolerance, self.config.threshold)[0])
    }

    fn check_points(&self, points: &Matrix) -> Result<()> {
        if points.ncols() != self.model.n_params() {
            return Err(Error::ShapeMismatch {
                context: "sample point parameter count vs emulator",
                expected: self.model.n_params(),
                actual: points.ncols(),
            });
        }
        Ok(())
    }
}

impl<M: Emulator> Sampler for AbcSampler<'_, M> {
    fn evaluate(&self, points: &Matrix) -> Result<Vec<bool>> {
        self.batch_constrain(points)
    }

    fn sample(&self) -> Result<Matrix> {
        AbcSampler::sample(self)
    }
}
