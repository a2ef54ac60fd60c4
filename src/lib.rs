//! # histmatch
//!
//! Uncertainty-aware history matching over statistical emulators.
//!
//! Given a trained emulator (anything that predicts a mean and variance
//! for a batch of parameter vectors) and an observation vector, this
//! crate decides which regions of parameter space are statistically
//! consistent with the observations:
//!
//! - **Variance aggregation**: four independent fractional uncertainty
//!   sources (observational, representativeness, inter-annual,
//!   structural) combine into one total variance per observation point,
//!   computed once per sampler.
//! - **Implausibility**: the standardized distance
//!   `|mean - obs| / sqrt(emulator_var + total_var)` between emulated
//!   predictions and observations.
//! - **Constraint**: a sample is accepted when at most a tolerated
//!   fraction of observation points exceeds an implausibility
//!   threshold.
//! - **Batch evaluation**: candidate sets stream through the emulator
//!   in fixed-size batches with optional progress observation.
//! - **Rejection sampling**: accepted parameter vectors are drawn
//!   directly from a prior, redrawing each candidate until it passes
//!   the constraint.
//!
//! Emulator training, posterior density estimation, and hardware
//! placement are out of scope; the emulator is consumed through the
//! [`Emulator`] trait alone.
//!
//! ## Quick start
//!
//! ```ignore
//! use histmatch::{AbcSampler, Config, Observations, UncertaintyBudget};
//!
//! let obs = Observations::named(obs_values, "aerosol optical depth");
//! let budget = UncertaintyBudget::new()
//!     .observational(0.05)
//!     .representativeness(0.02);
//!
//! let sampler = AbcSampler::new(&emulator, obs, &budget)?
//!     .with_config(Config::new().threshold(3.0).batch_size(1000).n_samples(200))?;
//!
//! // Which of these candidates survive the constraint?
//! let mask = sampler.batch_constrain(&candidates)?;
//!
//! // Draw accepted samples straight from the prior.
//! let posterior_points = sampler.sample()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod emulator;
pub mod error;
pub mod implausibility;
pub mod observations;
pub mod prior;
pub mod progress;
pub mod sampler;
pub mod types;
pub mod uncertainty;

pub use config::Config;
pub use emulator::{Decorated, Emulator};
pub use error::{Error, Result};
pub use implausibility::{constrain, implausibility, total_sd};
pub use observations::Observations;
pub use prior::{IndependentUniform, Prior};
pub use progress::{BatchProgress, NullProgress, ProgressObserver};
pub use sampler::{AbcSampler, Sampler};
pub use types::{Matrix, Vector};
pub use uncertainty::{Uncertainty, UncertaintyBudget};
