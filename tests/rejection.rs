//! Rejection sampling and end-to-end implausibility tests.
//!
//! The emulator double here reproduces its generating function exactly
//! with zero predictive variance, so implausibility reduces to the
//! observational uncertainty alone. Perturbing the observations by one
//! standard deviation of a single uncertainty source should then give a
//! mean implausibility of one at the generating point.

use approx::assert_relative_eq;
use histmatch::{
    AbcSampler, Config, Error, IndependentUniform, Matrix, Observations, Sampler,
    UncertaintyBudget, Vector,
};

// =============================================================================
// EMULATOR DOUBLE
// =============================================================================

const N_OBS: usize = 40;

/// Exact emulator of a two-parameter harmonic field:
/// `f_j(x) = 100 + amplitude * (x0 * sin(theta_j) + x1 * cos(theta_j))`.
struct HarmonicEmulator {
    amplitude: f64,
}

impl HarmonicEmulator {
    fn new(amplitude: f64) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self { amplitude }
    }

    fn field(&self, x0: f64, x1: f64) -> Vector {
        Vector::from_fn(N_OBS, |j, _| {
            let theta = 2.0 * std::f64::consts::PI * j as f64 / N_OBS as f64;
            100.0 + self.amplitude * (x0 * theta.sin() + x1 * theta.cos())
        })
    }
}

impl histmatch::Emulator for HarmonicEmulator {
    fn n_params(&self) -> usize {
        2
    }

    fn predict(&self, points: &Matrix) -> histmatch::Result<(Matrix, Matrix)> {
        let n = points.nrows();
        let mut mean = Matrix::zeros(n, N_OBS);
        for i in 0..n {
            let row = self.field(points[(i, 0)], points[(i, 1)]);
            mean.row_mut(i).copy_from(&row.transpose());
        }
        let var = Matrix::zeros(n, N_OBS);
        Ok((mean, var))
    }
}

/// Budget with a single source set to `fraction`, the rest zero.
fn single_source_budget(source: usize, fraction: f64) -> UncertaintyBudget {
    let budget = UncertaintyBudget::new();
    match source {
        0 => budget.observational(fraction),
        1 => budget.representativeness(fraction),
        2 => budget.interannual(fraction),
        _ => budget.structural(fraction),
    }
}

// =============================================================================
// END-TO-END IMPLAUSIBILITY CALIBRATION
// =============================================================================

/// Perturbing the observations by one standard deviation of any single
/// uncertainty source gives mean implausibility ~1 at the generating
/// point, since the emulator variance is zero there.
#[test]
fn one_sigma_perturbation_gives_unit_implausibility_per_source() {
    let emulator = HarmonicEmulator::new(2.0);
    let perturbation = 5.0;
    let truth = emulator.field(1.0, 1.0);
    let obs_values = truth.map(|v| v + perturbation);
    let fraction = perturbation / obs_values.mean();

    for source in 0..4 {
        let obs = Observations::new(obs_values.clone());
        let budget = single_source_budget(source, fraction);
        let sampler = AbcSampler::new(&emulator, obs, &budget).unwrap();

        let point = Matrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let imp = sampler.get_implausibility(&point).unwrap();
        assert_relative_eq!(imp.data().row(0).mean(), 1.0, max_relative = 1e-2);
    }
}

/// With a per-point fractional uncertainty of exactly
/// `perturbation / obs`, every implausibility entry is exactly one.
#[test]
fn one_sigma_perturbation_with_vector_uncertainty() {
    let emulator = HarmonicEmulator::new(2.0);
    let perturbation = 5.0;
    let obs_values = emulator.field(1.0, 1.0).map(|v| v + perturbation);
    let fractions = obs_values.map(|v| perturbation / v);

    let obs = Observations::new(obs_values);
    let budget = UncertaintyBudget::new().observational(fractions);
    let sampler = AbcSampler::new(&emulator, obs, &budget).unwrap();

    let point = Matrix::from_row_slice(1, 2, &[1.0, 1.0]);
    let imp = sampler.get_implausibility(&point).unwrap();
    for value in imp.data().row(0).iter() {
        assert_relative_eq!(*value, 1.0, max_relative = 1e-9);
    }
}

// =============================================================================
// REJECTION SAMPLING
// =============================================================================

fn constrained_sampler(
    emulator: &HarmonicEmulator,
    n_samples: usize,
    seed: u64,
) -> AbcSampler<'_, HarmonicEmulator> {
    // Observations at (0.5, 0.5) with an uncertainty tight enough that
    // only part of the unit hypercube survives the constraint.
    let obs = Observations::new(emulator.field(0.5, 0.5));
    let budget = UncertaintyBudget::new().observational(0.02);
    AbcSampler::new(emulator, obs, &budget)
        .unwrap()
        .with_config(
            Config::new()
                .threshold(3.0)
                .n_samples(n_samples)
                .seed(seed)
                .max_attempts(1_000_000),
        )
        .unwrap()
}

#[test]
fn sampled_points_all_satisfy_the_constraint() {
    let emulator = HarmonicEmulator::new(40.0);
    let sampler = constrained_sampler(&emulator, 25, 42);

    let samples = sampler.sample().unwrap();
    assert_eq!(samples.shape(), (25, 2));
    assert!(samples.iter().all(|&x| (0.0..1.0).contains(&x)));

    // Round-trip: every accepted draw passes the same constraint.
    let mask = sampler.batch_constrain(&samples).unwrap();
    assert!(mask.iter().all(|&accepted| accepted));
}

#[test]
fn constraint_is_nontrivial_over_the_prior() {
    // The configuration used for sampling must reject part of the
    // hypercube, otherwise the round-trip test is vacuous.
    let emulator = HarmonicEmulator::new(40.0);
    let sampler = constrained_sampler(&emulator, 1, 42);

    let grid = Matrix::from_fn(25, 2, |i, j| {
        if j == 0 {
            (i / 5) as f64 / 4.0
        } else {
            (i % 5) as f64 / 4.0
        }
    });
    let mask = sampler.batch_constrain(&grid).unwrap();
    assert!(mask.iter().any(|&a| a), "no grid point accepted");
    assert!(mask.iter().any(|&a| !a), "no grid point rejected");
}

#[test]
fn seeded_sampling_is_deterministic() {
    let emulator = HarmonicEmulator::new(40.0);
    let first = constrained_sampler(&emulator, 10, 7).sample().unwrap();
    let second = constrained_sampler(&emulator, 10, 7).sample().unwrap();
    assert_eq!(first, second);
}

#[test]
fn sample_through_the_strategy_trait() {
    let emulator = HarmonicEmulator::new(40.0);
    let sampler = constrained_sampler(&emulator, 5, 13);
    let strategy: &dyn Sampler = &sampler;

    let samples = strategy.sample().unwrap();
    assert_eq!(samples.shape(), (5, 2));
    assert!(strategy.evaluate(&samples).unwrap().iter().all(|&a| a));
}

#[test]
fn custom_prior_bounds_are_respected() {
    let emulator = HarmonicEmulator::new(40.0);
    let sampler = constrained_sampler(&emulator, 8, 3);

    let prior = IndependentUniform::new(
        &Vector::from_column_slice(&[0.4, 0.4]),
        &Vector::from_column_slice(&[0.6, 0.6]),
    )
    .unwrap();
    let samples = sampler.sample_with_prior(&prior).unwrap();
    assert!(samples.iter().all(|&x| (0.4..0.6).contains(&x)));
}

#[test]
fn prior_dimension_mismatch_is_rejected() {
    let emulator = HarmonicEmulator::new(40.0);
    let sampler = constrained_sampler(&emulator, 1, 3);

    let err = sampler
        .sample_with_prior(&IndependentUniform::unit(3))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn retry_guard_fires_on_unsatisfiable_constraint() {
    // Observations far outside anything the emulator can produce, with
    // tiny uncertainty: no draw is ever accepted.
    let emulator = HarmonicEmulator::new(2.0);
    let obs_values = emulator.field(0.5, 0.5).map(|v| v + 1_000.0);
    let obs = Observations::new(obs_values);
    let budget = UncertaintyBudget::new().observational(0.001);

    let sampler = AbcSampler::new(&emulator, obs, &budget)
        .unwrap()
        .with_config(Config::new().seed(1).max_attempts(50))
        .unwrap();

    match sampler.sample().unwrap_err() {
        Error::RetryLimit { slot, attempts } => {
            assert_eq!(slot, 0);
            assert_eq!(attempts, 50);
        }
        other => panic!("expected retry limit, got {other:?}"),
    }
}
