//! Type aliases and common types.

use nalgebra::{DMatrix, DVector};

/// Dynamically-sized column vector (observation points or parameters).
pub type Vector = DVector<f64>;

/// Dynamically-sized matrix; rows are parameter samples, columns are
/// observation points.
pub type Matrix = DMatrix<f64>;
