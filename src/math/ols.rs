//! Ordinary least squares for a straight line.
//!
//! The trend model regresses `y` on a single regressor (the row index `x`):
//!
//! ```text
//! minimize Σ (y_i - a - b·x_i)^2
//! ```
//!
//! Implementation choices:
//! - We center `x` and `y` and solve for the slope alone, then recover the
//!   intercept as `ȳ - b·x̄`. This keeps the design matrix well conditioned for
//!   long daily histories (`x` in the thousands).
//! - The solve goes through SVD so a degenerate design (a single point, or all
//!   points on one index) yields the minimum-norm slope `0` instead of failing.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::math::mean;

/// Intercept and slope of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LineFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = intercept + slope·x`.
///
/// Returns `None` for empty or mismatched inputs, or non-finite values.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let x_mean = mean(x)?;
    let y_mean = mean(y)?;

    let xc = DMatrix::from_iterator(x.len(), 1, x.iter().map(|v| v - x_mean));
    let yc = DVector::from_iterator(y.len(), y.iter().map(|v| v - y_mean));

    let beta = solve_least_squares(&xc, &yc)?;
    let slope = beta[0];

    Some(LineFit {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}
