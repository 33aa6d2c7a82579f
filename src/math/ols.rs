//! Least squares solvers.
//!
//! Two small problems are solved here over and over:
//!
//! ```text
//! minimize ||X β - y||^2
//! ```
//!
//! - for straight-line regressions (`X = [1, x]`), used by the linearised fits
//! - for each damped Levenberg-Marquardt step (`X = [J; sqrt(λ)·D]`)
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when
//!   the design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Parameter dimension is 2, so SVD cost is irrelevant.

use nalgebra::{DMatrix, DVector};

use crate::domain::LinearFit;
use crate::error::KineticsError;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-14, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = slope*x + intercept` by ordinary least squares.
///
/// Errors:
/// - fewer than two points: `InsufficientData`
/// - all `x` equal (slope undefined): `DivisionByZero`
/// - non-finite inputs: `InvalidArgument`
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LinearFit, KineticsError> {
    if x.len() != y.len() {
        return Err(KineticsError::InvalidArgument(format!(
            "regression inputs differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(KineticsError::InsufficientData { needed: 2, got: n });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(KineticsError::InvalidArgument(
            "regression inputs must be finite".to_string(),
        ));
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let x_spread = x.iter().map(|v| (v - x_mean).abs()).fold(0.0, f64::max);
    if x_spread <= f64::EPSILON * x_mean.abs().max(1.0) {
        return Err(KineticsError::DivisionByZero(
            "all regression x values are equal; slope is undefined".to_string(),
        ));
    }

    // Center and scale x so both columns stay well conditioned even when x spans
    // tiny or huge magnitudes (e.g. v/S for rates around 1e-7).
    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = (xi - x_mean) / x_spread;
    }
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs).ok_or_else(|| {
        KineticsError::DivisionByZero("regression design matrix is singular".to_string())
    })?;
    let slope = beta[1] / x_spread;
    let intercept = beta[0] - slope * x_mean;

    Ok(LinearFit {
        slope,
        intercept,
        r_squared: r_squared(x, y, slope, intercept),
    })
}

fn r_squared(x: &[f64], y: &[f64], slope: f64, intercept: f64) -> f64 {
    let y_mean = y.iter().sum::<f64>() / y.len() as f64;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let r = yi - (slope * xi + intercept);
        ss_res += r * r;
        ss_tot += (yi - y_mean) * (yi - y_mean);
    }
    if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 }
}

/// Median of a slice (average of the two middle values for even lengths).
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_exact_line() {
        let x = [1.0, 2.0, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| -0.5 * v + 4.0).collect();
        let line = fit_line(&x, &y).unwrap();
        assert!((line.slope + 0.5).abs() < 1e-12);
        assert!((line.intercept - 4.0).abs() < 1e-12);
        assert!((line.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fit_line_matches_closed_form_on_noisy_points() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 2.9, 5.2, 6.8];
        let line = fit_line(&x, &y).unwrap();
        // Closed form: slope = Sxy/Sxx with x̄=1.5, ȳ=3.975.
        let sxy = (-1.5 * -2.975) + (-0.5 * -1.075) + (0.5 * 1.225) + (1.5 * 2.825);
        let sxx = 2.25 + 0.25 + 0.25 + 2.25;
        let slope = sxy / sxx;
        assert!((line.slope - slope).abs() < 1e-12);
        assert!((line.intercept - (3.975 - slope * 1.5)).abs() < 1e-12);
    }

    #[test]
    fn fit_line_rejects_degenerate_inputs() {
        assert!(matches!(
            fit_line(&[1.0], &[2.0]),
            Err(KineticsError::InsufficientData { needed: 2, got: 1 })
        ));
        assert!(matches!(
            fit_line(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(KineticsError::DivisionByZero(_))
        ));
    }

    #[test]
    fn median_handles_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
