//! Overlay curves: fitted model curves, regression lines and Eadie-Hofstee
//! Km-range profiles.
//!
//! These are pure functions producing [`CurveSamples`]; rendering lives in `plot`.

use serde::{Deserialize, Serialize};

use crate::domain::{CurveSamples, LinearFit};
use crate::error::KineticsError;
use crate::models::michaelis_menten;

/// `n` evenly spaced values in `[min, max]`, both ends included.
pub fn linspace(min: f64, max: f64, n: usize) -> Result<Vec<f64>, KineticsError> {
    if n < 2 {
        return Err(KineticsError::InvalidArgument(format!(
            "need at least 2 curve points, got {n}"
        )));
    }
    if !(min.is_finite() && max.is_finite()) {
        return Err(KineticsError::InvalidArgument(format!(
            "curve bounds must be finite: min={min}, max={max}"
        )));
    }
    let step = (max - min) / (n as f64 - 1.0);
    Ok((0..n)
        .map(|i| if i + 1 == n { max } else { min + step * i as f64 })
        .collect())
}

/// Sample the Michaelis-Menten curve on `n_points` evenly spaced concentrations.
pub fn generate_curve(
    vmax: f64,
    km: f64,
    x_min: f64,
    x_max: f64,
    n_points: usize,
) -> Result<CurveSamples, KineticsError> {
    let xs = linspace(x_min, x_max, n_points)?;
    Ok(CurveSamples {
        points: xs.into_iter().map(|s| (s, michaelis_menten(s, vmax, km))).collect(),
    })
}

/// Sample a regression line for overlay on a linearised plot.
pub fn regression_line(
    line: &LinearFit,
    x_min: f64,
    x_max: f64,
    n_points: usize,
) -> Result<CurveSamples, KineticsError> {
    let xs = linspace(x_min, x_max, n_points)?;
    Ok(CurveSamples {
        points: xs.into_iter().map(|x| (x, line.eval(x))).collect(),
    })
}

/// A substrate whose Km is only known within bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmRange {
    pub substrate: String,
    /// Vmax relative to a reference substrate.
    pub relative_vmax: f64,
    pub km_low: f64,
    pub km_high: f64,
}

impl KmRange {
    /// Bounds `center ± spread`.
    pub fn from_center(substrate: impl Into<String>, relative_vmax: f64, center: f64, spread: f64) -> Self {
        Self {
            substrate: substrate.into(),
            relative_vmax,
            km_low: center - spread,
            km_high: center + spread,
        }
    }
}

/// Eadie-Hofstee profile: `(v, v/S)` along the model curve for each S in the grid.
pub fn eadie_hofstee_profile(
    vmax: f64,
    km: f64,
    s_min: f64,
    s_max: f64,
    n_points: usize,
) -> Result<CurveSamples, KineticsError> {
    if s_min <= 0.0 {
        return Err(KineticsError::DivisionByZero(format!(
            "profile substrate grid must start above zero, got {s_min}"
        )));
    }
    let curve = generate_curve(vmax, km, s_min, s_max, n_points)?;
    Ok(CurveSamples {
        points: curve.points.into_iter().map(|(s, v)| (v, v / s)).collect(),
    })
}

/// Profiles for the low and high Km bound of a substrate, in that order.
pub fn km_range_profiles(
    range: &KmRange,
    s_min: f64,
    s_max: f64,
    n_points: usize,
) -> Result<(CurveSamples, CurveSamples), KineticsError> {
    let low = eadie_hofstee_profile(range.relative_vmax, range.km_low, s_min, s_max, n_points)?;
    let high = eadie_hofstee_profile(range.relative_vmax, range.km_high, s_min, s_max, n_points)?;
    Ok((low, high))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_curve_three_points() {
        let curve = generate_curve(10.0, 5.0, 0.0, 20.0, 3).unwrap();
        assert_eq!(curve.xs(), vec![0.0, 10.0, 20.0]);
        let ys = curve.ys();
        assert!(ys[0].abs() < 1e-12);
        assert!((ys[1] - 100.0 / 15.0).abs() < 1e-12);
        assert!((ys[2] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn generate_curve_rejects_single_point() {
        assert!(matches!(
            generate_curve(10.0, 5.0, 0.0, 20.0, 1),
            Err(KineticsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = linspace(1.0, 1000.0, 100).unwrap();
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], 1.0);
        assert_eq!(xs[99], 1000.0);
        assert!((xs[1] - 11.090909090909092).abs() < 1e-9);
    }

    #[test]
    fn profile_lies_on_eadie_hofstee_line() {
        // v = Vmax - Km·(v/S) for every point on the model curve.
        let profile = eadie_hofstee_profile(1.0, 48.0, 1.0, 1000.0, 50).unwrap();
        for &(v, ratio) in &profile.points {
            assert!((v - (1.0 - 48.0 * ratio)).abs() < 1e-12);
        }
    }

    #[test]
    fn km_range_bounds_from_center() {
        let range = KmRange::from_center("CMP", 0.1, 940.0, 220.0);
        assert_eq!(range.km_low, 720.0);
        assert_eq!(range.km_high, 1160.0);
        let (low, high) = km_range_profiles(&range, 1.0, 1000.0, 10).unwrap();
        assert_eq!(low.len(), 10);
        // Larger Km means a lower rate at the same S.
        assert!(high.points[5].0 < low.points[5].0);
    }
}
