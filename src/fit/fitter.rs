//! Fitting routines for a single series.
//!
//! Given observed `(S_i, v_i)` we estimate `(Vmax, Km)` three ways:
//!
//! - `Direct`: Levenberg-Marquardt on `v = Vmax·S/(Km+S)`
//! - `LineweaverBurk`: OLS on `1/v = (Km/Vmax)·(1/S) + 1/Vmax`
//! - `EadieHofstee`: OLS on `v = -Km·(v/S) + Vmax`
//!
//! Every call is independent and borrows its input; nothing is cached.

use crate::domain::{FitDetail, FitMethod, FitResult, SampleSeries, SolverConfig};
use crate::error::KineticsError;
use crate::math::{LmOptions, fit_line, median, minimize};
use crate::models::{MichaelisMentenProblem, eadie_hofstee_point, lineweaver_burk_point};

/// Minimum number of samples any fit accepts.
pub const MIN_POINTS: usize = 2;

/// Fit `series` with the given method.
pub fn fit(
    series: &SampleSeries,
    method: FitMethod,
    solver: &SolverConfig,
) -> Result<FitResult, KineticsError> {
    let result = match method {
        FitMethod::Direct => fit_direct(series, solver),
        FitMethod::LineweaverBurk => fit_lineweaver_burk(series),
        FitMethod::EadieHofstee => fit_eadie_hofstee(series),
    }?;

    log::info!(
        "{} fit on {} points: vmax={:.6e} km={:.6e}",
        method.display_name(),
        series.len(),
        result.vmax,
        result.km
    );
    if !result.is_physical() {
        log::warn!(
            "{} fit produced non-physical parameters (vmax={}, km={})",
            method.display_name(),
            result.vmax,
            result.km
        );
    }
    Ok(result)
}

/// Run the same method independently on two series.
///
/// Typical use: with/without inhibitor, or the low/high Km bound of one substrate.
/// The results are returned unmodified; nothing couples the two fits.
pub fn compare_series(
    a: &SampleSeries,
    b: &SampleSeries,
    method: FitMethod,
    solver: &SolverConfig,
) -> Result<(FitResult, FitResult), KineticsError> {
    let first = fit(a, method, solver)?;
    let second = fit(b, method, solver)?;
    Ok((first, second))
}

/// Nonlinear least squares on the raw Michaelis-Menten model.
pub fn fit_direct(series: &SampleSeries, solver: &SolverConfig) -> Result<FitResult, KineticsError> {
    check_len(series)?;
    if series
        .samples()
        .iter()
        .any(|s| !(s.concentration.is_finite() && s.rate.is_finite()))
    {
        return Err(KineticsError::InvalidArgument(
            "samples must be finite".to_string(),
        ));
    }

    let (vmax0, km0) = match solver.initial_guess {
        Some(guess) => guess,
        None => initial_guess(series)?,
    };

    let opts = LmOptions {
        max_iterations: solver.max_iterations,
        xtol: solver.xtol,
        ftol: solver.ftol,
    };
    let solution = minimize(MichaelisMentenProblem::new(series, vmax0, km0), &opts)?;

    log::debug!(
        "direct fit converged after {} evaluations from vmax0={vmax0:.6e} km0={km0:.6e}",
        solution.evaluations
    );

    Ok(FitResult {
        vmax: solution.params[0],
        km: solution.params[1],
        method: FitMethod::Direct,
        detail: FitDetail::Nonlinear {
            evaluations: solution.evaluations,
            sse: solution.sse,
        },
    })
}

/// Regression on the reciprocal transform: `Vmax = 1/intercept`, `Km = slope/intercept`.
pub fn fit_lineweaver_burk(series: &SampleSeries) -> Result<FitResult, KineticsError> {
    let (x, y) = transform(series, lineweaver_burk_point)?;
    check_len(series)?;

    let line = fit_line(&x, &y)?;
    if line.intercept == 0.0 {
        return Err(KineticsError::DivisionByZero(
            "Lineweaver-Burk regression intercept is zero".to_string(),
        ));
    }

    Ok(FitResult {
        vmax: 1.0 / line.intercept,
        km: line.slope / line.intercept,
        method: FitMethod::LineweaverBurk,
        detail: FitDetail::Linear(line),
    })
}

/// Regression on the ratio transform: `Vmax = intercept`, `Km = -slope`.
pub fn fit_eadie_hofstee(series: &SampleSeries) -> Result<FitResult, KineticsError> {
    let (x, y) = transform(series, eadie_hofstee_point)?;
    check_len(series)?;

    let line = fit_line(&x, &y)?;

    Ok(FitResult {
        vmax: line.intercept,
        km: -line.slope,
        method: FitMethod::EadieHofstee,
        detail: FitDetail::Linear(line),
    })
}

/// Default starting point: `Vmax = 1.2·max(v)`, `Km = median(S)`.
///
/// Keeps the solver inside the region where the model is monotone in `S`.
pub fn initial_guess(series: &SampleSeries) -> Result<(f64, f64), KineticsError> {
    let rates = series.rates();
    let vmax = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max) * 1.2;
    let km = median(&series.concentrations()).ok_or(KineticsError::InsufficientData {
        needed: MIN_POINTS,
        got: 0,
    })?;
    Ok((vmax, km))
}

fn check_len(series: &SampleSeries) -> Result<(), KineticsError> {
    if series.len() < MIN_POINTS {
        return Err(KineticsError::InsufficientData {
            needed: MIN_POINTS,
            got: series.len(),
        });
    }
    Ok(())
}

type Transform = fn(&crate::domain::Sample) -> Result<(f64, f64), KineticsError>;

fn transform(series: &SampleSeries, f: Transform) -> Result<(Vec<f64>, Vec<f64>), KineticsError> {
    let mut x = Vec::with_capacity(series.len());
    let mut y = Vec::with_capacity(series.len());
    for sample in series.samples() {
        let (xi, yi) = f(sample)?;
        x.push(xi);
        y.push(yi);
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::michaelis_menten;

    fn exact_series(vmax: f64, km: f64, s: &[f64]) -> SampleSeries {
        let v: Vec<f64> = s.iter().map(|&s| michaelis_menten(s, vmax, km)).collect();
        SampleSeries::from_columns(s, &v).unwrap()
    }

    fn rel_err(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn direct_recovers_noise_free_parameters() {
        let series = exact_series(12.0, 3.5, &[0.5, 1.0, 2.0, 4.0, 8.0, 16.0]);
        let fit = fit_direct(&series, &SolverConfig::default()).unwrap();
        assert!(rel_err(fit.vmax, 12.0) < 1e-6, "vmax={}", fit.vmax);
        assert!(rel_err(fit.km, 3.5) < 1e-6, "km={}", fit.km);
        assert_eq!(fit.method, FitMethod::Direct);
    }

    #[test]
    fn linearised_fits_recover_noise_free_parameters() {
        let series = exact_series(12.0, 3.5, &[0.5, 1.0, 2.0, 4.0, 8.0, 16.0]);
        for fit in [
            fit_lineweaver_burk(&series).unwrap(),
            fit_eadie_hofstee(&series).unwrap(),
        ] {
            assert!(rel_err(fit.vmax, 12.0) < 1e-9, "{:?}", fit);
            assert!(rel_err(fit.km, 3.5) < 1e-9, "{:?}", fit);
        }
    }

    #[test]
    fn eadie_hofstee_km_is_negated_slope() {
        let series = SampleSeries::from_columns(
            &[0.5, 1.0, 1.5, 2.5, 3.5],
            &[23.5, 32.2, 36.9, 41.8, 44.0],
        )
        .unwrap();
        let fit = fit_eadie_hofstee(&series).unwrap();
        let line = fit.line().unwrap();
        assert_eq!(fit.km, -line.slope);
        assert_eq!(fit.vmax, line.intercept);
        assert!(fit.km > 0.0);
    }

    #[test]
    fn lineweaver_burk_rejects_zero_concentration() {
        let series = SampleSeries::from_columns(&[0.0, 1.0, 2.0], &[0.0, 5.0, 6.7]).unwrap();
        assert!(matches!(
            fit_lineweaver_burk(&series),
            Err(KineticsError::DivisionByZero(_))
        ));
    }

    #[test]
    fn too_few_points_is_insufficient_data() {
        let series = SampleSeries::from_columns(&[1.0], &[2.0]).unwrap();
        for method in FitMethod::ALL {
            assert!(matches!(
                fit(&series, method, &SolverConfig::default()),
                Err(KineticsError::InsufficientData { needed: 2, got: 1 })
            ));
        }
    }

    #[test]
    fn initial_guess_uses_max_rate_and_median_concentration() {
        let series = SampleSeries::from_columns(&[1.0, 2.0, 4.0, 8.0], &[1.0, 2.0, 3.0, 5.0]).unwrap();
        let (vmax, km) = initial_guess(&series).unwrap();
        assert!((vmax - 6.0).abs() < 1e-12);
        assert!((km - 3.0).abs() < 1e-12);
    }

    #[test]
    fn starved_solver_reports_non_convergence() {
        let series = SampleSeries::from_columns(
            &[0.5, 1.0, 1.5, 2.5, 3.5],
            &[23.5, 32.2, 36.9, 41.8, 44.0],
        )
        .unwrap();
        let solver = SolverConfig { max_iterations: 1, xtol: 0.0, ftol: 0.0, initial_guess: None };
        assert!(matches!(
            fit_direct(&series, &solver),
            Err(KineticsError::NonConvergence { .. })
        ));
    }
}
