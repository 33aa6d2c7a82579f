use approx::assert_relative_eq;

use mm_kinetics::data::{SynthSpec, generate_series, inhibition, trace};
use mm_kinetics::domain::{FitMethod, SampleSeries, SolverConfig};
use mm_kinetics::error::KineticsError;
use mm_kinetics::fit::{compare_series, fit, generate_curve};
use mm_kinetics::math::fit_line;

fn exact_series(vmax: f64, km: f64) -> SampleSeries {
    generate_series(&SynthSpec {
        vmax,
        km,
        concentrations: vec![0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
        noise: 0.0,
        seed: 7,
    })
    .unwrap()
}

#[test]
fn every_method_recovers_exact_parameters() {
    let series = exact_series(10.0, 5.0);
    for method in FitMethod::ALL {
        let result = fit(&series, method, &SolverConfig::default()).unwrap();
        assert_eq!(result.method, method);
        assert_relative_eq!(result.vmax, 10.0, max_relative = 1e-6);
        assert_relative_eq!(result.km, 5.0, max_relative = 1e-6);
    }
}

#[test]
fn curve_samples_the_model() {
    let curve = generate_curve(10.0, 5.0, 0.0, 20.0, 3).unwrap();
    assert_eq!(curve.xs(), vec![0.0, 10.0, 20.0]);
    let ys = curve.ys();
    assert_eq!(ys[0], 0.0);
    assert_relative_eq!(ys[1], 10.0 * 10.0 / 15.0, max_relative = 1e-12);
    assert_relative_eq!(ys[2], 8.0, max_relative = 1e-12);
}

#[test]
fn lineweaver_burk_rejects_zero_concentration() {
    let series = SampleSeries::from_columns(&[0.0, 1.0, 2.0], &[0.0, 3.0, 4.0]).unwrap();
    let err = fit(&series, FitMethod::LineweaverBurk, &SolverConfig::default()).unwrap_err();
    assert!(matches!(err, KineticsError::DivisionByZero(_)));
}

#[test]
fn eadie_hofstee_rejects_zero_concentration() {
    let series = SampleSeries::from_columns(&[0.0, 1.0, 2.0], &[0.0, 3.0, 4.0]).unwrap();
    let err = fit(&series, FitMethod::EadieHofstee, &SolverConfig::default()).unwrap_err();
    assert!(matches!(err, KineticsError::DivisionByZero(_)), "{err}");
}

#[test]
fn single_point_is_insufficient() {
    let series = SampleSeries::from_columns(&[1.0], &[3.0]).unwrap();
    for method in FitMethod::ALL {
        let err = fit(&series, method, &SolverConfig::default()).unwrap_err();
        assert!(
            matches!(err, KineticsError::InsufficientData { .. }),
            "{method:?}: {err}"
        );
    }
}

#[test]
fn eadie_hofstee_km_is_negated_slope() {
    let ds = inhibition().unwrap();
    let (control, inhibited) = (&ds.series[0].series, &ds.series[1].series);
    let (a, b) = compare_series(control, inhibited, FitMethod::EadieHofstee, &SolverConfig::default()).unwrap();

    for (series, result) in [(control, a), (inhibited, b)] {
        let x: Vec<f64> = series.samples().iter().map(|s| s.rate / s.concentration).collect();
        let line = fit_line(&x, &series.rates()).unwrap();
        assert_relative_eq!(result.km, -line.slope, max_relative = 1e-12);
        assert_relative_eq!(result.vmax, line.intercept, max_relative = 1e-12);
    }
    assert!(b.km > a.km);
}

#[test]
fn micro_scale_rates_fit_deterministically() {
    let ds = trace().unwrap();
    let series = &ds.series[0].series;
    let solver = SolverConfig::default();

    let first = fit(series, FitMethod::Direct, &solver).unwrap();
    let second = fit(series, FitMethod::Direct, &solver).unwrap();
    assert_eq!(first, second);

    assert_relative_eq!(first.vmax, 5.1349e-7, max_relative = 1e-2);
    assert_relative_eq!(first.km, 2.2893, max_relative = 1e-2);

    let lb = fit(series, FitMethod::LineweaverBurk, &solver).unwrap();
    assert_relative_eq!(lb.vmax, 5.0056e-7, max_relative = 1e-2);
    assert_relative_eq!(lb.km, 2.1355, max_relative = 1e-2);
}

#[test]
fn noisy_series_is_reproducible_per_seed() {
    let spec = SynthSpec {
        vmax: 50.0,
        km: 0.6,
        concentrations: vec![0.25, 0.5, 1.0, 2.0, 4.0],
        noise: 0.05,
        seed: 11,
    };
    let a = generate_series(&spec).unwrap();
    let b = generate_series(&spec).unwrap();
    assert_eq!(a, b);

    let result = fit(&a, FitMethod::Direct, &SolverConfig::default()).unwrap();
    assert!(result.is_physical());
}
