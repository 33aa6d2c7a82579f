//! Michaelis-Menten model evaluation and its linearising transforms.
//!
//! The fitter relies on three primitive operations:
//! - predict `v(S)` given `(Vmax, Km)` (for residuals/plots)
//! - the sensitivities `∂v/∂Vmax`, `∂v/∂Km` (for the Levenberg-Marquardt Jacobian)
//! - map a sample into Lineweaver-Burk or Eadie-Hofstee coordinates
//!
//! ```text
//! v        = Vmax·S / (Km + S)
//! ∂v/∂Vmax = S / (Km + S)
//! ∂v/∂Km   = -Vmax·S / (Km + S)²
//! ```

use levenberg_marquardt::LeastSquaresProblem;
use nalgebra::storage::Owned;
use nalgebra::{Const, DVector, Dyn, OMatrix, U2, Vector2};

use crate::domain::{Sample, SampleSeries};
use crate::error::KineticsError;

/// Reaction rate predicted by the Michaelis-Menten model.
pub fn michaelis_menten(s: f64, vmax: f64, km: f64) -> f64 {
    vmax * s / (km + s)
}

/// `[∂v/∂Vmax, ∂v/∂Km]` at substrate concentration `s`.
pub fn sensitivities(s: f64, vmax: f64, km: f64) -> [f64; 2] {
    let denom = km + s;
    [s / denom, -vmax * s / (denom * denom)]
}

/// Lineweaver-Burk coordinates `(1/S, 1/v)`.
pub fn lineweaver_burk_point(sample: &Sample) -> Result<(f64, f64), KineticsError> {
    if sample.concentration == 0.0 {
        return Err(KineticsError::DivisionByZero(
            "Lineweaver-Burk transform needs non-zero concentrations".to_string(),
        ));
    }
    if sample.rate == 0.0 {
        return Err(KineticsError::DivisionByZero(
            "Lineweaver-Burk transform needs non-zero rates".to_string(),
        ));
    }
    Ok((1.0 / sample.concentration, 1.0 / sample.rate))
}

/// Eadie-Hofstee coordinates `(v/S, v)`.
pub fn eadie_hofstee_point(sample: &Sample) -> Result<(f64, f64), KineticsError> {
    if sample.concentration == 0.0 {
        return Err(KineticsError::DivisionByZero(
            "Eadie-Hofstee transform needs non-zero concentrations".to_string(),
        ));
    }
    Ok((sample.rate / sample.concentration, sample.rate))
}

/// Residual problem `model(S_i; Vmax, Km) - v_i` over a borrowed series.
///
/// Parameter order is `[Vmax, Km]`; the solver moves the held parameters.
pub struct MichaelisMentenProblem<'a> {
    series: &'a SampleSeries,
    params: Vector2<f64>,
}

impl<'a> MichaelisMentenProblem<'a> {
    pub fn new(series: &'a SampleSeries, vmax: f64, km: f64) -> Self {
        Self {
            series,
            params: Vector2::new(vmax, km),
        }
    }
}

impl LeastSquaresProblem<f64, Dyn, U2> for MichaelisMentenProblem<'_> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, U2>;
    type ParameterStorage = Owned<f64, U2>;

    fn set_params(&mut self, params: &Vector2<f64>) {
        self.params = *params;
    }

    fn params(&self) -> Vector2<f64> {
        self.params
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        let samples = self.series.samples();
        let (vmax, km) = (self.params[0], self.params[1]);
        Some(DVector::from_iterator(
            samples.len(),
            samples
                .iter()
                .map(|s| michaelis_menten(s.concentration, vmax, km) - s.rate),
        ))
    }

    fn jacobian(&self) -> Option<OMatrix<f64, Dyn, U2>> {
        let samples = self.series.samples();
        let (vmax, km) = (self.params[0], self.params[1]);
        Some(OMatrix::<f64, Dyn, U2>::from_fn_generic(
            Dyn(samples.len()),
            Const::<2>,
            |i, j| sensitivities(samples[i].concentration, vmax, km)[j],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_saturation_at_km() {
        assert!((michaelis_menten(5.0, 10.0, 5.0) - 5.0).abs() < 1e-12);
        assert_eq!(michaelis_menten(0.0, 10.0, 5.0), 0.0);
    }

    #[test]
    fn sensitivities_match_finite_differences() {
        let (s, vmax, km) = (2.5, 40.0, 1.2);
        let h = 1e-6;
        let [d_vmax, d_km] = sensitivities(s, vmax, km);
        let fd_vmax = (michaelis_menten(s, vmax + h, km) - michaelis_menten(s, vmax - h, km)) / (2.0 * h);
        let fd_km = (michaelis_menten(s, vmax, km + h) - michaelis_menten(s, vmax, km - h)) / (2.0 * h);
        assert!((d_vmax - fd_vmax).abs() < 1e-6);
        assert!((d_km - fd_km).abs() < 1e-6);
    }

    #[test]
    fn transforms_reject_zeros() {
        let zero_s = Sample { concentration: 0.0, rate: 1.0 };
        let zero_v = Sample { concentration: 1.0, rate: 0.0 };
        assert!(matches!(lineweaver_burk_point(&zero_s), Err(KineticsError::DivisionByZero(_))));
        assert!(matches!(lineweaver_burk_point(&zero_v), Err(KineticsError::DivisionByZero(_))));
        assert!(matches!(eadie_hofstee_point(&zero_s), Err(KineticsError::DivisionByZero(_))));
        assert_eq!(eadie_hofstee_point(&zero_v).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn problem_residuals_and_jacobian_follow_held_params() {
        let series = SampleSeries::from_columns(&[1.0, 4.0], &[2.0, 3.0]).unwrap();
        let mut problem = MichaelisMentenProblem::new(&series, 5.0, 1.0);
        let r = problem.residuals().unwrap();
        assert!((r[0] - 0.5).abs() < 1e-12);
        assert!((r[1] - 1.0).abs() < 1e-12);

        problem.set_params(&Vector2::new(10.0, 4.0));
        assert_eq!(problem.params(), Vector2::new(10.0, 4.0));
        let jac = problem.jacobian().unwrap();
        assert_eq!(jac.shape(), (2, 2));
        assert!((jac[(1, 0)] - 0.5).abs() < 1e-12);
        assert!((jac[(1, 1)] + 10.0 * 4.0 / 64.0).abs() < 1e-12);
    }
}
