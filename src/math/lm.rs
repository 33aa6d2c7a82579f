//! Levenberg-Marquardt nonlinear least squares for two-parameter models.
//!
//! The solver itself is the MINPACK port from the `levenberg-marquardt` crate;
//! this module only validates options and maps its termination reasons onto
//! [`KineticsError`].
//!
//! Termination:
//! - `ftol` / `xtol` criterion met, residuals exactly zero or gradient orthogonal: converged
//! - evaluation budget exhausted or non-finite values: [`KineticsError::NonConvergence`]
//! - malformed problem (no residuals, wrong Jacobian shape): [`KineticsError::InvalidArgument`]

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt, TerminationReason};
use nalgebra::{ArrayStorage, Dyn, U2, Vector2};

use crate::error::KineticsError;

/// Tuning knobs for [`minimize`].
#[derive(Debug, Clone, Copy)]
pub struct LmOptions {
    /// Patience: at most `max_iterations * 3` residual evaluations.
    pub max_iterations: usize,
    pub xtol: f64,
    pub ftol: f64,
}

/// Converged solution.
#[derive(Debug, Clone, Copy)]
pub struct LmSolution {
    pub params: Vector2<f64>,
    pub sse: f64,
    pub evaluations: usize,
}

/// Minimize `Σ r_i(p)²` starting from the parameters currently held by `problem`.
pub fn minimize<P>(problem: P, opts: &LmOptions) -> Result<LmSolution, KineticsError>
where
    P: LeastSquaresProblem<f64, Dyn, U2, ParameterStorage = ArrayStorage<f64, 2, 1>>,
{
    if opts.max_iterations == 0 {
        return Err(KineticsError::InvalidArgument(
            "solver needs at least one iteration".to_string(),
        ));
    }
    if !(opts.xtol.is_finite() && opts.xtol >= 0.0 && opts.ftol.is_finite() && opts.ftol >= 0.0) {
        return Err(KineticsError::InvalidArgument(format!(
            "tolerances must be finite and >= 0: xtol={}, ftol={}",
            opts.xtol, opts.ftol
        )));
    }
    let initial = problem.params();
    if initial.iter().any(|v| !v.is_finite()) {
        return Err(KineticsError::InvalidArgument(
            "initial guess must be finite".to_string(),
        ));
    }

    let (solved, report) = LevenbergMarquardt::new()
        .with_xtol(opts.xtol)
        .with_ftol(opts.ftol)
        .with_patience(opts.max_iterations)
        .minimize(problem);

    log::debug!(
        "lm finished after {} evaluations: {:?} objective={:.6e}",
        report.number_of_evaluations,
        report.termination,
        report.objective_function
    );

    let termination = &report.termination;
    if termination.was_successful() {
        return Ok(LmSolution {
            params: solved.params(),
            // The crate reports `½‖r‖²`.
            sse: 2.0 * report.objective_function,
            evaluations: report.number_of_evaluations,
        });
    }

    Err(match termination {
        TerminationReason::NoParameters
        | TerminationReason::NoResiduals
        | TerminationReason::WrongDimensions(_) => KineticsError::InvalidArgument(format!(
            "malformed least-squares problem: {termination:?}"
        )),
        TerminationReason::LostPatience => KineticsError::NonConvergence {
            evaluations: report.number_of_evaluations,
            reason: "evaluation budget exhausted".to_string(),
        },
        other => KineticsError::NonConvergence {
            evaluations: report.number_of_evaluations,
            reason: format!("{other:?}"),
        },
    })
}
