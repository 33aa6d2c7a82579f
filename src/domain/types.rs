//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON
//! - rendered by the report and plot modules

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::KineticsError;

/// One observation: substrate concentration and the measured reaction rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub concentration: f64,
    pub rate: f64,
}

/// An ordered series of observations.
///
/// Concentrations are assumed distinct and positive. Fits only ever borrow a
/// series, so it is effectively immutable once handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build a series from parallel concentration / rate columns.
    pub fn from_columns(concentration: &[f64], rate: &[f64]) -> Result<Self, KineticsError> {
        if concentration.len() != rate.len() {
            return Err(KineticsError::InvalidArgument(format!(
                "column lengths differ: {} concentrations vs {} rates",
                concentration.len(),
                rate.len()
            )));
        }
        let samples = concentration
            .iter()
            .zip(rate)
            .map(|(&concentration, &rate)| Sample { concentration, rate })
            .collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.concentration).collect()
    }

    pub fn rates(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.rate).collect()
    }

    /// `(min, max)` of the concentrations, or `None` for an empty series.
    pub fn concentration_range(&self) -> Option<(f64, f64)> {
        min_max(self.samples.iter().map(|s| s.concentration))
    }
}

pub(crate) fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
}

/// Parameter estimation technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// Nonlinear least squares on `v = Vmax*S/(Km+S)`.
    Direct,
    /// OLS on the reciprocal transform `(1/S, 1/v)`.
    LineweaverBurk,
    /// OLS on the ratio transform `(v/S, v)`.
    EadieHofstee,
}

impl FitMethod {
    pub const ALL: [FitMethod; 3] = [
        FitMethod::Direct,
        FitMethod::LineweaverBurk,
        FitMethod::EadieHofstee,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FitMethod::Direct => "Michaelis-Menten",
            FitMethod::LineweaverBurk => "Lineweaver-Burk",
            FitMethod::EadieHofstee => "Eadie-Hofstee",
        }
    }
}

/// Which method(s) a CLI run should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodSpec {
    All,
    Direct,
    LineweaverBurk,
    EadieHofstee,
}

impl MethodSpec {
    pub fn methods(self) -> Vec<FitMethod> {
        match self {
            MethodSpec::All => FitMethod::ALL.to_vec(),
            MethodSpec::Direct => vec![FitMethod::Direct],
            MethodSpec::LineweaverBurk => vec![FitMethod::LineweaverBurk],
            MethodSpec::EadieHofstee => vec![FitMethod::EadieHofstee],
        }
    }
}

/// Ordinary least-squares line `y = slope*x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// How a [`FitResult`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum FitDetail {
    /// Levenberg-Marquardt on the raw model.
    Nonlinear { evaluations: usize, sse: f64 },
    /// Regression on a linearised transform.
    Linear(LinearFit),
}

/// Estimated Michaelis-Menten parameters for one series and one method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub vmax: f64,
    pub km: f64,
    pub method: FitMethod,
    pub detail: FitDetail,
}

impl FitResult {
    /// `true` when both parameters are finite and strictly positive.
    ///
    /// The model is non-monotonic (or undefined) otherwise, so callers should
    /// treat a `false` here as a suspect fit.
    pub fn is_physical(&self) -> bool {
        self.vmax.is_finite() && self.km.is_finite() && self.vmax > 0.0 && self.km > 0.0
    }

    /// Regression line behind a linearised fit.
    pub fn line(&self) -> Option<&LinearFit> {
        match &self.detail {
            FitDetail::Linear(line) => Some(line),
            FitDetail::Nonlinear { .. } => None,
        }
    }
}

/// Points for rendering (fitted curves, regression lines, profiles).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSamples {
    pub points: Vec<(f64, f64)>,
}

impl CurveSamples {
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.0).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.1).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A named series with the units it was measured in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSeries {
    pub label: String,
    pub series: SampleSeries,
}

/// A dataset: one or more labelled series sharing units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub concentration_unit: String,
    pub rate_unit: String,
    pub series: Vec<LabeledSeries>,
}

impl Dataset {
    pub fn find(&self, label: &str) -> Option<&LabeledSeries> {
        self.series.iter().find(|s| s.label.eq_ignore_ascii_case(label))
    }
}

/// Nonlinear solver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Levenberg-Marquardt patience: at most `3 * max_iterations` residual evaluations.
    pub max_iterations: usize,
    /// Relative parameter-step tolerance.
    pub xtol: f64,
    /// Relative SSE-reduction tolerance.
    pub ftol: f64,
    /// Starting `(Vmax, Km)`; derived from the data when `None`.
    pub initial_guess: Option<(f64, f64)>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            xtol: 1e-10,
            ftol: 1e-12,
            initial_guess: None,
        }
    }
}

/// A full run's configuration as understood by the app layer.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub methods: Vec<FitMethod>,
    pub solver: SolverConfig,
    /// Number of points on generated overlay curves.
    pub curve_points: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Directory for SVG chart exports.
    pub svg_dir: Option<PathBuf>,
    /// JSON results export.
    pub export: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            methods: FitMethod::ALL.to_vec(),
            solver: SolverConfig::default(),
            curve_points: 100,
            plot: true,
            plot_width: 72,
            plot_height: 20,
            svg_dir: None,
            export: None,
        }
    }
}

impl RunConfig {
    /// Whether any chart output (terminal or SVG) was requested.
    pub fn renders_charts(&self) -> bool {
        self.plot || self.svg_dir.is_some()
    }
}
