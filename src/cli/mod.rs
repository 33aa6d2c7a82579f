//! Command-line parsing for the kinetics fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::{DatasetName, Substrate};
use crate::domain::{FitMethod, MethodSpec, SolverConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kin", version, about = "Michaelis-Menten enzyme kinetics fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a dataset (built-in or given inline) and print Vmax / Km per method.
    Fit(FitArgs),
    /// Fit both series of a dataset with the same method and compare them side by side.
    Compare(CompareArgs),
    /// Eadie-Hofstee profiles for substrates whose Km is only known within bounds.
    KmRange(KmRangeArgs),
    /// Generate a synthetic series from known parameters and fit it back.
    Synth(SynthArgs),
    /// Redraw tables and charts from a JSON file written by `--export`.
    Plot(PlotArgs),
}

/// Nonlinear solver options.
#[derive(Debug, Args, Clone)]
pub struct SolverArgs {
    /// Levenberg-Marquardt patience (at most 3x this many model evaluations).
    #[arg(long = "max-iter", default_value_t = 200)]
    pub max_iter: usize,

    /// Relative parameter-step tolerance.
    #[arg(long, default_value_t = 1e-10)]
    pub xtol: f64,

    /// Relative SSE-reduction tolerance.
    #[arg(long, default_value_t = 1e-12)]
    pub ftol: f64,

    /// Initial Vmax (default: 1.2 × max rate). Requires --km0.
    #[arg(long, requires = "km0")]
    pub vmax0: Option<f64>,

    /// Initial Km (default: median concentration). Requires --vmax0.
    #[arg(long, requires = "vmax0")]
    pub km0: Option<f64>,
}

impl SolverArgs {
    pub fn to_config(&self) -> SolverConfig {
        SolverConfig {
            max_iterations: self.max_iter,
            xtol: self.xtol,
            ftol: self.ftol,
            initial_guess: self.vmax0.zip(self.km0),
        }
    }
}

/// Rendering and export options.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Number of points on fitted overlay curves.
    #[arg(long = "curve-points", default_value_t = 100)]
    pub curve_points: usize,

    /// Write one SVG chart per plot into this directory.
    #[arg(long, value_name = "DIR")]
    pub svg: Option<PathBuf>,

    /// Export fit results to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `kin fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Built-in dataset to fit (ignored when --conc/--rate are given).
    #[arg(short = 'd', long, value_enum, default_value_t = DatasetName::Inhibition)]
    pub dataset: DatasetName,

    /// Only fit the series with this label.
    #[arg(long)]
    pub series: Option<String>,

    /// Which method(s) to apply.
    #[arg(short = 'm', long, value_enum, default_value_t = MethodSpec::All)]
    pub method: MethodSpec,

    /// Inline substrate concentrations (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1.., requires = "rate")]
    pub conc: Vec<f64>,

    /// Inline reaction rates (comma separated, same length as --conc).
    #[arg(long, value_delimiter = ',', num_args = 1.., requires = "conc")]
    pub rate: Vec<f64>,

    /// Concentration unit label for inline data.
    #[arg(long, default_value = "mmol")]
    pub conc_unit: String,

    /// Rate unit label for inline data.
    #[arg(long, default_value = "mmol/min")]
    pub rate_unit: String,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `kin compare`.
#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    /// Dataset with (at least) two series.
    #[arg(short = 'd', long, value_enum, default_value_t = DatasetName::Inhibition)]
    pub dataset: DatasetName,

    /// Which method(s) to compare under.
    #[arg(short = 'm', long, value_enum, default_value_t = MethodSpec::All)]
    pub method: MethodSpec,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `kin km-range`.
#[derive(Debug, Args, Clone)]
pub struct KmRangeArgs {
    /// Substrate(s) to profile.
    #[arg(long, value_enum, default_value_t = Substrate::All)]
    pub substrate: Substrate,

    /// Lowest substrate concentration of the profile grid.
    #[arg(long = "s-min", default_value_t = 1.0)]
    pub s_min: f64,

    /// Highest substrate concentration of the profile grid.
    #[arg(long = "s-max", default_value_t = 1000.0)]
    pub s_max: f64,

    /// Number of grid points.
    #[arg(long, default_value_t = 100)]
    pub points: usize,

    /// Linearisation used for the numeric low/high comparison.
    #[arg(short = 'm', long, value_enum, default_value_t = FitMethod::EadieHofstee)]
    pub method: FitMethod,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `kin synth`.
#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// True Vmax.
    #[arg(long)]
    pub vmax: f64,

    /// True Km.
    #[arg(long)]
    pub km: f64,

    /// Substrate concentrations (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1.., default_values_t = [0.5, 1.0, 2.0, 4.0, 8.0, 16.0])]
    pub conc: Vec<f64>,

    /// Log-scale multiplicative noise standard deviation.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Which method(s) to apply.
    #[arg(short = 'm', long, value_enum, default_value_t = MethodSpec::All)]
    pub method: MethodSpec,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `kin plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Results JSON produced by `kin fit --export`.
    #[arg(long, value_name = "JSON")]
    pub results: PathBuf,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Number of points on fitted overlay curves.
    #[arg(long = "curve-points", default_value_t = 100)]
    pub curve_points: usize,

    /// Write one SVG chart per plot into this directory.
    #[arg(long, value_name = "DIR")]
    pub svg: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_with_inline_data() {
        let cli = Cli::try_parse_from([
            "kin", "fit", "--conc", "1,2,4", "--rate", "3,4,5", "-m", "eadie-hofstee", "--no-plot",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.conc, vec![1.0, 2.0, 4.0]);
        assert_eq!(args.rate, vec![3.0, 4.0, 5.0]);
        assert_eq!(args.method, MethodSpec::EadieHofstee);
        assert!(args.output.no_plot);
    }

    #[test]
    fn solver_guess_needs_both_values() {
        assert!(Cli::try_parse_from(["kin", "fit", "--vmax0", "50"]).is_err());
        let cli = Cli::try_parse_from(["kin", "fit", "--vmax0", "50", "--km0", "0.5"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.solver.to_config().initial_guess, Some((50.0, 0.5)));
    }

    #[test]
    fn synth_defaults() {
        let cli = Cli::try_parse_from(["kin", "synth", "--vmax", "10", "--km", "2"]).unwrap();
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!(args.conc, vec![0.5, 1.0, 2.0, 4.0, 8.0, 16.0]);
        assert_eq!(args.seed, 42);
        assert_eq!(args.noise, 0.0);
    }
}
