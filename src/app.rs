//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initialises logging
//! - parses CLI arguments
//! - loads built-in, inline or synthetic data (or a previous JSON export)
//! - runs the fits / comparisons
//! - prints reports/plots
//! - writes optional SVG charts and JSON exports

use std::path::Path;

use clap::Parser;

use crate::cli::{
    Command, CompareArgs, FitArgs, KmRangeArgs, OutputArgs, PlotArgs, SolverArgs, SynthArgs,
};
use crate::data::{SynthSpec, generate_series};
use crate::domain::{Dataset, FitMethod, LabeledSeries, RunConfig, SampleSeries};
use crate::error::AppError;
use crate::io::{FitExport, read_fits_json, write_fits_json};
use crate::plot::{Chart, km_range_chart, svg_path, write_svg_chart};

pub mod pipeline;

/// Entry point for the `kin` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    // We want `kin` and `kin -m direct` to behave like `kin fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Compare(args) => handle_compare(args),
        Command::KmRange(args) => handle_km_range(args),
        Command::Synth(args) => handle_synth(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// `warn` by default; `RUST_LOG` overrides.
fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config(args.method.methods(), &args.solver, &args.output);
    let dataset = fit_dataset(&args)?;

    let run = pipeline::run_fits(dataset, &config)?;
    print_run(&run, &config)?;
    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let config = run_config(args.method.methods(), &args.solver, &args.output);
    let dataset = args.dataset.load()?;

    let pairs = pipeline::run_comparisons(&dataset, &config)?;
    println!("{}", crate::report::format_dataset_header(&dataset));
    let labels = (dataset.series[0].label.as_str(), dataset.series[1].label.as_str());
    for (a, b) in &pairs {
        println!("{}", crate::report::format_comparison(labels, (a, b), &dataset));
    }

    let run = pipeline::RunOutput::from_comparisons(dataset, &pairs);
    emit_charts(&pipeline::method_charts(&run, &config)?, &run.dataset.name, &config)?;
    export(&run, &config)
}

fn handle_km_range(args: KmRangeArgs) -> Result<(), AppError> {
    let config = run_config(vec![args.method], &args.solver, &args.output);

    for range in args.substrate.ranges() {
        print!("{}", crate::report::format_km_range(&range));

        if config.renders_charts() {
            let chart = km_range_chart(&range, args.s_min, args.s_max, args.points)?;
            emit_charts(std::slice::from_ref(&chart), &range.substrate, &config)?;
        }

        // Numeric counterpart: exact series for each bound, fitted back.
        let grid = crate::fit::linspace(args.s_min, args.s_max, args.points)?;
        let bound_series = |km: f64| {
            generate_series(&SynthSpec {
                vmax: range.relative_vmax,
                km,
                concentrations: grid.clone(),
                noise: 0.0,
                seed: 0,
            })
        };
        let dataset = Dataset {
            name: range.substrate.clone(),
            concentration_unit: "uM".to_string(),
            rate_unit: "relative".to_string(),
            series: vec![
                LabeledSeries {
                    label: format!("Km low {}", range.km_low),
                    series: bound_series(range.km_low)?,
                },
                LabeledSeries {
                    label: format!("Km high {}", range.km_high),
                    series: bound_series(range.km_high)?,
                },
            ],
        };
        let pairs = pipeline::run_comparisons(&dataset, &config)?;
        let labels = (dataset.series[0].label.as_str(), dataset.series[1].label.as_str());
        for (low, high) in &pairs {
            println!("{}", crate::report::format_comparison(labels, (low, high), &dataset));
        }
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = run_config(args.method.methods(), &args.solver, &args.output);
    let spec = SynthSpec {
        vmax: args.vmax,
        km: args.km,
        concentrations: args.conc.clone(),
        noise: args.noise,
        seed: args.seed,
    };
    let series = generate_series(&spec)?;
    let dataset = Dataset {
        name: "synthetic".to_string(),
        concentration_unit: "mmol".to_string(),
        rate_unit: "mmol/min".to_string(),
        series: vec![LabeledSeries {
            label: format!("seed {}", args.seed),
            series,
        }],
    };

    println!(
        "True parameters: Vmax={} Km={} (noise sd={}, seed={})",
        crate::report::fmt_value(args.vmax),
        crate::report::fmt_value(args.km),
        args.noise,
        args.seed
    );
    let run = pipeline::run_fits(dataset, &config)?;
    print_run(&run, &config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let run = pipeline::RunOutput::from_export(read_fits_json(&args.results)?);
    let config = RunConfig {
        methods: run.methods(),
        curve_points: args.curve_points,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        svg_dir: args.svg.clone(),
        ..RunConfig::default()
    };
    print_run(&run, &config)
}

fn print_run(run: &pipeline::RunOutput, config: &RunConfig) -> Result<(), AppError> {
    println!("{}", crate::report::format_dataset_header(&run.dataset));
    for series_run in &run.runs {
        println!(
            "{}",
            crate::report::format_fit_table(&series_run.label, &series_run.fits, &run.dataset)
        );
    }

    emit_charts(&pipeline::method_charts(run, config)?, &run.dataset.name, config)?;
    export(run, config)
}

/// Print ASCII plots and/or write SVG files for `charts`.
fn emit_charts(charts: &[Chart], stem: &str, config: &RunConfig) -> Result<(), AppError> {
    for chart in charts {
        if config.plot {
            println!("{}", chart.to_ascii(config.plot_width, config.plot_height));
        }
        if let Some(dir) = &config.svg_dir {
            ensure_dir(dir)?;
            let path = svg_path(dir, &format!("{stem} {}", chart.title));
            write_svg_chart(&path, chart)?;
        }
    }
    Ok(())
}

fn export(run: &pipeline::RunOutput, config: &RunConfig) -> Result<(), AppError> {
    if let Some(path) = &config.export {
        write_fits_json(path, &FitExport::new(&run.dataset, run.to_series_fits()))?;
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create directory '{}': {e}", dir.display())))
}

/// Built-in dataset, or the inline `--conc/--rate` columns when given.
fn fit_dataset(args: &FitArgs) -> Result<Dataset, AppError> {
    let mut dataset = if args.conc.is_empty() {
        args.dataset.load()?
    } else {
        Dataset {
            name: "inline".to_string(),
            concentration_unit: args.conc_unit.clone(),
            rate_unit: args.rate_unit.clone(),
            series: vec![LabeledSeries {
                label: "inline".to_string(),
                series: SampleSeries::from_columns(&args.conc, &args.rate)?,
            }],
        }
    };

    if let Some(label) = &args.series {
        let Some(selected) = dataset.find(label).cloned() else {
            let known: Vec<&str> = dataset.series.iter().map(|s| s.label.as_str()).collect();
            return Err(AppError::new(
                2,
                format!("Unknown series '{label}' (available: {}).", known.join(", ")),
            ));
        };
        dataset.series = vec![selected];
    }
    Ok(dataset)
}

pub fn run_config(methods: Vec<FitMethod>, solver: &SolverArgs, output: &OutputArgs) -> RunConfig {
    RunConfig {
        methods,
        solver: solver.to_config(),
        curve_points: output.curve_points,
        plot: output.plot && !output.no_plot,
        plot_width: output.width,
        plot_height: output.height,
        svg_dir: output.svg.clone(),
        export: output.export.clone(),
    }
}

/// Rewrite argv so `kin` defaults to `kin fit`.
///
/// Rules:
/// - `kin`                      -> `kin fit`
/// - `kin -m direct ...`        -> `kin fit -m direct ...`
/// - `kin --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "fit" | "compare" | "km-range" | "synth" | "plot"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_fit() {
        assert_eq!(rewrite_args(argv(&["kin"])), argv(&["kin", "fit"]));
        assert_eq!(
            rewrite_args(argv(&["kin", "-m", "direct"])),
            argv(&["kin", "fit", "-m", "direct"])
        );
        assert_eq!(rewrite_args(argv(&["kin", "--help"])), argv(&["kin", "--help"]));
        assert_eq!(rewrite_args(argv(&["kin", "synth"])), argv(&["kin", "synth"]));
    }

    #[test]
    fn series_filter_selects_one_series() {
        let cli = Cli::parse_from(["kin", "fit", "--series", "inhibited"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let dataset = fit_dataset(&args).unwrap();
        assert_eq!(dataset.series.len(), 1);
        assert_eq!(dataset.series[0].label, "inhibited");
    }

    #[test]
    fn unknown_series_is_input_error() {
        let cli = Cli::parse_from(["kin", "fit", "--series", "nope"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(fit_dataset(&args).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn no_plot_wins_over_plot() {
        let cli = Cli::parse_from(["kin", "fit", "--no-plot"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = run_config(args.method.methods(), &args.solver, &args.output);
        assert!(!config.plot);
        assert_eq!(config.methods.len(), 3);
    }

    #[test]
    fn tables_print_without_charts_for_degenerate_curve_size() {
        let cli = Cli::parse_from(["kin", "fit", "--no-plot", "--curve-points", "1"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = run_config(args.method.methods(), &args.solver, &args.output);
        let run = pipeline::run_fits(fit_dataset(&args).unwrap(), &config).unwrap();
        assert!(print_run(&run, &config).is_ok());
    }

    #[test]
    fn plot_redraws_an_export() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("fits.json");
        let svg = dir.path().join("svg");

        let config = crate::domain::RunConfig {
            plot: false,
            ..crate::domain::RunConfig::default()
        };
        let run = pipeline::run_fits(crate::data::inhibition().unwrap(), &config).unwrap();
        write_fits_json(&json, &FitExport::new(&run.dataset, run.to_series_fits())).unwrap();

        let cli = Cli::parse_from([
            "kin",
            "plot",
            "--results",
            json.to_str().unwrap(),
            "--no-plot",
            "--svg",
            svg.to_str().unwrap(),
        ]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        handle_plot(args).unwrap();
        assert!(svg.join("inhibition-lineweaver-burk-plot.svg").exists());
    }

    #[test]
    fn plot_of_missing_export_is_input_error() {
        let cli = Cli::parse_from(["kin", "plot", "--results", "/definitely/not/here.json"]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(handle_plot(args).unwrap_err().exit_code(), 2);
    }
}
