//! Shared "fit pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset -> fit each series with each method -> charts
//!
//! The subcommand handlers can then focus on presentation (printing / exporting).

use crate::domain::{Dataset, FitMethod, FitResult, LabeledSeries, RunConfig, SampleSeries};
use crate::error::KineticsError;
use crate::fit::{compare_series, fit};
use crate::io::{FitExport, SeriesFits};
use crate::plot::{Chart, method_chart};

/// Fits for one labelled series, in `RunConfig::methods` order.
#[derive(Debug, Clone)]
pub struct SeriesRun {
    pub label: String,
    pub series: SampleSeries,
    pub fits: Vec<FitResult>,
}

impl SeriesRun {
    pub fn fit_for(&self, method: FitMethod) -> Option<&FitResult> {
        self.fits.iter().find(|f| f.method == method)
    }
}

/// All computed outputs of a single `kin fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub runs: Vec<SeriesRun>,
}

impl RunOutput {
    /// Regroup per-method comparison pairs into per-series fits.
    ///
    /// Only the two compared series are kept, so charts and exports show exactly
    /// what the comparison table shows.
    pub fn from_comparisons(mut dataset: Dataset, pairs: &[(FitResult, FitResult)]) -> Self {
        dataset.series.truncate(2);
        let runs = dataset
            .series
            .iter()
            .enumerate()
            .map(|(i, ls)| SeriesRun {
                label: ls.label.clone(),
                series: ls.series.clone(),
                fits: pairs.iter().map(|(a, b)| if i == 0 { *a } else { *b }).collect(),
            })
            .collect();
        Self { dataset, runs }
    }

    /// Rebuild a run from a JSON export, without refitting.
    pub fn from_export(export: FitExport) -> Self {
        let mut series = Vec::with_capacity(export.series.len());
        let mut runs = Vec::with_capacity(export.series.len());
        for record in export.series {
            series.push(LabeledSeries {
                label: record.label.clone(),
                series: record.samples.clone(),
            });
            runs.push(SeriesRun {
                label: record.label,
                series: record.samples,
                fits: record.fits,
            });
        }
        Self {
            dataset: Dataset {
                name: export.dataset,
                concentration_unit: export.concentration_unit,
                rate_unit: export.rate_unit,
                series,
            },
            runs,
        }
    }

    /// Methods that at least one series has a fit for, in canonical order.
    pub fn methods(&self) -> Vec<FitMethod> {
        FitMethod::ALL
            .into_iter()
            .filter(|&m| self.runs.iter().any(|r| r.fit_for(m).is_some()))
            .collect()
    }

    /// Records for the JSON export.
    pub fn to_series_fits(&self) -> Vec<SeriesFits> {
        self.runs
            .iter()
            .map(|r| SeriesFits {
                label: r.label.clone(),
                samples: r.series.clone(),
                fits: r.fits.clone(),
            })
            .collect()
    }
}

/// Fit every series of `dataset` with every configured method.
pub fn run_fits(dataset: Dataset, config: &RunConfig) -> Result<RunOutput, KineticsError> {
    let mut runs = Vec::with_capacity(dataset.series.len());
    for ls in &dataset.series {
        let fits = config
            .methods
            .iter()
            .map(|&method| fit(&ls.series, method, &config.solver))
            .collect::<Result<Vec<_>, _>>()?;
        runs.push(SeriesRun {
            label: ls.label.clone(),
            series: ls.series.clone(),
            fits,
        });
    }
    Ok(RunOutput { dataset, runs })
}

/// Pairwise comparison of the first two series, one entry per configured method.
pub fn run_comparisons(
    dataset: &Dataset,
    config: &RunConfig,
) -> Result<Vec<(FitResult, FitResult)>, KineticsError> {
    let [a, b, ..] = dataset.series.as_slice() else {
        return Err(KineticsError::InvalidArgument(format!(
            "dataset '{}' needs two series to compare, has {}",
            dataset.name,
            dataset.series.len()
        )));
    };
    config
        .methods
        .iter()
        .map(|&method| compare_series(&a.series, &b.series, method, &config.solver))
        .collect()
}

/// One chart per configured method, overlaying every series of the run.
///
/// Empty when the configuration neither plots nor writes SVG files.
pub fn method_charts(output: &RunOutput, config: &RunConfig) -> Result<Vec<Chart>, KineticsError> {
    if !config.renders_charts() {
        return Ok(Vec::new());
    }
    config
        .methods
        .iter()
        .map(|&method| {
            let fits: Vec<(&str, &SampleSeries, FitResult)> = output
                .runs
                .iter()
                .filter_map(|r| r.fit_for(method).map(|f| (r.label.as_str(), &r.series, *f)))
                .collect();
            method_chart(&output.dataset, &fits, method, config.curve_points)
        })
        .collect()
}
