//! Read/write fit results as JSON.
//!
//! The export is the "portable" record of a run:
//! - dataset name and units
//! - the observations of each series
//! - every fit produced for each series
//!
//! It is meant to be easy to consume from notebooks or downstream scripts.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, FitResult, SampleSeries};
use crate::error::AppError;

/// Top-level JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitExport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub concentration_unit: String,
    pub rate_unit: String,
    pub series: Vec<SeriesFits>,
}

/// All fits for one labelled series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFits {
    pub label: String,
    pub samples: SampleSeries,
    pub fits: Vec<FitResult>,
}

impl FitExport {
    pub fn new(dataset: &Dataset, series: Vec<SeriesFits>) -> Self {
        Self {
            tool: "kin".to_string(),
            generated_at: Utc::now(),
            dataset: dataset.name.clone(),
            concentration_unit: dataset.concentration_unit.clone(),
            rate_unit: dataset.rate_unit.clone(),
            series,
        }
    }
}

/// Write a fit results JSON file.
pub fn write_fits_json(path: &Path, export: &FitExport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create results JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), export)
        .map_err(|e| AppError::new(2, format!("Failed to write results JSON: {e}")))?;

    log::info!("wrote {} series to {}", export.series.len(), path.display());
    Ok(())
}

/// Read a fit results JSON file.
pub fn read_fits_json(path: &Path) -> Result<FitExport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open results JSON '{}': {e}", path.display())))?;
    let export: FitExport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid results JSON: {e}")))?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::inhibition;
    use crate::domain::{FitMethod, SolverConfig};
    use crate::fit::fit;

    #[test]
    fn export_reads_back() {
        let ds = inhibition().unwrap();
        let control = &ds.series[0];
        let fits = FitMethod::ALL
            .iter()
            .map(|&m| fit(&control.series, m, &SolverConfig::default()).unwrap())
            .collect();
        let export = FitExport::new(
            &ds,
            vec![SeriesFits {
                label: control.label.clone(),
                samples: control.series.clone(),
                fits,
            }],
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fits.json");
        write_fits_json(&path, &export).unwrap();

        let back = read_fits_json(&path).unwrap();
        assert_eq!(back.dataset, "inhibition");
        assert_eq!(back.series[0].samples, control.series);
        assert_eq!(back.series[0].fits.len(), 3);
        assert_eq!(back.series[0].fits[2].method, FitMethod::EadieHofstee);
        assert!(back.series[0].fits[2].line().is_some());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"method\": \"lineweaver-burk\""));
    }

    #[test]
    fn missing_file_is_exit_code_2() {
        let err = read_fits_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
