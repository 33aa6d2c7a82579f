//! Built-in measurement sets.
//!
//! - `inhibition`: product formation with and without an inhibitor (mmol, mmol/min)
//! - `trace`: a micro-scale rate series (moles, moles/min)
//! - Km ranges for AMP and CMP, used by the Eadie-Hofstee profile plots

use clap::ValueEnum;

use crate::domain::{Dataset, LabeledSeries, SampleSeries};
use crate::error::KineticsError;
use crate::fit::KmRange;

/// Label of the uninhibited series in the `inhibition` dataset.
pub const CONTROL: &str = "control";
/// Label of the inhibited series in the `inhibition` dataset.
pub const INHIBITED: &str = "inhibited";

const INHIBITION_S: [f64; 5] = [0.5, 1.0, 1.5, 2.5, 3.5];
const INHIBITION_V: [f64; 5] = [23.5, 32.2, 36.9, 41.8, 44.0];
const INHIBITION_V_INH: [f64; 5] = [16.67, 25.25, 30.49, 37.04, 38.91];

const TRACE_S: [f64; 6] = [1.5, 2.0, 3.0, 4.0, 8.0, 16.0];
const TRACE_V: [f64; 6] = [0.21, 0.24, 0.28, 0.33, 0.40, 0.45];
const TRACE_MULTIPLIER: f64 = 1e-6;

/// Names accepted by `--dataset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetName {
    Inhibition,
    Trace,
}

impl DatasetName {
    pub fn load(self) -> Result<Dataset, KineticsError> {
        match self {
            DatasetName::Inhibition => inhibition(),
            DatasetName::Trace => trace(),
        }
    }
}

/// Substrates accepted by `km-range --substrate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Substrate {
    All,
    Amp,
    Cmp,
}

impl Substrate {
    pub fn ranges(self) -> Vec<KmRange> {
        match self {
            Substrate::All => vec![amp_range(), cmp_range()],
            Substrate::Amp => vec![amp_range()],
            Substrate::Cmp => vec![cmp_range()],
        }
    }
}

pub fn inhibition() -> Result<Dataset, KineticsError> {
    Ok(Dataset {
        name: "inhibition".to_string(),
        concentration_unit: "mmol".to_string(),
        rate_unit: "mmol/min".to_string(),
        series: vec![
            LabeledSeries {
                label: CONTROL.to_string(),
                series: SampleSeries::from_columns(&INHIBITION_S, &INHIBITION_V)?,
            },
            LabeledSeries {
                label: INHIBITED.to_string(),
                series: SampleSeries::from_columns(&INHIBITION_S, &INHIBITION_V_INH)?,
            },
        ],
    })
}

pub fn trace() -> Result<Dataset, KineticsError> {
    let rates: Vec<f64> = TRACE_V.iter().map(|v| v * TRACE_MULTIPLIER).collect();
    Ok(Dataset {
        name: "trace".to_string(),
        concentration_unit: "moles".to_string(),
        rate_unit: "moles/min".to_string(),
        series: vec![LabeledSeries {
            label: "trace".to_string(),
            series: SampleSeries::from_columns(&TRACE_S, &rates)?,
        }],
    })
}

/// AMP: reference substrate, Km 48 ± 0.75 uM.
pub fn amp_range() -> KmRange {
    KmRange::from_center("AMP", 1.0, 48.0, 0.75)
}

/// CMP: a tenth of AMP's Vmax, Km 940 ± 220 uM.
pub fn cmp_range() -> KmRange {
    KmRange::from_center("CMP", 0.1, 940.0, 220.0)
}
