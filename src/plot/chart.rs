//! Render-agnostic chart descriptions.
//!
//! A [`Chart`] is pure data (title, axis labels, series). It is built from fit
//! results here and handed to either the ASCII renderer or the SVG writer, so
//! both front-ends show exactly the same series.

use crate::domain::{CurveSamples, Dataset, FitMethod, FitResult, SampleSeries};
use crate::error::KineticsError;
use crate::fit::{KmRange, generate_curve, km_range_profiles, regression_line};
use crate::models::{eadie_hofstee_point, lineweaver_burk_point};
use crate::plot::ascii::{Layer, render_ascii_plot};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Observations.
    Markers,
    /// Fitted curves and regression lines.
    Line,
}

#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub kind: SeriesKind,
}

#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

const MARKER_GLYPHS: [char; 3] = ['o', 'x', '+'];
const LINE_GLYPHS: [char; 3] = ['-', '=', '~'];

impl Chart {
    /// Render with the fixed-grid terminal renderer.
    pub fn to_ascii(&self, width: usize, height: usize) -> String {
        let mut markers = 0;
        let mut lines = 0;
        let layers: Vec<Layer<'_>> = self
            .series
            .iter()
            .map(|s| match s.kind {
                SeriesKind::Markers => {
                    let glyph = MARKER_GLYPHS[markers % MARKER_GLYPHS.len()];
                    markers += 1;
                    Layer::scatter(&s.points, glyph)
                }
                SeriesKind::Line => {
                    let glyph = LINE_GLYPHS[lines % LINE_GLYPHS.len()];
                    lines += 1;
                    Layer::line(&s.points, glyph)
                }
            })
            .collect();

        let mut out = render_ascii_plot(&self.title, &layers, width, height);
        for (series, layer) in self.series.iter().zip(&layers) {
            out.push_str(&format!("  {} {}\n", layer.glyph, series.label));
        }
        out
    }
}

/// Chart of observations plus fits for one method.
///
/// `fits` pairs each series label with its fit under `method`.
pub fn method_chart(
    dataset: &Dataset,
    fits: &[(&str, &SampleSeries, FitResult)],
    method: FitMethod,
    curve_points: usize,
) -> Result<Chart, KineticsError> {
    let cu = &dataset.concentration_unit;
    let ru = &dataset.rate_unit;

    let (title, x_label, y_label) = match method {
        FitMethod::Direct => (
            "Michaelis-Menten Plot".to_string(),
            format!("Substrate Concentration [S] ({cu})"),
            format!("Product Formation ({ru})"),
        ),
        FitMethod::LineweaverBurk => (
            "Lineweaver-Burk Plot".to_string(),
            format!("1 / [S] (1/{cu})"),
            format!("1 / V ({})", invert_unit(ru)),
        ),
        FitMethod::EadieHofstee => (
            "Eadie-Hofstee Plot".to_string(),
            format!("V/[S] ({})", ratio_unit(ru, cu)),
            format!("V ({ru})"),
        ),
    };

    let mut series = Vec::with_capacity(fits.len() * 2);
    for (label, samples, fit) in fits {
        let observed = observed_points(samples, method)?;
        let overlay = overlay_curve(&observed, fit, method, curve_points)?;
        series.push(ChartSeries {
            label: format!("{} {label}", method.display_name()),
            points: observed,
            kind: SeriesKind::Markers,
        });
        series.push(ChartSeries {
            label: format!("Fitted {label}"),
            points: overlay.points,
            kind: SeriesKind::Line,
        });
    }

    Ok(Chart { title, x_label, y_label, series })
}

/// Eadie-Hofstee profiles `(v, v/S)` for both Km bounds of a substrate.
pub fn km_range_chart(
    range: &KmRange,
    s_min: f64,
    s_max: f64,
    n_points: usize,
) -> Result<Chart, KineticsError> {
    let (low, high) = km_range_profiles(range, s_min, s_max, n_points)?;
    Ok(Chart {
        title: format!("Eadie-Hofstee Plot for {} with varying Km", range.substrate),
        x_label: "Reaction Rate (V) (uM/sec)".to_string(),
        y_label: "V/[S]".to_string(),
        series: vec![
            ChartSeries {
                label: format!("Km = {} uM", range.km_low),
                points: low.points,
                kind: SeriesKind::Line,
            },
            ChartSeries {
                label: format!("Km = {} uM", range.km_high),
                points: high.points,
                kind: SeriesKind::Line,
            },
        ],
    })
}

/// Observations in the coordinates of `method`.
pub fn observed_points(series: &SampleSeries, method: FitMethod) -> Result<Vec<(f64, f64)>, KineticsError> {
    series
        .samples()
        .iter()
        .map(|s| match method {
            FitMethod::Direct => Ok((s.concentration, s.rate)),
            FitMethod::LineweaverBurk => lineweaver_burk_point(s),
            FitMethod::EadieHofstee => eadie_hofstee_point(s),
        })
        .collect()
}

/// Fitted overlay in the coordinates of `method`.
///
/// - direct: model curve over the observed concentration range
/// - Lineweaver-Burk: regression line from `1/S = 0` (the `1/Vmax` intercept) to `max(1/S)`
/// - Eadie-Hofstee: regression line over the observed `v/S` range
fn overlay_curve(
    observed: &[(f64, f64)],
    fit: &FitResult,
    method: FitMethod,
    n_points: usize,
) -> Result<CurveSamples, KineticsError> {
    let (x_min, x_max) = crate::domain::min_max(observed.iter().map(|p| p.0)).ok_or(
        KineticsError::InsufficientData { needed: 1, got: 0 },
    )?;

    match (method, fit.line()) {
        (FitMethod::LineweaverBurk, Some(line)) => regression_line(line, 0.0, x_max, n_points),
        (FitMethod::EadieHofstee, Some(line)) => regression_line(line, x_min, x_max, n_points),
        _ => generate_curve(fit.vmax, fit.km, x_min, x_max, n_points),
    }
}

/// `mmol/min` -> `min/mmol`; anything without a single `/` becomes `1/unit`.
fn invert_unit(unit: &str) -> String {
    match unit.split_once('/') {
        Some((num, den)) if !den.contains('/') => format!("{den}/{num}"),
        _ => format!("1/{unit}"),
    }
}

/// Unit of `V/[S]`: `mmol/min` over `mmol` simplifies to `min^(-1)`.
fn ratio_unit(rate_unit: &str, conc_unit: &str) -> String {
    match rate_unit.split_once('/') {
        Some((num, den)) if num == conc_unit => format!("{den}^(-1)"),
        _ => format!("{rate_unit} per {conc_unit}"),
    }
}
