//! SVG chart export via Plotters.
//!
//! Each [`Chart`] becomes one standalone SVG file with a caption, labelled axes,
//! a mesh, the observed points as circles, fitted curves as lines and a legend.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::chart::{Chart, SeriesKind};

const SIZE: (u32, u32) = (900, 600);

/// Write `chart` as an SVG file at `path`.
pub fn write_svg_chart(path: &Path, chart: &Chart) -> Result<(), AppError> {
    draw(path, chart).map_err(|e| {
        AppError::new(2, format!("Failed to write SVG chart '{}': {e}", path.display()))
    })?;
    log::info!("wrote chart '{}' to {}", chart.title, path.display());
    Ok(())
}

/// File name for a chart inside an export directory: `<stem>.svg`, lowercase, `-` separated.
pub fn svg_path(dir: &Path, stem: &str) -> PathBuf {
    let slug: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    dir.join(format!("{slug}.svg"))
}

fn draw(path: &Path, chart: &Chart) -> Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = bounds(chart);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(16)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| tick(*v))
        .y_label_formatter(&|v| tick(*v))
        .draw()?;

    for (i, series) in chart.series.iter().enumerate() {
        // Observation and fit of the same series share a color.
        let color = Palette99::pick(i / 2).to_rgba();
        match series.kind {
            SeriesKind::Markers => {
                ctx.draw_series(
                    series
                        .points
                        .iter()
                        .map(|&p| Circle::new(p, 4, color.filled())),
                )?
                .label(series.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
            }
            SeriesKind::Line => {
                ctx.draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    color.stroke_width(2),
                ))?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
        }
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Padded `(x, y)` ranges covering every finite point of the chart.
fn bounds(chart: &Chart) -> ((f64, f64), (f64, f64)) {
    let points = || chart.series.iter().flat_map(|s| s.points.iter());
    let x = crate::domain::min_max(points().map(|p| p.0).filter(|v| v.is_finite()));
    let y = crate::domain::min_max(points().map(|p| p.1).filter(|v| v.is_finite()));
    (pad(x.unwrap_or((0.0, 1.0))), pad(y.unwrap_or((0.0, 1.0))))
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span <= 0.0 {
        let half = if lo == 0.0 { 1.0 } else { lo.abs() * 0.5 };
        return (lo - half, hi + half);
    }
    (lo - span * 0.05, hi + span * 0.05)
}

fn tick(v: f64) -> String {
    if v != 0.0 && (v.abs() < 1e-2 || v.abs() >= 1e5) {
        format!("{v:.2e}")
    } else {
        format!("{v:.2}")
    }
}
