//! Terminal formatting of fit results.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (snapshot-style tests below)

use crate::domain::{Dataset, FitDetail, FitResult};
use crate::fit::KmRange;

/// Format a value with 3 decimals; tiny magnitudes switch to scientific notation
/// so micro-scale rates do not collapse to `0.000`.
pub fn fmt_value(v: f64) -> String {
    if v != 0.0 && v.is_finite() && v.abs() < 1e-3 {
        format!("{v:.3e}")
    } else {
        format!("{v:.3}")
    }
}

/// Header block for a dataset run.
pub fn format_dataset_header(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== kin - Michaelis-Menten fit ({}) ===\n", dataset.name));
    out.push_str(&format!(
        "Units: [S] in {} | V in {}\n",
        dataset.concentration_unit, dataset.rate_unit
    ));
    for ls in &dataset.series {
        let (lo, hi) = ls.series.concentration_range().unwrap_or((f64::NAN, f64::NAN));
        out.push_str(&format!(
            "Series {}: n={} | [S]=[{}, {}]\n",
            ls.label,
            ls.series.len(),
            fmt_value(lo),
            fmt_value(hi)
        ));
    }
    out
}

/// One table of fits for a single series (one row per method).
pub fn format_fit_table(label: &str, fits: &[FitResult], dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nFits for {label}:\n"));
    out.push_str(
        format!(
            "{:<18} {:>12} {:>12} {}\n",
            "method", "Vmax", "Km", "detail"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<18} {:-<12} {:-<12} {:-<30}", "", "", "", "").trim_end());
    out.push('\n');

    for fit in fits {
        let suspect = if fit.is_physical() { "" } else { "  (suspect)" };
        out.push_str(
            format!(
                "{:<18} {:>12} {:>12} {}{suspect}\n",
                fit.method.display_name(),
                fmt_value(fit.vmax),
                fmt_value(fit.km),
                fmt_detail(&fit.detail),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out.push_str(&format!(
        "(Vmax in {}, Km in {})\n",
        dataset.rate_unit, dataset.concentration_unit
    ));
    out
}

/// Side-by-side comparison of the same method on two series.
pub fn format_comparison(
    labels: (&str, &str),
    fits: (&FitResult, &FitResult),
    dataset: &Dataset,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{} comparison:\n", fits.0.method.display_name()));
    out.push_str(format!("{:<18} {:>12} {:>12}", "series", "Vmax", "Km").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<18} {:-<12} {:-<12}", "", "", "").trim_end());
    out.push('\n');
    for (label, fit) in [(labels.0, fits.0), (labels.1, fits.1)] {
        let suspect = if fit.is_physical() { "" } else { "  (suspect)" };
        out.push_str(&format!(
            "{:<18} {:>12} {:>12}{suspect}\n",
            truncate(label, 18),
            fmt_value(fit.vmax),
            fmt_value(fit.km)
        ));
    }
    let dv = fits.1.vmax - fits.0.vmax;
    let dk = fits.1.km - fits.0.km;
    out.push_str(&format!(
        "{:<18} {:>12} {:>12}\n",
        "delta",
        fmt_value(dv),
        fmt_value(dk)
    ));
    out.push_str(&format!(
        "(Vmax in {}, Km in {})\n",
        dataset.rate_unit, dataset.concentration_unit
    ));
    out
}

/// Summary line for a Km-range substrate.
pub fn format_km_range(range: &KmRange) -> String {
    format!(
        "{}: relative Vmax={} | Km in [{}, {}] uM\n",
        range.substrate,
        fmt_value(range.relative_vmax),
        fmt_value(range.km_low),
        fmt_value(range.km_high)
    )
}

fn fmt_detail(detail: &FitDetail) -> String {
    match detail {
        FitDetail::Nonlinear { evaluations, sse } => {
            format!("evaluations={evaluations} sse={sse:.3e}")
        }
        FitDetail::Linear(line) => format!(
            "slope={} intercept={} r2={:.4}",
            fmt_value(line.slope),
            fmt_value(line.intercept),
            line.r_squared
        ),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
