//! Plotting: chart descriptions plus two renderers.
//!
//! - `chart`: what to draw (built from fit results)
//! - `ascii`: fixed-grid terminal rendering
//! - `svg`: Plotters SVG file export

pub mod ascii;
pub mod chart;
pub mod svg;

pub use ascii::*;
pub use chart::*;
pub use svg::*;
