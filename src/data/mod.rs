//! Input data: the built-in measurement sets and seeded synthetic series.

pub mod datasets;
pub mod synth;

pub use datasets::*;
pub use synth::*;
