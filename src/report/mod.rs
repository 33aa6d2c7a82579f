//! Reporting: formatted terminal output for fits and comparisons.

pub mod format;

pub use format::*;
