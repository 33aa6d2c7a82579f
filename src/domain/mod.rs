//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - observations (`Sample`, `SampleSeries`, `Dataset`)
//! - fit outputs (`FitResult`, `LinearFit`, `CurveSamples`)
//! - run configuration (`SolverConfig`, `RunConfig`)

pub mod types;

pub use types::*;
