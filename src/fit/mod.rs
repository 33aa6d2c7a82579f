//! Kinetics fitting.
//!
//! Responsibilities:
//!
//! - fit one series with a chosen method (direct, Lineweaver-Burk, Eadie-Hofstee)
//! - compare two series under the same method
//! - sample fitted curves, regression lines and Km-range profiles for plotting

pub mod curve;
pub mod fitter;

pub use curve::*;
pub use fitter::*;
