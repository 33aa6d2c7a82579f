//! Input/output helpers.
//!
//! - fit results JSON read/write (`export`)

pub mod export;

pub use export::*;
