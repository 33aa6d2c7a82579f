//! `mm-kinetics` library crate.
//!
//! The binary (`kin`) is a thin wrapper around this library so that:
//!
//! - fitting logic is testable without spawning processes
//! - the estimators can be reused from other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
