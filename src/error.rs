//! Error types.
//!
//! - [`KineticsError`] is returned by the fitting library (`math`, `models`, `fit`).
//! - [`AppError`] is what the `kin` binary surfaces: a message plus a process exit code.
//!
//! Exit codes:
//! - `2`: invalid input / IO
//! - `3`: not enough data to fit
//! - `4`: the fit itself failed (degenerate transform, solver did not converge)

use thiserror::Error;

/// Failure of a single kinetics computation.
///
/// All variants are terminal for the call that raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KineticsError {
    #[error("insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("solver did not converge after {evaluations} evaluations: {reason}")]
    NonConvergence { evaluations: usize, reason: String },

    #[error("division by zero: {0}")]
    DivisionByZero(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl KineticsError {
    /// Process exit code used when this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            KineticsError::InvalidArgument(_) => 2,
            KineticsError::InsufficientData { .. } => 3,
            KineticsError::NonConvergence { .. } | KineticsError::DivisionByZero(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<KineticsError> for AppError {
    fn from(err: KineticsError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
