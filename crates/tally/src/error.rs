//! Error types for tally
//!
//! Row-level failures never surface here: they are recorded on the row in the
//! [`Ledger`](crate::Ledger). These errors cover configuration only.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a solver
#[derive(Debug, Error)]
pub enum Error {
    /// Precision outside the range an f64 can represent
    #[error("Invalid precision {0}: expected 1 to {max}", max = crate::options::MAX_PRECISION)]
    InvalidPrecision(u32),

    /// Currency symbol that could never match a word in a line
    #[error("Invalid currency symbol: {0:?}")]
    InvalidCurrency(String),

    /// Options file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file is not valid JSON for [`SolverOptions`](crate::SolverOptions)
    #[cfg(feature = "serde")]
    #[error("Invalid options: {0}")]
    Config(#[from] serde_json::Error),
}
