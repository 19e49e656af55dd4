//! Prelude module - common imports for tally users
//!
//! ```rust
//! use tally::prelude::*;
//! ```

pub use crate::{
    parse,
    // Errors
    Error,
    FormatKind,
    // Ledger types
    Ledger,
    LineResult,
    LineValue,
    Result,
    ResultKind,
    // Solving
    Solver,
    SolverOptions,
};
