//! # tally
//!
//! A line-based calculation ledger for free-text math blocks.
//!
//! Each line of a block is parsed into an arithmetic expression and
//! evaluated against the variables accumulated by the lines above it.
//!
//! ## Features
//!
//! - `subtotal` and `total` aggregate rows
//! - `k`/`M` suffixes and percentage idioms (`10 + 10%`, `20% of 50`,
//!   `5 as a % of 20`)
//! - `name = expr` variables, plus `R0`, `R1`, ... mirroring each row
//! - `# ...` and `// ...` comments and `label:` prefixes
//! - Units of length, mass and area with `in`/`to` conversion
//! - Row-local errors: a bad line never stops the rest of the block
//!
//! ## Example
//!
//! ```rust
//! use tally::prelude::*;
//!
//! let solver = Solver::default();
//! let ledger = solver.solve_block("rent = 1200\n4 for books + 6 for bees\nsubtotal");
//!
//! assert_eq!(ledger.variable("rent"), Some(&LineValue::Numeric(1200.0)));
//! assert_eq!(ledger.line(1).unwrap().expression, "4 + 6");
//! assert_eq!(ledger.value(2), Some(&LineValue::Numeric(10.0)));
//! ```

pub mod assignment;
mod driver;
pub mod error;
pub mod keywords;
pub mod ledger;
pub mod normalize;
pub mod options;
pub mod prelude;
pub mod relations;
pub mod shorthand;
pub mod solver;

pub use error::{Error, Result};
pub use keywords::Aggregate;
pub use ledger::{FormatKind, Ledger, LineResult, LineValue, ResultKind};
pub use options::{SolverOptions, MAX_PRECISION};
pub use relations::RelationMap;
pub use solver::{parse, Solver, NOT_A_NUMBER};

// Re-export engine types
pub use tally_expr::{ExprError, Quantity, Value};
