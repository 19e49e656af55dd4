//! # tally-expr
//!
//! Expression engine for tally math blocks.
//!
//! This crate provides:
//! - Expression parsing (text → AST), including `name = expr` bindings
//! - Evaluation against a [`Scope`] of named values
//! - Built-in math and trigonometric functions
//! - Length, mass and area units with `in`/`to` conversion
//! - Significant-digit rounding and display formatting
//!
//! ## Example
//!
//! ```rust
//! use tally_expr::{evaluate_all, Scope, Value};
//!
//! let mut scope = Scope::new();
//! let values = evaluate_all(&["rent = 1200", "rent * 12"], &mut scope).unwrap();
//! assert_eq!(values[1], Value::Number(14400.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod functions;
pub mod parser;
pub mod units;

pub use ast::{BinaryOperator, Expr, Statement, UnaryOperator};
pub use error::{ExprError, ExprResult};
pub use evaluator::{
    evaluate, evaluate_all, evaluate_statement, evaluate_str, function_registry, Quantity, Scope,
    Value, CONSTANTS,
};
pub use format::{format_number, format_percent, format_value, round_to_precision, round_value};
pub use parser::{parse_expression, parse_statement};

/// Every identifier the engine itself gives meaning to: function names,
/// constants, unit spellings and conversion keywords
pub fn reserved_words() -> Vec<&'static str> {
    let mut words = function_registry().names();
    words.extend(CONSTANTS.iter().map(|(name, _)| *name));
    words.extend(units::unit_tokens());
    words.sort_unstable();
    words.dedup();
    words
}
