//! Line solver
//!
//! [`parse`] is the entry point: it classifies one line, writes it into the
//! ledger at its row and re-evaluates the whole block up to that row.
//!
//! # Example
//!
//! ```rust
//! use tally::{parse, Ledger, LineValue};
//!
//! let mut ledger = Ledger::new();
//! for (row, line) in ["1", "2", "subtotal"].iter().enumerate() {
//!     ledger = parse(line, row, ledger);
//! }
//! assert_eq!(ledger.value(2), Some(&LineValue::Numeric(3.0)));
//! ```

use crate::assignment::{self, AssignmentShape, Vocabulary};
use crate::error::Result;
use crate::keywords::Aggregate;
use crate::ledger::{FormatKind, Ledger, LineResult, ResultKind};
use crate::normalize::{self, Passthrough};
use crate::options::SolverOptions;
use crate::{driver, shorthand};

/// Message for a line that leaves nothing to evaluate once free text is gone
pub const NOT_A_NUMBER: &str = "was not a number, equation, variable or comment";

/// Parse `line` as row `row` of the block held in `ledger`, with default options
pub fn parse(line: &str, row: usize, ledger: Ledger) -> Ledger {
    Solver::default().parse_line(line, row, ledger)
}

/// Solves math blocks line by line under a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct Solver {
    options: SolverOptions,
}

impl Solver {
    /// Create a solver, rejecting invalid options
    pub fn new(options: SolverOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// An empty ledger carrying this solver's precision
    pub fn new_ledger(&self) -> Ledger {
        match self.options.precision {
            Some(precision) => Ledger::with_precision(precision),
            None => Ledger::new(),
        }
    }

    /// Parse one line into `ledger` and re-evaluate rows `0..=row`
    ///
    /// Rows must arrive in increasing order. Failures stay on the row.
    pub fn parse_line(&self, line: &str, row: usize, mut ledger: Ledger) -> Ledger {
        if row < ledger.row_count() {
            tracing::warn!(row, row_count = ledger.row_count(), "row submitted out of order");
        }
        if ledger.precision.is_none() {
            ledger.precision = self.options.precision;
        }

        let (result, references) = self.classify(line, row, &ledger);
        tracing::debug!(
            row,
            kind = ?result.kind,
            expression = %result.expression,
            "classified line"
        );
        ledger.relations.set(row, references);
        ledger.set_line(result);
        driver::evaluate(&mut ledger, row);
        ledger
    }

    /// Solve every line of `text` from a fresh ledger
    pub fn solve_block(&self, text: &str) -> Ledger {
        self.solve_lines(text.lines())
    }

    /// Solve a sequence of lines from a fresh ledger
    pub fn solve_lines<I, S>(&self, lines: I) -> Ledger
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .fold(self.new_ledger(), |ledger, (row, line)| {
                self.parse_line(line.as_ref(), row, ledger)
            })
    }

    /// Turn a raw line into a row and the variable names it reads
    fn classify(&self, line: &str, row: usize, ledger: &Ledger) -> (LineResult, Vec<String>) {
        let text = normalize::strip_comments(line);
        if text.trim().is_empty() {
            return (LineResult::heading(row, line), Vec::new());
        }
        let text = normalize::strip_label(text);
        if text.trim().is_empty() {
            return (LineResult::heading(row, line), Vec::new());
        }

        let (text, passthrough) = if self.options.passthrough {
            Passthrough::extract(text)
        } else {
            (text.to_string(), Passthrough::default())
        };

        let shape = AssignmentShape::detect(&text);
        if shape == AssignmentShape::Incomplete {
            return (LineResult::heading(row, line), Vec::new());
        }

        let mut result = LineResult::new(row, line);

        let aggregate = Aggregate::detect(&text, &shape);
        let (binding, rhs) = match shape {
            AssignmentShape::Binding { name, rhs } => (Some(name), rhs),
            _ => (None, text.as_str()),
        };

        let rhs = match (aggregate, binding) {
            (Some(aggregate), None) => {
                let sum = aggregate.sum_expression(row, ledger);
                let references = assignment::referenced_names(&sum, &ledger.variables);
                result.kind = aggregate.kind();
                result.expression = sum;
                result.complete = true;
                return (result, references);
            }
            // `name = subtotal * 10%`: the sum stands in for the keyword only
            (Some(aggregate), Some(_)) => {
                let sum = aggregate.sum_expression(row, ledger);
                aggregate.substitute(rhs, &sum)
            }
            (None, _) => rhs.to_string(),
        };

        let rewritten = shorthand::rewrite(&rhs);
        if rewritten.percent {
            result.format = FormatKind::Percent;
        }
        let vocabulary = Vocabulary::new(&ledger.variables, binding, &self.options.currencies);
        let stripped = assignment::strip_free_text(&rewritten.text, &vocabulary);
        let stripped = passthrough.restore(&stripped);
        let references = assignment::referenced_names(&stripped, &ledger.variables);

        match binding {
            Some(name) => {
                result.kind = if aggregate.is_some() {
                    ResultKind::AssignedTotal
                } else {
                    ResultKind::Assignment
                };
                result.complete = aggregate.is_some();
                result.expression = format!("{} = {}", name, stripped);
            }
            None if stripped.is_empty() => {
                result.fail(NOT_A_NUMBER);
                return (result, Vec::new());
            }
            None => {
                result.kind = ResultKind::Number;
                result.expression = stripped;
            }
        }
        (result, references)
    }
}
