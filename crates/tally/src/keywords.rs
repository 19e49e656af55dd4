//! `subtotal` and `total` aggregate commands

use crate::assignment::AssignmentShape;
use crate::ledger::{Ledger, ResultKind};
use lazy_regex::regex;

/// A zero-argument aggregate command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Number rows back to the previous boundary
    Subtotal,
    /// Number and subtotal rows from the start of the block
    Total,
}

impl Aggregate {
    /// Find a command in the line; `subtotal` wins over `total`
    ///
    /// A keyword on the left of an assignment (`total = 5`) is a variable
    /// name, not a command.
    pub fn detect(line: &str, shape: &AssignmentShape<'_>) -> Option<Self> {
        let found = if regex!(r"(?i)\bsubtotal\b").is_match(line) {
            Aggregate::Subtotal
        } else if regex!(r"(?i)\btotal\b").is_match(line) {
            Aggregate::Total
        } else {
            return None;
        };
        if let Some(name) = shape.name() {
            if regex!(r"(?i)\b(?:sub)?total\b").is_match(name) {
                return None;
            }
        }
        Some(found)
    }

    pub fn kind(self) -> ResultKind {
        match self {
            Aggregate::Subtotal => ResultKind::Subtotal,
            Aggregate::Total => ResultKind::Total,
        }
    }

    /// Rows below `row` this command adds up, ascending
    ///
    /// Rows without a value (such as `R0` pointing at a heading) are skipped.
    pub fn contributing_rows(self, row: usize, ledger: &Ledger) -> Vec<usize> {
        let previous = &ledger.lines()[..row.min(ledger.lines().len())];
        match self {
            Aggregate::Subtotal => {
                let mut rows: Vec<usize> = previous
                    .iter()
                    .rev()
                    .take_while(|line| !line.kind.is_boundary())
                    .filter(|line| line.kind == ResultKind::Number && !line.value.is_none())
                    .map(|line| line.row)
                    .collect();
                rows.reverse();
                rows
            }
            Aggregate::Total => previous
                .iter()
                .filter(|line| matches!(line.kind, ResultKind::Number | ResultKind::Subtotal))
                .filter(|line| !line.value.is_none())
                .map(|line| line.row)
                .collect(),
        }
    }

    /// Put `sum` in place of the keyword inside an assignment's right side
    ///
    /// `subtotal * 10%` → `(R0 + R1) * 10%`
    pub fn substitute(self, rhs: &str, sum: &str) -> String {
        let sum = if sum.contains(' ') {
            format!("({})", sum)
        } else {
            sum.to_string()
        };
        let pattern = match self {
            Aggregate::Subtotal => regex!(r"(?i)\bsubtotal\b"),
            Aggregate::Total => regex!(r"(?i)\btotal\b"),
        };
        pattern.replace_all(rhs, regex::NoExpand(&sum)).into_owned()
    }

    /// The summation expression, `R0 + R1 + ...`, or `0` when nothing contributes
    pub fn sum_expression(self, row: usize, ledger: &Ledger) -> String {
        let rows = self.contributing_rows(row, ledger);
        if rows.is_empty() {
            return "0".to_string();
        }
        rows.into_iter()
            .map(Ledger::row_variable)
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
