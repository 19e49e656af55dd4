//! Ledger state threaded through every line of a math block

use crate::relations::RelationMap;
use std::collections::BTreeMap;
use tally_expr::{Quantity, Value};

/// Classification of a row, used by the aggregate logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultKind {
    /// Blank, comment-only, label-only or incomplete line
    Heading,
    /// Plain arithmetic; the only kind `subtotal` sums
    Number,
    Subtotal,
    Total,
    /// `name = subtotal` / `name = total`
    AssignedTotal,
    Assignment,
    Error,
}

impl ResultKind {
    /// Kinds a `subtotal` stops at when walking backwards
    pub fn is_boundary(self) -> bool {
        matches!(
            self,
            ResultKind::Subtotal | ResultKind::Total | ResultKind::AssignedTotal
        )
    }
}

/// How a row's value should be displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatKind {
    #[default]
    Normal,
    /// The value is a ratio shown as a percentage
    Percent,
}

/// An evaluated row value
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineValue {
    Numeric(f64),
    Unit { amount: f64, unit: String },
    #[default]
    None,
}

impl LineValue {
    /// The plain number, if this is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LineValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Magnitude of a number or unit value
    pub fn amount(&self) -> Option<f64> {
        match self {
            LineValue::Numeric(n) => Some(*n),
            LineValue::Unit { amount, .. } => Some(*amount),
            LineValue::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, LineValue::None)
    }

    /// Convert an engine result, rounding plain numbers to `precision`
    pub fn from_engine(value: Value, precision: Option<u32>) -> Self {
        match (value, precision) {
            (Value::Number(n), Some(p)) => {
                LineValue::Numeric(tally_expr::round_to_precision(n, p))
            }
            (value, _) => value.into(),
        }
    }
}

impl From<Value> for LineValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => LineValue::Numeric(n),
            Value::Unit(q) => LineValue::Unit {
                amount: q.amount,
                unit: q.unit,
            },
            Value::None => LineValue::None,
        }
    }
}

impl From<LineValue> for Value {
    fn from(value: LineValue) -> Self {
        match value {
            LineValue::Numeric(n) => Value::Number(n),
            LineValue::Unit { amount, unit } => Value::Unit(Quantity::new(amount, unit)),
            LineValue::None => Value::None,
        }
    }
}

impl std::fmt::Display for LineValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: Value = self.clone().into();
        f.write_str(&tally_expr::format_value(&value))
    }
}

/// The result of one input line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineResult {
    pub row: usize,
    pub kind: ResultKind,
    pub format: FormatKind,
    /// The line as given
    pub original_text: String,
    /// The cleaned expression handed to the engine; empty for non-numeric rows
    pub expression: String,
    pub value: LineValue,
    /// Set once normalization alone has classified the line
    pub complete: bool,
    /// Annotation such as `//= 12`
    pub display_value: Option<String>,
    pub error: Option<String>,
}

impl LineResult {
    /// A fresh, unclassified row
    pub fn new(row: usize, original_text: impl Into<String>) -> Self {
        Self {
            row,
            kind: ResultKind::Number,
            format: FormatKind::Normal,
            original_text: original_text.into(),
            expression: String::new(),
            value: LineValue::None,
            complete: false,
            display_value: None,
            error: None,
        }
    }

    /// A row that needs no evaluation
    pub fn heading(row: usize, original_text: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Heading,
            complete: true,
            ..Self::new(row, original_text)
        }
    }

    /// Mark the row as failed; it no longer contributes to any aggregate
    pub fn fail(&mut self, message: impl Into<String>) {
        self.kind = ResultKind::Error;
        self.expression.clear();
        self.value = LineValue::None;
        self.display_value = None;
        self.error = Some(message.into());
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResultKind::Error
    }
}

/// Aggregate state for one math block
///
/// Rows are written by index (append or overwrite, never removed), and
/// `expressions[i]` always belongs to `lines[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ledger {
    pub(crate) lines: Vec<LineResult>,
    pub(crate) variables: BTreeMap<String, LineValue>,
    pub(crate) relations: RelationMap,
    pub(crate) expressions: Vec<String>,
    pub(crate) row_count: usize,
    pub(crate) precision: Option<u32>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger that rounds plain numbers to `precision`
    /// significant digits
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: Some(precision),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[LineResult] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&LineResult> {
        self.lines.get(row)
    }

    /// Evaluated value of a row
    pub fn value(&self, row: usize) -> Option<&LineValue> {
        self.lines.get(row).map(|line| &line.value)
    }

    pub fn variables(&self) -> &BTreeMap<String, LineValue> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&LineValue> {
        self.variables.get(name)
    }

    pub fn relations(&self) -> &RelationMap {
        &self.relations
    }

    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Rows that failed to evaluate
    pub fn errors(&self) -> impl Iterator<Item = &LineResult> {
        self.lines.iter().filter(|line| line.is_error())
    }

    /// Number of rows that failed to evaluate
    pub fn total_errors(&self) -> usize {
        self.errors().count()
    }

    /// Name of the pseudo-variable mirroring a row's value
    pub fn row_variable(row: usize) -> String {
        format!("R{}", row)
    }

    /// Write `line` into its slot, padding any skipped rows with headings
    pub(crate) fn set_line(&mut self, line: LineResult) {
        let row = line.row;
        while self.lines.len() < row {
            let filler = self.lines.len();
            self.lines.push(LineResult::heading(filler, ""));
            self.expressions.push(String::new());
        }
        let expression = line.expression.clone();
        if row < self.lines.len() {
            self.lines[row] = line;
            self.expressions[row] = expression;
        } else {
            self.lines.push(line);
            self.expressions.push(expression);
        }
        self.row_count = self.lines.len();
    }

    pub(crate) fn line_mut(&mut self, row: usize) -> Option<&mut LineResult> {
        self.lines.get_mut(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_line_appends_and_overwrites() {
        let mut ledger = Ledger::new();
        let mut first = LineResult::new(0, "1");
        first.expression = "1".into();
        ledger.set_line(first);
        assert_eq!(ledger.row_count(), 1);

        let mut replaced = LineResult::new(0, "2");
        replaced.expression = "2".into();
        ledger.set_line(replaced);
        assert_eq!(ledger.row_count(), 1);
        assert_eq!(ledger.expressions(), ["2".to_string()]);
        assert_eq!(ledger.line(0).unwrap().original_text, "2");
    }

    #[test]
    fn test_set_line_pads_skipped_rows() {
        let mut ledger = Ledger::new();
        ledger.set_line(LineResult::new(2, "5"));
        assert_eq!(ledger.row_count(), 3);
        assert_eq!(ledger.expressions().len(), 3);
        assert_eq!(ledger.line(0).unwrap().kind, ResultKind::Heading);
        assert_eq!(ledger.line(2).unwrap().row, 2);
    }

    #[test]
    fn test_fail_clears_expression() {
        let mut line = LineResult::new(0, "2 4 6");
        line.expression = "2 4 6".into();
        line.fail("Syntax error");
        assert!(line.is_error());
        assert!(line.expression.is_empty());
        assert_eq!(line.value, LineValue::None);
    }

    #[test]
    fn test_line_value_conversions() {
        let unit: LineValue = Value::Unit(Quantity::new(5.0, "km")).into();
        assert_eq!(
            unit,
            LineValue::Unit {
                amount: 5.0,
                unit: "km".into()
            }
        );
        assert_eq!(unit.to_string(), "5 km");
        assert_eq!(unit.amount(), Some(5.0));
        assert_eq!(unit.as_f64(), None);

        let back: Value = unit.into();
        assert!(back.is_unit());

        assert_eq!(
            LineValue::from_engine(Value::Number(11.000000000000002), Some(14)),
            LineValue::Numeric(11.0)
        );
        // Units are never rounded
        assert_eq!(
            LineValue::from_engine(Value::Unit(Quantity::new(1.23456, "m")), Some(2)),
            LineValue::Unit {
                amount: 1.23456,
                unit: "m".into()
            }
        );
    }

    #[test]
    fn test_boundary_kinds() {
        assert!(ResultKind::Subtotal.is_boundary());
        assert!(ResultKind::Total.is_boundary());
        assert!(ResultKind::AssignedTotal.is_boundary());
        assert!(!ResultKind::Number.is_boundary());
        assert!(!ResultKind::Assignment.is_boundary());
    }
}
