//! Evaluation driver
//!
//! Hands every expression up to the current row to the engine in one batch
//! and writes the results back into the ledger. A failing batch is pinned on
//! the current row; earlier rows keep what they had.

use crate::ledger::{FormatKind, Ledger, LineResult, LineValue, ResultKind};
use tally_expr::{evaluate_all, Scope, Value};

/// Re-evaluate rows `0..=row` of `ledger`
pub(crate) fn evaluate(ledger: &mut Ledger, row: usize) {
    let end = (row + 1).min(ledger.expressions.len());
    let mut scope: Scope = ledger
        .variables
        .iter()
        .map(|(name, value)| (name.clone(), Value::from(value.clone())))
        .collect();

    match evaluate_all(&ledger.expressions[..end], &mut scope) {
        Ok(values) => {
            let precision = ledger.precision;
            for (name, value) in scope.into_values() {
                ledger
                    .variables
                    .insert(name, LineValue::from_engine(value, precision));
            }
            for (index, value) in values.into_iter().enumerate() {
                let value = LineValue::from_engine(value, precision);
                ledger
                    .variables
                    .insert(Ledger::row_variable(index), value.clone());
                if let Some(line) = ledger.line_mut(index) {
                    line.display_value = annotation(line, &value);
                    line.value = value;
                }
            }
        }
        Err(err) => {
            tracing::debug!(row, error = %err, "evaluation failed");
            if let Some(line) = ledger.line_mut(row) {
                line.fail(err.to_string());
            }
            if let Some(expression) = ledger.expressions.get_mut(row) {
                expression.clear();
            }
            ledger
                .variables
                .insert(Ledger::row_variable(row), LineValue::None);
        }
    }
}

/// `//= 12`, `//= 5 km` or `//= 25%`; nothing for rows without a value
fn annotation(line: &LineResult, value: &LineValue) -> Option<String> {
    if value.is_none() || matches!(line.kind, ResultKind::Heading | ResultKind::Error) {
        return None;
    }
    let rendered = match (line.format, value) {
        (FormatKind::Percent, LineValue::Numeric(ratio)) => tally_expr::format_percent(*ratio),
        _ => value.to_string(),
    };
    Some(format!("//= {}", rendered))
}
