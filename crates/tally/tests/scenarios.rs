//! End-to-end tests for math blocks solved line by line

use pretty_assertions::assert_eq;
use tally::prelude::*;

fn solve(lines: &[&str]) -> Ledger {
    let mut ledger = Ledger::new();
    for (row, line) in lines.iter().enumerate() {
        ledger = parse(line, row, ledger);
    }
    ledger
}

fn number(ledger: &Ledger, row: usize) -> f64 {
    ledger
        .value(row)
        .and_then(LineValue::as_f64)
        .unwrap_or_else(|| panic!("row {} has no numeric value: {:?}", row, ledger.line(row)))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Every row's value is mirrored in its `R{i}` pseudo-variable
fn assert_rows_mirrored(ledger: &Ledger) {
    for line in ledger.lines() {
        assert_eq!(
            ledger.variable(&Ledger::row_variable(line.row)),
            Some(&line.value),
            "R{} out of sync",
            line.row
        );
    }
}

#[test]
fn test_subtotal_then_total() {
    let ledger = solve(&["1", "2", "subtotal", "4", "5", "total"]);
    assert_eq!(number(&ledger, 2), 3.0);
    assert_eq!(number(&ledger, 5), 15.0);
    assert_eq!(ledger.line(2).unwrap().kind, ResultKind::Subtotal);
    assert_eq!(ledger.line(5).unwrap().kind, ResultKind::Total);
    assert_eq!(ledger.line(5).unwrap().expression, "R0 + R1 + R2 + R3 + R4");
    assert_rows_mirrored(&ledger);
}

#[test]
fn test_thousand_and_million_suffixes() {
    let ledger = solve(&["4k", "4M", "4kg"]);
    assert_eq!(number(&ledger, 0), 4000.0);
    assert_eq!(number(&ledger, 1), 4_000_000.0);
    assert_eq!(
        ledger.value(2),
        Some(&LineValue::Unit {
            amount: 4.0,
            unit: "kg".into()
        })
    );
}

#[test]
fn test_percentages() {
    let ledger = solve(&["10 + 10%", "10 - 10%", "10%", "20% of 50"]);
    assert_close(number(&ledger, 0), 11.0);
    assert_close(number(&ledger, 1), 9.0);
    assert_close(number(&ledger, 2), 0.1);
    assert_close(number(&ledger, 3), 10.0);
    assert_eq!(ledger.line(0).unwrap().display_value.as_deref(), Some("//= 11"));
}

#[test]
fn test_variable_assignment() {
    let ledger = solve(&["varname = 4 + 2", "varname + 99"]);
    assert_eq!(ledger.line(0).unwrap().kind, ResultKind::Assignment);
    assert_eq!(number(&ledger, 0), 6.0);
    assert_eq!(number(&ledger, 1), 105.0);
    assert_eq!(ledger.variable("varname"), Some(&LineValue::Numeric(6.0)));
    assert_rows_mirrored(&ledger);
}

#[test]
fn test_mixed_block() {
    let ledger = solve(&[
        "Quickbooks: 300",
        "myVar = subtotal",
        "subtotal",
        "Frogs = 22",
        "subtotal",
        "stuff = 2 + Frogs",
        "1*1",
        "total",
        "stuff",
    ]);
    assert_eq!(number(&ledger, 0), 300.0);
    assert_eq!(ledger.line(1).unwrap().kind, ResultKind::AssignedTotal);
    assert_eq!(ledger.variable("myVar"), Some(&LineValue::Numeric(300.0)));
    assert_eq!(number(&ledger, 2), 0.0);
    assert_eq!(number(&ledger, 4), 0.0);
    assert_eq!(number(&ledger, 5), 24.0);
    assert_eq!(number(&ledger, 7), 301.0);
    assert_eq!(number(&ledger, 8), 24.0);
    assert_eq!(ledger.total_errors(), 0);
    assert_rows_mirrored(&ledger);
}

#[test]
fn test_syntax_error_is_row_local() {
    let ledger = solve(&["2 4 6", "2+2"]);
    let failed = ledger.line(0).unwrap();
    assert_eq!(failed.kind, ResultKind::Error);
    assert!(failed.error.as_deref().unwrap().contains("Syntax error"));
    assert_eq!(failed.expression, "");
    assert_eq!(number(&ledger, 1), 4.0);
    assert_eq!(ledger.total_errors(), 1);
}

#[test]
fn test_error_rows_do_not_count() {
    let ledger = solve(&["5", "2 4 6", "subtotal"]);
    assert_eq!(ledger.line(2).unwrap().expression, "R0");
    assert_eq!(number(&ledger, 2), 5.0);
}

#[test]
fn test_free_text_and_labels() {
    let ledger = solve(&["4 for books + 6 for bees", "books:"]);
    assert_eq!(ledger.line(0).unwrap().expression, "4 + 6");
    assert_eq!(number(&ledger, 0), 10.0);

    let label = ledger.line(1).unwrap();
    assert_eq!(label.kind, ResultKind::Heading);
    assert!(label.error.is_none());
    assert_eq!(label.value, LineValue::None);
}

#[test]
fn test_comments() {
    let ledger = solve(&["# Groceries", "12 //= 12", "4 + 5 # fruit", "subtotal"]);
    assert_eq!(ledger.line(0).unwrap().kind, ResultKind::Heading);
    assert_eq!(number(&ledger, 1), 12.0);
    assert_eq!(number(&ledger, 2), 9.0);
    assert_eq!(number(&ledger, 3), 21.0);
}

#[test]
fn test_unit_conversion() {
    let ledger = solve(&["5 km in m", "distance = 3 km", "distance + 500 m"]);
    assert_eq!(
        ledger.value(0),
        Some(&LineValue::Unit {
            amount: 5000.0,
            unit: "m".into()
        })
    );
    assert_eq!(
        ledger.value(2),
        Some(&LineValue::Unit {
            amount: 3.5,
            unit: "km".into()
        })
    );
    assert_eq!(
        ledger.line(2).unwrap().display_value.as_deref(),
        Some("//= 3.5 km")
    );
}

#[test]
fn test_precision_applies_to_numbers_only() {
    let solver = Solver::new(SolverOptions::new().with_precision(3)).unwrap();
    let ledger = solver.solve_lines(["2 / 3", "1 km / 3"]);
    assert_eq!(ledger.value(0), Some(&LineValue::Numeric(0.667)));
    match ledger.value(1) {
        Some(LineValue::Unit { amount, unit }) => {
            assert_eq!(unit, "km");
            assert_close(*amount, 1.0 / 3.0);
        }
        other => panic!("expected a unit value, got {:?}", other),
    }
}

#[test]
fn test_passthrough_segments() {
    let lines = [r#"4 {km} + 1 km"#];

    // Without the flag the braces reach the engine
    let plain = Solver::default().solve_lines(lines);
    assert!(plain.line(0).unwrap().is_error());

    let solver = Solver::new(SolverOptions::new().with_passthrough(true)).unwrap();
    let ledger = solver.solve_lines(lines);
    assert_eq!(ledger.line(0).unwrap().expression, "4 km + 1 km");
    assert_eq!(
        ledger.value(0),
        Some(&LineValue::Unit {
            amount: 5.0,
            unit: "km".into()
        })
    );
}

#[test]
fn test_currency_symbols_survive_stripping() {
    let plain = Solver::default().solve_lines(["3 EUR apples"]);
    assert_eq!(plain.line(0).unwrap().expression, "3");

    // The symbol is kept, but nothing evaluates it yet
    let solver = Solver::new(SolverOptions::new().with_currency("EUR")).unwrap();
    let ledger = solver.solve_lines(["3 EUR apples"]);
    let line = ledger.line(0).unwrap();
    assert!(line.is_error());
    assert_eq!(
        line.error.as_deref(),
        Some("Syntax error: Unexpected symbol EUR (char 3)")
    );
}

#[test]
fn test_highlight_dependents() {
    let ledger = solve(&["Frogs = 22", "stuff = 2 + Frogs", "1", "total"]);
    assert_eq!(ledger.relations().dependents_of(0, &["Frogs"]), vec![1]);
    assert_eq!(ledger.relations().dependents_of(2, &[]), vec![3]);
}

#[test]
fn test_assignment_applies_arithmetic_to_subtotal() {
    let ledger = solve(&["100", "tax = subtotal * 10%", "tax"]);
    let tax = ledger.line(1).unwrap();
    assert_eq!(tax.kind, ResultKind::AssignedTotal);
    assert_close(ledger.variable("tax").and_then(LineValue::as_f64).unwrap(), 10.0);
    assert_close(number(&ledger, 2), 10.0);
    assert_rows_mirrored(&ledger);
}

#[test]
fn test_assignment_adds_to_total() {
    let ledger = solve(&["1", "2", "mytotal = 5 + total"]);
    assert_eq!(ledger.line(2).unwrap().kind, ResultKind::AssignedTotal);
    assert_close(number(&ledger, 2), 8.0);
}

#[test]
fn test_row_reference_to_heading_is_left_out_of_sums() {
    let ledger = solve(&["# head", "R0", "5", "subtotal", "total"]);
    assert!(!ledger.line(1).unwrap().is_error());
    let subtotal = ledger.line(3).unwrap();
    assert!(!subtotal.is_error(), "{:?}", subtotal.error);
    assert_close(number(&ledger, 3), 5.0);
    assert_close(number(&ledger, 4), 10.0);
}
