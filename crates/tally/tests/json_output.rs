//! JSON round trips for ledgers and options

#![cfg(feature = "serde")]

use pretty_assertions::assert_eq;
use tally::prelude::*;

#[test]
fn test_ledger_json_is_deterministic() {
    let solver = Solver::default();
    let block = "Frogs = 22\nstuff = 2 + Frogs\n5 km in m\n2 4 6\ntotal";

    let first = serde_json::to_string(&solver.solve_block(block)).unwrap();
    let second = serde_json::to_string(&solver.solve_block(block)).unwrap();
    assert_eq!(first, second);

    let restored: Ledger = serde_json::from_str(&first).unwrap();
    assert_eq!(restored, solver.solve_block(block));
}

#[test]
fn test_line_value_shapes() {
    assert_eq!(
        serde_json::to_value(LineValue::Numeric(12.0)).unwrap(),
        serde_json::json!({ "Numeric": 12.0 })
    );
    assert_eq!(
        serde_json::to_value(LineValue::Unit {
            amount: 5.0,
            unit: "km".into()
        })
        .unwrap(),
        serde_json::json!({ "Unit": { "amount": 5.0, "unit": "km" } })
    );
    assert_eq!(
        serde_json::to_value(LineValue::None).unwrap(),
        serde_json::json!("None")
    );
}

#[test]
fn test_options_from_file_drive_the_solver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.json");
    std::fs::write(&path, r#"{ "precision": 3, "passthrough": true }"#).unwrap();

    let options = SolverOptions::from_path(&path).unwrap();
    let solver = Solver::new(options).unwrap();
    let ledger = solver.solve_block("2 / 3");
    assert_eq!(ledger.value(0), Some(&LineValue::Numeric(0.667)));
}
