//! Property tests: re-solving is deterministic and failures stay on their row

use proptest::prelude::*;
use tally::prelude::*;

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..10_000).prop_map(|n| n.to_string()),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{} + {}", a, b)),
        (1u32..50).prop_map(|n| format!("{}k", n)),
        (1u32..100).prop_map(|n| format!("100 + {}%", n)),
        (0u32..100).prop_map(|n| format!("x = {}", n)),
        prop::sample::select(vec!["x * 2", "subtotal", "total", "# note", "label:", "2 4 6", ""])
            .prop_map(str::to_string),
        "[a-z ]{0,12}",
    ]
}

fn solve(lines: &[String]) -> Ledger {
    let mut ledger = Ledger::new();
    for (row, line) in lines.iter().enumerate() {
        ledger = parse(line, row, ledger);
    }
    ledger
}

proptest! {
    #[test]
    fn solving_twice_gives_identical_ledgers(lines in prop::collection::vec(line_strategy(), 0..20)) {
        prop_assert_eq!(solve(&lines), solve(&lines));
    }

    #[test]
    fn every_row_is_mirrored(lines in prop::collection::vec(line_strategy(), 1..20)) {
        let ledger = solve(&lines);
        prop_assert_eq!(ledger.row_count(), lines.len());
        for line in ledger.lines() {
            prop_assert_eq!(
                ledger.variable(&Ledger::row_variable(line.row)),
                Some(&line.value)
            );
        }
    }

    #[test]
    fn errors_stay_on_their_row(
        before in prop::collection::vec(line_strategy(), 0..10),
        after in 0u32..1000,
    ) {
        let mut lines = before;
        lines.push("2 4 6".to_string());
        lines.push(after.to_string());
        let ledger = solve(&lines);

        let failed = ledger.line(lines.len() - 2).unwrap();
        prop_assert!(failed.is_error());
        prop_assert_eq!(failed.expression.as_str(), "");

        let last = ledger.line(lines.len() - 1).unwrap();
        prop_assert_eq!(&last.value, &LineValue::Numeric(after as f64));
    }

    #[test]
    fn aggregates_are_never_numbers(lines in prop::collection::vec(line_strategy(), 1..20)) {
        let ledger = solve(&lines);
        for (line, text) in ledger.lines().iter().zip(&lines) {
            if text == "subtotal" || text == "total" {
                prop_assert_ne!(line.kind, ResultKind::Number);
            }
        }
    }
}
