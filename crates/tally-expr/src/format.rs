//! Rounding and display formatting

use crate::evaluator::Value;

/// Significant digits used when no precision is configured for display
pub const DISPLAY_PRECISION: u32 = 14;

/// Round `value` to `precision` significant digits
///
/// A precision of zero leaves the value untouched, as do non-finite values.
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    if precision == 0 || value == 0.0 || !value.is_finite() {
        return value;
    }
    let digits = (precision - 1) as usize;
    format!("{:.*e}", digits, value).parse().unwrap_or(value)
}

/// Round a value's magnitude, keeping its unit
pub fn round_value(value: &Value, precision: u32) -> Value {
    match value {
        Value::Number(n) => Value::Number(round_to_precision(*n, precision)),
        Value::Unit(q) => Value::Unit(q.with_amount(round_to_precision(q.amount, precision))),
        Value::None => Value::None,
    }
}

/// Format a number for display: integers without a fraction, everything else
/// rounded to [`DISPLAY_PRECISION`] significant digits
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let rounded = round_to_precision(n, DISPLAY_PRECISION);
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Format a value for display (`12`, `5 km`, empty for no value)
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::Unit(q) => format!("{} {}", format_number(q.amount), q.unit),
        Value::None => String::new(),
    }
}

/// Format a ratio as a percentage (`0.5` → `50%`)
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", format_number(ratio * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Quantity;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(11.000000000000002, 14), 11.0);
        assert_eq!(round_to_precision(3.14159, 3), 3.14);
        assert_eq!(round_to_precision(123456.0, 2), 120000.0);
        assert_eq!(round_to_precision(0.000123456, 2), 0.00012);
        assert_eq!(round_to_precision(-2.5551, 3), -2.56);
        assert_eq!(round_to_precision(7.25, 0), 7.25);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Number(4000.0)), "4000");
        assert_eq!(
            format_value(&Value::Unit(Quantity::new(5.0, "km"))),
            "5 km"
        );
        assert_eq!(format_value(&Value::None), "");
        assert_eq!(format_percent(0.5), "50%");
    }

    #[test]
    fn test_round_value_keeps_unit() {
        let rounded = round_value(&Value::Unit(Quantity::new(1.23456, "kg")), 3);
        assert_eq!(rounded, Value::Unit(Quantity::new(1.23, "kg")));
    }
}
