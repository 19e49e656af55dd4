//! Trigonometric and hyperbolic functions (radians)

use super::{finite, number_arg};
use crate::error::ExprResult;
use crate::evaluator::Value;

macro_rules! unary_trig {
    ($($fn_name:ident => $name:literal, $method:ident;)*) => {
        $(
            #[doc = concat!(stringify!($method), "(x)")]
            pub fn $fn_name(args: &[Value]) -> ExprResult<Value> {
                finite(number_arg(args, 0, $name)?.$method(), $name)
            }
        )*
    };
}

unary_trig! {
    fn_sin => "sin", sin;
    fn_cos => "cos", cos;
    fn_tan => "tan", tan;
    fn_asin => "asin", asin;
    fn_acos => "acos", acos;
    fn_atan => "atan", atan;
    fn_sinh => "sinh", sinh;
    fn_cosh => "cosh", cosh;
    fn_tanh => "tanh", tanh;
}

/// ATAN2(y, x)
pub fn fn_atan2(args: &[Value]) -> ExprResult<Value> {
    let y = number_arg(args, 0, "atan2")?;
    let x = number_arg(args, 1, "atan2")?;
    Ok(Value::Number(y.atan2(x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(value: Value, expected: f64) {
        let n = value.as_number().expect("number");
        assert!((n - expected).abs() < 1e-12, "expected {}, got {}", expected, n);
    }

    #[test]
    fn test_trig_functions() {
        approx(fn_sin(&[Value::Number(0.0)]).unwrap(), 0.0);
        approx(fn_cos(&[Value::Number(0.0)]).unwrap(), 1.0);
        approx(
            fn_atan2(&[Value::Number(1.0), Value::Number(1.0)]).unwrap(),
            std::f64::consts::FRAC_PI_4,
        );
    }

    #[test]
    fn test_inverse_trig_domain() {
        assert!(fn_asin(&[Value::Number(2.0)]).is_err());
    }
}
