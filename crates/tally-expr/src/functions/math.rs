//! Math functions

use super::{finite, number_arg};
use crate::error::{ExprError, ExprResult};
use crate::evaluator::Value;

/// Apply `f` to a number, or to a quantity's magnitude keeping its unit
fn map_magnitude(args: &[Value], function: &str, f: impl Fn(f64) -> f64) -> ExprResult<Value> {
    match args.first() {
        Some(Value::Number(n)) => Ok(Value::Number(f(*n))),
        Some(Value::Unit(q)) => Ok(Value::Unit(q.with_amount(f(q.amount)))),
        _ => Err(ExprError::Evaluation(format!("{} expects a number", function))),
    }
}

/// ABS(x)
pub fn fn_abs(args: &[Value]) -> ExprResult<Value> {
    map_magnitude(args, "abs", f64::abs)
}

/// FLOOR(x)
pub fn fn_floor(args: &[Value]) -> ExprResult<Value> {
    map_magnitude(args, "floor", f64::floor)
}

/// CEIL(x)
pub fn fn_ceil(args: &[Value]) -> ExprResult<Value> {
    map_magnitude(args, "ceil", f64::ceil)
}

/// FIX(x) - round towards zero
pub fn fn_fix(args: &[Value]) -> ExprResult<Value> {
    map_magnitude(args, "fix", f64::trunc)
}

/// ROUND(x, decimals) - half away from zero
pub fn fn_round(args: &[Value]) -> ExprResult<Value> {
    let decimals = if args.len() > 1 {
        number_arg(args, 1, "round")?.trunc() as i32
    } else {
        0
    };
    let factor = 10f64.powi(decimals);
    map_magnitude(args, "round", |n| (n * factor).round() / factor)
}

/// SIGN(x)
pub fn fn_sign(args: &[Value]) -> ExprResult<Value> {
    let n = number_arg(args, 0, "sign")?;
    Ok(Value::Number(if n > 0.0 {
        1.0
    } else if n < 0.0 {
        -1.0
    } else {
        0.0
    }))
}

/// SQRT(x)
pub fn fn_sqrt(args: &[Value]) -> ExprResult<Value> {
    let n = number_arg(args, 0, "sqrt")?;
    if n < 0.0 {
        return Err(ExprError::Evaluation(
            "sqrt of a negative number".into(),
        ));
    }
    Ok(Value::Number(n.sqrt()))
}

/// CBRT(x)
pub fn fn_cbrt(args: &[Value]) -> ExprResult<Value> {
    Ok(Value::Number(number_arg(args, 0, "cbrt")?.cbrt()))
}

/// EXP(x)
pub fn fn_exp(args: &[Value]) -> ExprResult<Value> {
    finite(number_arg(args, 0, "exp")?.exp(), "exp")
}

/// LOG(x) natural logarithm, or LOG(x, base)
pub fn fn_log(args: &[Value]) -> ExprResult<Value> {
    let n = number_arg(args, 0, "log")?;
    let result = if args.len() > 1 {
        n.log(number_arg(args, 1, "log")?)
    } else {
        n.ln()
    };
    finite(result, "log")
}

/// LOG10(x)
pub fn fn_log10(args: &[Value]) -> ExprResult<Value> {
    finite(number_arg(args, 0, "log10")?.log10(), "log10")
}

/// LOG2(x)
pub fn fn_log2(args: &[Value]) -> ExprResult<Value> {
    finite(number_arg(args, 0, "log2")?.log2(), "log2")
}

/// POW(x, y)
pub fn fn_pow(args: &[Value]) -> ExprResult<Value> {
    let base = number_arg(args, 0, "pow")?;
    let exponent = number_arg(args, 1, "pow")?;
    finite(base.powf(exponent), "pow")
}

/// MOD(x, y) - result takes the sign of the divisor
pub fn fn_mod(args: &[Value]) -> ExprResult<Value> {
    let n = number_arg(args, 0, "mod")?;
    let d = number_arg(args, 1, "mod")?;
    if d == 0.0 {
        return Err(ExprError::Evaluation("Division by zero".into()));
    }
    Ok(Value::Number(n - d * (n / d).floor()))
}

/// MIN(a, b, ...)
pub fn fn_min(args: &[Value]) -> ExprResult<Value> {
    fold_numbers(args, "min", f64::min)
}

/// MAX(a, b, ...)
pub fn fn_max(args: &[Value]) -> ExprResult<Value> {
    fold_numbers(args, "max", f64::max)
}

fn fold_numbers(args: &[Value], function: &str, f: fn(f64, f64) -> f64) -> ExprResult<Value> {
    let mut acc: Option<f64> = None;
    for index in 0..args.len() {
        let n = number_arg(args, index, function)?;
        acc = Some(acc.map_or(n, |a| f(a, n)));
    }
    acc.map(Value::Number)
        .ok_or_else(|| ExprError::Evaluation(format!("{} expects a number", function)))
}
