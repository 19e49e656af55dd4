//! Expression evaluator
//!
//! Evaluates expression ASTs against a [`Scope`] of named values.

use crate::ast::{BinaryOperator, Expr, Statement, UnaryOperator};
use crate::error::{ExprError, ExprResult};
use crate::functions::FunctionRegistry;
use crate::parser::parse_statement;
use crate::units::{self, Dimension};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The built-in function registry
pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Named constants, resolved when a symbol is not bound in the scope
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("PI", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("E", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
];

/// A magnitude with a physical unit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    pub amount: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }

    /// Same unit, different magnitude
    pub fn with_amount(&self, amount: f64) -> Self {
        Self::new(amount, self.unit.clone())
    }

    /// Convert into another unit of the same dimension
    pub fn to(&self, unit: &str) -> ExprResult<Quantity> {
        let amount = units::convert(self.amount, &self.unit, unit)?;
        let canonical = units::resolve(unit)?.name;
        Ok(Quantity::new(amount, canonical))
    }

    fn dimension(&self) -> ExprResult<Dimension> {
        Ok(units::resolve(&self.unit)?.dimension)
    }
}

/// Value types produced by evaluation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Number(f64),
    Unit(Quantity),
    /// No value: empty expressions and rows that produced nothing
    None,
}

impl Value {
    /// The plain number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The magnitude of a number or quantity
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Unit(q) => Some(q.amount),
            Value::None => None,
        }
    }

    /// Whether this value carries a unit
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit(_))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Unit(_) => "unit",
            Value::None => "empty value",
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Unit(q)
    }
}

/// Named values visible to an evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    values: BTreeMap<String, Value>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Consume the scope, yielding its bindings
    pub fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }

    fn resolve(&self, name: &str) -> ExprResult<Value> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }
        if let Some((_, n)) = CONSTANTS.iter().find(|(c, _)| *c == name) {
            return Ok(Value::Number(*n));
        }
        if let Some(unit) = units::lookup(name) {
            return Ok(Value::Unit(Quantity::new(1.0, unit.name)));
        }
        Err(ExprError::UndefinedSymbol(name.to_string()))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Evaluate an ordered list of expressions, threading assignments through
/// `scope`
///
/// Blank entries evaluate to [`Value::None`]. The first syntax or reference
/// error aborts the whole batch.
///
/// # Example
/// ```rust
/// use tally_expr::{evaluate_all, Scope, Value};
///
/// let mut scope = Scope::new();
/// let values = evaluate_all(&["x = 4 + 2", "", "x * 2"], &mut scope).unwrap();
/// assert_eq!(values, vec![Value::Number(6.0), Value::None, Value::Number(12.0)]);
/// ```
pub fn evaluate_all<S: AsRef<str>>(expressions: &[S], scope: &mut Scope) -> ExprResult<Vec<Value>> {
    let mut results = Vec::with_capacity(expressions.len());
    for (index, text) in expressions.iter().enumerate() {
        let text = text.as_ref().trim();
        if text.is_empty() {
            results.push(Value::None);
            continue;
        }
        let statement = parse_statement(text)?;
        let value = evaluate_statement(&statement, scope)?;
        tracing::trace!(index, expression = text, ?value, "evaluated");
        results.push(value);
    }
    Ok(results)
}

/// Evaluate a single line of text in `scope`
pub fn evaluate_str(text: &str, scope: &mut Scope) -> ExprResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::None);
    }
    let statement = parse_statement(text)?;
    evaluate_statement(&statement, scope)
}

/// Evaluate a statement; assignments bind into `scope` and yield the bound value
pub fn evaluate_statement(statement: &Statement, scope: &mut Scope) -> ExprResult<Value> {
    match statement {
        Statement::Expr(expr) => evaluate(expr, scope),
        Statement::Assign { name, value } => {
            let value = evaluate(value, scope)?;
            scope.set(name.clone(), value.clone());
            Ok(value)
        }
    }
}

/// Evaluate an expression
pub fn evaluate(expr: &Expr, scope: &Scope) -> ExprResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),

        Expr::Quantity { amount, unit } => match evaluate(amount, scope)? {
            Value::Number(n) => {
                let def = units::resolve(unit)?;
                Ok(Value::Unit(Quantity::new(n, def.name)))
            }
            other => Err(ExprError::UnitMismatch(format!(
                "Cannot attach unit {} to {}",
                unit,
                other.type_name()
            ))),
        },

        Expr::Symbol(name) => scope.resolve(name),

        Expr::BinaryOp { op, left, right } => {
            let left = evaluate(left, scope)?;
            let right = evaluate(right, scope)?;
            evaluate_binary_op(*op, left, right)
        }

        Expr::UnaryOp { op, operand } => evaluate_unary_op(*op, evaluate(operand, scope)?),

        Expr::Convert { value, unit } => match evaluate(value, scope)? {
            Value::Unit(q) => Ok(Value::Unit(q.to(unit)?)),
            other => Err(ExprError::UnitMismatch(format!(
                "Cannot convert {} to {}",
                other.type_name(),
                unit
            ))),
        },

        Expr::Function { name, args } => evaluate_function(name, args, scope),
    }
}

fn mismatch(verb: &str, left: &Value, right: &Value) -> ExprError {
    ExprError::UnitMismatch(format!(
        "Cannot {} {} and {}",
        verb,
        left.type_name(),
        right.type_name()
    ))
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, left: Value, right: Value) -> ExprResult<Value> {
    if left.is_none() || right.is_none() {
        return Err(ExprError::Evaluation(
            "Cannot use an empty value in arithmetic".into(),
        ));
    }

    match op {
        BinaryOperator::Add | BinaryOperator::Subtract => {
            let sign = if op == BinaryOperator::Add { 1.0 } else { -1.0 };
            match (&left, &right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + sign * r)),
                (Value::Unit(l), Value::Unit(r)) => {
                    let r = r.to(&l.unit)?;
                    Ok(Value::Unit(l.with_amount(l.amount + sign * r.amount)))
                }
                _ => Err(mismatch(
                    if sign > 0.0 { "add" } else { "subtract" },
                    &left,
                    &right,
                )),
            }
        }

        BinaryOperator::Multiply => match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l * r)),
            (Value::Unit(q), Value::Number(n)) | (Value::Number(n), Value::Unit(q)) => {
                Ok(Value::Unit(q.with_amount(q.amount * n)))
            }
            (Value::Unit(l), Value::Unit(r)) => {
                let square = match (l.dimension()?, r.dimension()?) {
                    (Dimension::Length, Dimension::Length) => units::resolve(&l.unit)?.square,
                    _ => None,
                };
                match square {
                    Some(area) => {
                        let r = r.to(&l.unit)?;
                        Ok(Value::Unit(Quantity::new(l.amount * r.amount, area)))
                    }
                    None => Err(mismatch("multiply", &left, &right)),
                }
            }
            _ => Err(mismatch("multiply", &left, &right)),
        },

        BinaryOperator::Divide => match (&left, &right) {
            (_, Value::Number(r)) if *r == 0.0 => {
                Err(ExprError::Evaluation("Division by zero".into()))
            }
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l / r)),
            (Value::Unit(q), Value::Number(n)) => Ok(Value::Unit(q.with_amount(q.amount / n))),
            (Value::Unit(l), Value::Unit(r)) => divide_quantities(l, r),
            _ => Err(mismatch("divide", &left, &right)),
        },

        BinaryOperator::Power => match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => {
                let result = l.powf(*r);
                if result.is_finite() {
                    Ok(Value::Number(result))
                } else {
                    Err(ExprError::Evaluation(format!("{}^{} is not a finite number", l, r)))
                }
            }
            (Value::Unit(q), Value::Number(r)) if *r == 2.0 => {
                evaluate_binary_op(BinaryOperator::Multiply, left.clone(), Value::Unit(q.clone()))
            }
            _ => Err(mismatch("raise", &left, &right)),
        },
    }
}

fn divide_quantities(l: &Quantity, r: &Quantity) -> ExprResult<Value> {
    let (ld, rd) = (l.dimension()?, r.dimension()?);
    if r.amount == 0.0 {
        return Err(ExprError::Evaluation("Division by zero".into()));
    }
    if ld == rd {
        let r = r.to(&l.unit)?;
        return Ok(Value::Number(l.amount / r.amount));
    }
    if ld == Dimension::Area && rd == Dimension::Length {
        let area = l.to(units::base_unit(Dimension::Area))?;
        let length = r.to(units::base_unit(Dimension::Length))?;
        return Ok(Value::Unit(Quantity::new(
            area.amount / length.amount,
            units::base_unit(Dimension::Length),
        )));
    }
    Err(ExprError::UnitMismatch(format!(
        "Cannot divide {} by {}",
        l.unit, r.unit
    )))
}

/// Evaluate a unary operation
fn evaluate_unary_op(op: UnaryOperator, value: Value) -> ExprResult<Value> {
    match (op, value) {
        (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOperator::Negate, Value::Unit(q)) => Ok(Value::Unit(q.with_amount(-q.amount))),
        (UnaryOperator::Percent, Value::Number(n)) => Ok(Value::Number(n / 100.0)),
        (UnaryOperator::Percent, Value::Unit(q)) => Err(ExprError::UnitMismatch(format!(
            "Cannot take a percentage of unit {}",
            q.unit
        ))),
        (_, Value::None) => Err(ExprError::Evaluation(
            "Cannot use an empty value in arithmetic".into(),
        )),
    }
}

/// Evaluate a function call
fn evaluate_function(name: &str, args: &[Expr], scope: &Scope) -> ExprResult<Value> {
    let registry = function_registry();

    let func = registry
        .get(name)
        .ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;

    // Check argument count
    if args.len() < func.min_args {
        return Err(ExprError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(ExprError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: args.len(),
            });
        }
    }

    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        evaluated_args.push(evaluate(arg, scope)?);
    }

    (func.implementation)(&evaluated_args)
}
