//! Built-in functions

pub mod math;
pub mod trig;

use crate::error::{ExprError, ExprResult};
use crate::evaluator::Value;
use ahash::AHashMap;

/// Function implementation signature
pub type FunctionImpl = fn(&[Value]) -> ExprResult<Value>;

/// Function definition
pub struct FunctionDef {
    /// Function name (lowercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<&'static str, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_math_functions();
        registry.register_trig_functions();

        registry
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name.to_lowercase().as_str())
    }

    /// Whether `name` is a registered function (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of every registered function, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    fn register_fixed(&mut self, name: &'static str, arity: usize, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: arity,
            max_args: Some(arity),
            implementation,
        });
    }

    fn register_math_functions(&mut self) {
        self.register_fixed("abs", 1, math::fn_abs);
        self.register_fixed("sqrt", 1, math::fn_sqrt);
        self.register_fixed("cbrt", 1, math::fn_cbrt);
        self.register_fixed("floor", 1, math::fn_floor);
        self.register_fixed("ceil", 1, math::fn_ceil);
        self.register_fixed("fix", 1, math::fn_fix);
        self.register_fixed("sign", 1, math::fn_sign);
        self.register_fixed("exp", 1, math::fn_exp);
        self.register_fixed("log10", 1, math::fn_log10);
        self.register_fixed("log2", 1, math::fn_log2);
        self.register_fixed("pow", 2, math::fn_pow);
        self.register_fixed("mod", 2, math::fn_mod);

        // ROUND(x) or ROUND(x, decimals)
        self.register(FunctionDef {
            name: "round",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_round,
        });

        // LOG(x) natural log, LOG(x, base)
        self.register(FunctionDef {
            name: "log",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_log,
        });

        self.register(FunctionDef {
            name: "min",
            min_args: 1,
            max_args: None,
            implementation: math::fn_min,
        });

        self.register(FunctionDef {
            name: "max",
            min_args: 1,
            max_args: None,
            implementation: math::fn_max,
        });
    }

    fn register_trig_functions(&mut self) {
        self.register_fixed("sin", 1, trig::fn_sin);
        self.register_fixed("cos", 1, trig::fn_cos);
        self.register_fixed("tan", 1, trig::fn_tan);
        self.register_fixed("asin", 1, trig::fn_asin);
        self.register_fixed("acos", 1, trig::fn_acos);
        self.register_fixed("atan", 1, trig::fn_atan);
        self.register_fixed("atan2", 2, trig::fn_atan2);
        self.register_fixed("sinh", 1, trig::fn_sinh);
        self.register_fixed("cosh", 1, trig::fn_cosh);
        self.register_fixed("tanh", 1, trig::fn_tanh);
    }
}

/// Extract a plain number argument
pub(crate) fn number_arg(args: &[Value], index: usize, function: &str) -> ExprResult<f64> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::Unit(q)) => Err(ExprError::UnitMismatch(format!(
            "{} expects a number, got unit {}",
            function, q.unit
        ))),
        Some(Value::None) | None => Err(ExprError::Evaluation(format!(
            "{} expects a number",
            function
        ))),
    }
}

/// Reject results that are not finite numbers
pub(crate) fn finite(value: f64, function: &str) -> ExprResult<Value> {
    if value.is_finite() {
        Ok(Value::Number(value))
    } else {
        Err(ExprError::Evaluation(format!(
            "{} produced a value outside its domain",
            function
        )))
    }
}
