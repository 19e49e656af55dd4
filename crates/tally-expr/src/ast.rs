//! Expression Abstract Syntax Tree types

/// A parsed line: either a bare expression or a binding
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `expr`
    Expr(Expr),
    /// `name = expr`
    Assign { name: String, value: Expr },
}

/// Expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// Numeric literal with an attached unit, e.g. `5 km`
    Quantity { amount: Box<Expr>, unit: String },

    // === References ===
    /// Variable, constant, or bare unit name
    Symbol(String),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// Unit conversion, `expr in unit` / `expr to unit`
    Convert { value: Box<Expr>, unit: String },

    // === Function call ===
    Function { name: String, args: Vec<Expr> },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Percent,
}

impl Expr {
    /// Collect every symbol name the expression reads, in source order
    pub fn symbols(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => out.push(name),
            Expr::Quantity { amount, .. } => amount.collect_symbols(out),
            Expr::BinaryOp { left, right, .. } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
            Expr::UnaryOp { operand, .. } => operand.collect_symbols(out),
            Expr::Convert { value, .. } => value.collect_symbols(out),
            Expr::Function { args, .. } => {
                for arg in args {
                    arg.collect_symbols(out);
                }
            }
        }
    }
}
