//! Expression parser
//!
//! A recursive descent parser for ledger expressions with proper operator
//! precedence, implicit unit suffixes (`5 km`) and unit conversion
//! (`5 km in m`).

use crate::ast::{BinaryOperator, Expr, Statement, UnaryOperator};
use crate::error::{ExprError, ExprResult};
use crate::units;

/// Parse a single expression
///
/// # Example
/// ```rust
/// use tally_expr::parse_expression;
///
/// let ast = parse_expression("1 + 2").unwrap();
/// let ast = parse_expression("sqrt(16) * 2").unwrap();
/// let ast = parse_expression("5 km in m").unwrap();
/// ```
pub fn parse_expression(input: &str) -> ExprResult<Expr> {
    let mut parser = ExprParser::new(input);
    let expr = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse a statement: an expression, or `name = expression`
pub fn parse_statement(input: &str) -> ExprResult<Statement> {
    let mut parser = ExprParser::new(input);
    let statement = parser.parse_statement()?;
    parser.expect_end()?;
    Ok(statement)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Equal,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    /// Character with no meaning in the grammar
    Unknown(char),

    // End of input
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Identifier(name) => format!("symbol {}", name),
            Token::Plus => "operator +".into(),
            Token::Minus => "operator -".into(),
            Token::Star => "operator *".into(),
            Token::Slash => "operator /".into(),
            Token::Caret => "operator ^".into(),
            Token::Percent => "operator %".into(),
            Token::Equal => "operator =".into(),
            Token::Comma => "separator ,".into(),
            Token::LeftParen => "parenthesis (".into(),
            Token::RightParen => "parenthesis )".into(),
            Token::Unknown(c) => format!("character {}", c),
            Token::Eof => "end of expression".into(),
        }
    }
}

/// Deepest chain of prefix operators, parentheses or powers accepted
const MAX_NESTING: usize = 100;

/// Expression parser
struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    /// Byte offset where `current_token` starts
    token_start: usize,
    current_token: Option<Token>,
    /// Open `parse_unary` frames; every nested construct passes through it
    depth: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: None,
            depth: 0,
        };
        parser.advance_token();
        parser
    }

    // === Token scanning ===

    fn advance_token(&mut self) {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = Some(self.scan_token());
    }

    fn scan_token(&mut self) -> Token {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Token::Eof,
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '%' => Some(Token::Percent),
            '=' => Some(Token::Equal),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return token;
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_alphabetic() || c == '_' {
            return self.scan_identifier();
        }

        self.advance();
        Token::Unknown(c)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part, only when digits follow so `2e` stays `2` then `e`
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let signed = self
                .peek_char_at(1)
                .map_or(false, |c| c == '+' || c == '-');
            let digit_at = if signed { 2 } else { 1 };
            if self
                .peek_char_at(digit_at)
                .map_or(false, |c| c.is_ascii_digit())
            {
                for _ in 0..digit_at {
                    self.advance();
                }
                while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let num_str = &self.input[start..self.pos];
        Token::Number(num_str.parse().unwrap_or(0.0))
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Token::Identifier(self.input[start..self.pos].to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> Token {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token();
        token
    }

    /// 1-based character column of the current token
    fn column(&self) -> usize {
        self.input[..self.token_start].chars().count() + 1
    }

    fn unexpected(&self) -> ExprError {
        ExprError::syntax(
            format!("Unexpected {}", self.current_token().describe()),
            self.column(),
        )
    }

    fn expect(&mut self, expected: &Token) -> ExprResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(ExprError::syntax(
                format!(
                    "Expected {} but found {}",
                    expected.describe(),
                    self.current_token().describe()
                ),
                self.column(),
            ))
        }
    }

    fn expect_end(&self) -> ExprResult<()> {
        if matches!(self.current_token(), Token::Eof) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn current_unit(&self) -> Option<String> {
        match self.current_token() {
            Token::Identifier(name) if units::is_unit(name) && self.peek_char() != Some('(') => {
                Some(name.clone())
            }
            _ => None,
        }
    }

    // === Statement ===

    fn parse_statement(&mut self) -> ExprResult<Statement> {
        if let Token::Identifier(name) = self.current_token().clone() {
            let saved = (self.pos, self.token_start);
            self.consume();
            if matches!(self.current_token(), Token::Equal) {
                self.consume();
                let value = self.parse_expression()?;
                return Ok(Statement::Assign { name, value });
            }
            // Not a binding; rewind to the identifier
            self.pos = saved.0;
            self.token_start = saved.1;
            self.current_token = Some(Token::Identifier(name));
        }
        Ok(Statement::Expr(self.parse_expression()?))
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Conversion: in, to
    // 2. Addition/Subtraction: +, -
    // 3. Multiplication/Division: *, /
    // 4. Unary: -, +
    // 5. Exponentiation: ^
    // 6. Postfix: %, unit suffix
    // 7. Primary: literals, symbols, function calls, parentheses

    fn parse_expression(&mut self) -> ExprResult<Expr> {
        self.parse_conversion()
    }

    fn parse_conversion(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_additive()?;

        while let Token::Identifier(keyword) = self.current_token() {
            if !units::CONVERSION_KEYWORDS.contains(&keyword.as_str()) {
                break;
            }
            self.consume();
            let unit = match self.current_token().clone() {
                Token::Identifier(unit) if units::is_unit(&unit) => unit,
                _ => {
                    return Err(ExprError::syntax(
                        format!("Expected unit but found {}", self.current_token().describe()),
                        self.column(),
                    ))
                }
            };
            self.consume();
            left = Expr::Convert {
                value: Box::new(left),
                unit,
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ExprResult<Expr> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::syntax(
                format!("Expression nested too deeply (limit {})", MAX_NESTING),
                self.column(),
            ));
        }
        self.depth += 1;
        let result = self.parse_unary_nested();
        self.depth -= 1;
        result
    }

    fn parse_unary_nested(&mut self) -> ExprResult<Expr> {
        if matches!(self.current_token(), Token::Minus) {
            self.consume();
            let operand = self.parse_unary()?;
            return Ok(Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.consume();
            return self.parse_unary();
        }

        self.parse_exponent()
    }

    fn parse_exponent(&mut self) -> ExprResult<Expr> {
        let left = self.parse_postfix()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume();
            let right = self.parse_unary()?; // Right associative
            return Ok(Expr::BinaryOp {
                op: BinaryOperator::Power,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_postfix(&mut self) -> ExprResult<Expr> {
        let mut expr = self.parse_primary()?;

        if let Some(unit) = self.current_unit() {
            self.consume();
            expr = Expr::Quantity {
                amount: Box::new(expr),
                unit,
            };
        }

        while matches!(self.current_token(), Token::Percent) {
            self.consume();
            expr = Expr::UnaryOp {
                op: UnaryOperator::Percent,
                operand: Box::new(expr),
            };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ExprResult<Expr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume();
                Ok(Expr::Number(n))
            }

            Token::LeftParen => {
                self.consume();
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::Identifier(name) => {
                if units::CONVERSION_KEYWORDS.contains(&name.as_str()) {
                    return Err(self.unexpected());
                }
                self.consume();
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(Expr::Symbol(name))
                }
            }

            _ => Err(self.unexpected()),
        }
    }

    fn parse_function_call(&mut self, name: String) -> ExprResult<Expr> {
        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;

        Ok(Expr::Function {
            name: name.to_lowercase(),
            args,
        })
    }
}
