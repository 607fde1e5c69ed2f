//! Parser for predicate expressions
//!
//! Recursive descent with precedence climbing for binary operators.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::PredicateError;
use super::lexer::{Lexer, Token, TokenKind};

// ============================================================================
// AST
// ============================================================================

/// Literal value in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal that fits `i64`.
    Int(i64),
    /// Any other numeric literal.
    Decimal(Decimal),
    /// Quoted string.
    Text(String),
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEqual,
    /// `=~` / `matches`
    Matches,
    /// `&&` / `and`
    And,
    /// `||` / `or`
    Or,
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value.
    Literal(Literal),
    /// Field of the record under validation.
    Field(String),
    /// Field of a nested record: `address.city`.
    Property {
        /// Expression yielding the record.
        object: Box<Expr>,
        /// Field name.
        name: String,
    },
    /// Function or method call. `receiver` is `None` for calls on the
    /// record under validation (and for built-ins).
    Call {
        /// Expression yielding the record the method is called on.
        receiver: Option<Box<Expr>>,
        /// Method name.
        name: String,
        /// Arguments.
        args: Vec<Expr>,
    },
    /// `!expr`
    Not(Box<Expr>),
    /// `-expr`
    Negate(Box<Expr>),
    /// `left op right`
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
}

/// Parses an expression string into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, PredicateError> {
    let tokens = Lexer::new(input).tokenize()?;
    Parser::new(tokens).parse()
}

// ============================================================================
// PARSER
// ============================================================================

/// Parser over a token stream.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser. `tokens` must end with [`TokenKind::Eof`].
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the whole token stream as one expression.
    pub fn parse(&mut self) -> Result<Expr, PredicateError> {
        let expr = self.parse_binary_expression(0)?;
        if self.current().kind != TokenKind::Eof {
            return Err(self.unexpected("end of expression"));
        }
        Ok(expr)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, PredicateError> {
        let mut left = self.parse_unary_expression()?;

        while let Some(precedence) = self.current().kind.precedence() {
            if precedence < min_precedence {
                break;
            }
            let op = match self.current().kind {
                TokenKind::Equal => BinaryOp::Equal,
                TokenKind::NotEqual => BinaryOp::NotEqual,
                TokenKind::LessThan => BinaryOp::LessThan,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::GreaterThan => BinaryOp::GreaterThan,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                TokenKind::Matches => BinaryOp::Matches,
                TokenKind::And => BinaryOp::And,
                TokenKind::Or => BinaryOp::Or,
                _ => return Err(self.unexpected("operator")),
            };
            self.advance();

            let right = self.parse_binary_expression(precedence + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expr, PredicateError> {
        match self.current().kind {
            TokenKind::Not => {
                self.advance();
                Ok(Expr::Not(Box::new(self.parse_unary_expression()?)))
            }
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::Negate(Box::new(self.parse_unary_expression()?)))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> Result<Expr, PredicateError> {
        let mut expr = self.parse_primary_expression()?;

        while self.current().kind == TokenKind::Dot {
            self.advance();
            let TokenKind::Identifier(name) = self.current().kind else {
                return Err(self.unexpected("property name after '.'"));
            };
            let name = name.to_string();
            self.advance();

            expr = if self.current().kind == TokenKind::LeftParen {
                Expr::Call {
                    receiver: Some(Box::new(expr)),
                    name,
                    args: self.parse_arguments()?,
                }
            } else {
                Expr::Property {
                    object: Box::new(expr),
                    name,
                }
            };
        }

        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> Result<Expr, PredicateError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number(raw) => {
                self.advance();
                let literal = match raw.parse::<i64>() {
                    Ok(n) => Literal::Int(n),
                    Err(_) => Decimal::from_str(raw).map(Literal::Decimal).map_err(|e| {
                        PredicateError::syntax(token.position, format!("invalid number '{raw}': {e}"))
                    })?,
                };
                Ok(Expr::Literal(literal))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::Text(s)))
            }
            TokenKind::Boolean(b) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(b)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Identifier(name) if !name.is_empty() => {
                self.advance();
                if self.current().kind == TokenKind::LeftParen {
                    Ok(Expr::Call {
                        receiver: None,
                        name: name.to_string(),
                        args: self.parse_arguments()?,
                    })
                } else {
                    Ok(Expr::Field(name.to_string()))
                }
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_binary_expression(0)?;
                self.expect(&TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, PredicateError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let mut args = Vec::new();
        if self.current().kind == TokenKind::RightParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_binary_expression(0)?);
            match self.current().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RightParen => {
                    self.advance();
                    return Ok(args);
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
    }

    fn current(&self) -> &Token<'a> {
        // The stream always ends with Eof, and advance never moves past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn expect(&mut self, kind: &TokenKind<'a>, what: &str) -> Result<(), PredicateError> {
        if &self.current().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> PredicateError {
        let token = self.current();
        let found = match &token.kind {
            TokenKind::Eof => "end of input".to_string(),
            other => format!("{other:?}"),
        };
        PredicateError::syntax(token.position, format!("expected {expected}, found {found}"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
