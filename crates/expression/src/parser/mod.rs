//! Recursive-descent parser with precedence climbing for binary operators.

use crate::core::ast::{BinaryOp, Expr};
use crate::core::error::{ExpressionErrorExt, ExpressionResult};
use crate::lexer::Token;
use crate::ExpressionError;
use serde_json::Value;
use std::sync::Arc;

/// Maximum recursion depth while descending through the grammar.
const MAX_PARSER_DEPTH: usize = 256;

/// Parses a [`Token`] stream into an [`Expr`] AST.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a parser over an already-tokenized stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    /// Parse the full token stream into a single expression.
    pub fn parse(&mut self) -> ExpressionResult<Expr> {
        self.parse_expression(0)
    }

    fn parse_expression(&mut self, depth: usize) -> ExpressionResult<Expr> {
        self.check_depth(depth)?;
        self.parse_conditional(depth)
    }

    fn check_depth(&self, depth: usize) -> ExpressionResult<()> {
        if depth > MAX_PARSER_DEPTH {
            Err(ExpressionError::expression_parse_error(format!(
                "maximum parser recursion depth ({MAX_PARSER_DEPTH}) exceeded"
            )))
        } else {
            Ok(())
        }
    }

    fn parse_conditional(&mut self, depth: usize) -> ExpressionResult<Expr> {
        if self.match_token(&Token::If) {
            let condition = Box::new(self.parse_pipeline(depth + 1)?);
            self.expect(Token::Then)?;
            let then_expr = Box::new(self.parse_pipeline(depth + 1)?);
            self.expect(Token::Else)?;
            let else_expr = Box::new(self.parse_pipeline(depth + 1)?);
            Ok(Expr::Conditional { condition, then_expr, else_expr })
        } else {
            self.parse_pipeline(depth + 1)
        }
    }

    fn parse_pipeline(&mut self, depth: usize) -> ExpressionResult<Expr> {
        self.check_depth(depth)?;
        let mut expr = self.parse_binary(0, depth + 1)?;

        while self.current() == &Token::Pipe {
            self.advance();
            let function = match self.current().clone() {
                Token::Identifier(name) => {
                    self.advance();
                    Arc::from(name)
                }
                other => {
                    return Err(ExpressionError::expression_parse_error(format!(
                        "expected function name after '|', found {other}"
                    )))
                }
            };

            let args = if self.current() == &Token::LeftParen {
                self.parse_function_args(depth + 1)?
            } else {
                Vec::new()
            };

            expr = Expr::Pipeline { value: Box::new(expr), function, args };
        }

        Ok(expr)
    }

    fn parse_binary(&mut self, min_precedence: u8, depth: usize) -> ExpressionResult<Expr> {
        self.check_depth(depth)?;
        let mut left = self.parse_unary(depth + 1)?;

        while self.current().is_binary_operator() {
            let precedence = self.current().precedence();
            if precedence < min_precedence {
                break;
            }

            let is_right_assoc = self.current().is_right_associative();
            let op = match self.current() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                Token::Star => BinaryOp::Multiply,
                Token::Slash => BinaryOp::Divide,
                Token::Percent => BinaryOp::Modulo,
                Token::Power => BinaryOp::Power,
                Token::Equal => BinaryOp::Equal,
                Token::NotEqual => BinaryOp::NotEqual,
                Token::LessThan => BinaryOp::LessThan,
                Token::GreaterThan => BinaryOp::GreaterThan,
                Token::LessEqual => BinaryOp::LessEqual,
                Token::GreaterEqual => BinaryOp::GreaterEqual,
                Token::RegexMatch => BinaryOp::RegexMatch,
                Token::And => BinaryOp::And,
                Token::Or => BinaryOp::Or,
                other => {
                    return Err(ExpressionError::expression_parse_error(format!(
                        "unexpected operator: {other}"
                    )))
                }
            };
            self.advance();

            let next_min = if is_right_assoc { precedence } else { precedence + 1 };
            let right = self.parse_binary(next_min, depth + 1)?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }

        Ok(left)
    }

    fn parse_unary(&mut self, depth: usize) -> ExpressionResult<Expr> {
        self.check_depth(depth)?;
        match self.current() {
            Token::Minus => {
                self.advance();
                Ok(Expr::Negate(Box::new(self.parse_unary(depth + 1)?)))
            }
            Token::Not => {
                self.advance();
                Ok(Expr::Not(Box::new(self.parse_unary(depth + 1)?)))
            }
            _ => self.parse_postfix(depth + 1),
        }
    }

    fn parse_postfix(&mut self, depth: usize) -> ExpressionResult<Expr> {
        self.check_depth(depth)?;
        let expr = self.parse_primary(depth + 1)?;
        self.parse_postfix_from(expr, depth + 1)
    }

    fn parse_postfix_from(&mut self, mut expr: Expr, depth: usize) -> ExpressionResult<Expr> {
        loop {
            match self.current() {
                Token::Dot => {
                    self.advance();
                    let property = match self.current().clone() {
                        Token::Identifier(name) => {
                            self.advance();
                            Arc::from(name)
                        }
                        other => {
                            return Err(ExpressionError::expression_parse_error(format!(
                                "expected property name after '.', found {other}"
                            )))
                        }
                    };
                    expr = Expr::PropertyAccess { object: Box::new(expr), property };
                }
                Token::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression(depth + 1)?;
                    self.expect(Token::RightBracket)?;
                    expr = Expr::IndexAccess { object: Box::new(expr), index: Box::new(index) };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self, depth: usize) -> ExpressionResult<Expr> {
        self.check_depth(depth)?;
        match self.current().clone() {
            Token::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Value::from(n)))
            }
            Token::Float(n) => {
                self.advance();
                Ok(Expr::Literal(serde_json::json!(n)))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::Literal(Value::String(s)))
            }
            Token::Boolean(b) => {
                self.advance();
                Ok(Expr::Literal(Value::Bool(b)))
            }
            Token::Null => {
                self.advance();
                Ok(Expr::Literal(Value::Null))
            }
            Token::Variable(name) => {
                self.advance();
                Ok(Expr::Variable(Arc::from(name)))
            }
            Token::Identifier(name) => {
                self.advance();
                if self.current() == &Token::LeftParen {
                    let args = self.parse_function_args(depth + 1)?;
                    Ok(Expr::FunctionCall { name: Arc::from(name), args })
                } else {
                    Ok(Expr::Identifier(Arc::from(name)))
                }
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expression(depth + 1)?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }
            Token::LeftBracket => {
                self.advance();
                let mut elements = Vec::new();
                if self.current() != &Token::RightBracket {
                    loop {
                        elements.push(self.parse_expression(depth + 1)?);
                        if !self.match_token(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::RightBracket)?;
                Ok(Expr::Array(elements))
            }
            Token::LeftBrace => {
                self.advance();
                let mut pairs = Vec::new();
                if self.current() != &Token::RightBrace {
                    loop {
                        let key: Arc<str> = match self.current().clone() {
                            Token::Identifier(name) => {
                                self.advance();
                                Arc::from(name)
                            }
                            Token::String(s) => {
                                self.advance();
                                Arc::from(s)
                            }
                            other => {
                                return Err(ExpressionError::expression_parse_error(format!(
                                    "expected object key, found {other}"
                                )))
                            }
                        };
                        self.expect(Token::Colon)?;
                        let value = self.parse_expression(depth + 1)?;
                        pairs.push((key, value));
                        if !self.match_token(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::RightBrace)?;
                Ok(Expr::Object(pairs))
            }
            other => Err(ExpressionError::expression_parse_error(format!(
                "unexpected token: {other}"
            ))),
        }
    }

    /// Parse a `(args...)` list, recognizing `name => body` lambda arguments.
    fn parse_function_args(&mut self, depth: usize) -> ExpressionResult<Vec<Expr>> {
        self.expect(Token::LeftParen)?;
        let mut args = Vec::new();

        if self.current() != &Token::RightParen {
            loop {
                if let Token::Identifier(param) = self.current().clone() {
                    self.advance();
                    if self.match_token(&Token::Arrow) {
                        let body = Box::new(self.parse_expression(depth + 1)?);
                        args.push(Expr::Lambda { param: Arc::from(param), body });
                    } else {
                        let expr = Expr::Identifier(Arc::from(param));
                        args.push(self.parse_postfix_from(expr, depth + 1)?);
                    }
                } else {
                    args.push(self.parse_expression(depth + 1)?);
                }

                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }

        self.expect(Token::RightParen)?;
        Ok(args)
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.current() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> ExpressionResult<()> {
        if self.current() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(ExpressionError::expression_parse_error(format!(
                "expected {expected}, found {}",
                self.current()
            )))
        }
    }
}
