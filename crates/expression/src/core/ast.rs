//! The expression abstract syntax tree.

use serde_json::Value;
use std::sync::Arc;

/// A parsed expression, ready for evaluation against an [`crate::context::EvaluationContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, bool, null, or a literal array/object element).
    Literal(Value),
    /// A `$name` reference, resolved against the evaluation context.
    Variable(Arc<str>),
    /// A bare identifier, used for lambda parameters and otherwise evaluated as a string.
    Identifier(Arc<str>),
    /// Unary arithmetic negation (`-expr`).
    Negate(Box<Expr>),
    /// Unary boolean negation (`!expr`).
    Not(Box<Expr>),
    /// A binary operation.
    Binary {
        /// Left-hand operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right-hand operand.
        right: Box<Expr>,
    },
    /// `object.property` field access.
    PropertyAccess {
        /// The expression producing the object.
        object: Box<Expr>,
        /// The field name.
        property: Arc<str>,
    },
    /// `object[index]` indexed access, for both arrays and objects.
    IndexAccess {
        /// The expression producing the array or object.
        object: Box<Expr>,
        /// The expression producing the index or key.
        index: Box<Expr>,
    },
    /// A call to a builtin function.
    FunctionCall {
        /// The function name.
        name: Arc<str>,
        /// Argument expressions.
        args: Vec<Expr>,
    },
    /// A `value | function(args)` pipeline, desugars to `function(value, args...)`.
    Pipeline {
        /// The piped-in value.
        value: Box<Expr>,
        /// The function name.
        function: Arc<str>,
        /// Additional argument expressions.
        args: Vec<Expr>,
    },
    /// An `if condition then a else b` conditional.
    Conditional {
        /// The condition expression.
        condition: Box<Expr>,
        /// Evaluated when the condition is truthy.
        then_expr: Box<Expr>,
        /// Evaluated when the condition is not truthy.
        else_expr: Box<Expr>,
    },
    /// A `param => body` lambda, only valid as an argument to a higher-order builtin.
    Lambda {
        /// The lambda's single parameter name.
        param: Arc<str>,
        /// The lambda body.
        body: Box<Expr>,
    },
    /// An array literal.
    Array(Vec<Expr>),
    /// An object literal, as ordered key/value pairs.
    Object(Vec<(Arc<str>, Expr)>),
}

impl Expr {
    /// Returns `true` if this expression is a literal value.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns the inner value if this expression is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(v) => Some(v),
            _ => None,
        }
    }
}

/// Binary operators supported by the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `**`
    Power,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `=~`
    RegexMatch,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// The operator's canonical source-text spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Power => "**",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::RegexMatch => "=~",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
