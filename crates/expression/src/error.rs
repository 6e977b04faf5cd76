//! Error types for expression parsing, evaluation, and templating.

use thiserror::Error;

/// Result type used throughout the expression engine.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Errors that can occur while tokenizing, parsing, or evaluating an expression.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExpressionError {
    /// The input could not be tokenized.
    #[error("syntax error: {message}")]
    SyntaxError {
        /// Description of the offending input.
        message: String,
    },

    /// The token stream could not be parsed into an AST.
    #[error("parse error: {message}")]
    ParseError {
        /// Description of the offending input.
        message: String,
    },

    /// Evaluation of an otherwise well-formed AST failed.
    #[error("evaluation error: {message}")]
    EvalError {
        /// Description of the failure.
        message: String,
    },

    /// A value had the wrong type for the operation being performed.
    #[error("type error: expected {expected}, got {actual}")]
    TypeError {
        /// The type the operation required.
        expected: String,
        /// The type actually encountered.
        actual: String,
    },

    /// A `$variable` reference could not be resolved in the evaluation context.
    #[error("variable not found: {name}")]
    VariableNotFound {
        /// The unresolved variable name.
        name: String,
    },

    /// A function call referenced a name not present in the builtin registry.
    #[error("function not found: {name}")]
    FunctionNotFound {
        /// The unresolved function name.
        name: String,
    },

    /// A builtin function was called with an invalid argument.
    #[error("invalid argument to {function}: {message}")]
    InvalidArgument {
        /// The function that rejected the argument.
        function: String,
        /// Why the argument was rejected.
        message: String,
    },

    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A regular expression failed to compile or evaluate.
    #[error("regex error: {message}")]
    RegexError {
        /// Description of the regex failure.
        message: String,
    },

    /// An array index was out of bounds.
    #[error("index {index} out of bounds (length {length})")]
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// The length of the array being indexed.
        length: usize,
    },

    /// A validation rule failed outside of argument checking.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the failed validation.
        message: String,
    },

    /// A named resource could not be found.
    #[error("{resource_type} not found: {resource_id}")]
    NotFound {
        /// The kind of resource.
        resource_type: String,
        /// The resource identifier.
        resource_id: String,
    },

    /// A condition was violated that should be unreachable in correct usage.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal failure.
        message: String,
    },

    /// The expression budget (steps or nodes) was exceeded during evaluation.
    #[error("budget exceeded: {message}")]
    BudgetExceeded {
        /// Description of which budget was exceeded.
        message: String,
    },

    /// Evaluation did not complete within the configured wall-clock deadline.
    #[error("evaluation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Failed to (de)serialize a JSON value.
    #[error("json error: {0}")]
    Json(String),

    /// Failed to parse a date/time value.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl From<serde_json::Error> for ExpressionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<chrono::ParseError> for ExpressionError {
    fn from(err: chrono::ParseError) -> Self {
        Self::InvalidDate(err.to_string())
    }
}

impl ExpressionError {
    /// A short, stable identifier for this error variant, suitable for metrics or logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SyntaxError { .. } => "syntax_error",
            Self::ParseError { .. } => "parse_error",
            Self::EvalError { .. } => "eval_error",
            Self::TypeError { .. } => "type_error",
            Self::VariableNotFound { .. } => "variable_not_found",
            Self::FunctionNotFound { .. } => "function_not_found",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::DivisionByZero => "division_by_zero",
            Self::RegexError { .. } => "regex_error",
            Self::IndexOutOfBounds { .. } => "index_out_of_bounds",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Internal { .. } => "internal",
            Self::BudgetExceeded { .. } => "budget_exceeded",
            Self::Timeout(_) => "timeout",
            Self::Json(_) => "json",
            Self::InvalidDate(_) => "invalid_date",
        }
    }

    /// Whether retrying the same expression with the same input could plausibly succeed.
    ///
    /// Syntax/parse/type errors are deterministic; only resource-limit errors are retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BudgetExceeded { .. } | Self::Timeout(_))
    }
}

/// Method-syntax constructors for [`ExpressionError`], mirroring the builtin registry's call
/// sites (`err.expression_type_error(...)` reads better inline than `ExpressionError::TypeError`).
pub trait ExpressionErrorExt {
    /// Build a [`ExpressionError::SyntaxError`].
    fn expression_syntax_error(message: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::ParseError`].
    fn expression_parse_error(message: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::EvalError`].
    fn expression_eval_error(message: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::TypeError`].
    fn expression_type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::VariableNotFound`].
    fn expression_variable_not_found(name: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::FunctionNotFound`].
    fn expression_function_not_found(name: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::InvalidArgument`].
    fn expression_invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::DivisionByZero`].
    fn expression_division_by_zero() -> Self;
    /// Build a [`ExpressionError::RegexError`].
    fn expression_regex_error(message: impl Into<String>) -> Self;
    /// Build a [`ExpressionError::IndexOutOfBounds`].
    fn expression_index_out_of_bounds(index: i64, length: usize) -> Self;
    /// Build a [`ExpressionError::BudgetExceeded`].
    fn expression_budget_exceeded(message: impl Into<String>) -> Self;
}

impl ExpressionErrorExt for ExpressionError {
    fn expression_syntax_error(message: impl Into<String>) -> Self {
        Self::SyntaxError { message: message.into() }
    }

    fn expression_parse_error(message: impl Into<String>) -> Self {
        Self::ParseError { message: message.into() }
    }

    fn expression_eval_error(message: impl Into<String>) -> Self {
        Self::EvalError { message: message.into() }
    }

    fn expression_type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeError { expected: expected.into(), actual: actual.into() }
    }

    fn expression_variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    fn expression_function_not_found(name: impl Into<String>) -> Self {
        Self::FunctionNotFound { name: name.into() }
    }

    fn expression_invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument { function: function.into(), message: message.into() }
    }

    fn expression_division_by_zero() -> Self {
        Self::DivisionByZero
    }

    fn expression_regex_error(message: impl Into<String>) -> Self {
        Self::RegexError { message: message.into() }
    }

    fn expression_index_out_of_bounds(index: i64, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    fn expression_budget_exceeded(message: impl Into<String>) -> Self {
        Self::BudgetExceeded { message: message.into() }
    }
}
