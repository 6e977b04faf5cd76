//! Expression language for Nebula workflow connections and node parameters.
//!
//! Expressions are a small, side-effect-free language over JSON values: field
//! access, comparisons, arithmetic, string/array/object builtins, and a ternary
//! `if .. then .. else`. They have no filesystem, network, process, or
//! host-environment primitives by construction, which is what makes them safe
//! to run as connection [`sandbox::evaluate_conversion`] functions and inside
//! `{{ }}` parameter [`Template`]s.
//!
//! ```
//! use nebula_expression::{EvaluationContext, ExpressionEngine};
//! use serde_json::json;
//!
//! let engine = ExpressionEngine::new();
//! let mut context = EvaluationContext::new();
//! context.set_input(json!({ "name": "ada" }));
//!
//! let greeting = engine.evaluate("uppercase($input.name)", &context).unwrap();
//! assert_eq!(greeting, json!("ADA"));
//! ```

pub mod builtins;
pub mod context;
pub mod core;
pub mod engine;
pub mod error;
pub mod error_formatter;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod sandbox;
pub mod template;
pub mod value_utils;

pub use context::EvaluationContext;
pub use core::ast::{BinaryOp, Expr};
pub use engine::{CacheMetrics, ExpressionEngine};
pub use error::{ExpressionError, ExpressionErrorExt, ExpressionResult};
pub use eval::Evaluator;
pub use lexer::{Lexer, Token};
pub use parser::Parser;
pub use sandbox::{evaluate_conversion, ConversionBudget, ConversionOutcome};
pub use template::{Template, TemplatePart};
