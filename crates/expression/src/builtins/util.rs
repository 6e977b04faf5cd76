//! Miscellaneous utility builtins: length, type predicates, uuid generation.

use super::check_arg_count;
use crate::context::EvaluationContext;
use crate::core::error::{ExpressionErrorExt, ExpressionResult};
use crate::eval::Evaluator;
use crate::value_utils::value_type_name;
use serde_json::Value;

impl super::BuiltinRegistry {
    pub(super) fn register_util_functions(&mut self) {
        self.register("length", length);
        self.register("is_null", is_null);
        self.register("is_array", is_array);
        self.register("is_object", is_object);
        self.register("is_string", is_string);
        self.register("is_number", is_number);
        #[cfg(feature = "uuid")]
        self.register("uuid", uuid);
        #[cfg(not(feature = "uuid"))]
        self.register("uuid", uuid_unavailable);
    }
}

fn length(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("length", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::from(s.len())),
        Value::Array(a) => Ok(Value::from(a.len())),
        Value::Object(o) => Ok(Value::from(o.len())),
        other => Err(ExpressionError::expression_type_error(
            "string, array, or object",
            value_type_name(other),
        )),
    }
}

fn is_null(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("is_null", args, 1)?;
    Ok(Value::Bool(args[0].is_null()))
}

fn is_array(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("is_array", args, 1)?;
    Ok(Value::Bool(args[0].is_array()))
}

fn is_object(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("is_object", args, 1)?;
    Ok(Value::Bool(args[0].is_object()))
}

fn is_string(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("is_string", args, 1)?;
    Ok(Value::Bool(args[0].is_string()))
}

fn is_number(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("is_number", args, 1)?;
    Ok(Value::Bool(args[0].is_number()))
}

#[cfg(feature = "uuid")]
fn uuid(args: &[Value], _eval: &Evaluator, _ctx: &EvaluationContext) -> ExpressionResult<Value> {
    check_arg_count("uuid", args, 0)?;
    Ok(Value::String(::uuid::Uuid::new_v4().to_string()))
}

#[cfg(not(feature = "uuid"))]
fn uuid_unavailable(
    _args: &[Value],
    _eval: &Evaluator,
    _ctx: &EvaluationContext,
) -> ExpressionResult<Value> {
    Err(crate::ExpressionError::expression_function_not_found(
        "uuid (requires the \"uuid\" feature)",
    ))
}

use crate::ExpressionError;
