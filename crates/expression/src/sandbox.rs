//! Sandboxed evaluation of connection conversion functions.
//!
//! A conversion function is a short, user-authored expression attached to a
//! workflow connection: it runs with `input` bound to the source port's payload
//! and its result becomes the target port's payload. The expression language has
//! no filesystem, network, process, or host-environment primitives, so isolation
//! is structural; what remains is bounding how much time and how large a result
//! one evaluation may consume before it is cut off.

use crate::context::EvaluationContext;
use crate::engine::ExpressionEngine;
use crate::ExpressionError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Wall-clock and result-size ceilings applied to a single conversion function run.
#[derive(Debug, Clone, Copy)]
pub struct ConversionBudget {
    /// Maximum time allowed for parsing plus evaluation.
    pub wall_clock: Duration,
    /// Maximum number of `Value` nodes (scalars, array elements, object fields)
    /// the evaluated result may contain. A proxy for a memory ceiling: counting
    /// live bytes in an interior `serde_json::Value` tree isn't cheap to do
    /// precisely, and node count tracks it closely enough for typical payloads.
    pub max_value_nodes: usize,
}

impl Default for ConversionBudget {
    fn default() -> Self {
        Self {
            wall_clock: Duration::from_millis(200),
            max_value_nodes: 1 << 20,
        }
    }
}

/// Outcome of evaluating a connection's conversion function.
///
/// The source node's own run is recorded as successful regardless of outcome;
/// a failed conversion is attributed to the connection, not the node.
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    /// The expression evaluated within budget.
    Ok(Value),
    /// The expression failed, timed out, or produced an oversized result.
    Failed(ExpressionError),
}

impl ConversionOutcome {
    /// The payload to deliver to the sink port: the converted value on success,
    /// `null` on failure.
    #[must_use]
    pub fn sink_value(&self) -> Value {
        match self {
            Self::Ok(value) => value.clone(),
            Self::Failed(_) => Value::Null,
        }
    }

    /// `true` if the conversion succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The error to record against the connection, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ExpressionError> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Evaluate `expression` against `input` under `budget`.
///
/// Runs on a blocking-pool thread so a pathological expression (deep recursion
/// through nested `map`/`filter`/`reduce` lambdas, say) cannot stall the calling
/// Execution's driver task; `tokio::time::timeout` races that work against the
/// wall-clock budget and the result is size-checked before being handed back.
/// This never panics and never returns `Err`: every failure mode collapses into
/// [`ConversionOutcome::Failed`] so the caller can record it against the
/// connection and still forward `null` downstream.
pub async fn evaluate_conversion(
    engine: Arc<ExpressionEngine>,
    expression: &str,
    input: Value,
    budget: ConversionBudget,
) -> ConversionOutcome {
    let expression = expression.to_string();
    let max_value_nodes = budget.max_value_nodes;

    let task = tokio::task::spawn_blocking(move || {
        let mut context = EvaluationContext::new();
        context.set_input(input);
        let value = engine.evaluate(&expression, &context)?;
        check_value_node_budget(&value, max_value_nodes)?;
        Ok::<Value, ExpressionError>(value)
    });

    match tokio::time::timeout(budget.wall_clock, task).await {
        Ok(Ok(Ok(value))) => ConversionOutcome::Ok(value),
        Ok(Ok(Err(err))) => ConversionOutcome::Failed(err),
        Ok(Err(_join_error)) => ConversionOutcome::Failed(ExpressionError::Internal {
            message: "conversion function evaluation task panicked".to_string(),
        }),
        Err(_elapsed) => ConversionOutcome::Failed(ExpressionError::Timeout(budget.wall_clock)),
    }
}

/// Walks `value`, decrementing a shared budget per node, stopping early once it
/// would go negative rather than counting the whole (potentially huge) tree.
fn check_value_node_budget(value: &Value, limit: usize) -> Result<(), ExpressionError> {
    fn within(value: &Value, remaining: &mut usize) -> bool {
        if *remaining == 0 {
            return false;
        }
        *remaining -= 1;
        match value {
            Value::Array(items) => items.iter().all(|item| within(item, remaining)),
            Value::Object(fields) => fields.values().all(|item| within(item, remaining)),
            _ => true,
        }
    }

    let mut remaining = limit;
    if within(value, &mut remaining) {
        Ok(())
    } else {
        Err(ExpressionError::BudgetExceeded {
            message: format!("conversion result exceeds the {limit}-node budget"),
        })
    }
}
