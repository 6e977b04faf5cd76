//! `FLOW.*` runners (§4.2.4): branching, merging, iteration and waiting.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use nebula_action::{ActionContext, ActionMetadata, ActionResult, RunnerError, WaitCondition};
use nebula_expression::{EvaluationContext, ExpressionEngine};
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::runner::Runner;

/// `FLOW/IF`: evaluates `condition_expression` against `inputs` and routes
/// to the `true` or `false` branch. A non-boolean result is coerced with
/// truthiness (`0`, `""`, `null`, `false` are false; everything else true).
pub struct FlowIfRunner {
    metadata: ActionMetadata,
    engine: ExpressionEngine,
}

impl FlowIfRunner {
    /// Build the runner with its own private expression engine instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: ActionMetadata::new("FLOW/IF", "If", "Branch on a condition").with_category("flow"),
            engine: ExpressionEngine::new(),
        }
    }
}

impl Default for FlowIfRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[async_trait]
impl Runner for FlowIfRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        _ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        let Some(expression) = node.configurations.get("condition_expression").and_then(Value::as_str) else {
            return Err(RunnerError::validation("IF node is missing required \"condition_expression\" configuration"));
        };

        let mut context = EvaluationContext::new();
        context.set_input(inputs.clone());
        let evaluated = self
            .engine
            .evaluate(expression, &context)
            .map_err(|err| RunnerError::validation(err.to_string()))?;

        let selected = if is_truthy(&evaluated) { "true" } else { "false" };
        let mut alternatives = HashMap::new();
        alternatives.insert(selected.to_string(), inputs.clone());
        Ok(ActionResult::Branch { selected: selected.to_string(), output: inputs, alternatives })
    }
}

/// `FLOW/MERGE`: the engine only dispatches this once every inbound port is
/// ready (§4.2.2a — that readiness check lives in the main loop, not here),
/// so by the time it runs `inputs` already holds one entry per port. Passes
/// the aggregated object straight through.
pub struct FlowMergeRunner {
    metadata: ActionMetadata,
}

impl FlowMergeRunner {
    /// Build the merge runner.
    #[must_use]
    pub fn new() -> Self {
        Self { metadata: ActionMetadata::new("FLOW/MERGE", "Merge", "Join multiple inbound branches").with_category("flow") }
    }
}

impl Default for FlowMergeRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for FlowMergeRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        _node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        _ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        Ok(ActionResult::success(inputs))
    }
}

/// `FLOW/FOR_EACH` and `FLOW/LOOP`: reads an array from `items_expression`
/// (or `inputs` itself, if it's already an array) and routes it on the
/// `iteration` port, where the main loop fans it out into one activation per
/// element (§4.2.2g).
pub struct FlowSplitRunner {
    metadata: ActionMetadata,
    engine: ExpressionEngine,
}

impl FlowSplitRunner {
    /// Build the runner for `subtype` (`"FOR_EACH"` or `"LOOP"`).
    #[must_use]
    pub fn new(subtype: &str) -> Self {
        Self {
            metadata: ActionMetadata::new(format!("FLOW/{subtype}"), subtype, "Iterate over a collection").with_category("flow"),
            engine: ExpressionEngine::new(),
        }
    }
}

#[async_trait]
impl Runner for FlowSplitRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        _ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        let items = if let Some(expression) = node.configurations.get("items_expression").and_then(Value::as_str) {
            let mut context = EvaluationContext::new();
            context.set_input(inputs);
            self.engine.evaluate(expression, &context).map_err(|err| RunnerError::validation(err.to_string()))?
        } else {
            inputs
        };

        if !items.is_array() {
            return Err(RunnerError::validation("FOR_EACH/LOOP resolved a non-array value to iterate"));
        }

        Ok(ActionResult::Route { port: "iteration".to_string(), data: items })
    }
}

/// `FLOW/WAIT` and `FLOW/DELAY`: pauses the node for `delay_ms` (default
/// 0) before letting it proceed, via [`ActionResult::Wait`] — the engine's
/// timer mechanism re-enqueues the node once the duration elapses (§4.2.2e).
pub struct FlowWaitRunner {
    metadata: ActionMetadata,
}

impl FlowWaitRunner {
    /// Build the wait/delay runner.
    #[must_use]
    pub fn new() -> Self {
        Self { metadata: ActionMetadata::new("FLOW/WAIT", "Wait", "Pause for a fixed duration").with_category("flow") }
    }
}

impl Default for FlowWaitRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for FlowWaitRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        _ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        let delay_ms = node.configurations.get("delay_ms").and_then(Value::as_u64).unwrap_or(0);
        let duration = Duration::from_millis(delay_ms);
        Ok(ActionResult::Wait {
            condition: WaitCondition::Duration { duration },
            timeout: None,
            partial_output: Some(inputs),
        })
    }
}
