//! Fallback for an unregistered `(node_type, subtype)` pair (§4.2.4).

use async_trait::async_trait;
use nebula_action::{ActionContext, ActionMetadata, ActionResult, RunnerError};
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::runner::Runner;

/// Copies its inputs straight to the `result` port. Dispatched whenever the
/// registry has no runner for a node's `(type, subtype)`.
pub struct PassthroughRunner {
    metadata: ActionMetadata,
}

impl PassthroughRunner {
    /// Build the passthrough runner.
    #[must_use]
    pub fn new() -> Self {
        Self { metadata: ActionMetadata::new("*/PASSTHROUGH", "Passthrough", "Copies inputs to output unchanged") }
    }
}

impl Default for PassthroughRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for PassthroughRunner {
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

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{ExecutionId, NodeId, WorkflowId};
    use nebula_workflow::NodeType;

    #[tokio::test]
    async fn copies_inputs_to_result() {
        let runner = PassthroughRunner::new();
        let node = NodeDefinition::new(NodeId::v4(), "n", NodeType::Action, "UNKNOWN");
        let ctx = ActionContext::new(ExecutionId::v4(), node.id, WorkflowId::v4());
        let inputs = serde_json::json!({"a": 1});
        let result = runner.run(&node, inputs.clone(), &Value::Null, &ctx).await.unwrap();
        match result {
            ActionResult::Success { output } => assert_eq!(output, inputs),
            _ => panic!("expected success"),
        }
    }
}
