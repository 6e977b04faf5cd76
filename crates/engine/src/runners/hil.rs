//! `HUMAN_IN_THE_LOOP.*` runners (§4.2.3): pause the graph for a human
//! response.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nebula_action::{
    ActionContext, ActionMetadata, ActionResult, InteractionRequest, InteractionType, RunnerError, WaitCondition,
};
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::runner::Runner;

const DEFAULT_HIL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Where an [`HilRunner`] persists the interaction it creates. Production
/// deployments back this with the HIL Interaction table (§3.1); tests use
/// [`NoopInteractionSink`].
#[async_trait]
pub trait InteractionSink: Send + Sync {
    async fn record(&self, request: &InteractionRequest);
}

/// Discards the request. Useful in tests where only the runner's returned
/// [`ActionResult::Wait`] matters, and as the registry's default so a
/// misconfigured deployment still pauses correctly instead of panicking.
#[derive(Debug, Default)]
pub struct NoopInteractionSink;

#[async_trait]
impl InteractionSink for NoopInteractionSink {
    async fn record(&self, _request: &InteractionRequest) {}
}

/// `HUMAN_IN_THE_LOOP/*`: builds an [`InteractionRequest`] from the node's
/// `subtype` and configuration, persists it, and returns
/// [`ActionResult::Wait`] so the engine pauses the execution (§4.2.3). The
/// resume path is the engine's job — it synthesizes the HIL node's eventual
/// output from the human's response and the configured
/// [`HilClassifier`](nebula_action::HilClassifier), not this runner's.
pub struct HilRunner {
    metadata: ActionMetadata,
    sink: Arc<dyn InteractionSink>,
}

impl HilRunner {
    /// Build the runner, persisting every interaction it creates via `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn InteractionSink>) -> Self {
        Self {
            metadata: ActionMetadata::new("HUMAN_IN_THE_LOOP/*", "Human in the Loop", "Pause for a human response")
                .with_category("hil"),
            sink,
        }
    }
}

fn interaction_type_for(subtype: &str) -> InteractionType {
    match subtype {
        "APPROVAL" => InteractionType::Approval,
        "SELECTION" => InteractionType::Selection,
        "REVIEW" => InteractionType::Review,
        "CONFIRMATION" => InteractionType::Confirmation,
        "INPUT" => InteractionType::Input,
        _ => InteractionType::Custom,
    }
}

#[async_trait]
impl Runner for HilRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        let prompt = node.configurations.get("prompt").and_then(Value::as_str).unwrap_or("Awaiting human response").to_string();
        let timeout = node
            .configurations
            .get("timeout_seconds")
            .and_then(Value::as_u64)
            .map_or(DEFAULT_HIL_TIMEOUT, Duration::from_secs);
        let interaction_id = ctx.node_id.to_string();

        let mut request = InteractionRequest::approval(interaction_id.clone(), prompt, timeout);
        request.interaction_type = interaction_type_for(&node.subtype);
        request.options = node.configurations.get("options").cloned();

        self.sink.record(&request).await;

        Ok(ActionResult::Wait {
            condition: WaitCondition::Webhook { callback_id: interaction_id },
            timeout: Some(timeout),
            partial_output: Some(inputs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{ExecutionId, NodeId, WorkflowId};
    use nebula_workflow::NodeType;

    #[tokio::test]
    async fn hil_runner_waits_on_webhook_keyed_by_node_id() {
        let runner = HilRunner::new(Arc::new(NoopInteractionSink));
        let node = NodeDefinition::new(NodeId::v4(), "approve", NodeType::HumanInTheLoop, "APPROVAL");
        let ctx = ActionContext::new(ExecutionId::v4(), node.id, WorkflowId::v4());
        let result = runner.run(&node, Value::Null, &Value::Null, &ctx).await.unwrap();
        match result {
            ActionResult::Wait { condition: WaitCondition::Webhook { callback_id }, timeout, .. } => {
                assert_eq!(callback_id, node.id.to_string());
                assert_eq!(timeout, Some(DEFAULT_HIL_TIMEOUT));
            }
            _ => panic!("expected wait"),
        }
    }

    #[tokio::test]
    async fn hil_runner_honors_configured_timeout() {
        let runner = HilRunner::new(Arc::new(NoopInteractionSink));
        let node = NodeDefinition::new(NodeId::v4(), "approve", NodeType::HumanInTheLoop, "APPROVAL")
            .with_configuration("timeout_seconds", Value::from(60));
        let ctx = ActionContext::new(ExecutionId::v4(), node.id, WorkflowId::v4());
        let result = runner.run(&node, Value::Null, &Value::Null, &ctx).await.unwrap();
        match result {
            ActionResult::Wait { timeout, .. } => assert_eq!(timeout, Some(Duration::from_secs(60))),
            _ => panic!("expected wait"),
        }
    }
}
