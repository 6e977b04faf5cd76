//! `AI_AGENT.*` runners (§4.2.5).
//!
//! Attached `MEMORY`/`TOOL` nodes never become scheduling vertices
//! ([`NodeType::is_attachment_only`](nebula_workflow::NodeType::is_attachment_only)),
//! so this runner cannot reach them through `inputs` the way a normal node
//! reaches its predecessors. Instead the engine resolves
//! `node.attached_nodes` itself before dispatch and passes their loaded
//! memory/tool state in under the reserved `_memory_context` and
//! `_available_tools` input keys (§4.2.5 "pre-call memory load, pre-call
//! tool discovery"); this runner only has to read them.

use async_trait::async_trait;
use nebula_action::{ActionContext, ActionMetadata, ActionResult, RunnerError};
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::runner::Runner;

const MEMORY_CONTEXT_KEY: &str = "_memory_context";
const AVAILABLE_TOOLS_KEY: &str = "_available_tools";

/// A single completion call's result, shaped to the ports §4.2.5 names:
/// `content`, `token_usage`, `tool_invocations`.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub content: String,
    pub token_usage: u64,
    pub tool_invocations: Vec<Value>,
}

/// Calls a language model. A trait rather than a concrete SDK client: real
/// provider SDKs are out of scope (§4.2.5) the same way real HTTP clients
/// are for `ACTION/HTTP_REQUEST` — this crate ships
/// [`ScriptedProvider`] for tests and local runs.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str, memory_context: &Value, available_tools: &Value) -> Result<CompletionResult, String>;
}

/// Deterministic `CompletionProvider`: echoes the prompt back as `content`
/// and reports a token count proportional to its length, with no tool
/// invocations. Enough to drive the pause-free control-flow paths in tests.
#[derive(Debug, Default)]
pub struct ScriptedProvider;

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, prompt: &str, _memory_context: &Value, _available_tools: &Value) -> Result<CompletionResult, String> {
        Ok(CompletionResult {
            content: format!("[scripted response to: {prompt}]"),
            token_usage: prompt.len() as u64,
            tool_invocations: Vec::new(),
        })
    }
}

/// `AI_AGENT/*`: runs the pre-call memory/tool steps the engine already
/// performed (read from reserved input keys), calls the configured
/// [`CompletionProvider`], and emits `content`/`token_usage`/`tool_invocations`.
/// Post-call memory write is also the engine's job — it happens after this
/// runner returns, driven by the `content` this runner produced.
pub struct AiAgentRunner {
    metadata: ActionMetadata,
    provider: std::sync::Arc<dyn CompletionProvider>,
}

impl AiAgentRunner {
    /// Build the runner calling `provider` for every completion.
    #[must_use]
    pub fn new(provider: std::sync::Arc<dyn CompletionProvider>) -> Self {
        Self {
            metadata: ActionMetadata::new("AI_AGENT/*", "AI Agent", "Call a language model with attached tools and memory")
                .with_category("ai"),
            provider,
        }
    }
}

#[async_trait]
impl Runner for AiAgentRunner {
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
        ctx.check_cancelled()?;

        let prompt = node
            .configurations
            .get("prompt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| inputs.to_string());
        let memory_context = inputs.get(MEMORY_CONTEXT_KEY).cloned().unwrap_or(Value::Null);
        let available_tools = inputs.get(AVAILABLE_TOOLS_KEY).cloned().unwrap_or_else(|| Value::Array(Vec::new()));

        let completion = self
            .provider
            .complete(&prompt, &memory_context, &available_tools)
            .await
            .map_err(RunnerError::retryable)?;

        Ok(ActionResult::success(serde_json::json!({
            "content": completion.content,
            "token_usage": completion.token_usage,
            "tool_invocations": completion.tool_invocations,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{ExecutionId, NodeId, WorkflowId};
    use nebula_workflow::NodeType;

    #[tokio::test]
    async fn agent_runner_shapes_output_ports() {
        let runner = AiAgentRunner::new(std::sync::Arc::new(ScriptedProvider));
        let node = NodeDefinition::new(NodeId::v4(), "agent", NodeType::AiAgent, "OPENAI")
            .with_configuration("prompt", Value::from("summarize the ticket"));
        let ctx = ActionContext::new(ExecutionId::v4(), node.id, WorkflowId::v4());
        let result = runner.run(&node, Value::Null, &Value::Null, &ctx).await.unwrap();
        match result {
            ActionResult::Success { output } => {
                assert!(output["content"].as_str().unwrap().contains("summarize the ticket"));
                assert!(output["token_usage"].as_u64().unwrap() > 0);
                assert_eq!(output["tool_invocations"], serde_json::json!([]));
            }
            _ => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn agent_runner_reads_preloaded_memory_and_tools() {
        struct RecordingProvider;
        #[async_trait]
        impl CompletionProvider for RecordingProvider {
            async fn complete(&self, _prompt: &str, memory_context: &Value, available_tools: &Value) -> Result<CompletionResult, String> {
                Ok(CompletionResult {
                    content: format!("mem={memory_context} tools={available_tools}"),
                    token_usage: 1,
                    tool_invocations: Vec::new(),
                })
            }
        }

        let runner = AiAgentRunner::new(std::sync::Arc::new(RecordingProvider));
        let node = NodeDefinition::new(NodeId::v4(), "agent", NodeType::AiAgent, "OPENAI");
        let ctx = ActionContext::new(ExecutionId::v4(), node.id, WorkflowId::v4());
        let inputs = serde_json::json!({
            MEMORY_CONTEXT_KEY: {"history": ["hi"]},
            AVAILABLE_TOOLS_KEY: ["search"],
        });
        let result = runner.run(&node, inputs, &Value::Null, &ctx).await.unwrap();
        match result {
            ActionResult::Success { output } => {
                let content = output["content"].as_str().unwrap();
                assert!(content.contains("history"));
                assert!(content.contains("search"));
            }
            _ => panic!("expected success"),
        }
    }
}
