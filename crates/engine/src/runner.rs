//! The runner factory (§4.2.4): `(node_type, subtype) → Runner`.
//!
//! `nebula_action::Action` is deliberately execution-free — pure identity and
//! metadata, no `run` method — so this crate defines the execution-capable
//! extension of it the main loop actually dispatches to.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nebula_action::{ActionContext, ActionMetadata, ActionResult, RunnerError};
use nebula_workflow::{NodeDefinition, NodeType};
use serde_json::Value;

/// A runner is a stateless node implementation, keyed into the factory table
/// by `(node.node_type, node.subtype)`.
///
/// `inputs` is the aggregated `pending_inputs` map for this activation
/// (§4.2.2b), already overridden by any `override_inputs`. `trigger_info` is
/// the payload the run or resume started with, handed to every node
/// unchanged so e.g. a downstream node can read webhook headers without a
/// connection threading them through.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Static identity, reused by the registry for validation and logging.
    fn metadata(&self) -> &ActionMetadata;

    /// Execute the node once. Retries and timeouts are the caller's concern
    /// (§4.2.2d); a runner only reports whether a single attempt succeeded.
    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        trigger_info: &Value,
        ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError>;
}

/// Maps `(node_type, subtype)` to the runner that implements it. Unknown
/// pairs fall back to [`crate::runners::PassthroughRunner`] rather than
/// failing the lookup (§4.2.4: "Unknown (type,subtype) ⇒ Passthrough").
#[derive(Default)]
pub struct RunnerRegistry {
    runners: HashMap<(NodeType, String), Arc<dyn Runner>>,
    fallback: Option<Arc<dyn Runner>>,
}

impl RunnerRegistry {
    /// An empty registry with no fallback runner configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry seeded with every built-in runner (§4.2.4 categories).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new().with_fallback(Arc::new(crate::runners::PassthroughRunner::new()));
        for (node_type, subtype, runner) in crate::runners::builtin_runners() {
            registry.register_for(node_type, subtype, runner);
        }
        registry
    }

    /// Set the runner dispatched to when no `(type, subtype)` entry matches.
    #[must_use]
    pub fn with_fallback(mut self, runner: Arc<dyn Runner>) -> Self {
        self.fallback = Some(runner);
        self
    }

    /// Register a runner under its metadata key's `(type, subtype)` pair.
    /// The key is parsed as `"{TYPE}/{SUBTYPE}"`.
    pub fn register_for(&mut self, node_type: NodeType, subtype: impl Into<String>, runner: Arc<dyn Runner>) {
        self.runners.insert((node_type, subtype.into()), runner);
    }

    /// Dispatch for `(node_type, subtype)`, logging and falling back to
    /// [`PassthroughRunner`](crate::runners::PassthroughRunner) on a miss.
    #[must_use]
    pub fn dispatch(&self, node_type: NodeType, subtype: &str) -> Arc<dyn Runner> {
        if let Some(runner) = self.runners.get(&(node_type, subtype.to_string())) {
            return runner.clone();
        }
        tracing::warn!(%node_type, subtype, "no runner registered, dispatching to passthrough");
        self.fallback
            .clone()
            .unwrap_or_else(|| Arc::new(crate::runners::PassthroughRunner::new()))
    }

    /// Number of explicitly registered `(type, subtype)` runners, excluding the fallback.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// `true` if no runner beyond the fallback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runners::PassthroughRunner;
    use nebula_core::{ExecutionId, NodeId, WorkflowId};

    #[tokio::test]
    async fn dispatch_falls_back_to_passthrough_for_unknown_subtype() {
        let registry = RunnerRegistry::with_builtins();
        let runner = registry.dispatch(NodeType::Action, "SOME_UNKNOWN_SUBTYPE");
        let node = NodeDefinition::new(NodeId::v4(), "n", NodeType::Action, "SOME_UNKNOWN_SUBTYPE");
        let ctx = ActionContext::new(ExecutionId::v4(), node.id, WorkflowId::v4());
        let result = runner
            .run(&node, serde_json::json!({"a": 1}), &Value::Null, &ctx)
            .await
            .unwrap();
        match result {
            ActionResult::Success { output } => assert_eq!(output, serde_json::json!({"a": 1})),
            _ => panic!("expected passthrough success"),
        }
    }

    #[test]
    fn empty_registry_has_no_runners() {
        assert!(RunnerRegistry::new().is_empty());
    }

    #[test]
    fn with_builtins_registers_known_subtypes() {
        let registry = RunnerRegistry::with_builtins();
        assert!(registry.len() > 0);
    }

    #[tokio::test]
    async fn passthrough_metadata_identifies_itself() {
        let runner = PassthroughRunner::new();
        assert_eq!(runner.metadata().key, "*/PASSTHROUGH");
    }
}
