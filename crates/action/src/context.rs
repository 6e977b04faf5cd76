use std::sync::Arc;

use nebula_core::{ExecutionId, NodeId, WorkflowId};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::RunnerError;

/// Runtime context provided to every runner during execution.
///
/// Constructed by the engine before invoking a runner. Carries identity
/// information (which execution, workflow, and node this is), workflow-scoped
/// variables, and a cancellation token.
///
/// Runners **must** periodically call [`check_cancelled`](Self::check_cancelled)
/// in long-running loops to support cooperative cancellation (§5).
#[non_exhaustive]
pub struct ActionContext {
    pub execution_id: ExecutionId,
    pub node_id: NodeId,
    pub workflow_id: WorkflowId,
    pub cancellation: CancellationToken,
    variables: Arc<RwLock<serde_json::Map<String, serde_json::Value>>>,
}

impl ActionContext {
    #[must_use]
    pub fn new(execution_id: ExecutionId, node_id: NodeId, workflow_id: WorkflowId) -> Self {
        Self {
            execution_id,
            node_id,
            workflow_id,
            cancellation: CancellationToken::new(),
            variables: Arc::new(RwLock::new(serde_json::Map::new())),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[must_use]
    pub fn with_variables(mut self, vars: serde_json::Map<String, serde_json::Value>) -> Self {
        self.variables = Arc::new(RwLock::new(vars));
        self
    }

    #[must_use]
    pub fn get_variable(&self, key: &str) -> Option<serde_json::Value> {
        self.variables.read().get(key).cloned()
    }

    pub fn set_variable(&self, key: &str, value: serde_json::Value) {
        self.variables.write().insert(key.to_owned(), value);
    }

    pub fn remove_variable(&self, key: &str) -> Option<serde_json::Value> {
        self.variables.write().remove(key)
    }

    /// Returns `Err(RunnerError::Cancelled)` once the execution's
    /// cancellation token has fired.
    pub fn check_cancelled(&self) -> Result<(), RunnerError> {
        if self.cancellation.is_cancelled() {
            Err(RunnerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("execution_id", &self.execution_id)
            .field("node_id", &self.node_id)
            .field("workflow_id", &self.workflow_id)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> ActionContext {
        ActionContext::new(ExecutionId::v4(), NodeId::v4(), WorkflowId::v4())
    }

    #[test]
    fn get_set_variable() {
        let ctx = test_context();
        assert!(ctx.get_variable("count").is_none());
        ctx.set_variable("count", serde_json::json!(42));
        assert_eq!(ctx.get_variable("count"), Some(serde_json::json!(42)));
    }

    #[test]
    fn overwrite_variable() {
        let ctx = test_context();
        ctx.set_variable("name", serde_json::json!("alice"));
        ctx.set_variable("name", serde_json::json!("bob"));
        assert_eq!(ctx.get_variable("name"), Some(serde_json::json!("bob")));
    }

    #[test]
    fn remove_variable() {
        let ctx = test_context();
        ctx.set_variable("temp", serde_json::json!(true));
        let old = ctx.remove_variable("temp");
        assert_eq!(old, Some(serde_json::json!(true)));
        assert!(ctx.get_variable("temp").is_none());
    }

    #[test]
    fn check_cancelled_ok() {
        let ctx = test_context();
        assert!(ctx.check_cancelled().is_ok());
    }

    #[test]
    fn check_cancelled_after_cancel() {
        let ctx = test_context();
        ctx.cancellation.cancel();
        assert!(matches!(ctx.check_cancelled(), Err(RunnerError::Cancelled)));
    }

    #[test]
    fn with_cancellation_token_is_inherited() {
        let token = CancellationToken::new();
        let child = token.child_token();
        let ctx = test_context().with_cancellation(child);
        assert!(ctx.check_cancelled().is_ok());
        token.cancel();
        assert!(ctx.check_cancelled().is_err());
    }

    #[test]
    fn with_variables_preset() {
        let mut vars = serde_json::Map::new();
        vars.insert("preset".into(), serde_json::json!("value"));
        let ctx = test_context().with_variables(vars);
        assert_eq!(ctx.get_variable("preset"), Some(serde_json::json!("value")));
    }

    #[test]
    fn debug_format() {
        let ctx = test_context();
        let debug = format!("{ctx:?}");
        assert!(debug.contains("ActionContext"));
        assert!(debug.contains("execution_id"));
    }
}
