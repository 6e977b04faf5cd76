//! Runtime execution context (non-serializable).

use std::collections::HashMap;
use std::sync::Arc;

use nebula_core::{ExecutionId, NodeId};
use nebula_workflow::WorkflowDefinition;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::budget::ExecutionBudget;
use crate::error::ExecutionError;
use crate::output::NodeOutput;

/// Runtime context for an executing workflow.
///
/// This type is NOT serializable â€” it holds runtime resources like
/// Arc-wrapped shared state and cancellation tokens. Persistent state
/// is tracked by [`ExecutionState`](crate::state::ExecutionState).
#[derive(Debug)]
pub struct ExecutionContext {
    /// Unique identifier for this execution.
    pub execution_id: ExecutionId,
    /// The workflow definition being executed.
    pub workflow: Arc<WorkflowDefinition>,
    /// Per-node outputs, populated as nodes complete.
    pub node_outputs: Arc<RwLock<HashMap<NodeId, NodeOutput>>>,
    /// Token for cooperative cancellation.
    pub cancellation: CancellationToken,
    /// Execution-level variables shared across nodes.
    pub variables: Arc<RwLock<serde_json::Map<String, serde_json::Value>>>,
    /// Resource budget for this execution.
    pub budget: ExecutionBudget,
}

impl ExecutionContext {
    /// Create a new execution context.
    #[must_use]
    pub fn new(
        execution_id: ExecutionId,
        workflow: Arc<WorkflowDefinition>,
        budget: ExecutionBudget,
    ) -> Self {
        Self {
            execution_id,
            workflow,
            node_outputs: Arc::new(RwLock::new(HashMap::new())),
            cancellation: CancellationToken::new(),
            variables: Arc::new(RwLock::new(serde_json::Map::new())),
            budget,
        }
    }

    /// Replace the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set initial variables.
    #[must_use]
    pub fn with_variables(self, vars: serde_json::Map<String, serde_json::Value>) -> Self {
        *self.variables.write() = vars;
        self
    }

    /// Store a node's output.
    pub fn set_node_output(&self, node_id: NodeId, output: NodeOutput) {
        self.node_outputs.write().insert(node_id, output);
    }

    /// Retrieve a node's output.
    #[must_use]
    pub fn get_node_output(&self, node_id: NodeId) -> Option<NodeOutput> {
        self.node_outputs.read().get(&node_id).cloned()
    }

    /// Set an execution variable.
    pub fn set_variable(&self, key: impl Into<String>, value: serde_json::Value) {
        self.variables.write().insert(key.into(), value);
    }

    /// Get an execution variable.
    #[must_use]
    pub fn get_variable(&self, key: &str) -> Option<serde_json::Value> {
        self.variables.read().get(key).cloned()
    }

    /// Check if cancellation has been requested.
    pub fn check_cancelled(&self) -> Result<(), ExecutionError> {
        if self.cancellation.is_cancelled() {
            Err(ExecutionError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Total output bytes across all completed nodes.
    #[must_use]
    pub fn total_output_bytes(&self) -> u64 {
        self.node_outputs.read().values().map(|o| o.bytes).sum()
    }
}
