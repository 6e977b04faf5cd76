//! Top-level error type for the orchestrator.

use nebula_core::{ExecutionId, NodeId};

/// Errors the engine itself raises, as opposed to [`nebula_action::RunnerError`],
/// which is a single node's failure and never aborts the whole crate.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The workflow failed registry validation (§4.2.1 step 1).
    #[error("workflow validation failed: {0}")]
    Validation(#[from] nebula_registry::RegistryError),

    /// The workflow's structure or scheduling graph was rejected.
    #[error("workflow graph error: {0}")]
    Graph(#[from] nebula_workflow::WorkflowError),

    /// An execution-state transition was invalid.
    #[error("execution state error: {0}")]
    State(#[from] nebula_execution::ExecutionError),

    /// `ResumeExecution` was called for an execution that is not paused.
    #[error("execution {execution_id} is not paused")]
    NotPaused {
        /// The execution that was asked to resume.
        execution_id: ExecutionId,
    },

    /// `ResumeExecution` named a node that does not match the execution's
    /// recorded pause point.
    #[error("execution {execution_id} is paused at a different node than {node_id}")]
    WrongResumeNode {
        /// The execution being resumed.
        execution_id: ExecutionId,
        /// The node the caller asked to resume.
        node_id: NodeId,
    },

    /// No `ExecutionPause` record exists for an execution reporting a paused status.
    #[error("no pause record found for execution {execution_id}")]
    MissingPauseRecord {
        /// The execution missing its pause record.
        execution_id: ExecutionId,
    },

    /// A node exhausted its retry budget (or failed non-retryably) and
    /// `on_error` is `Fail` (the default), aborting the whole execution.
    #[error("node {node_id} failed: {message}")]
    NodeFailed {
        /// The node that failed terminally.
        node_id: NodeId,
        message: String,
    },

    /// The work queue referenced a node id absent from the workflow —
    /// unreachable given a registry-validated, graph-checked workflow, kept
    /// as a defensive error rather than a panic.
    #[error("node {0} referenced by the execution is not part of the workflow")]
    UnknownNode(NodeId),
}
