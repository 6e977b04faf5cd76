use nebula_core::WorkflowId;

/// Errors raised by deployment, routing, and cron firing (§4.3).
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// `deploy()` rejected the workflow before touching the trigger index.
    #[error("workflow {0} failed registry validation: {1}")]
    ValidationFailed(WorkflowId, String),

    /// A trigger node is missing a `trigger_config` field its subtype
    /// requires to derive an `index_key` (§4.3.2).
    #[error("trigger node {node} ({subtype}) is missing required config field `{field}`")]
    MissingTriggerConfig { node: nebula_core::NodeId, subtype: String, field: &'static str },

    /// `subtype` on a TRIGGER node isn't one this scheduler knows how to
    /// index (§4.3.2's table is closed).
    #[error("unknown trigger subtype `{0}`")]
    UnknownTriggerSubtype(String),

    /// `undeploy()`/restore operated on a workflow with no index rows.
    #[error("workflow {0} is not deployed")]
    NotDeployed(WorkflowId),

    /// The single-flight lock for a cron tick could not be acquired or was
    /// lost mid-tick.
    #[error("lock error: {0}")]
    Lock(#[from] crate::lock::LockError),
}
