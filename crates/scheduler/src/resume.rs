//! Smart resume (§4.3.5): before starting a fresh Execution for a matched
//! trigger, check whether this workflow already has a paused run waiting
//! for exactly this kind of input.

use nebula_core::{NodeId, WorkflowId};
use nebula_execution::ExecutionState;
use nebula_workflow::NodeState;
use serde_json::Value;

/// What the caller should do with a matched trigger once smart resume has
/// looked for an existing paused execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeDecision {
    /// Resume this previously paused execution instead of starting a new run.
    Resume {
        /// The paused execution to resume.
        execution_id: nebula_core::ExecutionId,
        /// The node it was paused at.
        paused_node_id: NodeId,
        /// The incoming event payload, handed to the engine as the human's
        /// response.
        user_response: Value,
    },
    /// No paused execution exists for this workflow; start a fresh run.
    StartFresh,
}

/// Implements §4.3.5: pick the most recently paused/waiting execution for
/// `workflow_id`, if any, to resume instead of starting a new one.
///
/// `paused` is every execution currently in `PAUSED` or `WAITING_FOR_HUMAN`
/// for this workflow, as the caller's execution store reports them — this
/// function only implements the selection rule, not the store query.
#[must_use]
pub fn decide(workflow_id: WorkflowId, paused: &[ExecutionState], trigger_payload: Value) -> ResumeDecision {
    let most_recent = paused
        .iter()
        .filter(|state| state.workflow_id == workflow_id && state.status.is_paused())
        .max_by_key(|state| state.updated_at);

    match most_recent {
        Some(state) => {
            // The node model has no dedicated "waiting" state: a `HUMAN_IN_THE_LOOP`
            // node stays `Running` at the node level while the execution as a whole
            // moves to `Paused`/`WaitingForHuman`, so the still-running node is the
            // one blocking progress.
            let paused_node_id = state
                .node_states
                .iter()
                .find(|(_, node_state)| node_state.state == NodeState::Running)
                .map(|(node_id, _)| *node_id)
                .unwrap_or(NodeId::nil());
            ResumeDecision::Resume { execution_id: state.execution_id, paused_node_id, user_response: trigger_payload }
        }
        None => ResumeDecision::StartFresh,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, Utc};
    use nebula_core::ExecutionId;
    use nebula_execution::ExecutionStatus;
    use serde_json::json;

    use super::*;

    fn paused_state(workflow_id: WorkflowId, updated_at: chrono::DateTime<Utc>) -> ExecutionState {
        let now = Utc::now();
        ExecutionState {
            execution_id: ExecutionId::v4(),
            workflow_id,
            status: ExecutionStatus::WaitingForHuman,
            node_states: HashMap::new(),
            version: 1,
            created_at: now,
            updated_at,
            started_at: Some(now),
            completed_at: None,
            total_retries: 0,
            total_output_bytes: 0,
            variables: serde_json::Map::new(),
        }
    }

    #[test]
    fn no_paused_executions_starts_fresh() {
        let workflow_id = WorkflowId::v4();
        assert_eq!(decide(workflow_id, &[], json!({})), ResumeDecision::StartFresh);
    }

    #[test]
    fn picks_most_recently_paused_execution() {
        let workflow_id = WorkflowId::v4();
        let now = Utc::now();
        let older = paused_state(workflow_id, now - Duration::minutes(10));
        let newer = paused_state(workflow_id, now);
        let newer_id = newer.execution_id;

        let decision = decide(workflow_id, &[older, newer], json!({ "text": "yes" }));
        match decision {
            ResumeDecision::Resume { execution_id, .. } => assert_eq!(execution_id, newer_id),
            ResumeDecision::StartFresh => panic!("expected a resume decision"),
        }
    }

    #[test]
    fn ignores_paused_executions_for_other_workflows() {
        let workflow_id = WorkflowId::v4();
        let other = paused_state(WorkflowId::v4(), Utc::now());
        assert_eq!(decide(workflow_id, &[other], json!({})), ResumeDecision::StartFresh);
    }
}
