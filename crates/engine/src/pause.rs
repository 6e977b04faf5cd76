//! Pause/resume continuation state (§4.2.3).

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use nebula_core::{ActivationId, ExecutionId, ExecutionPauseId, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the main loop's work queue (§4.2.2): a node to dispatch,
/// optionally with inputs that override `pending_inputs` and a fan-out
/// activation id distinguishing sibling iterations of the same node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub node_id: NodeId,
    #[serde(default)]
    pub override_inputs: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub activation_id: Option<ActivationId>,
}

impl WorkItem {
    #[must_use]
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id, override_inputs: None, activation_id: None }
    }

    #[must_use]
    pub fn with_override(mut self, inputs: serde_json::Map<String, Value>) -> Self {
        self.override_inputs = Some(inputs);
        self
    }

    #[must_use]
    pub fn with_activation(mut self, activation_id: ActivationId) -> Self {
        self.activation_id = Some(activation_id);
        self
    }
}

/// Everything the main loop needs to pick back up where it left off: the
/// queue tail, per-node pending inputs, which nodes already ran, and the
/// order they ran in (§4.2.1 step 3, §4.2.3). Persisted whenever a run
/// pauses so `resume_from_pause` can restore it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPause {
    pub pause_id: ExecutionPauseId,
    pub execution_id: ExecutionId,
    /// The node whose `Wait` caused this pause — `ResumeExecution` requires
    /// the resuming caller to name this node (§4.2.3).
    pub current_node_id: NodeId,
    /// Identifies what resumes this pause: an HIL interaction id for
    /// `HUMAN_IN_THE_LOOP` nodes, or a synthetic key for other wait kinds.
    pub callback_key: String,
    pub queue: VecDeque<WorkItem>,
    pub pending_inputs: HashMap<NodeId, serde_json::Map<String, Value>>,
    pub executed: HashSet<NodeId>,
    pub execution_sequence: Vec<NodeId>,
    pub created_at: DateTime<Utc>,
    pub timeout_at: Option<DateTime<Utc>>,
    pub resumed: bool,
}

impl ExecutionPause {
    #[must_use]
    pub fn new(
        execution_id: ExecutionId,
        current_node_id: NodeId,
        callback_key: String,
        queue: VecDeque<WorkItem>,
        pending_inputs: HashMap<NodeId, serde_json::Map<String, Value>>,
        executed: HashSet<NodeId>,
        execution_sequence: Vec<NodeId>,
        timeout_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            pause_id: ExecutionPauseId::v4(),
            execution_id,
            current_node_id,
            callback_key,
            queue,
            pending_inputs,
            executed,
            execution_sequence,
            created_at: Utc::now(),
            timeout_at,
            resumed: false,
        }
    }

    /// `true` once `timeout_at` has passed — the timeout watcher's signal to
    /// dispatch a synthetic resume on the node's `timeout` port (§4.2.3).
    #[must_use]
    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        self.timeout_at.is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_item_builders_set_fields() {
        let node_id = NodeId::v4();
        let mut inputs = serde_json::Map::new();
        inputs.insert("a".into(), Value::from(1));
        let item = WorkItem::new(node_id).with_override(inputs.clone()).with_activation(ActivationId::v4());
        assert_eq!(item.node_id, node_id);
        assert_eq!(item.override_inputs, Some(inputs));
        assert!(item.activation_id.is_some());
    }

    #[test]
    fn pause_not_timed_out_without_deadline() {
        let pause = ExecutionPause::new(
            ExecutionId::v4(),
            NodeId::v4(),
            "hil-1".into(),
            VecDeque::new(),
            HashMap::new(),
            HashSet::new(),
            Vec::new(),
            None,
        );
        assert!(!pause.is_timed_out(Utc::now()));
    }

    #[test]
    fn pause_times_out_after_deadline() {
        let pause = ExecutionPause::new(
            ExecutionId::v4(),
            NodeId::v4(),
            "hil-1".into(),
            VecDeque::new(),
            HashMap::new(),
            HashSet::new(),
            Vec::new(),
            Some(Utc::now() - chrono::Duration::seconds(1)),
        );
        assert!(pause.is_timed_out(Utc::now()));
    }
}
