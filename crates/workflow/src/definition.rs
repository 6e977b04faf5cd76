use std::collections::HashMap;

use chrono::{DateTime, Utc};
use nebula_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::node_type::NodeType;

/// The default output port a runner writes to and a connection reads from
/// when no `output_key` is specified.
pub const DEFAULT_OUTPUT_KEY: &str = "result";

/// What the engine does when a node fails terminally (§7 propagation policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    /// The first terminal failure fails the whole Execution (default).
    #[default]
    Fail,
    /// The Execution continues; the failing node's outputs are `null`.
    Continue,
    /// The Execution continues but the failing node's successors are
    /// explicitly marked `SKIPPED`.
    SkipDownstream,
}

/// Author-time configuration shared by every workflow, independent of any
/// single node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Default `on_error` policy for nodes that don't declare their own.
    #[serde(default)]
    pub on_error: OnError,
    /// Maximum number of fan-out sibling activations run concurrently (§5).
    #[serde(default = "default_fanout_concurrency")]
    pub max_fanout_concurrency: usize,
}

const fn default_fanout_concurrency() -> usize {
    4
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            on_error: OnError::default(),
            max_fanout_concurrency: default_fanout_concurrency(),
        }
    }
}

/// A single vertex in a workflow's node set (§3.1 `Node`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub subtype: String,
    #[serde(default)]
    pub configurations: serde_json::Map<String, serde_json::Value>,
    /// Non-empty only when `node_type == AiAgent`; references TOOL/MEMORY
    /// nodes invisible to scheduling (§4.2.5).
    #[serde(default)]
    pub attached_nodes: Vec<NodeId>,
}

impl NodeDefinition {
    #[must_use]
    pub fn new(id: NodeId, name: impl Into<String>, node_type: NodeType, subtype: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            node_type,
            subtype: subtype.into(),
            configurations: serde_json::Map::new(),
            attached_nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attached_nodes(mut self, attached: Vec<NodeId>) -> Self {
        self.attached_nodes = attached;
        self
    }

    #[must_use]
    pub fn with_configuration(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.configurations.insert(key.into(), value);
        self
    }
}

/// A directed edge between two nodes (§3.1 `Connection`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub to_node: NodeId,
    #[serde(default = "default_output_key")]
    pub output_key: String,
    #[serde(default)]
    pub conversion_function: Option<String>,
}

fn default_output_key() -> String {
    DEFAULT_OUTPUT_KEY.to_string()
}

impl Connection {
    #[must_use]
    pub fn new(from_node: NodeId, to_node: NodeId) -> Self {
        Self {
            from_node,
            to_node,
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
            conversion_function: None,
        }
    }

    #[must_use]
    pub fn on_port(mut self, output_key: impl Into<String>) -> Self {
        self.output_key = output_key.into();
        self
    }

    #[must_use]
    pub fn with_conversion(mut self, expression: impl Into<String>) -> Self {
        self.conversion_function = Some(expression.into());
        self
    }
}

/// An immutable workflow definition (§3.1 `Workflow`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: nebula_core::WorkflowId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: semver::Version,
    pub nodes: Vec<NodeDefinition>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub config: WorkflowConfig,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    /// Validate the structural invariants from §3.1 that don't require the
    /// Node Specification Registry (type/subtype validation is `nebula-registry`'s job).
    pub fn validate_structure(&self) -> Result<(), WorkflowError> {
        if self.nodes.is_empty() {
            return Err(WorkflowError::EmptyWorkflow);
        }

        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(WorkflowError::DuplicateNodeId(node.id));
            }
            if node.name.chars().any(char::is_whitespace) {
                return Err(WorkflowError::NameContainsWhitespace(node.name.clone()));
            }
            if !node.attached_nodes.is_empty() && node.node_type != NodeType::AiAgent {
                return Err(WorkflowError::AttachmentsOnNonAgent(node.id));
            }
        }

        let by_id: HashMap<NodeId, &NodeDefinition> = self.nodes.iter().map(|n| (n.id, n)).collect();

        let mut attached: std::collections::HashSet<NodeId> = std::collections::HashSet::new();
        for node in &self.nodes {
            for &attached_id in &node.attached_nodes {
                let target = by_id.get(&attached_id).ok_or(WorkflowError::UnknownNode(attached_id))?;
                if !matches!(target.node_type, NodeType::Tool | NodeType::Memory) {
                    return Err(WorkflowError::InvalidAttachmentType(attached_id));
                }
                attached.insert(attached_id);
            }
        }

        for conn in &self.connections {
            if !by_id.contains_key(&conn.from_node) {
                return Err(WorkflowError::UnknownNode(conn.from_node));
            }
            if !by_id.contains_key(&conn.to_node) {
                return Err(WorkflowError::UnknownNode(conn.to_node));
            }
            if attached.contains(&conn.from_node) {
                return Err(WorkflowError::AttachedNodeInConnections(conn.from_node));
            }
            if attached.contains(&conn.to_node) {
                return Err(WorkflowError::AttachedNodeInConnections(conn.to_node));
            }
        }

        Ok(())
    }

    /// Node ids of type `TRIGGER` — the entry points of a run (§3.1).
    #[must_use]
    pub fn trigger_node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Trigger)
            .map(|n| n.id)
            .collect()
    }

    /// Node ids referenced as attachments by any `AiAgent` node — excluded
    /// from the scheduling graph (§4.2.1 step 2).
    #[must_use]
    pub fn attached_node_ids(&self) -> std::collections::HashSet<NodeId> {
        self.nodes.iter().flat_map(|n| n.attached_nodes.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::WorkflowId;

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    fn base_workflow(nodes: Vec<NodeDefinition>, connections: Vec<Connection>) -> WorkflowDefinition {
        WorkflowDefinition {
            id: WorkflowId::v4(),
            name: "wf".into(),
            description: None,
            version: semver::Version::new(0, 1, 0),
            nodes,
            connections,
            variables: HashMap::new(),
            config: WorkflowConfig::default(),
            tags: Vec::new(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn empty_workflow_rejected() {
        let wf = base_workflow(vec![], vec![]);
        assert!(matches!(wf.validate_structure(), Err(WorkflowError::EmptyWorkflow)));
    }

    #[test]
    fn whitespace_in_name_rejected() {
        let n = NodeDefinition::new(NodeId::v4(), "bad name", NodeType::Trigger, "MANUAL");
        let wf = base_workflow(vec![n], vec![]);
        assert!(matches!(
            wf.validate_structure(),
            Err(WorkflowError::NameContainsWhitespace(_))
        ));
    }

    #[test]
    fn connection_to_unknown_node_rejected() {
        let a = NodeDefinition::new(NodeId::v4(), "a", NodeType::Trigger, "MANUAL");
        let missing = NodeId::v4();
        let conn = Connection::new(a.id, missing);
        let wf = base_workflow(vec![a], vec![conn]);
        assert!(matches!(wf.validate_structure(), Err(WorkflowError::UnknownNode(_))));
    }

    #[test]
    fn attached_node_must_be_tool_or_memory() {
        let agent = NodeDefinition::new(NodeId::v4(), "agent", NodeType::AiAgent, "OPENAI");
        let bad_attachment = NodeDefinition::new(NodeId::v4(), "not_a_tool", NodeType::Action, "HTTP");
        let agent = agent.with_attached_nodes(vec![bad_attachment.id]);
        let wf = base_workflow(vec![agent, bad_attachment], vec![]);
        assert!(matches!(
            wf.validate_structure(),
            Err(WorkflowError::InvalidAttachmentType(_))
        ));
    }

    #[test]
    fn attached_node_cannot_appear_in_connections() {
        let tool = NodeDefinition::new(NodeId::v4(), "tool", NodeType::Tool, "CALCULATOR");
        let agent = NodeDefinition::new(NodeId::v4(), "agent", NodeType::AiAgent, "OPENAI")
            .with_attached_nodes(vec![tool.id]);
        let other = NodeDefinition::new(NodeId::v4(), "other", NodeType::Action, "HTTP");
        let conn = Connection::new(tool.id, other.id);
        let wf = base_workflow(vec![agent, tool, other], vec![conn]);
        assert!(matches!(
            wf.validate_structure(),
            Err(WorkflowError::AttachedNodeInConnections(_))
        ));
    }

    #[test]
    fn valid_workflow_passes() {
        let a = NodeDefinition::new(NodeId::v4(), "trigger", NodeType::Trigger, "MANUAL");
        let b = NodeDefinition::new(NodeId::v4(), "action", NodeType::Action, "HTTP_REQUEST");
        let conn = Connection::new(a.id, b.id);
        let wf = base_workflow(vec![a, b], vec![conn]);
        assert!(wf.validate_structure().is_ok());
    }

    #[test]
    fn trigger_node_ids_filters_by_type() {
        let trigger = NodeDefinition::new(NodeId::v4(), "t", NodeType::Trigger, "MANUAL");
        let action = NodeDefinition::new(NodeId::v4(), "a", NodeType::Action, "HTTP_REQUEST");
        let wf = base_workflow(vec![trigger.clone(), action], vec![]);
        assert_eq!(wf.trigger_node_ids(), vec![trigger.id]);
    }

    #[test]
    fn connection_defaults_to_result_port() {
        let conn = Connection::new(NodeId::v4(), NodeId::v4());
        assert_eq!(conn.output_key, DEFAULT_OUTPUT_KEY);
        assert!(conn.conversion_function.is_none());
    }
}
