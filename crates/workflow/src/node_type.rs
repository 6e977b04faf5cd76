use serde::{Deserialize, Serialize};

/// The eight node types a workflow vertex may declare (§3.1).
///
/// `Tool` and `Memory` nodes are never scheduled as graph vertices — they
/// only exist as `attached_nodes` on an `AiAgent` node (§4.2.5) — but they
/// still need a `NodeType` so the registry can validate them the same way
/// it validates every other node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Trigger,
    AiAgent,
    Action,
    ExternalAction,
    Flow,
    HumanInTheLoop,
    Tool,
    Memory,
}

impl NodeType {
    /// Returns `true` for the two types that are only ever reached as
    /// attached capabilities of an `AiAgent`, never as scheduling vertices.
    #[must_use]
    pub const fn is_attachment_only(self) -> bool {
        matches!(self, Self::Tool | Self::Memory)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "TRIGGER",
            Self::AiAgent => "AI_AGENT",
            Self::Action => "ACTION",
            Self::ExternalAction => "EXTERNAL_ACTION",
            Self::Flow => "FLOW",
            Self::HumanInTheLoop => "HUMAN_IN_THE_LOOP",
            Self::Tool => "TOOL",
            Self::Memory => "MEMORY",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_only_types() {
        assert!(NodeType::Tool.is_attachment_only());
        assert!(NodeType::Memory.is_attachment_only());
        assert!(!NodeType::AiAgent.is_attachment_only());
        assert!(!NodeType::Action.is_attachment_only());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&NodeType::HumanInTheLoop).unwrap();
        assert_eq!(json, "\"HUMAN_IN_THE_LOOP\"");
        let back: NodeType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeType::HumanInTheLoop);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(NodeType::ExternalAction.to_string(), "EXTERNAL_ACTION");
    }
}
