use nebula_core::NodeId;
use nebula_workflow::NodeType;

/// Errors raised by the Node Specification Registry (§4.1, §7).
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("no node spec registered for {node_type}/{subtype}")]
    UnknownSpec { node_type: NodeType, subtype: String },

    #[error("node `{node_id}` failed registry validation: {errors:?}")]
    Validation { node_id: NodeId, errors: Vec<String> },
}

impl RegistryError {
    /// The structured error code used at the engine/scheduler API boundary
    /// (§7: `RegistryError::Validation` surfaces at deploy and execute time
    /// and is never retried).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownSpec { .. } => "registry.unknown_spec",
            Self::Validation { .. } => "registry.validation",
        }
    }
}
