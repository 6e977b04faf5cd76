use std::collections::HashMap;

use nebula_core::InterfaceVersion;
use nebula_workflow::NodeType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::param_schema::ParamSchema;

/// The canonical schema for one `(type, subtype)` pair (§4.1 `NodeSpec`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub node_type: NodeType,
    pub subtype: String,
    pub version: InterfaceVersion,
    pub description: String,
    #[serde(default)]
    pub configurations: HashMap<String, ParamSchema>,
    #[serde(default)]
    pub input_params: HashMap<String, ParamSchema>,
    #[serde(default)]
    pub output_params: HashMap<String, ParamSchema>,
    /// Subtypes of default TOOL/MEMORY attachments an `AI_AGENT` spec of
    /// this kind suggests, not enforced.
    #[serde(default)]
    pub attached_nodes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Value>,
    #[serde(default)]
    pub system_prompt_appendix: Option<String>,
}

impl NodeSpec {
    #[must_use]
    pub fn new(node_type: NodeType, subtype: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            node_type,
            subtype: subtype.into(),
            version: InterfaceVersion::new(1, 0),
            description: description.into(),
            configurations: HashMap::new(),
            input_params: HashMap::new(),
            output_params: HashMap::new(),
            attached_nodes: Vec::new(),
            tags: Vec::new(),
            examples: Vec::new(),
            system_prompt_appendix: None,
        }
    }

    #[must_use]
    pub fn with_configuration(mut self, key: impl Into<String>, schema: ParamSchema) -> Self {
        self.configurations.insert(key.into(), schema);
        self
    }

    #[must_use]
    pub fn with_output(mut self, key: impl Into<String>, schema: ParamSchema) -> Self {
        self.output_params.insert(key.into(), schema);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The key this spec is registered under: `(type, subtype)` (§4.1).
    #[must_use]
    pub fn key(&self) -> (NodeType, &str) {
        (self.node_type, self.subtype.as_str())
    }
}
