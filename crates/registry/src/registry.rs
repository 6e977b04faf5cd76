use std::collections::HashMap;

use nebula_workflow::{NodeDefinition, NodeType, WorkflowDefinition};
use serde_json::Value;

use crate::error::RegistryError;
use crate::spec::NodeSpec;

/// Process-wide, read-mostly catalog of every known `(type, subtype)` node
/// spec (§4.1). Immutable once built: readers share it freely behind an
/// `Arc` without synchronization (§5).
#[derive(Debug, Default)]
pub struct Registry {
    specs: HashMap<(NodeType, String), NodeSpec>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in catalog (§4.1: "loaded once at
    /// process start ... built in-process from a static built-in catalog").
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for spec in crate::builtin::catalog() {
            registry.register(spec);
        }
        registry
    }

    pub fn register(&mut self, spec: NodeSpec) {
        let key = (spec.node_type, spec.subtype.clone());
        self.specs.insert(key, spec);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// `Lookup(type, subtype) → (NodeSpec, found)` (§4.1).
    #[must_use]
    pub fn lookup(&self, node_type: NodeType, subtype: &str) -> Option<&NodeSpec> {
        self.specs.get(&(node_type, subtype.to_string()))
    }

    /// Lookup from raw, possibly author-typo'd strings: a `_NODE` suffix on
    /// `type_str` is stripped with a warning before parsing (§4.1 "Error
    /// correction"). `subtype` lookups stay case-sensitive.
    #[must_use]
    pub fn lookup_raw(&self, type_str: &str, subtype: &str) -> Option<&NodeSpec> {
        let corrected = type_str.strip_suffix("_NODE").unwrap_or(type_str);
        if corrected != type_str {
            tracing::warn!(original = type_str, corrected, "stripped _NODE suffix from node type");
        }
        let node_type = parse_node_type(corrected)?;
        self.lookup(node_type, subtype)
    }

    /// `Validate(node) → errors[]` (§4.1), surfaced here as `Result` since
    /// every caller treats a non-empty error list as an abort condition.
    pub fn validate_node(&self, node: &NodeDefinition) -> Result<(), RegistryError> {
        let spec = self.lookup(node.node_type, &node.subtype).ok_or_else(|| RegistryError::UnknownSpec {
            node_type: node.node_type,
            subtype: node.subtype.clone(),
        })?;

        let mut errors = Vec::new();
        for (key, schema) in &spec.configurations {
            match node.configurations.get(key) {
                Some(value) => {
                    if let Some(violation) = schema.violation(value) {
                        errors.push(format!("{key}: {violation}"));
                    }
                }
                None if schema.required && schema.default.is_none() => {
                    errors.push(format!("{key}: missing required configuration"));
                }
                None => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Validation { node_id: node.id, errors })
        }
    }

    /// Validate every node in a workflow; abort on the first failure (§4.2.1
    /// step 1: "No partial runs from invalid workflows").
    pub fn validate_workflow(&self, workflow: &WorkflowDefinition) -> Result<(), RegistryError> {
        for node in &workflow.nodes {
            self.validate_node(node)?;
        }
        Ok(())
    }

    /// `Normalize(node) → node'` (§4.1): fills missing configuration
    /// defaults, leaving author-specified values untouched.
    pub fn normalize(&self, node: &mut NodeDefinition) -> Result<(), RegistryError> {
        let spec = self.lookup(node.node_type, &node.subtype).ok_or_else(|| RegistryError::UnknownSpec {
            node_type: node.node_type,
            subtype: node.subtype.clone(),
        })?;

        for (key, schema) in &spec.configurations {
            if !node.configurations.contains_key(key) {
                if let Some(default) = &schema.default {
                    node.configurations.insert(key.clone(), default.clone());
                }
            }
        }

        Ok(())
    }

    /// `ShapeOutput(node, raw_output) → shaped_output` (§4.1): the only way
    /// output leaves a runner. Retains declared keys, fills defaults for
    /// missing declared keys, drops everything else. Idempotent: shaping an
    /// already-shaped value reproduces it (§7 `ShapeOutput ∘ ShapeOutput =
    /// ShapeOutput`), since the output contains exactly the declared keys
    /// with no undeclared ones left for a second pass to drop.
    #[must_use]
    pub fn shape_output(&self, node_type: NodeType, subtype: &str, raw_output: &Value) -> Value {
        let Some(spec) = self.lookup(node_type, subtype) else {
            return raw_output.clone();
        };

        if spec.output_params.is_empty() {
            return raw_output.clone();
        }

        let raw_object = raw_output.as_object();
        let mut shaped = serde_json::Map::new();
        for (key, schema) in &spec.output_params {
            let value = raw_object.and_then(|obj| obj.get(key)).cloned();
            match value {
                Some(value) => {
                    shaped.insert(key.clone(), value);
                }
                None => {
                    if let Some(default) = &schema.default {
                        shaped.insert(key.clone(), default.clone());
                    }
                }
            }
        }
        Value::Object(shaped)
    }
}

fn parse_node_type(s: &str) -> Option<NodeType> {
    match s {
        "TRIGGER" => Some(NodeType::Trigger),
        "AI_AGENT" => Some(NodeType::AiAgent),
        "ACTION" => Some(NodeType::Action),
        "EXTERNAL_ACTION" => Some(NodeType::ExternalAction),
        "FLOW" => Some(NodeType::Flow),
        "HUMAN_IN_THE_LOOP" => Some(NodeType::HumanInTheLoop),
        "TOOL" => Some(NodeType::Tool),
        "MEMORY" => Some(NodeType::Memory),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param_schema::{ParamSchema, ParamType};
    use nebula_core::NodeId;

    fn sample_spec() -> NodeSpec {
        NodeSpec::new(NodeType::Action, "HTTP_REQUEST", "Make an HTTP request")
            .with_configuration("url", ParamSchema::new(ParamType::String).required())
            .with_configuration("method", ParamSchema::new(ParamType::String).with_default(Value::from("GET")))
            .with_output("status", ParamSchema::new(ParamType::Number))
    }

    #[test]
    fn lookup_unknown_pair_returns_none() {
        let registry = Registry::new();
        assert!(registry.lookup(NodeType::Action, "HTTP_REQUEST").is_none());
    }

    #[test]
    fn lookup_raw_strips_node_suffix() {
        let mut registry = Registry::new();
        registry.register(sample_spec());
        assert!(registry.lookup_raw("ACTION_NODE", "HTTP_REQUEST").is_some());
        assert!(registry.lookup_raw("ACTION", "HTTP_REQUEST").is_some());
    }

    #[test]
    fn validate_rejects_missing_required_param() {
        let mut registry = Registry::new();
        registry.register(sample_spec());
        let node = NodeDefinition::new(NodeId::v4(), "req", NodeType::Action, "HTTP_REQUEST");
        assert!(matches!(registry.validate_node(&node), Err(RegistryError::Validation { .. })));
    }

    #[test]
    fn validate_accepts_node_with_required_param_present() {
        let mut registry = Registry::new();
        registry.register(sample_spec());
        let node = NodeDefinition::new(NodeId::v4(), "req", NodeType::Action, "HTTP_REQUEST")
            .with_configuration("url", Value::from("https://example.com"));
        assert!(registry.validate_node(&node).is_ok());
    }

    #[test]
    fn validate_unknown_subtype_fails() {
        let registry = Registry::new();
        let node = NodeDefinition::new(NodeId::v4(), "req", NodeType::Action, "UNKNOWN");
        assert!(matches!(registry.validate_node(&node), Err(RegistryError::UnknownSpec { .. })));
    }

    #[test]
    fn normalize_fills_default_without_overwriting_author_value() {
        let mut registry = Registry::new();
        registry.register(sample_spec());
        let mut node = NodeDefinition::new(NodeId::v4(), "req", NodeType::Action, "HTTP_REQUEST")
            .with_configuration("url", Value::from("https://example.com"));
        registry.normalize(&mut node).unwrap();
        assert_eq!(node.configurations.get("method").unwrap(), "GET");
        assert_eq!(node.configurations.get("url").unwrap(), "https://example.com");
    }

    #[test]
    fn shape_output_drops_undeclared_keys_and_fills_defaults() {
        let mut registry = Registry::new();
        registry.register(sample_spec());
        let raw = serde_json::json!({"status": 200, "secret_header": "leak"});
        let shaped = registry.shape_output(NodeType::Action, "HTTP_REQUEST", &raw);
        assert_eq!(shaped, serde_json::json!({"status": 200}));
    }

    #[test]
    fn shape_output_is_idempotent() {
        let mut registry = Registry::new();
        registry.register(sample_spec());
        let raw = serde_json::json!({"status": 200, "secret_header": "leak"});
        let once = registry.shape_output(NodeType::Action, "HTTP_REQUEST", &raw);
        let twice = registry.shape_output(NodeType::Action, "HTTP_REQUEST", &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn shape_output_passes_through_unknown_spec() {
        let registry = Registry::new();
        let raw = serde_json::json!({"anything": true});
        assert_eq!(registry.shape_output(NodeType::Action, "UNKNOWN", &raw), raw);
    }
}
