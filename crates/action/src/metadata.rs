use serde::{Deserialize, Serialize};

pub use nebula_core::InterfaceVersion;

/// Static metadata describing a runner, keyed by the `(type, subtype)` pair
/// it implements. Distinct from `nebula_registry::NodeSpec`: the spec
/// describes the *schema* a node author fills in; this describes the
/// *implementation* the engine dispatches to.
#[derive(Debug, Clone)]
pub struct ActionMetadata {
    /// Unique key identifying this runner, e.g. `"ACTION/HTTP_REQUEST"`.
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Changes only when this runner's input/output contract changes.
    pub version: InterfaceVersion,
    pub execution_mode: ExecutionMode,
    pub input_schema: Option<serde_json::Value>,
    pub output_schema: Option<serde_json::Value>,
}

impl ActionMetadata {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            category: String::new(),
            version: InterfaceVersion::new(1, 0),
            execution_mode: ExecutionMode::Dynamic,
            input_schema: None,
            output_schema: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.version = InterfaceVersion::new(major, minor);
        self
    }

    #[must_use]
    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    #[must_use]
    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    #[must_use]
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Discriminant for the runner's execution shape (§4.2.2 runner factory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Stateless single-call runner — the common case for `ACTION`/`EXTERNAL_ACTION`/`FLOW`.
    Process,
    /// Event source that starts or resumes workflows (`TRIGGER`).
    Trigger,
    /// Pauses for a human response (`HUMAN_IN_THE_LOOP`).
    Interactive,
}

/// Whether a runner's I/O is strongly typed or dynamic JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    Typed,
    Dynamic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_builder() {
        let meta = ActionMetadata::new("ACTION/HTTP_REQUEST", "HTTP Request", "Make HTTP calls")
            .with_category("network")
            .with_version(2, 1)
            .with_execution_mode(ExecutionMode::Typed);

        assert_eq!(meta.key, "ACTION/HTTP_REQUEST");
        assert_eq!(meta.version, InterfaceVersion::new(2, 1));
        assert_eq!(meta.execution_mode, ExecutionMode::Typed);
    }

    #[test]
    fn interface_version_compatibility() {
        let v1_0 = InterfaceVersion::new(1, 0);
        let v1_2 = InterfaceVersion::new(1, 2);
        let v2_0 = InterfaceVersion::new(2, 0);
        assert!(v1_0.is_compatible_with(&v1_2));
        assert!(!v1_2.is_compatible_with(&v1_0));
        assert!(!v1_0.is_compatible_with(&v2_0));
    }

    #[test]
    fn default_metadata_values() {
        let meta = ActionMetadata::new("test", "Test", "A test runner");
        assert_eq!(meta.version, InterfaceVersion::new(1, 0));
        assert_eq!(meta.execution_mode, ExecutionMode::Dynamic);
        assert!(meta.input_schema.is_none());
        assert!(meta.output_schema.is_none());
    }
}
