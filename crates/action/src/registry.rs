use std::collections::HashMap;
use std::sync::Arc;

use crate::action::Action;
use crate::metadata::ActionMetadata;

/// Type-erased registry mapping a node's runner key (`"{TYPE}/{SUBTYPE}"`)
/// to the runner implementation that executes it (§4.2.2 runner factory).
///
/// Populated once at engine startup. Runners are stored as `Arc<dyn Action>`
/// to allow shared ownership across concurrent executions (§5).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use nebula_action::{ActionRegistry, ActionMetadata, ActionType, Action};
///
/// struct NoOp(ActionMetadata);
/// impl Action for NoOp {
///     fn metadata(&self) -> &ActionMetadata { &self.0 }
///     fn action_type(&self) -> ActionType { ActionType::Process }
/// }
///
/// let mut registry = ActionRegistry::new();
/// let runner = Arc::new(NoOp(ActionMetadata::new("ACTION/NOOP", "No-Op", "Does nothing")));
/// registry.register(runner);
///
/// assert!(registry.get("ACTION/NOOP").is_some());
/// assert!(registry.get("ACTION/UNKNOWN").is_none());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default)]
pub struct ActionRegistry {
    runners: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a runner. Overwrites any existing runner with the same key.
    pub fn register(&mut self, runner: Arc<dyn Action>) {
        let key = runner.metadata().key.clone();
        self.runners.insert(key, runner);
    }

    /// Look up a runner by its key.
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Action>> {
        self.runners.get(key)
    }

    /// Check whether a runner with the given key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.runners.contains_key(key)
    }

    /// Return metadata for all registered runners.
    pub fn list(&self) -> Vec<&ActionMetadata> {
        self.runners.values().map(|a| a.metadata()).collect()
    }

    /// Number of registered runners.
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// Returns `true` if no runners are registered.
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Remove a runner by key. Returns the removed runner, if any.
    pub fn unregister(&mut self, key: &str) -> Option<Arc<dyn Action>> {
        self.runners.remove(key)
    }

    /// Iterate over all registered `(key, runner)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Action>)> {
        self.runners.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.runners.len())
            .field("keys", &self.runners.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ActionMetadata, ActionType};

    struct DummyAction(ActionMetadata);

    impl Action for DummyAction {
        fn metadata(&self) -> &ActionMetadata {
            &self.0
        }
        fn action_type(&self) -> ActionType {
            ActionType::Process
        }
    }

    fn make_action(key: &str, name: &str) -> Arc<dyn Action> {
        Arc::new(DummyAction(ActionMetadata::new(key, name, "test")))
    }

    #[test]
    fn empty_registry() {
        let reg = ActionRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.get("anything").is_none());
    }

    #[test]
    fn register_and_get() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/HTTP_REQUEST", "HTTP Request"));

        assert_eq!(reg.len(), 1);
        assert!(!reg.is_empty());

        let action = reg.get("ACTION/HTTP_REQUEST").unwrap();
        assert_eq!(action.metadata().key, "ACTION/HTTP_REQUEST");
        assert_eq!(action.metadata().name, "HTTP Request");
    }

    #[test]
    fn contains() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/A", "A"));
        assert!(reg.contains("ACTION/A"));
        assert!(!reg.contains("ACTION/B"));
    }

    #[test]
    fn overwrite_existing() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/X", "Version 1"));
        reg.register(make_action("ACTION/X", "Version 2"));

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("ACTION/X").unwrap().metadata().name, "Version 2");
    }

    #[test]
    fn list_metadata() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/A", "Action A"));
        reg.register(make_action("ACTION/B", "Action B"));

        let mut names: Vec<&str> = reg.list().iter().map(|m| m.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Action A", "Action B"]);
    }

    #[test]
    fn unregister() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/TEMP", "Temporary"));

        let removed = reg.unregister("ACTION/TEMP");
        assert!(removed.is_some());
        assert!(reg.is_empty());

        let removed_again = reg.unregister("ACTION/TEMP");
        assert!(removed_again.is_none());
    }

    #[test]
    fn iter_actions() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/A", "A"));
        reg.register(make_action("ACTION/B", "B"));

        let mut keys: Vec<&str> = reg.iter().map(|(k, _)| k).collect();
        keys.sort();
        assert_eq!(keys, vec!["ACTION/A", "ACTION/B"]);
    }

    #[test]
    fn debug_format() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("ACTION/TEST", "Test"));
        let debug = format!("{reg:?}");
        assert!(debug.contains("ActionRegistry"));
        assert!(debug.contains("count: 1"));
    }
}
