use crate::metadata::{ActionMetadata, ActionType};

/// Base trait every runner implements. Provides identity and metadata; the
/// engine uses this to pick a dispatch path. Execution logic itself lives
/// behind `nebula-engine`'s own call sites, keyed by `ActionType` (§4.2.2).
///
/// Object-safe: the engine stores runners as `Arc<dyn Action>` in the
/// registry.
pub trait Action: Send + Sync + 'static {
    fn metadata(&self) -> &ActionMetadata;
    fn action_type(&self) -> ActionType;
}
