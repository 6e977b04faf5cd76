//! `TRIGGER.*` runners (§4.2.4): echo the trigger payload onto the graph.

use async_trait::async_trait;
use nebula_action::{ActionContext, ActionMetadata, ActionResult, RunnerError};
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::runner::Runner;

/// Every trigger subtype the engine ships behaves identically once a run
/// has already started: the scheduler (`nebula-scheduler`) is what decides
/// *whether* and *when* to fire a trigger node; by the time the runner sees
/// it, firing has already happened and `trigger_info` is the event to emit.
pub struct TriggerEchoRunner {
    metadata: ActionMetadata,
}

impl TriggerEchoRunner {
    /// Build a trigger runner for `subtype` (`"MANUAL"`, `"WEBHOOK"`, `"CRON"`, ...).
    #[must_use]
    pub fn new(subtype: &str) -> Self {
        Self {
            metadata: ActionMetadata::new(format!("TRIGGER/{subtype}"), subtype, "Entry point for a workflow run")
                .with_category("trigger"),
        }
    }
}

#[async_trait]
impl Runner for TriggerEchoRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        _node: &NodeDefinition,
        _inputs: Value,
        trigger_info: &Value,
        _ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        Ok(ActionResult::success(trigger_info.clone()))
    }
}
