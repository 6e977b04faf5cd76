//! HIL timeout watcher (§4.2.3 "Timeout watcher"): scans paused executions
//! for ones past their `timeout_at` deadline and resumes each on its
//! `timeout` port.
//!
//! This crate has no database of its own, so it cannot enumerate paused
//! executions itself — the caller's persistence layer implements
//! [`PauseStore`] over however it stores `ExecutionPause`s. Once a timeout
//! fires, the resume result is published on an [`EventBus`] rather than
//! returned in bulk, the same decoupling `nebula_scheduler::CronFireHandler`
//! uses to keep this crate from depending on an orchestrator above it.

use chrono::{DateTime, Utc};
use nebula_core::{ExecutionId, NodeId};
use nebula_eventbus::EventBus;
use nebula_execution::ExecutionState;
use nebula_workflow::WorkflowDefinition;
use tracing::warn;

use crate::engine::{Engine, RunOutcome};
use crate::pause::ExecutionPause;

/// A paused execution as the watcher needs it: enough to call
/// `Engine::resume_from_timeout` without the watcher knowing how any of it
/// was stored.
pub struct PausedExecution {
    pub workflow: WorkflowDefinition,
    pub pause: ExecutionPause,
    pub state: ExecutionState,
}

/// Looks up executions paused past their deadline. Implemented by whatever
/// stores `ExecutionPause` records (§4.2.3: "Persist a pause record").
#[async_trait::async_trait]
pub trait PauseStore: Send + Sync {
    /// Every paused execution whose `timeout_at` is at or before `now`.
    async fn due_timeouts(&self, now: DateTime<Utc>) -> Vec<PausedExecution>;
}

/// Published once per resumed timeout, so callers that only care about
/// "a timeout just fired" don't need to poll `scan_once`'s return value.
#[derive(Debug, Clone)]
pub struct HilTimeoutElapsed {
    pub execution_id: ExecutionId,
    pub node_id: NodeId,
}

/// One pass over `store`: resumes every due pause on its `timeout` port and
/// emits a [`HilTimeoutElapsed`] for each. A node whose resume fails (e.g.
/// the pause record no longer matches the execution's current node) is
/// logged and skipped rather than aborting the rest of the scan.
pub async fn scan_once(store: &dyn PauseStore, engine: &Engine, bus: &EventBus<HilTimeoutElapsed>, now: DateTime<Utc>) -> Vec<RunOutcome> {
    let mut outcomes = Vec::new();
    for due in store.due_timeouts(now).await {
        let node_id = due.pause.current_node_id;
        let execution_id = due.state.execution_id;
        match engine.resume_from_timeout(&due.workflow, due.pause, due.state, node_id).await {
            Ok(outcome) => {
                bus.emit(HilTimeoutElapsed { execution_id, node_id });
                outcomes.push(outcome);
            }
            Err(error) => {
                warn!(%execution_id, %node_id, %error, "hil timeout resume failed");
            }
        }
    }
    outcomes
}
