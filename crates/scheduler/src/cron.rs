//! Cron firing (§4.3.4): deterministic per-workflow jitter plus a
//! distributed single-flight lock so only one scheduler instance runs a
//! given workflow's tick.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use nebula_core::WorkflowId;
use tracing::{debug, warn};

use crate::error::SchedulerError;
use crate::lock::{cron_lock_key, DistributedLock, LockGuard, MIN_CRON_LOCK_TTL};

/// Thirty-second jitter ceiling from §4.3.4 step 1.
const JITTER_CEILING: Duration = Duration::from_secs(30);

/// Deterministic jitter for a workflow: `hash(workflow_id) mod 30s`. Same
/// workflow always sleeps the same amount before firing, spreading a cohort
/// of simultaneously-due jobs without coordination.
#[must_use]
pub fn deterministic_jitter(workflow_id: WorkflowId) -> Duration {
    let mut hasher = DefaultHasher::new();
    workflow_id.hash(&mut hasher);
    Duration::from_millis(hasher.finish() % JITTER_CEILING.as_millis() as u64)
}

/// What the cron runner does once it owns a workflow's tick: starts an
/// Execution with `trigger_info.trigger_type = "CRON"` (§4.3.4 step 3).
/// A trait rather than a direct call into `nebula-engine` so this crate
/// never depends on the orchestrator crate built on top of it.
#[async_trait]
pub trait CronFireHandler: Send + Sync {
    /// Starts an Execution for `workflow_id` with `trigger_info.trigger_type
    /// = "CRON"`. Errors are the handler's own concern to log; this trait
    /// has no failure channel back to the cron runner.
    async fn fire(&self, workflow_id: WorkflowId);
}

/// Drives a single workflow's cron tick end to end: jitter, lock, fire,
/// release. Skips the tick entirely if the lock is already held (§4.3.4
/// step 2: "if not acquired, skip this tick").
pub async fn run_tick<L: DistributedLock>(
    lock: &L,
    handler: &dyn CronFireHandler,
    workflow_id: WorkflowId,
) -> Result<(), SchedulerError> {
    tokio::time::sleep(deterministic_jitter(workflow_id)).await;

    let key = cron_lock_key(workflow_id);
    let Some(guard) = lock.try_acquire(&key, MIN_CRON_LOCK_TTL).await? else {
        debug!(%workflow_id, "cron tick skipped, lock held elsewhere");
        return Ok(());
    };

    handler.fire(workflow_id).await;

    if let Err(e) = Box::new(guard).release().await {
        warn!(%workflow_id, error = %e, "failed to release cron lock after firing");
    }
    Ok(())
}
