//! Distributed single-flight lock (§4.3.4 step 2): `lock:workflow:{id}`
//! with TTL ≥ 5 minutes, so only one scheduler instance fires a given
//! workflow's cron tick.

use std::time::Duration;

use async_trait::async_trait;

/// Errors a lock backend can raise.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LockError {
    /// Another holder currently owns the key.
    #[error("lock is contended")]
    Contended,
    /// The lock expired or was released out from under its holder.
    #[error("lock was lost")]
    Lost,
    /// The backend (Redis, etcd, ...) failed.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Releases the lock when dropped or explicitly released.
#[async_trait]
pub trait LockGuard: Send {
    /// Releases the lock. Dropping the guard without calling this leaves
    /// the lock held until `ttl` elapses.
    async fn release(self: Box<Self>) -> Result<(), LockError>;
}

/// A distributed mutual-exclusion lock keyed by an opaque string.
///
/// Implementations back this with whatever the deployment uses for
/// cross-instance coordination (Redis `SET NX PX`, etcd lease, Postgres
/// advisory lock, ...); this crate only defines the contract the cron
/// runner needs.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Guard type returned on success.
    type Guard: LockGuard;

    /// Attempts to acquire `key` for `ttl`, returning immediately if it's
    /// already held (§4.3.4: "if not acquired, skip this tick").
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<Self::Guard>, LockError>;
}

/// The key a cron tick locks on for a given workflow.
#[must_use]
pub fn cron_lock_key(workflow_id: nebula_core::WorkflowId) -> String {
    format!("lock:workflow:{workflow_id}")
}

/// Minimum TTL §4.3.4 requires for the cron single-flight lock.
pub const MIN_CRON_LOCK_TTL: Duration = Duration::from_secs(5 * 60);
