#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Scheduler
//!
//! Trigger deployment, event routing, and cron firing for the workflow
//! engine.
//!
//! This crate owns the Trigger Index and the pure routing logic that sits
//! between an inbound external event (a webhook call, a Slack message, a
//! cron tick) and whatever actually runs or resumes an Execution. It never
//! calls that orchestrator directly: [`CronFireHandler`] and
//! [`DistributedLock`] are traits the orchestrator and its lock backend
//! implement, keeping this crate's dependency direction one-way.
//!
//! - [`Deployer`] — the `UNDEPLOYED`/`DEPLOYED` state machine (§4.3.1)
//! - [`TriggerIndex`] — the concurrent `(subtype, index_key)` lookup table (§4.3.2)
//! - [`route`] — two-phase event routing (§4.3.3)
//! - [`run_tick`] / [`deterministic_jitter`] — cron firing with jitter and a
//!   single-flight lock (§4.3.4)
//! - [`decide_resume`] — smart resume, preferring a paused execution over a
//!   fresh run (§4.3.5)

mod cron;
mod deployment;
mod error;
mod lock;
mod resume;
mod router;
mod trigger_index;

pub use cron::{deterministic_jitter, run_tick, CronFireHandler};
pub use deployment::{DeploymentHistoryEvent, DeploymentStatus, Deployer};
pub use error::SchedulerError;
pub use lock::{cron_lock_key, DistributedLock, LockError, LockGuard, MIN_CRON_LOCK_TTL};
pub use resume::{decide as decide_resume, ResumeDecision};
pub use router::{route, InboundEvent, TriggerMatch};
pub use trigger_index::{
    derive_index_key, IndexRowStatus, TriggerIndex, TriggerIndexRow, TriggerSubtype,
};
