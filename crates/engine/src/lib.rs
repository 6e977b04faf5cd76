#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Engine
//!
//! The workflow execution engine: `Run`/`ResumeExecution` (§4.2.1–§4.2.3),
//! the per-node-type runner factory (§4.2.4), and the HIL timeout watcher
//! (§4.2.3).
//!
//! This crate is the one orchestrator `nebula-scheduler`'s `CronFireHandler`
//! is written for — it depends down into `nebula-workflow`, `nebula-registry`,
//! `nebula-action`, `nebula-execution`, `nebula-expression`, `nebula-resilience`,
//! `nebula-eventbus`, and `nebula-scheduler`, never the other way.
//!
//! - [`Engine`] — builds the dependency graph, drives the main loop, and
//!   resolves pauses and resumes
//! - [`Runner`] / [`RunnerRegistry`] — per-node-type dispatch (§4.2.4)
//! - [`ExecutionPause`] / [`WorkItem`] — the continuation state a pause
//!   persists and a resume restores verbatim (§4.2.3)
//! - [`scan_once`] / [`PauseStore`] — the timeout watcher's single scan pass

mod engine;
mod error;
mod outputs;
mod pause;
mod runner;
mod runners;
mod timeout_watcher;

pub use engine::{AttachedNodeLoader, Engine, NoopAttachedNodeLoader, RunOutcome};
pub use error::EngineError;
pub use outputs::{is_graceful_break, resolve, Resolved};
pub use pause::{ExecutionPause, WorkItem};
pub use runner::{Runner, RunnerRegistry};
pub use runners::{
    builtin_runners, AiAgentRunner, CompletionProvider, DataTransformationRunner, FlowIfRunner, FlowMergeRunner,
    FlowSplitRunner, FlowWaitRunner, HilRunner, HttpClient, HttpRequestRunner, InteractionSink, NoopInteractionSink,
    PassthroughRunner, ScriptedHttpClient, ScriptedProvider, TriggerEchoRunner,
};
pub use timeout_watcher::{scan_once, HilTimeoutElapsed, PauseStore, PausedExecution};
