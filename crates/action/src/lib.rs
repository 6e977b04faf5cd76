//! # Nebula Action System
//!
//! Execution vocabulary shared by every node runner: identity, metadata,
//! the runtime context passed into a run, the result/error types a runner
//! returns, and the human-in-the-loop interaction shapes a `HUMAN_IN_THE_LOOP`
//! runner produces.
//!
//! This crate defines **what** a runner is and **how it communicates** with
//! the engine — not how the engine dispatches or retries it; that lives in
//! `nebula-engine` and `nebula-resilience`.
//!
//! ## Core Types
//!
//! - [`Action`] — base trait providing identity and metadata
//! - [`ActionResult`] — execution result carrying data and flow-control intent
//! - [`RunnerError`] — error type distinguishing retryable from fatal failures
//! - [`ActionContext`] — runtime context with IDs, variables, cancellation
//! - [`ActionMetadata`] — static descriptor (key, version, execution mode)
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_action::{Action, ActionMetadata, ActionType};
//!
//! struct NoOp(ActionMetadata);
//!
//! impl Action for NoOp {
//!     fn metadata(&self) -> &ActionMetadata { &self.0 }
//!     fn action_type(&self) -> ActionType { ActionType::Process }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Base action trait defining identity and metadata.
pub mod action;
/// Runtime context provided to runners during execution.
pub mod context;
/// Error type distinguishing retryable from fatal failures.
pub mod error;
/// Static metadata, versioning, and execution mode descriptors.
pub mod metadata;
/// Execution result type carrying data and flow-control intent.
pub mod result;
/// Runner registry for type-erased discovery and lookup.
pub mod registry;
mod types;

// ── Public re-exports ───────────────────────────────────────────────────────

pub use action::Action;
pub use context::ActionContext;
pub use error::RunnerError;
pub use metadata::{ActionMetadata, ActionType, ExecutionMode, InterfaceVersion};
pub use registry::ActionRegistry;
pub use result::{ActionResult, BreakReason, BranchKey, PortKey, WaitCondition};
pub use types::interactive::{ClassifierVerdict, DefaultHilClassifier, HilClassifier, InteractionRequest, InteractionResponse, InteractionType};
pub use types::trigger::{TriggerEvent, TriggerKind, WebhookRequest};
