//! Hierarchical execution context, scoped to survive across `.await` points.
//!
//! `GlobalContext` is process-wide; `ExecutionContext`/`NodeContext` are
//! scoped per-task (or per-thread without the `async` feature) and nest —
//! entering a `NodeContext` inside an active `ExecutionContext` does not
//! clear the outer one.

mod context;

pub use context::{ContextSnapshot, ExecutionContext, GlobalContext, NodeContext, ResourceMap, current_contexts};
