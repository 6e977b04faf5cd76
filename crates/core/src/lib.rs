//! # Nebula Core
//!
//! Identifiers and shared primitives used across every workflow engine crate.
//! This crate has no dependency on the engine, registry, or scheduler — it is
//! the leaf of the dependency graph so identifier types can be shared without
//! creating cycles.
//!
//! ## Usage
//!
//! ```rust
//! use nebula_core::{ExecutionId, NodeId, WorkflowId};
//!
//! let execution_id = ExecutionId::v4();
//! let workflow_id = WorkflowId::v4();
//! let node_id = NodeId::v4();
//! ```

mod error;
pub mod id;
mod timeout;
mod version;

pub use error::CoreError;
pub use id::{
    ActivationId, ExecutionId, ExecutionPauseId, InteractionId, NodeId, TriggerIndexId, UserId,
    UuidParseError, WorkflowId,
};
pub use timeout::{TimeoutError, TimeoutSeconds};
pub use version::InterfaceVersion;

/// Result type used throughout Nebula.
pub type Result<T> = std::result::Result<T, error::CoreError>;

/// Common prelude for Nebula crates.
pub mod prelude {
    pub use crate::{
        ActivationId, CoreError, ExecutionId, ExecutionPauseId, InteractionId, InterfaceVersion,
        NodeId, Result, TimeoutSeconds, TriggerIndexId, UserId, WorkflowId,
    };
}
