//! Workflow definition and scheduling graph: the typed DAG a deployed
//! workflow compiles to, independent of any one execution's runtime state.

mod definition;
mod error;
mod graph;
mod node_type;
mod state;

pub use definition::{Connection, NodeDefinition, OnError, WorkflowConfig, WorkflowDefinition, DEFAULT_OUTPUT_KEY};
pub use error::WorkflowError;
pub use graph::DependencyGraph;
pub use node_type::NodeType;
pub use state::NodeState;

pub mod prelude {
    pub use crate::{
        Connection, DependencyGraph, NodeDefinition, NodeState, NodeType, OnError, WorkflowConfig,
        WorkflowDefinition, WorkflowError,
    };
}
