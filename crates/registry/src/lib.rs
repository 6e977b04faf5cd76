//! The Node Specification Registry: a process-wide catalog of node schemas
//! used to validate, normalize, and shape the output of every node in a
//! workflow (§4.1).

mod builtin;
mod error;
mod param_schema;
mod registry;
mod spec;

pub use error::RegistryError;
pub use param_schema::{ParamSchema, ParamType};
pub use registry::Registry;
pub use spec::NodeSpec;

pub mod prelude {
    pub use crate::{ParamSchema, ParamType, Registry, RegistryError, NodeSpec};
}
