//! `tracing_subscriber::Layer` implementations.

pub mod context;
pub mod fields;

pub use context::Context;
pub use fields::FieldsLayer;
