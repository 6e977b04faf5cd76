//! Core-level error type.
//!
//! Kept deliberately small: this crate only produces parsing/validation
//! errors for the primitives it defines. The engine, registry, and scheduler
//! crates define their own richer error taxonomies (see `nebula-error`) and
//! wrap `CoreError` where a core primitive is the root cause.

use crate::id::UuidParseError;
use crate::timeout::TimeoutError;

/// Errors that can occur while working with core primitives.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An identifier string did not parse as a UUID.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] UuidParseError),

    /// A timeout value fell outside the accepted range.
    #[error(transparent)]
    InvalidTimeout(#[from] TimeoutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_displays_source() {
        let err = crate::id::NodeId::parse("nope").unwrap_err();
        let wrapped = CoreError::from(err);
        assert!(wrapped.to_string().contains("invalid identifier"));
    }
}
