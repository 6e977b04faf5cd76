//! Shared error taxonomy for the workflow engine and trigger scheduler.
//!
//! Every crate in this workspace defines its own narrow error enum close to
//! the code that raises it (`RegistryError`, `RunnerError`, `ExecutionError`,
//! `SchedulerError`, ...). This crate defines the structured, user-facing
//! shape those errors collapse into at the API boundary (§6.1/§7 of the
//! design document), plus the small set of categories shared by every
//! narrower error type: retryable vs. fatal, and the presence of a
//! human-actionable `solution` hint.

use serde::{Deserialize, Serialize};

/// Whether the engine should retry the operation that produced this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Transient — may succeed if retried (network blip, 5xx, rate limit).
    Retryable,
    /// Permanent — retrying will not help (validation, schema, auth).
    Fatal,
    /// Execution was cancelled; neither retryable nor fatal in the
    /// business sense.
    Cancelled,
}

impl ErrorCategory {
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }

    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// The structured error shape returned across every external interface
/// (§6.1 `Engine control API`, §6.2 `Scheduler control API`).
///
/// `solution` is populated for errors a human can act on directly, e.g.
/// missing OAuth credentials: `"connect X account at /integrations/connect/X"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

impl ErrorDetails {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            solution: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }
}

/// Top-level error code for engine invariant violations (§7 category 5).
///
/// These are bugs in a workflow definition or a genuine scheduler
/// impossibility, never a transient condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    /// The scheduling graph (after filtering attached nodes) contains a cycle.
    Cycle,
    /// A node can never become ready given the recorded upstream state.
    UnreachableNode,
    /// An `attached_nodes` reference points at a node that is not TOOL/MEMORY,
    /// or that also appears in `connections`.
    InvalidAttachment,
}

impl InvariantViolation {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cycle => "invariant_violation.cycle",
            Self::UnreachableNode => "invariant_violation.unreachable_node",
            Self::InvalidAttachment => "invariant_violation.invalid_attachment",
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_predicates() {
        assert!(ErrorCategory::Retryable.is_retryable());
        assert!(!ErrorCategory::Retryable.is_fatal());
        assert!(ErrorCategory::Fatal.is_fatal());
        assert!(!ErrorCategory::Cancelled.is_fatal());
        assert!(!ErrorCategory::Cancelled.is_retryable());
    }

    #[test]
    fn error_details_builder() {
        let err = ErrorDetails::new("auth_missing", "OAuth token missing")
            .with_solution("connect X account at /integrations/connect/X");
        assert_eq!(err.code, "auth_missing");
        assert_eq!(
            err.solution.as_deref(),
            Some("connect X account at /integrations/connect/X")
        );
    }

    #[test]
    fn invariant_violation_codes() {
        assert_eq!(InvariantViolation::Cycle.code(), "invariant_violation.cycle");
        assert_eq!(InvariantViolation::Cycle.to_string(), "invariant_violation.cycle");
    }

    #[test]
    fn error_details_serde_omits_absent_fields() {
        let err = ErrorDetails::new("x", "y");
        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("solution").is_none());
    }
}
