use std::time::Duration;

/// Error type every runner raises. Distinguishes retryable from fatal
/// failures so the engine can decide retry policy (§4.2.2d) without the
/// runner knowing about resilience patterns (§7).
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// Transient failure — the engine's retry envelope may retry this.
    #[error("retryable: {error}")]
    Retryable {
        error: String,
        /// Suggested delay before retry; the engine's own backoff config wins.
        backoff_hint: Option<Duration>,
        partial_output: Option<serde_json::Value>,
    },

    /// Permanent failure — never retried.
    #[error("fatal: {error}")]
    Fatal {
        error: String,
        details: Option<serde_json::Value>,
        /// User-facing remediation, e.g. "connect X account at /integrations/connect/X"
        /// (§7 point 6: authentication failures carry a solution, never a silent fallback).
        solution: Option<String>,
    },

    /// Input validation failed before execution began.
    #[error("validation: {0}")]
    Validation(String),

    /// The per-node or per-HIL timeout elapsed (§7 point 4).
    #[error("timeout after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// Execution cancelled via cancellation token.
    #[error("cancelled")]
    Cancelled,
}

impl RunnerError {
    #[must_use]
    pub fn retryable(msg: impl Into<String>) -> Self {
        Self::Retryable {
            error: msg.into(),
            backoff_hint: None,
            partial_output: None,
        }
    }

    #[must_use]
    pub fn retryable_with_backoff(msg: impl Into<String>, backoff: Duration) -> Self {
        Self::Retryable {
            error: msg.into(),
            backoff_hint: Some(backoff),
            partial_output: None,
        }
    }

    #[must_use]
    pub fn retryable_with_partial(msg: impl Into<String>, partial: serde_json::Value) -> Self {
        Self::Retryable {
            error: msg.into(),
            backoff_hint: None,
            partial_output: Some(partial),
        }
    }

    #[must_use]
    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal {
            error: msg.into(),
            details: None,
            solution: None,
        }
    }

    #[must_use]
    pub fn fatal_with_details(msg: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Fatal {
            error: msg.into(),
            details: Some(details),
            solution: None,
        }
    }

    #[must_use]
    pub fn fatal_with_solution(msg: impl Into<String>, solution: impl Into<String>) -> Self {
        Self::Fatal {
            error: msg.into(),
            details: None,
            solution: Some(solution.into()),
        }
    }

    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. } | Self::Validation(_))
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    #[must_use]
    pub const fn backoff_hint(&self) -> Option<Duration> {
        match self {
            Self::Retryable { backoff_hint, .. } => *backoff_hint,
            _ => None,
        }
    }

    #[must_use]
    pub const fn partial_output(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Retryable { partial_output, .. } => partial_output.as_ref(),
            _ => None,
        }
    }
}
