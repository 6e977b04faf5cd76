//! Retry/backoff envelope (§4.2.2d): how many attempts a node gets and how
//! long the engine waits between them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the delay between retry attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BackoffPolicy {
    /// Same delay before every retry.
    Fixed {
        /// Delay before each retry.
        delay: Duration,
    },
    /// `initial_delay * factor^attempt`, capped at `max_delay`.
    Exponential {
        /// Delay before the first retry (attempt 1).
        initial_delay: Duration,
        /// Growth factor applied per additional attempt.
        factor: f64,
        /// Upper bound on the computed delay.
        max_delay: Duration,
    },
}

impl Default for BackoffPolicy {
    /// `initial_delay = 1s`, `factor = 2.0` — the engine's default backoff.
    fn default() -> Self {
        Self::Exponential {
            initial_delay: Duration::from_secs(1),
            factor: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    /// Delay before the given 1-indexed retry attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed { delay } => delay,
            Self::Exponential { initial_delay, factor, max_delay } => {
                let exponent = attempt.saturating_sub(1) as i32;
                let scaled = initial_delay.as_secs_f64() * factor.powi(exponent);
                Duration::from_secs_f64(scaled.max(0.0)).min(max_delay)
            }
        }
    }
}

/// Retry envelope for a single node's runner invocations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first try. `1` means no retries.
    pub max_attempts: u32,
    /// Delay schedule applied between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 1, backoff: BackoffPolicy::default() }
    }
}

impl RetryPolicy {
    /// Builds the policy from a workflow's `retry_attempts` configuration
    /// value. `0` (the configuration default) still means one try, not zero.
    #[must_use]
    pub fn from_retry_attempts(retry_attempts: u32) -> Self {
        Self {
            max_attempts: if retry_attempts == 0 { 1 } else { retry_attempts },
            backoff: BackoffPolicy::default(),
        }
    }

    /// Overrides the backoff policy, keeping `max_attempts`.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// `true` if another attempt remains after `attempts_so_far` tries.
    #[must_use]
    pub fn has_attempts_remaining(&self, attempts_so_far: u32) -> bool {
        attempts_so_far < self.max_attempts
    }
}
