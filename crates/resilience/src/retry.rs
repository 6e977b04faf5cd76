//! The retry loop itself, decoupled from any specific runner error type.
//!
//! The engine decides retryability per its own error taxonomy
//! (`RunnerError::Retryable`/`Fatal` and friends); this crate only knows how
//! to wait between attempts, so [`retry_with_backoff`] takes a predicate
//! instead of depending on a fixed error enum.

use std::future::Future;

use tracing::debug;

use crate::policy::RetryPolicy;

/// Returned once the retry budget is exhausted or a non-retryable error is
/// hit. Carries the last error the operation produced.
#[derive(Debug, thiserror::Error)]
#[error("retry budget exhausted after {attempts} attempt(s)")]
pub struct RetryExhausted<E> {
    /// Attempts actually made, including the first.
    pub attempts: u32,
    /// The error from the final attempt.
    pub last_error: E,
}

/// Runs `operation` under `policy`, retrying while `is_retryable` returns
/// `true` for the error it produced.
///
/// A per-attempt timeout is the caller's responsibility: wrap `operation` in
/// `tokio::time::timeout` and fold the elapsed case into the same error type
/// `is_retryable` inspects. The timed-out attempt still counts against
/// `policy.max_attempts` once it does.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut is_retryable: impl FnMut(&E) -> bool,
    mut operation: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !policy.has_attempts_remaining(attempt) || !is_retryable(&error) {
                    return Err(RetryExhausted { attempts: attempt, last_error: error });
                }
                let delay = policy.backoff.delay_for_attempt(attempt);
                debug!(attempt, ?delay, "retrying after backoff");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
