use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lower bound for any timeout expressed in this codebase (seconds).
pub const MIN_TIMEOUT_SECONDS: u32 = 60;
/// Upper bound for any timeout expressed in this codebase (seconds).
pub const MAX_TIMEOUT_SECONDS: u32 = 86_400;

/// A timeout duration, always expressed in whole seconds and always within
/// `[MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS]`.
///
/// The source system this engine is modeled on mixed `timeout_hours` and
/// `timeout_seconds` across different node types. This type standardizes on
/// seconds everywhere and rejects out-of-range values at construction time
/// rather than at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeoutSeconds(u32);

impl TimeoutSeconds {
    /// Construct a timeout, rejecting values outside the accepted range.
    pub fn new(seconds: u32) -> Result<Self, TimeoutError> {
        if (MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&seconds) {
            Ok(Self(seconds))
        } else {
            Err(TimeoutError::OutOfRange { seconds })
        }
    }

    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl TryFrom<u32> for TimeoutSeconds {
    type Error = TimeoutError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeoutSeconds> for u32 {
    fn from(value: TimeoutSeconds) -> Self {
        value.0
    }
}

/// Error constructing a [`TimeoutSeconds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeoutError {
    #[error(
        "timeout of {seconds}s is out of the accepted range [{MIN_TIMEOUT_SECONDS}, {MAX_TIMEOUT_SECONDS}]"
    )]
    OutOfRange { seconds: u32 },
}
