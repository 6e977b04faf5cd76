//! Error type for logger setup.

/// Result alias used throughout this crate's setup path.
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while building or reconfiguring the logger.
///
/// Once [`crate::LoggerGuard`] is built, logging itself never returns a
/// `Result` — these errors only occur during setup.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// An `EnvFilter` directive string failed to parse.
    #[error("invalid filter directive: {0}")]
    Filter(String),

    /// A writer (stdout/stderr) could not be constructed.
    #[error("failed to set up log writer: {0}")]
    Writer(String),

    /// Any other configuration error.
    #[error("logger configuration error: {0}")]
    Config(String),
}
