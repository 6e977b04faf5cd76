//! Structured logging for the engine, its runners, and the CLI.
//!
//! Zero-config by default — [`auto_init`] picks a pretty development format
//! or a JSON production format depending on `debug_assertions`, or honors
//! `NEBULA_LOG`/`RUST_LOG` if set.
//!
//! ```rust
//! use nebula_log::prelude::*;
//!
//! fn main() -> nebula_log::Result<()> {
//!     let _guard = nebula_log::auto_init()?;
//!     info!(port = 8080, "server starting");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod core;
mod format;
mod layer;
mod macros;
mod observability;
mod timer;
mod writer;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Fields, Format, Level, WriterConfig};
pub use core::{LogError, LogResult};
pub use layer::context::Context;
pub use observability::{ContextSnapshot, ExecutionContext, GlobalContext, NodeContext, ResourceMap, current_contexts};
pub use timer::{Timed, Timer, TimerGuard};

/// Common imports for call sites that just want to log.
pub mod prelude {
    pub use crate::{Level, Result, Timed, Timer, auto_init, debug, error, info, instrument, span, trace, warn};
    pub use tracing::{Span, field};
}

// Re-export tracing's own macros so callers depend on this crate alone.
pub use tracing::{debug, error, info, instrument, span, trace, warn};

/// Result type for logger setup.
pub type Result<T> = LogResult<T>;

#[cfg(test)]
static TEST_INIT: std::sync::OnceLock<()> = std::sync::OnceLock::new();

/// Auto-detect and initialize the best logging configuration.
///
/// `NEBULA_LOG` or `RUST_LOG` wins if set; otherwise development (pretty,
/// debug level) under `debug_assertions`, production (JSON, info level)
/// otherwise.
///
/// # Errors
///
/// Returns an error if the resolved filter string fails to parse.
pub fn auto_init() -> Result<LoggerGuard> {
    #[cfg(test)]
    {
        TEST_INIT.get_or_init(|| ());
        if tracing::dispatcher::has_been_set() {
            return Ok(LoggerGuard::noop());
        }
    }

    if std::env::var("NEBULA_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration.
///
/// # Errors
///
/// Returns an error if the default filter string fails to parse.
pub fn init() -> Result<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a caller-supplied configuration.
///
/// # Errors
///
/// Returns an error if `config.level` fails to parse as an `EnvFilter`.
pub fn init_with(config: Config) -> Result<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests. Safe to call from multiple tests in the same
/// process — only the first call installs a subscriber, later calls get a
/// no-op guard.
#[cfg(test)]
pub fn init_test() -> Result<LoggerGuard> {
    TEST_INIT.get_or_init(|| ());
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }
    init_with(Config::test())
}
