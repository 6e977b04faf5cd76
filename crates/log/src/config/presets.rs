//! Configuration presets for the engine's own deployment shapes.
//!
//! The module-scoped filters below (`nebula_engine=…,nebula_execution=…`)
//! follow the logging policy in SPEC_FULL.md: lifecycle transitions at
//! `info`, passthrough dispatch and retries at `warn`, terminal failures at
//! `error` — so a deployment can turn the engine's own chatter up or down
//! without touching every other crate's default.

use super::{Config, DisplayConfig, Fields, Format};

const ENGINE_TARGETS: &[&str] = &["nebula_engine", "nebula_execution", "nebula_scheduler"];

/// Builds an `EnvFilter` directive string: `base_level`, plus one
/// `target=engine_level` clause per entry in [`ENGINE_TARGETS`].
fn scoped_filter(base_level: &str, engine_level: &str) -> String {
    let mut filter = base_level.to_string();
    for target in ENGINE_TARGETS {
        filter.push(',');
        filter.push_str(target);
        filter.push('=');
        filter.push_str(engine_level);
    }
    filter
}

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Parse NEBULA_LOG or RUST_LOG
        if let Ok(level) = std::env::var("NEBULA_LOG") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }

        // Parse format
        if let Ok(format) = std::env::var("NEBULA_LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "pretty" => Format::Pretty,
                "json" => Format::Json,
                "logfmt" => Format::Logfmt,
                _ => Format::Compact,
            };
        }

        // Parse display options
        config.display.parse_env();

        // Parse fields from env
        config.fields = Fields::from_env();

        config
    }

    /// Development configuration: pretty-printed, debug level, and the
    /// engine crates explicitly at `trace` so a branch/merge/HIL run can be
    /// followed node by node without drowning in dependency noise.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: scoped_filter("debug", "trace"),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration: JSON, info level, reloadable so an operator
    /// can raise the engine crates to `debug` on a live worker to chase down
    /// a stuck execution without a restart.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: scoped_filter("info", "info"),
            format: Format::Json,
            reloadable: true,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Worker configuration: production's settings with thread ids on,
    /// since a multi-thread runtime running several executions at once
    /// needs them to tell one execution's interleaved spans apart from
    /// another's in a flat JSON stream (§"Scheduling model": multiple
    /// executions proceed in parallel across workers).
    #[must_use]
    pub fn worker() -> Self {
        let production = Self::production();
        Self { display: DisplayConfig { thread_ids: true, ..production.display.clone() }, ..production }
    }

    /// Test configuration (captures output)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}
