//! Logger builder implementation
//!
//! This module is organized into:
//! - `reload`: Runtime filter reload logic

mod reload;

pub use reload::ReloadHandle;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::LogResult;
use crate::{
    config::{Config, Format},
    writer,
};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger alive
///
/// This guard ensures that all logging infrastructure stays alive for the lifetime
/// of the guard. When dropped, the logger will be properly shut down.
#[derive(Debug)]
pub struct LoggerGuard {
    #[allow(dead_code)]
    inner: Option<Box<Inner>>,
}

pub(crate) struct Inner {
    pub(crate) reload_handle: Option<ReloadHandle>,
    /// RAII guard for root span - intentionally prefixed with _ to indicate it's never accessed
    #[allow(clippy::used_underscore_binding)]
    pub(crate) _root_span_guard: Option<tracing::span::EnteredSpan>,
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner").finish_non_exhaustive()
    }
}

/// Finishes a subscriber with the `FieldsLayer` attached only when fields are
/// non-empty, then installs it as the global default.
macro_rules! init_subscriber {
    ($filter_layer:expr, $fmt_layer:expr, $fields:expr) => {{
        let fields = $fields.clone();
        if fields.is_empty() {
            Registry::default().with($filter_layer).with($fmt_layer).init();
        } else {
            Registry::default()
                .with($filter_layer)
                .with($fmt_layer)
                .with(crate::layer::fields::FieldsLayer::new(fields))
                .init();
        }
    }};
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and initialize the logger
    ///
    /// # Errors
    ///
    /// Returns an error if the filter string cannot be parsed or the writer
    /// cannot be set up.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let mut inner = Inner { reload_handle: None, _root_span_guard: None };

        let filter = EnvFilter::try_new(&self.config.level).map_err(|e| {
            use crate::core::LogError;
            LogError::Filter(format!("{}: {}", &self.config.level, e))
        })?;

        let (writer, _guards) = writer::make_writer(&self.config.writer)?;

        let (filter_layer, reload_handle) =
            reload::create_filter_layer(filter, &self.config.level, self.config.reloadable);
        inner.reload_handle = reload_handle;

        let display = &self.config.display;
        let timer = crate::format::make_timer(display.time_format.as_deref());

        match self.config.format {
            Format::Pretty => {
                let fmt_layer = fmt::layer()
                    .pretty()
                    .with_writer(writer)
                    .with_ansi(display.colors)
                    .with_target(display.target)
                    .with_thread_ids(display.thread_ids)
                    .with_thread_names(display.thread_names)
                    .with_timer(timer)
                    .with_file(display.source)
                    .with_line_number(display.source);
                init_subscriber!(filter_layer, fmt_layer, self.config.fields);
            }
            Format::Compact | Format::Logfmt => {
                let fmt_layer = fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(display.colors)
                    .with_target(display.target)
                    .with_thread_ids(display.thread_ids)
                    .with_thread_names(display.thread_names)
                    .with_timer(timer)
                    .with_file(display.source)
                    .with_line_number(display.source);
                init_subscriber!(filter_layer, fmt_layer, self.config.fields);
            }
            Format::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .flatten_event(display.flatten)
                    .with_writer(writer)
                    .with_target(display.target)
                    .with_thread_ids(display.thread_ids)
                    .with_thread_names(display.thread_names)
                    .with_timer(timer)
                    .with_file(display.source)
                    .with_line_number(display.source);
                init_subscriber!(filter_layer, fmt_layer, self.config.fields);
            }
        }

        if !self.config.fields.is_empty() {
            let root = tracing::info_span!(
                "app",
                service = self.config.fields.service.as_deref().unwrap_or(""),
                env = self.config.fields.env.as_deref().unwrap_or(""),
                version = self.config.fields.version.as_deref().unwrap_or(""),
                instance = self.config.fields.instance.as_deref().unwrap_or(""),
                region = self.config.fields.region.as_deref().unwrap_or("")
            );
            inner._root_span_guard = Some(root.entered());
        }

        Ok(LoggerGuard { inner: Some(Box::new(inner)) })
    }
}

impl LoggerGuard {
    #[cfg(test)]
    pub(crate) fn noop() -> Self {
        Self { inner: None }
    }
}
