//! Reload logic for runtime filter changes
//!
//! A production worker runs several executions concurrently (§"Scheduling
//! model"); raising the engine crates' level to chase a stuck execution
//! must not disturb those other executions' spans, so the swap below is the
//! only mutation this module makes to a running process.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, Registry, layer::Layer};

use crate::core::LogResult;

/// Handle for runtime configuration changes
#[derive(Clone)]
pub struct ReloadHandle {
    /// Filter reload handle - used by public reload() method
    #[allow(dead_code)]
    filter: tracing_subscriber::reload::Handle<EnvFilter, Registry>,
    /// Current filter string — lock-free reads via ArcSwap
    #[allow(dead_code)]
    current_filter: Arc<ArcSwap<String>>,
    /// Number of successful reloads since process start, surfaced so an
    /// operator can tell a filter change actually took effect rather than
    /// silently failing upstream of this handle.
    #[allow(dead_code)]
    generation: Arc<AtomicU64>,
}

impl ReloadHandle {
    /// Reload the log filter at runtime
    ///
    /// # Errors
    /// Returns error if filter parsing fails or reload fails
    #[allow(dead_code)]
    pub fn reload(&self, filter: &str) -> LogResult<()> {
        use crate::core::LogError;
        let new_filter = EnvFilter::try_new(filter)
            .map_err(|e| LogError::Filter(format!("{}: {}", filter, e)))?;
        self.filter
            .reload(new_filter)
            .map_err(|e| LogError::Config(format!("Failed to reload filter: {e}")))?;
        let previous = self.current_filter.swap(Arc::new(filter.to_string()));
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            previous_filter = %previous,
            new_filter = filter,
            generation,
            "log filter reloaded"
        );
        Ok(())
    }

    /// Get the current filter string
    #[allow(dead_code)]
    pub fn current_filter(&self) -> Arc<String> {
        self.current_filter.load_full()
    }

    /// Number of successful reloads since this handle was created.
    #[allow(dead_code)]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

/// Create a filter layer, optionally wrapping it in a reloadable layer
///
/// Returns:
/// - The filter layer (potentially wrapped in reload)
/// - Optional reload handle (if reloadable=true)
pub(super) fn create_filter_layer(
    filter: EnvFilter,
    level_str: &str,
    reloadable: bool,
) -> (
    Box<dyn Layer<Registry> + Send + Sync + 'static>,
    Option<ReloadHandle>,
) {
    if reloadable {
        let (layer, handle) = tracing_subscriber::reload::Layer::new(filter);
        let reload_handle = ReloadHandle {
            filter: handle,
            current_filter: Arc::new(ArcSwap::from_pointee(level_str.to_string())),
            generation: Arc::new(AtomicU64::new(0)),
        };
        (Box::new(layer), Some(reload_handle))
    } else {
        (Box::new(filter), None)
    }
}
