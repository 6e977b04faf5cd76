//! Expression engine: parses and evaluates expressions, with optional caching
//! of parsed ASTs and templates.

use crate::builtins::BuiltinRegistry;
use crate::context::EvaluationContext;
use crate::core::ast::Expr;
use crate::core::error::ExpressionResult;
use crate::eval::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::Template;
use nebula_log::{debug, trace};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time cache occupancy and hit-rate counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheMetrics {
    /// Number of lookups that found a cached entry.
    pub hits: u64,
    /// Number of lookups that required a fresh parse.
    pub misses: u64,
    /// Approximate number of entries currently cached.
    pub entry_count: u64,
}

#[cfg(feature = "cache")]
struct Cache<V> {
    inner: moka::sync::Cache<Arc<str>, Arc<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[cfg(feature = "cache")]
impl<V: Clone + Send + Sync + 'static> Cache<V> {
    fn new(capacity: u64) -> Self {
        Self {
            inner: moka::sync::Cache::new(capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn get_or_try_insert_with<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(cached) = self.inner.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(compute()?);
        self.inner.insert(Arc::from(key), Arc::clone(&value));
        Ok(value)
    }

    fn clear(&self) {
        self.inner.invalidate_all();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.inner.entry_count(),
        }
    }
}

/// Parses and evaluates expressions and `{{ }}` templates.
pub struct ExpressionEngine {
    #[cfg(feature = "cache")]
    expr_cache: Option<Cache<Expr>>,
    #[cfg(feature = "cache")]
    template_cache: Option<Cache<Template>>,
    builtins: Arc<BuiltinRegistry>,
    evaluator: Evaluator,
}

impl ExpressionEngine {
    /// Create an engine with no caching — every `evaluate`/`parse_template` call reparses.
    #[must_use]
    pub fn new() -> Self {
        let builtins = Arc::new(BuiltinRegistry::new());
        let evaluator = Evaluator::new(Arc::clone(&builtins));

        Self {
            #[cfg(feature = "cache")]
            expr_cache: None,
            #[cfg(feature = "cache")]
            template_cache: None,
            builtins,
            evaluator,
        }
    }

    /// Create an engine with a shared cache capacity for both expressions and templates.
    #[cfg(feature = "cache")]
    #[must_use]
    pub fn with_cache_size(size: usize) -> Self {
        Self::with_cache_sizes(size, size)
    }

    /// Create an engine with independently-sized expression and template caches.
    #[cfg(feature = "cache")]
    #[must_use]
    pub fn with_cache_sizes(expr_cache_size: usize, template_cache_size: usize) -> Self {
        let builtins = Arc::new(BuiltinRegistry::new());
        let evaluator = Evaluator::new(Arc::clone(&builtins));

        debug!(
            expr_cache_size,
            template_cache_size, "creating expression engine with AST and template caches"
        );

        Self {
            expr_cache: Some(Cache::new(expr_cache_size as u64)),
            template_cache: Some(Cache::new(template_cache_size as u64)),
            builtins,
            evaluator,
        }
    }

    /// Register a custom builtin function. Must be called before the engine is shared
    /// across threads (it requires unique ownership of the builtin registry).
    ///
    /// # Panics
    /// Panics if the registry has already been shared (e.g. an `Evaluator` clone exists).
    pub fn register_function(&mut self, name: &str, func: crate::builtins::BuiltinFunction) {
        Arc::get_mut(&mut self.builtins)
            .expect("cannot register a function after the builtin registry has been shared")
            .register(name, func);
    }

    /// Evaluate an expression string (optionally wrapped in `{{ }}`) against `context`.
    pub fn evaluate(&self, expression: &str, context: &EvaluationContext) -> ExpressionResult<Value> {
        trace!(expression, "evaluating expression");

        #[cfg(feature = "cache")]
        let ast = if let Some(cache) = &self.expr_cache {
            cache.get_or_try_insert_with(expression, || self.parse_expression(expression))?
        } else {
            Arc::new(self.parse_expression(expression)?)
        };
        #[cfg(not(feature = "cache"))]
        let ast = self.parse_expression(expression)?;

        let result = self.evaluator.eval(&ast, context)?;
        trace!(?result, "expression evaluation completed");
        Ok(result)
    }

    /// Parse (or fetch from cache) a `{{ }}`-delimited template.
    pub fn parse_template(&self, source: impl Into<String>) -> ExpressionResult<Template> {
        let source_str = source.into();

        #[cfg(feature = "cache")]
        if let Some(cache) = &self.template_cache {
            let template = cache.get_or_try_insert_with(&source_str, || Template::new(&source_str))?;
            return Ok((*template).clone());
        }

        Template::new(source_str)
    }

    /// Alias for [`Self::parse_template`].
    pub fn get_template(&self, source: impl Into<String>) -> ExpressionResult<Template> {
        self.parse_template(source)
    }

    /// Render an already-parsed template against `context`.
    pub fn render_template(&self, template: &Template, context: &EvaluationContext) -> ExpressionResult<String> {
        template.render(self, context)
    }

    fn parse_expression(&self, expression: &str) -> ExpressionResult<Expr> {
        let trimmed = expression.trim();
        let content = if let Some(inner) = trimmed
            .strip_prefix("{{")
            .and_then(|s| s.strip_suffix("}}"))
        {
            inner.trim()
        } else {
            expression
        };

        let tokens = Lexer::new(content).tokenize()?;
        Parser::new(tokens).parse()
    }

    /// Drop all cached ASTs and templates.
    pub fn clear_cache(&self) {
        self.clear_expr_cache();
        self.clear_template_cache();
    }

    /// Drop cached ASTs only.
    pub fn clear_expr_cache(&self) {
        #[cfg(feature = "cache")]
        if let Some(cache) = &self.expr_cache {
            cache.clear();
            debug!("expression cache cleared");
        }
    }

    /// Drop cached templates only.
    pub fn clear_template_cache(&self) {
        #[cfg(feature = "cache")]
        if let Some(cache) = &self.template_cache {
            cache.clear();
            debug!("template cache cleared");
        }
    }

    /// Expression-AST cache occupancy and hit rate, if caching is enabled.
    #[cfg(feature = "cache")]
    #[must_use]
    pub fn expr_cache_stats(&self) -> Option<CacheMetrics> {
        self.expr_cache.as_ref().map(Cache::metrics)
    }

    /// Template cache occupancy and hit rate, if caching is enabled.
    #[cfg(feature = "cache")]
    #[must_use]
    pub fn template_cache_stats(&self) -> Option<CacheMetrics> {
        self.template_cache.as_ref().map(Cache::metrics)
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}
