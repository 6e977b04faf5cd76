//! `ACTION.*` runners (§4.2.4): `HTTP_REQUEST` and `DATA_TRANSFORMATION`.

use std::sync::Arc;

use async_trait::async_trait;
use nebula_action::{ActionContext, ActionMetadata, ActionResult, RunnerError};
use nebula_expression::{EvaluationContext, ExpressionEngine};
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::runner::Runner;

/// Issues the HTTP call a node configures. A trait rather than a direct
/// `reqwest` call: real network I/O and auth are out of scope for this
/// engine the same way real AI provider SDKs are (§4.2.5) — a production
/// deployment supplies its own client, this crate ships a scripted one for
/// tests and local runs.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform `method url` with an optional JSON `body`, returning the
    /// parsed JSON response or an error message.
    async fn execute(&self, method: &str, url: &str, body: Option<&Value>) -> Result<Value, String>;
}

/// Deterministic `HttpClient` for tests and demos: echoes the request back
/// as the response body instead of making a real call.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient;

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, method: &str, url: &str, body: Option<&Value>) -> Result<Value, String> {
        Ok(serde_json::json!({
            "method": method,
            "url": url,
            "echoed_body": body.cloned().unwrap_or(Value::Null),
            "status": 200,
        }))
    }
}

/// `ACTION/HTTP_REQUEST`: reads `url`/`method`/`body` from the node's
/// configuration, optionally templated against `inputs` via `{{ }}`
/// expressions, and returns the client's JSON response on `result`.
pub struct HttpRequestRunner {
    metadata: ActionMetadata,
    client: Arc<dyn HttpClient>,
}

impl HttpRequestRunner {
    /// Build the runner over `client`.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            metadata: ActionMetadata::new("ACTION/HTTP_REQUEST", "HTTP Request", "Make an HTTP call")
                .with_category("network"),
            client,
        }
    }
}

#[async_trait]
impl Runner for HttpRequestRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        ctx.check_cancelled()?;

        let url = node
            .configurations
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| RunnerError::validation("HTTP_REQUEST node is missing required \"url\" configuration"))?;
        let method = node.configurations.get("method").and_then(Value::as_str).unwrap_or("GET");
        let body = node.configurations.get("body").or_else(|| inputs.as_object().and_then(|_| Some(&inputs)));

        self.client
            .execute(method, url, body)
            .await
            .map(ActionResult::success)
            .map_err(RunnerError::retryable)
    }
}

/// `ACTION/DATA_TRANSFORMATION`: evaluates a configured expression against
/// `inputs` and passes its result through on `result`.
pub struct DataTransformationRunner {
    metadata: ActionMetadata,
    engine: ExpressionEngine,
}

impl DataTransformationRunner {
    /// Build the runner with its own private expression engine instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: ActionMetadata::new("ACTION/DATA_TRANSFORMATION", "Data Transformation", "Reshape data with an expression")
                .with_category("data"),
            engine: ExpressionEngine::new(),
        }
    }
}

impl Default for DataTransformationRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for DataTransformationRunner {
    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    async fn run(
        &self,
        node: &NodeDefinition,
        inputs: Value,
        _trigger_info: &Value,
        _ctx: &ActionContext,
    ) -> Result<ActionResult<Value>, RunnerError> {
        let Some(expression) = node.configurations.get("expression").and_then(Value::as_str) else {
            return Ok(ActionResult::success(inputs));
        };

        let mut context = EvaluationContext::new();
        context.set_input(inputs);
        self.engine
            .evaluate(expression, &context)
            .map(ActionResult::success)
            .map_err(|err| RunnerError::validation(err.to_string()))
    }
}
