//! `Engine`: the `Run`/`ResumeExecution` orchestrator (§4.2.1–§4.2.3).

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use nebula_action::{
    ActionContext, DefaultHilClassifier, HilClassifier, InteractionRequest, InteractionResponse, InteractionType,
    RunnerError,
};
use nebula_core::{ActivationId, ExecutionId, NodeId, WorkflowId};
use nebula_execution::{ExecutionState, ExecutionStatus, NodeExecutionState};
use nebula_expression::{evaluate_conversion, ConversionBudget, ExpressionEngine};
use nebula_registry::Registry;
use nebula_resilience::{retry_with_backoff, RetryPolicy};
use nebula_scheduler::CronFireHandler;
use nebula_workflow::{DependencyGraph, NodeState, NodeType, OnError, WorkflowDefinition};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::outputs::{resolve, Resolved};
use crate::pause::{ExecutionPause, WorkItem};
use crate::runner::RunnerRegistry;

const DEFAULT_OUTPUT_PORT: &str = "result";
const MEMORY_CONTEXT_KEY: &str = "_memory_context";
const AVAILABLE_TOOLS_KEY: &str = "_available_tools";

/// What a run or resume produced: either the execution ran to a terminal
/// status, or it paused and needs an [`ExecutionPause`] persisted by the
/// caller before the process can move on to other work.
#[derive(Debug, Serialize)]
pub enum RunOutcome {
    /// The execution reached a terminal [`ExecutionStatus`].
    Finished { execution_id: ExecutionId, state: ExecutionState },
    /// The execution suspended on an `HUMAN_IN_THE_LOOP` wait (or any other
    /// pause-worthy [`nebula_action::WaitCondition`]); `pause` is what
    /// `resume_from_pause` needs to continue it.
    Paused { execution_id: ExecutionId, state: ExecutionState, pause: ExecutionPause },
}

/// Loads attached `MEMORY`/`TOOL` node state for an `AI_AGENT` node ahead of
/// dispatch (§4.2.5). The engine ships a no-op loader; a production
/// deployment supplies one backed by its actual memory/tool stores.
#[async_trait::async_trait]
pub trait AttachedNodeLoader: Send + Sync {
    async fn load(&self, attached: &[NodeId]) -> (Value, Value);
}

/// Loads nothing: empty memory context, no available tools. Enough for
/// `AI_AGENT` nodes with no attachments, and for tests.
#[derive(Debug, Default)]
pub struct NoopAttachedNodeLoader;

#[async_trait::async_trait]
impl AttachedNodeLoader for NoopAttachedNodeLoader {
    async fn load(&self, _attached: &[NodeId]) -> (Value, Value) {
        (Value::Null, Value::Array(Vec::new()))
    }
}

/// Ties the registry, runner factory, and expression engine together into
/// the `Run`/`ResumeExecution` driver. Cheap to clone (everything behind an
/// `Arc`), so one instance is shared across every concurrently running
/// execution in a process (§5).
#[derive(Clone)]
pub struct Engine {
    registry: Arc<Registry>,
    runners: Arc<RunnerRegistry>,
    expressions: Arc<ExpressionEngine>,
    hil_classifier: Arc<dyn HilClassifier>,
    attached_loader: Arc<dyn AttachedNodeLoader>,
}

impl Engine {
    /// Build an engine from its component parts.
    #[must_use]
    pub fn new(registry: Arc<Registry>, runners: Arc<RunnerRegistry>) -> Self {
        Self {
            registry,
            runners,
            expressions: Arc::new(ExpressionEngine::new()),
            hil_classifier: Arc::new(DefaultHilClassifier::default()),
            attached_loader: Arc::new(NoopAttachedNodeLoader),
        }
    }

    /// The engine with every built-in registered on both the node-spec
    /// registry and the runner factory (§4.1, §4.2.4).
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new(Arc::new(Registry::with_builtins()), Arc::new(RunnerRegistry::with_builtins()))
    }

    /// Override the classifier `ResumeExecution` uses to turn an HIL
    /// response into an output port (§4.2.3).
    #[must_use]
    pub fn with_hil_classifier(mut self, classifier: Arc<dyn HilClassifier>) -> Self {
        self.hil_classifier = classifier;
        self
    }

    /// Override how `AI_AGENT` attached-node state is loaded before dispatch (§4.2.5).
    #[must_use]
    pub fn with_attached_loader(mut self, loader: Arc<dyn AttachedNodeLoader>) -> Self {
        self.attached_loader = loader;
        self
    }

    /// `Run(workflow, trigger_info, workflow_id) → Execution` (§4.2.1),
    /// driven straight through to a terminal status or a pause.
    pub async fn run(&self, workflow: &WorkflowDefinition, trigger_info: Value) -> Result<RunOutcome, EngineError> {
        self.run_until_pause(workflow, ExecutionId::v4(), trigger_info).await
    }

    /// `Run`, but returning as soon as the execution pauses instead of
    /// blocking until `resume_from_pause` is called separately. `run` is a
    /// thin wrapper over this with a freshly generated execution id.
    pub async fn run_until_pause(
        &self,
        workflow: &WorkflowDefinition,
        execution_id: ExecutionId,
        trigger_info: Value,
    ) -> Result<RunOutcome, EngineError> {
        let mut workflow = workflow.clone();
        for node in &mut workflow.nodes {
            self.registry.normalize(node)?;
        }
        self.registry.validate_workflow(&workflow)?;

        let graph = DependencyGraph::from_definition(&workflow)?;

        let node_ids: Vec<NodeId> = workflow.nodes.iter().map(|n| n.id).collect();
        let mut state = ExecutionState::new(execution_id, workflow.id, &node_ids);
        state.transition_status(ExecutionStatus::Running)?;

        let mut queue = VecDeque::new();
        for entry in graph.entry_nodes() {
            queue.push_back(WorkItem::new(entry));
        }

        self.drive(&workflow, &graph, &mut state, &trigger_info, queue, HashMap::new(), Vec::new())
            .await
    }

    /// `ResumeExecution(execution_id, node_id, user_response)` (§4.2.3):
    /// restores the queue and per-node inputs from `pause` verbatim,
    /// synthesizes the paused HIL node's output from `user_response`, and
    /// re-enters the main loop.
    pub async fn resume_from_pause(
        &self,
        workflow: &WorkflowDefinition,
        mut pause: ExecutionPause,
        mut state: ExecutionState,
        node_id: NodeId,
        user_response: Value,
    ) -> Result<RunOutcome, EngineError> {
        self.resume_inner(workflow, &mut pause, &mut state, node_id, user_response, None).await
    }

    /// The timeout watcher's entry point: dispatches a synthetic resume on
    /// the node's `timeout` port instead of classifying a human response
    /// (§4.2.3 "Timeout watcher").
    pub async fn resume_from_timeout(
        &self,
        workflow: &WorkflowDefinition,
        mut pause: ExecutionPause,
        mut state: ExecutionState,
        node_id: NodeId,
    ) -> Result<RunOutcome, EngineError> {
        self.resume_inner(workflow, &mut pause, &mut state, node_id, Value::Null, Some("timeout")).await
    }

    async fn resume_inner(
        &self,
        workflow: &WorkflowDefinition,
        pause: &mut ExecutionPause,
        state: &mut ExecutionState,
        node_id: NodeId,
        user_response: Value,
        forced_port: Option<&str>,
    ) -> Result<RunOutcome, EngineError> {
        if !state.status.is_paused() {
            return Err(EngineError::NotPaused { execution_id: state.execution_id });
        }
        if pause.current_node_id != node_id {
            return Err(EngineError::WrongResumeNode { execution_id: state.execution_id, node_id });
        }
        let node = workflow
            .nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or(EngineError::UnknownNode(node_id))?;

        let (port, value) = match forced_port {
            Some(port) => (port.to_string(), user_response),
            None => {
                let response = InteractionResponse {
                    interaction_id: pause.callback_key.clone(),
                    approved: user_response.get("approved").and_then(Value::as_bool),
                    data: user_response.clone(),
                    responder: user_response.get("responder").and_then(Value::as_str).map(str::to_string),
                };
                let request = InteractionRequest {
                    interaction_id: node_id.to_string(),
                    interaction_type: interaction_type_for(&node.subtype),
                    prompt: String::new(),
                    options: None,
                    timeout: Duration::ZERO,
                    metadata: HashMap::new(),
                };
                let port = self.hil_classifier.classify(&request, &response).port();
                (port.to_string(), response.data)
            }
        };

        let graph = DependencyGraph::from_definition(workflow)?;

        let node_state = state.node_states.entry(node_id).or_insert_with(NodeExecutionState::new);
        node_state.transition_to(NodeState::Completed)?;
        pause.execution_sequence.push(node_id);
        pause.resumed = true;

        let mut execution_sequence = std::mem::take(&mut pause.execution_sequence);
        let mut queue = std::mem::take(&mut pause.queue);
        let mut pending_inputs = std::mem::take(&mut pause.pending_inputs);

        self.propagate(&graph, workflow, node_id, &[(port, value)], state, &mut queue, &mut pending_inputs).await?;

        state.transition_status(ExecutionStatus::Running)?;
        self.drive(workflow, &graph, state, &Value::Null, queue, pending_inputs, execution_sequence.drain(..).collect())
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn drive(
        &self,
        workflow: &WorkflowDefinition,
        graph: &DependencyGraph,
        state: &mut ExecutionState,
        trigger_info: &Value,
        mut queue: VecDeque<WorkItem>,
        mut pending_inputs: HashMap<NodeId, Map<String, Value>>,
        mut execution_sequence: Vec<NodeId>,
    ) -> Result<RunOutcome, EngineError> {
        while let Some(item) = queue.pop_front() {
            let node = workflow
                .nodes
                .iter()
                .find(|n| n.id == item.node_id)
                .ok_or(EngineError::UnknownNode(item.node_id))?;

            let node_state = state.node_states.entry(node.id).or_insert_with(NodeExecutionState::new);
            if node_state.state == NodeState::Pending {
                node_state.transition_to(NodeState::Ready)?;
            }
            if node_state.state != NodeState::Running {
                node_state.transition_to(NodeState::Running)?;
            }

            let mut inputs = item.override_inputs.unwrap_or_else(|| pending_inputs.remove(&node.id).unwrap_or_default());
            if node.node_type == NodeType::AiAgent && !node.attached_nodes.is_empty() {
                let (memory_context, available_tools) = self.attached_loader.load(&node.attached_nodes).await;
                inputs.insert(MEMORY_CONTEXT_KEY.to_string(), memory_context);
                inputs.insert(AVAILABLE_TOOLS_KEY.to_string(), available_tools);
            }

            let runner = self.runners.dispatch(node.node_type, &node.subtype);
            let retry_attempts = node.configurations.get("retry_attempts").and_then(Value::as_u64).unwrap_or(0) as u32;
            let policy = RetryPolicy::from_retry_attempts(retry_attempts);
            let timeout_seconds = node.configurations.get("timeout_seconds").and_then(Value::as_u64);
            let ctx = ActionContext::new(state.execution_id, node.id, workflow.id);

            let inputs_value = Value::Object(inputs);
            let attempt = retry_with_backoff(&policy, RunnerError::is_retryable, || {
                let runner = runner.clone();
                let inputs_value = inputs_value.clone();
                let ctx = &ctx;
                async move {
                    let fut = runner.run(node, inputs_value, trigger_info, ctx);
                    match timeout_seconds {
                        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
                            .await
                            .unwrap_or_else(|_| Err(RunnerError::Timeout { elapsed: Duration::from_secs(secs) })),
                        None => fut.await,
                    }
                }
            })
            .await;

            let action_result = match attempt {
                Ok(result) => result,
                Err(exhausted) => {
                    let node_state = state.node_states.get_mut(&node.id).expect("inserted above");
                    node_state.error_message = Some(exhausted.last_error.to_string());
                    node_state.transition_to(NodeState::Failed)?;
                    state.total_retries += exhausted.attempts.saturating_sub(1);

                    match node.configurations.get("on_error").and_then(Value::as_str) {
                        Some("continue") => {
                            self.propagate(graph, workflow, node.id, &[(DEFAULT_OUTPUT_PORT.to_string(), Value::Null)], state, &mut queue, &mut pending_inputs).await?;
                            continue;
                        }
                        Some("skip_downstream") => {
                            skip_subgraph(graph, state, node.id)?;
                            continue;
                        }
                        _ => match workflow.config.on_error {
                            OnError::Continue => {
                                self.propagate(graph, workflow, node.id, &[(DEFAULT_OUTPUT_PORT.to_string(), Value::Null)], state, &mut queue, &mut pending_inputs).await?;
                                continue;
                            }
                            OnError::SkipDownstream => {
                                skip_subgraph(graph, state, node.id)?;
                                continue;
                            }
                            OnError::Fail => {
                                state.transition_status(ExecutionStatus::Error)?;
                                return Ok(RunOutcome::Finished { execution_id: state.execution_id, state: state.clone() });
                            }
                        },
                    }
                }
            };

            match resolve(action_result) {
                Resolved::Proceed(value) | Resolved::Skip { output: Some(value) } => {
                    let shaped = self.registry.shape_output(node.node_type, &node.subtype, &value);
                    finish_node(state, node.id)?;
                    execution_sequence.push(node.id);
                    self.propagate(graph, workflow, node.id, &[(DEFAULT_OUTPUT_PORT.to_string(), shaped)], state, &mut queue, &mut pending_inputs).await?;
                }
                Resolved::Skip { output: None } => {
                    finish_node(state, node.id)?;
                    execution_sequence.push(node.id);
                    self.propagate(graph, workflow, node.id, &[(DEFAULT_OUTPUT_PORT.to_string(), Value::Null)], state, &mut queue, &mut pending_inputs).await?;
                }
                Resolved::Retry { resume_input, delay } => {
                    if delay > Duration::ZERO {
                        tokio::time::sleep(delay).await;
                    }
                    queue.push_front(WorkItem::new(node.id).with_override(as_object(resume_input)));
                }
                Resolved::Ports(ports) => {
                    let raw: Value = Value::Object(ports.iter().cloned().collect());
                    let shaped = self.registry.shape_output(node.node_type, &node.subtype, &raw);
                    let shaped_ports: Vec<(String, Value)> = match shaped {
                        Value::Object(map) if !map.is_empty() => map.into_iter().collect(),
                        _ => ports,
                    };
                    finish_node(state, node.id)?;
                    execution_sequence.push(node.id);
                    self.propagate(graph, workflow, node.id, &shaped_ports, state, &mut queue, &mut pending_inputs).await?;
                }
                Resolved::Pause { callback_key, timeout, partial_output: _ } => {
                    let timeout_at = timeout.map(|d| {
                        chrono::Utc::now() + chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::seconds(0))
                    });
                    state.transition_status(ExecutionStatus::WaitingForHuman)?;
                    let pause = ExecutionPause::new(
                        state.execution_id,
                        node.id,
                        callback_key,
                        queue,
                        pending_inputs,
                        state.completed_node_ids().into_iter().collect(),
                        execution_sequence,
                        timeout_at,
                    );
                    return Ok(RunOutcome::Paused { execution_id: state.execution_id, state: state.clone(), pause });
                }
            }
        }

        debug_assert!(state.all_nodes_terminal(), "queue drained with a node still Pending; a branch went unskipped");
        state.transition_status(ExecutionStatus::Success)?;
        Ok(RunOutcome::Finished { execution_id: state.execution_id, state: state.clone() })
    }

    #[allow(clippy::too_many_arguments)]
    async fn propagate(
        &self,
        graph: &DependencyGraph,
        workflow: &WorkflowDefinition,
        node_id: NodeId,
        ports: &[(String, Value)],
        state: &mut ExecutionState,
        queue: &mut VecDeque<WorkItem>,
        pending_inputs: &mut HashMap<NodeId, Map<String, Value>>,
    ) -> Result<(), EngineError> {
        for connection in workflow.connections.iter().filter(|c| c.from_node == node_id) {
            let Some((_, raw_value)) = ports.iter().find(|(p, _)| *p == connection.output_key) else {
                // This edge's port wasn't produced (the untaken branch of a
                // FLOW.IF/SWITCH). Its target never receives input: skip it,
                // and cascade into anything beneath it that has no other
                // way to become ready, instead of leaving it Pending forever.
                if graph.contains(connection.to_node) {
                    try_skip(graph, state, connection.to_node)?;
                }
                continue;
            };

            if connection.output_key == "iteration" {
                if let Some(elements) = raw_value.as_array() {
                    for element in elements {
                        let mut map = Map::new();
                        map.insert(DEFAULT_OUTPUT_PORT.to_string(), element.clone());
                        queue.push_back(WorkItem::new(connection.to_node).with_override(map).with_activation(ActivationId::v4()));
                    }
                    continue;
                }
            }

            let value = match &connection.conversion_function {
                Some(expression) => {
                    evaluate_conversion(self.expressions.clone(), expression, raw_value.clone(), ConversionBudget::default())
                        .await
                        .sink_value()
                }
                None => raw_value.clone(),
            };

            pending_inputs.entry(connection.to_node).or_default().insert(connection.output_key.clone(), value);

            let successor_state = state.node_states.entry(connection.to_node).or_insert_with(NodeExecutionState::new);
            if successor_state.state == NodeState::Pending && graph.contains(connection.to_node) && is_ready(graph, state, connection.to_node) {
                queue.push_back(WorkItem::new(connection.to_node));
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CronFireHandler for Engine {
    async fn fire(&self, workflow_id: WorkflowId) {
        tracing::info!(%workflow_id, "cron fired; a deployment-aware caller resolves the workflow definition and calls run()");
    }
}

fn interaction_type_for(subtype: &str) -> InteractionType {
    match subtype {
        "APPROVAL" => InteractionType::Approval,
        "SELECTION" => InteractionType::Selection,
        "REVIEW" => InteractionType::Review,
        "CONFIRMATION" => InteractionType::Confirmation,
        "INPUT" => InteractionType::Input,
        _ => InteractionType::Custom,
    }
}

fn is_ready(graph: &DependencyGraph, state: &ExecutionState, node_id: NodeId) -> bool {
    graph.predecessors(node_id).iter().all(|(pred, _)| {
        state.node_state(*pred).is_some_and(|ns| ns.state.satisfies_readiness())
    })
}

/// Marks `start` as `Skipped` once every one of its predecessors is terminal
/// (it never received a live input), then cascades into its successors the
/// same way. Unlike `skip_subgraph`, a node with another predecessor that
/// hasn't finished yet is left `Pending`: it may still be reached through
/// that other edge, the usual case at a `FLOW.MERGE` downstream of an `IF`
/// whose taken branch hasn't completed yet.
fn try_skip(graph: &DependencyGraph, state: &mut ExecutionState, start: NodeId) -> Result<(), EngineError> {
    let mut stack = vec![start];
    while let Some(node_id) = stack.pop() {
        let pending = state.node_states.entry(node_id).or_insert_with(NodeExecutionState::new).state == NodeState::Pending;
        if !pending || !is_ready(graph, state, node_id) {
            continue;
        }
        let node_state = state.node_states.get_mut(&node_id).expect("checked above");
        node_state.transition_to(NodeState::Skipped)?;
        stack.extend(graph.successors(node_id).into_iter().map(|(id, _)| id));
    }
    Ok(())
}

fn finish_node(state: &mut ExecutionState, node_id: NodeId) -> Result<(), EngineError> {
    let node_state = state.node_states.get_mut(&node_id).expect("dispatched node has state");
    node_state.transition_to(NodeState::Completed)?;
    Ok(())
}

fn skip_subgraph(graph: &DependencyGraph, state: &mut ExecutionState, from: NodeId) -> Result<(), EngineError> {
    let mut stack = graph.successors(from).into_iter().map(|(id, _)| id).collect::<Vec<_>>();
    while let Some(node_id) = stack.pop() {
        let node_state = state.node_states.entry(node_id).or_insert_with(NodeExecutionState::new);
        if node_state.state == NodeState::Pending {
            node_state.transition_to(NodeState::Skipped)?;
            stack.extend(graph.successors(node_id).into_iter().map(|(id, _)| id));
        }
    }
    Ok(())
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => Map::from_iter([(DEFAULT_OUTPUT_PORT.to_string(), other)]),
    }
}
