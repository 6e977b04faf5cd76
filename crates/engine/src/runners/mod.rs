//! Built-in runners for every node category in §4.2.4.
//!
//! `MEMORY`/`TOOL` nodes have no entry here: they are never scheduled as
//! graph vertices, only invoked directly by [`ai_agent::AiAgentRunner`]
//! (§4.2.5).

mod ai_agent;
mod flow;
mod hil;
mod passthrough;
mod process;
mod trigger;

pub use ai_agent::{AiAgentRunner, CompletionProvider, ScriptedProvider};
pub use flow::{FlowIfRunner, FlowMergeRunner, FlowSplitRunner, FlowWaitRunner};
pub use hil::{HilRunner, InteractionSink, NoopInteractionSink};
pub use passthrough::PassthroughRunner;
pub use process::{DataTransformationRunner, HttpClient, HttpRequestRunner, ScriptedHttpClient};
pub use trigger::TriggerEchoRunner;

use std::sync::Arc;

use nebula_workflow::NodeType;

use crate::runner::Runner;

/// Every runner wired in by default, keyed for [`crate::RunnerRegistry::with_builtins`].
pub fn builtin_runners() -> Vec<(NodeType, &'static str, Arc<dyn Runner>)> {
    vec![
        (NodeType::Trigger, "MANUAL", Arc::new(TriggerEchoRunner::new("MANUAL"))),
        (NodeType::Trigger, "WEBHOOK", Arc::new(TriggerEchoRunner::new("WEBHOOK"))),
        (NodeType::Trigger, "CRON", Arc::new(TriggerEchoRunner::new("CRON"))),
        (NodeType::Action, "HTTP_REQUEST", Arc::new(HttpRequestRunner::new(Arc::new(ScriptedHttpClient::default())))),
        (NodeType::Action, "DATA_TRANSFORMATION", Arc::new(DataTransformationRunner::new())),
        (NodeType::Flow, "IF", Arc::new(FlowIfRunner::new())),
        (NodeType::Flow, "MERGE", Arc::new(FlowMergeRunner::new())),
        (NodeType::Flow, "FOR_EACH", Arc::new(FlowSplitRunner::new("FOR_EACH"))),
        (NodeType::Flow, "LOOP", Arc::new(FlowSplitRunner::new("LOOP"))),
        (NodeType::Flow, "WAIT", Arc::new(FlowWaitRunner::new())),
        (NodeType::Flow, "DELAY", Arc::new(FlowWaitRunner::new())),
        (
            NodeType::HumanInTheLoop,
            "APPROVAL",
            Arc::new(HilRunner::new(Arc::new(NoopInteractionSink))),
        ),
        (
            NodeType::HumanInTheLoop,
            "INPUT",
            Arc::new(HilRunner::new(Arc::new(NoopInteractionSink))),
        ),
        (
            NodeType::AiAgent,
            "OPENAI",
            Arc::new(AiAgentRunner::new(Arc::new(ScriptedProvider::default()))),
        ),
    ]
}
