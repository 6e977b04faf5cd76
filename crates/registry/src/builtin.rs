//! The static built-in catalog the registry is seeded with at process start
//! (§4.1: "built in-process from a static built-in catalog of specs").

use nebula_workflow::NodeType;
use serde_json::Value;

use crate::param_schema::{ParamSchema, ParamType};
use crate::spec::NodeSpec;

#[must_use]
pub fn catalog() -> Vec<NodeSpec> {
    vec![
        NodeSpec::new(NodeType::Trigger, "MANUAL", "Manually started run, no external event")
            .with_output("triggered_at", ParamSchema::new(ParamType::String)),
        NodeSpec::new(NodeType::Trigger, "WEBHOOK", "Fires when an HTTP request hits the registered path")
            .with_configuration("path", ParamSchema::new(ParamType::String).required())
            .with_output("body", ParamSchema::new(ParamType::Any))
            .with_output("headers", ParamSchema::new(ParamType::Object)),
        NodeSpec::new(NodeType::Trigger, "CRON", "Fires on a cron schedule")
            .with_configuration("expression", ParamSchema::new(ParamType::String).required())
            .with_output("fired_at", ParamSchema::new(ParamType::String)),
        NodeSpec::new(NodeType::Action, "HTTP_REQUEST", "Issue an HTTP request")
            .with_configuration("url", ParamSchema::new(ParamType::String).required())
            .with_configuration("method", ParamSchema::new(ParamType::String).with_default(Value::from("GET")))
            .with_configuration("body", ParamSchema::new(ParamType::Any))
            .with_output("status", ParamSchema::new(ParamType::Number))
            .with_output("body", ParamSchema::new(ParamType::Any)),
        NodeSpec::new(NodeType::ExternalAction, "WEBHOOK_CALL", "Deliver a payload to an external webhook")
            .with_configuration("url", ParamSchema::new(ParamType::String).required())
            .with_output("status", ParamSchema::new(ParamType::Number)),
        NodeSpec::new(NodeType::Flow, "IF", "Branch on a boolean condition")
            .with_configuration("condition", ParamSchema::new(ParamType::String).required())
            .with_output("result", ParamSchema::new(ParamType::Boolean)),
        NodeSpec::new(NodeType::Flow, "MERGE", "Join fan-out sibling activations into one downstream activation")
            .with_output("merged", ParamSchema::new(ParamType::Array)),
        NodeSpec::new(NodeType::Flow, "FOR_EACH", "Fan out one activation per element of an input array")
            .with_configuration("items_expression", ParamSchema::new(ParamType::String).required()),
        NodeSpec::new(NodeType::AiAgent, "OPENAI", "Chat-completion agent with tool and memory attachments")
            .with_configuration("model", ParamSchema::new(ParamType::String).with_default(Value::from("gpt-4o-mini")))
            .with_configuration(
                "system_prompt",
                ParamSchema::new(ParamType::String).with_default(Value::from("")),
            )
            .with_output("response", ParamSchema::new(ParamType::String)),
        NodeSpec::new(NodeType::Tool, "CALCULATOR", "Evaluate arithmetic expressions on demand")
            .with_output("result", ParamSchema::new(ParamType::Number)),
        NodeSpec::new(NodeType::Memory, "BUFFER", "Fixed-window conversation buffer")
            .with_configuration("window_size", ParamSchema::new(ParamType::Number).with_default(Value::from(20))),
        NodeSpec::new(NodeType::HumanInTheLoop, "APPROVAL", "Pause for a human approve/reject decision")
            .with_configuration("prompt", ParamSchema::new(ParamType::String).required())
            .with_output("approved", ParamSchema::new(ParamType::Boolean)),
    ]
}
