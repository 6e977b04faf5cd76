//! Resolves a runner's [`ActionResult`] into what the main loop does next
//! (§4.2.2e–g).
//!
//! The distilled spec describes this step as a handful of magic JSON
//! control keys (`_hil_wait`, `_wait`, `_delay_ms`, `success=false`).
//! `nebula_action::ActionResult` already gives every one of those cases its
//! own typed variant, so this module matches on it directly instead of
//! re-inventing a key convention on top of `Value`.

use std::time::Duration;

use nebula_action::{ActionResult, BreakReason, WaitCondition};
use serde_json::Value;

/// What the main loop should do with a node's result once a runner (and any
/// retry envelope around it) has produced one.
pub enum Resolved {
    /// Shape and propagate `value` to successors immediately.
    Proceed(Value),
    /// Sleep `delay`, then re-run the same node with `resume_input` as its
    /// input (`FLOW/WAIT`, `FLOW/DELAY`, and `ActionResult::Continue`).
    Retry { resume_input: Value, delay: Duration },
    /// Mark the node `SKIPPED`; its `on_error` policy decides whether
    /// successors run.
    Skip { output: Option<Value> },
    /// Node resolved to more than one output port at once; propagate each
    /// independently (`Route`/`Branch`/`MultiOutput`).
    Ports(Vec<(String, Value)>),
    /// Persist a pause record and stop the run here; `callback_key`
    /// identifies what resumes it (an HIL interaction id, a sub-execution
    /// id, or an absolute deadline, depending on the wait condition).
    Pause { callback_key: String, timeout: Option<Duration>, partial_output: Option<Value> },
}

/// Resolve a successful [`ActionResult`] into the main loop's next action.
/// Runner failures (`RunnerError`) are handled by the retry envelope before
/// this function ever sees them — it only resolves values a runner actually
/// produced.
#[must_use]
pub fn resolve(result: ActionResult<Value>) -> Resolved {
    match result {
        ActionResult::Success { output } | ActionResult::Break { output, reason: _ } => Resolved::Proceed(output),
        ActionResult::Skip { output, .. } => Resolved::Skip { output },
        ActionResult::Continue { output, delay, .. } => Resolved::Retry {
            resume_input: output,
            delay: delay.unwrap_or(Duration::ZERO),
        },
        ActionResult::Branch { selected, output, mut alternatives } => {
            alternatives.insert(selected, output);
            Resolved::Ports(alternatives.into_iter().collect())
        }
        ActionResult::Route { port, data } => Resolved::Ports(vec![(port, data)]),
        ActionResult::MultiOutput { outputs, main_output } => {
            let mut ports: Vec<(String, Value)> = outputs.into_iter().collect();
            if let Some(main) = main_output {
                ports.push(("result".to_string(), main));
            }
            Resolved::Ports(ports)
        }
        ActionResult::Wait { condition, timeout, partial_output } => match condition {
            WaitCondition::Duration { duration } => Resolved::Retry {
                resume_input: partial_output.unwrap_or(Value::Null),
                delay: duration,
            },
            WaitCondition::Webhook { callback_id } => {
                Resolved::Pause { callback_key: callback_id, timeout, partial_output }
            }
            WaitCondition::Approval { approver, .. } => {
                Resolved::Pause { callback_key: format!("approval:{approver}"), timeout, partial_output }
            }
            WaitCondition::Until { datetime } => {
                Resolved::Pause { callback_key: format!("until:{datetime}"), timeout, partial_output }
            }
            WaitCondition::Execution { execution_id } => {
                Resolved::Pause { callback_key: format!("execution:{execution_id}"), timeout, partial_output }
            }
        },
    }
}

/// `true` if `reason` represents a normal loop exit rather than a failure —
/// used when deciding whether a `Break` should log at `info` or `warn`.
#[must_use]
pub fn is_graceful_break(reason: &BreakReason) -> bool {
    matches!(reason, BreakReason::Completed | BreakReason::ConditionMet | BreakReason::MaxIterations)
}
