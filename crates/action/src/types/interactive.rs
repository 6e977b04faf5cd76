use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of human interaction an HIL node requests (§3.1 `hil_interactions.interaction_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Approval,
    Input,
    Selection,
    Review,
    Confirmation,
    Custom,
}

/// A request for human input, persisted as an HIL Interaction row when an
/// `HUMAN_IN_THE_LOOP` node runs (§4.2.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRequest {
    pub interaction_id: String,
    pub interaction_type: InteractionType,
    pub prompt: String,
    /// Options for `Selection`, form schema for `Input`.
    pub options: Option<Value>,
    pub timeout: Duration,
    pub metadata: HashMap<String, Value>,
}

impl InteractionRequest {
    #[must_use]
    pub fn approval(id: impl Into<String>, prompt: impl Into<String>, timeout: Duration) -> Self {
        Self::new(id, InteractionType::Approval, prompt, None, timeout)
    }

    #[must_use]
    pub fn input(id: impl Into<String>, prompt: impl Into<String>, schema: Value, timeout: Duration) -> Self {
        Self::new(id, InteractionType::Input, prompt, Some(schema), timeout)
    }

    #[must_use]
    pub fn selection(id: impl Into<String>, prompt: impl Into<String>, choices: Vec<String>, timeout: Duration) -> Self {
        Self::new(id, InteractionType::Selection, prompt, Some(serde_json::json!(choices)), timeout)
    }

    fn new(
        id: impl Into<String>,
        interaction_type: InteractionType,
        prompt: impl Into<String>,
        options: Option<Value>,
        timeout: Duration,
    ) -> Self {
        Self {
            interaction_id: id.into(),
            interaction_type,
            prompt: prompt.into(),
            options,
            timeout,
            metadata: HashMap::new(),
        }
    }
}

/// Human response to an interaction request (§3.1 `hil_interactions.response_data`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub interaction_id: String,
    /// Set for `Approval`; `None` for every other interaction type, including
    /// on timeout, where the engine synthesizes a response with this unset.
    pub approved: Option<bool>,
    pub data: Value,
    pub responder: Option<String>,
}

/// The port an HIL node's resume resolves to (§4.2.3 "HIL output port selection").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierVerdict {
    Approved,
    Rejected,
    /// The default outcome for every non-`Approval` interaction type that
    /// carried a usable response.
    Completed,
    Filtered,
}

impl ClassifierVerdict {
    #[must_use]
    pub const fn port(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Filtered => "filtered",
        }
    }
}

/// Classifies an HIL response into an output port for every interaction
/// type, not just `Approval` (§4.2.3 "HIL response classifier
/// parameterization"). Kept pluggable so a production deployment can inject
/// a model-backed relevance/moderation classifier without engine changes;
/// the engine never hard-codes a specific model or score threshold.
pub trait HilClassifier: Send + Sync {
    fn classify(&self, request: &InteractionRequest, response: &InteractionResponse) -> ClassifierVerdict;
}

/// Deterministic exact-match/keyword classifier, good enough for tests and
/// as a safe default. `Approval` responses go through affirmative/negative
/// keyword matching; every other interaction type completes on any non-empty
/// response and is filtered otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHilClassifier;

const AFFIRMATIVE: &[&str] = &["approve", "approved", "yes", "true", "confirm", "confirmed"];
const NEGATIVE: &[&str] = &["reject", "rejected", "no", "false", "deny", "denied"];

impl HilClassifier for DefaultHilClassifier {
    fn classify(&self, request: &InteractionRequest, response: &InteractionResponse) -> ClassifierVerdict {
        if request.interaction_type != InteractionType::Approval {
            return if response_text(&response.data).trim().is_empty() {
                ClassifierVerdict::Filtered
            } else {
                ClassifierVerdict::Completed
            };
        }

        if let Some(approved) = response.approved {
            return if approved { ClassifierVerdict::Approved } else { ClassifierVerdict::Rejected };
        }

        let text = response_text(&response.data).to_lowercase();
        if AFFIRMATIVE.iter().any(|marker| text.contains(marker)) {
            ClassifierVerdict::Approved
        } else if NEGATIVE.iter().any(|marker| text.contains(marker)) {
            ClassifierVerdict::Rejected
        } else {
            ClassifierVerdict::Filtered
        }
    }
}

fn response_text(data: &Value) -> String {
    match data {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
