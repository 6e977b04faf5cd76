//! Two-phase event routing (§4.3.3). Pure: computing matches never starts
//! or resumes an Execution — the caller does that with the returned
//! [`TriggerMatch`]es.

use nebula_core::{NodeId, WorkflowId};
use serde_json::Value;

use self::glob::glob_match;

use crate::trigger_index::{TriggerIndex, TriggerSubtype};

/// An inbound external event, already normalized to the coarse key its
/// subtype indexes on.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Which trigger table to look the event up in.
    pub subtype: TriggerSubtype,
    /// The candidate key to look up in phase 1 (e.g. `"owner/repo"` for
    /// source control, the webhook path, the Slack workspace id).
    pub coarse_key: String,
    /// Raw event fields the detailed filters in phase 2 inspect. Shape
    /// depends on `subtype`; see `passes_detailed_filter`.
    pub fields: Value,
}

/// A trigger that matched an inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerMatch {
    /// The workflow to run or resume.
    pub workflow_id: WorkflowId,
    /// The trigger node that matched.
    pub node_id: NodeId,
    /// The event payload to hand the new or resumed run.
    pub payload: Value,
}

/// Routes `event` against `index`, applying §4.3.2's coarse lookup followed
/// by §4.3.3's per-subtype detailed filters.
pub fn route(index: &TriggerIndex, event: &InboundEvent) -> Vec<TriggerMatch> {
    index
        .candidates(event.subtype, &event.coarse_key)
        .into_iter()
        .filter(|row| passes_detailed_filter(event.subtype, &row.trigger_config, &event.fields))
        .map(|row| TriggerMatch { workflow_id: row.workflow_id, node_id: row.node_id, payload: event.fields.clone() })
        .collect()
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn array_contains_str(value: &Value, key: &str, needle: &str) -> bool {
    value
        .get(key)
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().filter_map(Value::as_str).any(|s| s == needle))
}

fn glob_list_matches(patterns: &Value, key: &str, text: Option<&str>) -> bool {
    let Some(text) = text else { return true };
    match patterns.get(key).and_then(Value::as_array) {
        None => true,
        Some(patterns) => patterns.iter().filter_map(Value::as_str).any(|pattern| glob_match(pattern, text)),
    }
}

/// Phase 2: apply the subtype-specific detailed filters from §4.3.3.
/// `config` is the trigger node's stored `trigger_config`; `event` is the
/// inbound event's raw fields.
fn passes_detailed_filter(subtype: TriggerSubtype, config: &serde_json::Map<String, Value>, event: &Value) -> bool {
    let config = Value::Object(config.clone());
    match subtype {
        TriggerSubtype::Manual | TriggerSubtype::Cron => true,
        TriggerSubtype::SourceControl => {
            let branch_ok = glob_list_matches(&config, "branches", str_field(event, "branch"));
            let path_ok = match (config.get("paths").and_then(Value::as_array), event.get("paths").and_then(Value::as_array)) {
                (None, _) => true,
                (Some(patterns), Some(changed)) => changed
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|path| patterns.iter().filter_map(Value::as_str).any(|pattern| glob_match(pattern, path))),
                (Some(_), None) => false,
            };
            let action_ok = match str_field(event, "action") {
                None => true,
                Some(action) => config.get("actions").and_then(Value::as_array).is_none_or(|actions| {
                    actions.iter().filter_map(Value::as_str).any(|a| a == action)
                }),
            };
            let author_ok = match (str_field(&config, "author_pattern"), str_field(event, "author")) {
                (Some(pattern), Some(author)) => glob_match(pattern, author),
                _ => true,
            };
            let label_ok = match config.get("labels").and_then(Value::as_array) {
                None => true,
                Some(labels) => labels
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|label| array_contains_str(event, "labels", label)),
            };
            branch_ok && path_ok && action_ok && author_ok && label_ok
        }
        TriggerSubtype::Slack => {
            let channel_ok = match str_field(event, "channel") {
                None => true,
                Some(channel) => config.get("channels").and_then(Value::as_array).is_none_or(|channels| {
                    channels.iter().filter_map(Value::as_str).any(|c| c == channel)
                }),
            };
            let event_type_ok = match str_field(event, "event_type") {
                None => true,
                Some(event_type) => config.get("event_types").and_then(Value::as_array).is_none_or(|types| {
                    types.iter().filter_map(Value::as_str).any(|t| t == event_type)
                }),
            };
            let user_ok = match str_field(event, "user") {
                None => true,
                Some(user) => config.get("users").and_then(Value::as_array).is_none_or(|users| {
                    users.iter().filter_map(Value::as_str).any(|u| u == user)
                }),
            };
            let mention_ok = config.get("mention_required").and_then(Value::as_bool).unwrap_or(false).then(|| {
                event.get("mentions_bot").and_then(Value::as_bool).unwrap_or(false)
            }).unwrap_or(true);
            let bot_ok = !config.get("ignore_bots").and_then(Value::as_bool).unwrap_or(false)
                || !event.get("is_bot").and_then(Value::as_bool).unwrap_or(false);
            channel_ok && event_type_ok && user_ok && mention_ok && bot_ok
        }
        TriggerSubtype::Email => {
            let sender_ok = match (str_field(&config, "sender_pattern"), str_field(event, "sender")) {
                (Some(pattern), Some(sender)) => glob_match(pattern, sender),
                _ => true,
            };
            let subject_ok = match (str_field(&config, "subject_pattern"), str_field(event, "subject")) {
                (Some(pattern), Some(subject)) => glob_match(pattern, subject),
                _ => true,
            };
            let attachment_ok = match config.get("require_attachment").and_then(Value::as_bool) {
                Some(true) => event.get("has_attachment").and_then(Value::as_bool).unwrap_or(false),
                _ => true,
            };
            sender_ok && subject_ok && attachment_ok
        }
        TriggerSubtype::Webhook => {
            let method_ok = match (config.get("allowed_methods").and_then(Value::as_array), str_field(event, "method")) {
                (Some(methods), Some(method)) => {
                    methods.iter().filter_map(Value::as_str).any(|m| m.eq_ignore_ascii_case(method))
                }
                _ => true,
            };
            let signature_ok = match str_field(&config, "signature_secret") {
                None => true,
                Some(_secret) => event.get("signature_valid").and_then(Value::as_bool).unwrap_or(false),
            };
            method_ok && signature_ok
        }
        TriggerSubtype::GoogleCalendar => true,
    }
}

mod glob {
    /// `*`-only glob match (no `?`, no character classes): enough for
    /// branch/path globs like `release/*` or `src/**/*.rs` where `*`
    /// greedily matches any run of characters including `/`.
    pub fn glob_match(pattern: &str, text: &str) -> bool {
        fn go(pattern: &[u8], text: &[u8]) -> bool {
            match pattern.first() {
                None => text.is_empty(),
                Some(b'*') => go(&pattern[1..], text) || (!text.is_empty() && go(pattern, &text[1..])),
                Some(&p) => matches!(text.first(), Some(&t) if t == p) && go(&pattern[1..], &text[1..]),
            }
        }
        go(pattern.as_bytes(), text.as_bytes())
    }

}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use nebula_core::TriggerIndexId;
    use serde_json::json;

    use super::*;
    use crate::trigger_index::{IndexRowStatus, TriggerIndexRow};

    fn deploy_github_trigger(index: &TriggerIndex, workflow_id: WorkflowId, config: Value) -> NodeId {
        let node_id = NodeId::v4();
        index.upsert(TriggerIndexRow {
            id: TriggerIndexId::v4(),
            workflow_id,
            node_id,
            subtype: TriggerSubtype::SourceControl,
            index_key: Some("acme/widgets".to_string()),
            trigger_config: config.as_object().cloned().unwrap_or_default(),
            status: IndexRowStatus::Active,
            created_at: Utc::now(),
        });
        node_id
    }

    #[test]
    fn matching_branch_glob_routes() {
        let index = TriggerIndex::new();
        let workflow_id = WorkflowId::v4();
        deploy_github_trigger(&index, workflow_id, json!({ "branches": ["release/*"] }));

        let event = InboundEvent {
            subtype: TriggerSubtype::SourceControl,
            coarse_key: "acme/widgets".to_string(),
            fields: json!({ "branch": "release/2.0" }),
        };
        let matches = route(&index, &event);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].workflow_id, workflow_id);
    }

    #[test]
    fn non_matching_branch_glob_is_filtered_out() {
        let index = TriggerIndex::new();
        deploy_github_trigger(&index, WorkflowId::v4(), json!({ "branches": ["release/*"] }));

        let event = InboundEvent {
            subtype: TriggerSubtype::SourceControl,
            coarse_key: "acme/widgets".to_string(),
            fields: json!({ "branch": "main" }),
        };
        assert!(route(&index, &event).is_empty());
    }

    #[test]
    fn unknown_coarse_key_has_no_candidates() {
        let index = TriggerIndex::new();
        deploy_github_trigger(&index, WorkflowId::v4(), json!({}));

        let event = InboundEvent {
            subtype: TriggerSubtype::SourceControl,
            coarse_key: "someone/else".to_string(),
            fields: json!({}),
        };
        assert!(route(&index, &event).is_empty());
    }

    #[test]
    fn webhook_method_allow_list_filters() {
        let index = TriggerIndex::new();
        let workflow_id = WorkflowId::v4();
        index.upsert(TriggerIndexRow {
            id: TriggerIndexId::v4(),
            workflow_id,
            node_id: NodeId::v4(),
            subtype: TriggerSubtype::Webhook,
            index_key: Some("/hooks/deploy".to_string()),
            trigger_config: json!({ "allowed_methods": ["POST"] }).as_object().cloned().unwrap(),
            status: IndexRowStatus::Active,
            created_at: Utc::now(),
        });

        let get_event = InboundEvent {
            subtype: TriggerSubtype::Webhook,
            coarse_key: "/hooks/deploy".to_string(),
            fields: json!({ "method": "GET" }),
        };
        assert!(route(&index, &get_event).is_empty());

        let post_event = InboundEvent {
            subtype: TriggerSubtype::Webhook,
            coarse_key: "/hooks/deploy".to_string(),
            fields: json!({ "method": "POST" }),
        };
        assert_eq!(route(&index, &post_event).len(), 1);
    }
}
