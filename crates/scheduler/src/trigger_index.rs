//! Trigger index (§4.3.2): a coarse `(subtype, index_key)` lookup the event
//! router uses before applying per-trigger detailed filters.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use nebula_core::{NodeId, TriggerIndexId, WorkflowId};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// The trigger kinds §4.3.2's table enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerSubtype {
    /// Fired only by an explicit `ExecuteWorkflow` call, never routed.
    Manual,
    /// Fired by the in-process cron runner (§4.3.4).
    Cron,
    /// Fired by an inbound HTTP request to a deployed path.
    Webhook,
    /// Fired by a Slack (or other chat platform) event.
    Slack,
    /// Fired by an inbound email matching an address/filter.
    Email,
    /// Fired by a GitHub (or other VCS host) webhook event.
    SourceControl,
    /// Fired by a Google Calendar event within a configured window.
    GoogleCalendar,
}

impl TriggerSubtype {
    /// Parses a `NodeDefinition::subtype` string, case-insensitively.
    pub fn parse(subtype: &str) -> Result<Self, SchedulerError> {
        match subtype.to_ascii_uppercase().as_str() {
            "MANUAL" => Ok(Self::Manual),
            "CRON" => Ok(Self::Cron),
            "WEBHOOK" => Ok(Self::Webhook),
            "SLACK" => Ok(Self::Slack),
            "EMAIL" => Ok(Self::Email),
            "GITHUB" | "SOURCE_CONTROL" => Ok(Self::SourceControl),
            "GOOGLE_CALENDAR" => Ok(Self::GoogleCalendar),
            other => Err(SchedulerError::UnknownTriggerSubtype(other.to_string())),
        }
    }
}

/// Derives the coarse `index_key` for a trigger node from its
/// `trigger_config`, per §4.3.2's table. `MANUAL` has no index key: manual
/// triggers are never routed from an external event.
pub fn derive_index_key(
    node_id: NodeId,
    subtype: TriggerSubtype,
    config: &serde_json::Map<String, serde_json::Value>,
) -> Result<Option<String>, SchedulerError> {
    let field = |name: &'static str| -> Result<String, SchedulerError> {
        config
            .get(name)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or(SchedulerError::MissingTriggerConfig { node: node_id, subtype: format!("{subtype:?}"), field: name })
    };

    match subtype {
        TriggerSubtype::Manual => Ok(None),
        TriggerSubtype::Cron => field("cron_expression").map(Some),
        TriggerSubtype::Webhook => field("path").map(Some),
        TriggerSubtype::Slack => field("workspace_id").map(Some),
        TriggerSubtype::Email => field("address").map(Some),
        TriggerSubtype::SourceControl => field("repository").map(Some),
        TriggerSubtype::GoogleCalendar => field("calendar_id").map(Some),
    }
}

/// Whether a deployed trigger's index row is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexRowStatus {
    /// The workflow is deployed; this row is a routing candidate.
    Active,
    /// Retained for history but no longer matched by [`TriggerIndex::candidates`].
    Inactive,
}

/// A single row of the trigger index: one per deployed trigger node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerIndexRow {
    pub id: TriggerIndexId,
    pub workflow_id: WorkflowId,
    pub node_id: NodeId,
    pub subtype: TriggerSubtype,
    pub index_key: Option<String>,
    pub trigger_config: serde_json::Map<String, serde_json::Value>,
    pub status: IndexRowStatus,
    pub created_at: DateTime<Utc>,
}

/// Concurrent `(subtype, index_key)` index giving the router sub-linear
/// candidate lookup (§4.3.2 "B-tree index ... mandatory"; a concurrent hash
/// index gives the same sub-linear guarantee the router needs and matches
/// the read-heavy-lookup pattern `nebula-registry` already uses).
#[derive(Default)]
pub struct TriggerIndex {
    rows: DashMap<(TriggerSubtype, String), Vec<TriggerIndexRow>>,
    by_workflow: DashMap<WorkflowId, Vec<(TriggerSubtype, String)>>,
}

impl TriggerIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a row. Rows with no `index_key` (`MANUAL`
    /// triggers) are tracked per-workflow but never inserted into the
    /// routing table since they can't be matched from an external event.
    pub fn upsert(&self, row: TriggerIndexRow) {
        let Some(index_key) = row.index_key.clone() else {
            self.by_workflow.entry(row.workflow_id).or_default().push((row.subtype, String::new()));
            return;
        };
        let key = (row.subtype, index_key);
        self.by_workflow.entry(row.workflow_id).or_default().push(key.clone());
        self.rows.entry(key).or_default().push(row);
    }

    /// Removes every row belonging to `workflow_id` (§4.3.1 `undeploy`).
    pub fn remove_workflow(&self, workflow_id: WorkflowId) {
        if let Some((_, keys)) = self.by_workflow.remove(&workflow_id) {
            for key in keys {
                if let dashmap::mapref::entry::Entry::Occupied(mut entry) = self.rows.entry(key) {
                    entry.get_mut().retain(|row| row.workflow_id != workflow_id);
                    if entry.get().is_empty() {
                        entry.remove();
                    }
                }
            }
        }
    }

    /// Coarse lookup: every active row for `(subtype, index_key)`.
    #[must_use]
    pub fn candidates(&self, subtype: TriggerSubtype, index_key: &str) -> Vec<TriggerIndexRow> {
        self.rows
            .get(&(subtype, index_key.to_string()))
            .map(|rows| rows.iter().filter(|r| r.status == IndexRowStatus::Active).cloned().collect())
            .unwrap_or_default()
    }

    /// Every row this index currently holds, active or not. Used to
    /// reconstruct in-process subscriptions on process start (§4.3.1
    /// restore).
    #[must_use]
    pub fn all_active(&self) -> Vec<TriggerIndexRow> {
        self.rows
            .iter()
            .flat_map(|entry| entry.value().clone())
            .filter(|row| row.status == IndexRowStatus::Active)
            .collect()
    }

    #[must_use]
    pub fn contains_workflow(&self, workflow_id: WorkflowId) -> bool {
        self.by_workflow.contains_key(&workflow_id)
    }
}
