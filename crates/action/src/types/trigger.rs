use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of trigger — determines how the scheduler drives a `TRIGGER` node
/// (§4.3 "Trigger Scheduler & Event Router"). Dispatch itself lives in
/// `nebula-scheduler`; this crate only describes the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Scheduler polls at a fixed interval.
    Poll {
        /// How often to poll.
        interval: Duration,
    },
    /// Scheduler registers an HTTP endpoint and forwards requests.
    Webhook {
        /// URL path suffix (e.g. `"/github-events"`).
        path: String,
    },
    /// Scheduler fires on a cron expression, with jitter and a single-flight lock.
    Cron {
        /// Standard cron expression (e.g. `"0 */5 * * *"`).
        expression: String,
    },
}

/// An event emitted by a trigger and converted into a workflow activation.
#[derive(Debug, Clone)]
pub struct TriggerEvent<T> {
    /// The event payload.
    pub data: T,
    /// When this event occurred.
    pub timestamp: DateTime<Utc>,
    /// Deduplication key — the scheduler drops a second event sharing the
    /// same key within its dedup window.
    pub dedup_key: Option<String>,
}

impl<T> TriggerEvent<T> {
    /// Create a new event with the current timestamp.
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
            dedup_key: None,
        }
    }

    /// Create an event with a deduplication key.
    pub fn with_dedup(data: T, key: impl Into<String>) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
            dedup_key: Some(key.into()),
        }
    }
}

/// Incoming webhook request forwarded by the event router to a trigger.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// HTTP method (e.g. `"POST"`).
    pub method: String,
    /// Request path.
    pub path: String,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Parsed request body.
    pub body: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_event_new() {
        let event = TriggerEvent::new(42);
        assert_eq!(event.data, 42);
        assert!(event.dedup_key.is_none());
    }

    #[test]
    fn trigger_event_with_dedup() {
        let event = TriggerEvent::with_dedup("payload", "unique-123");
        assert_eq!(event.data, "payload");
        assert_eq!(event.dedup_key.as_deref(), Some("unique-123"));
    }

    #[test]
    fn trigger_kind_poll() {
        let kind = TriggerKind::Poll {
            interval: Duration::from_secs(30),
        };
        match &kind {
            TriggerKind::Poll { interval } => {
                assert_eq!(*interval, Duration::from_secs(30));
            }
            _ => panic!("expected Poll"),
        }
    }

    #[test]
    fn trigger_kind_webhook() {
        let kind = TriggerKind::Webhook {
            path: "/github-events".into(),
        };
        match &kind {
            TriggerKind::Webhook { path } => {
                assert_eq!(path, "/github-events");
            }
            _ => panic!("expected Webhook"),
        }
    }

    #[test]
    fn trigger_kind_cron() {
        let kind = TriggerKind::Cron {
            expression: "0 */5 * * *".into(),
        };
        match &kind {
            TriggerKind::Cron { expression } => {
                assert_eq!(expression, "0 */5 * * *");
            }
            _ => panic!("expected Cron"),
        }
    }

    #[test]
    fn webhook_request_construction() {
        let req = WebhookRequest {
            method: "POST".into(),
            path: "/hooks/abc".into(),
            headers: HashMap::from([("content-type".into(), "application/json".into())]),
            body: serde_json::json!({"event": "push"}),
        };
        assert_eq!(req.method, "POST");
        assert_eq!(req.headers.len(), 1);
    }
}
