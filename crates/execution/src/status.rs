//! Execution-level status tracking (§3.1 `Execution.status`).

use serde::{Deserialize, Serialize};

/// The overall status of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Created but not yet started.
    New,
    /// Actively running nodes.
    Running,
    /// Paused by the user or system (not a HIL pause — see `WaitingForHuman`).
    Paused,
    /// Paused at a `HUMAN_IN_THE_LOOP` node awaiting a response or timeout.
    WaitingForHuman,
    /// All nodes completed successfully.
    Success,
    /// At least one node failed and the execution could not continue.
    Error,
    /// Cancelled via `CancelExecution`.
    Canceled,
    /// The execution exceeded its wall-clock time budget.
    Timeout,
}

impl ExecutionStatus {
    /// Returns `true` if the execution has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Canceled | Self::Timeout)
    }

    /// Returns `true` if the execution is currently doing work.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if the execution is paused for any reason (user pause
    /// or awaiting a human response).
    #[must_use]
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused | Self::WaitingForHuman)
    }

    /// Returns `true` if the execution completed successfully.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` if the execution ended in a failure state.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Timeout)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::WaitingForHuman => write!(f, "waiting_for_human"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Canceled => write!(f, "canceled"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(ExecutionStatus::Success.is_terminal());
        assert!(ExecutionStatus::Error.is_terminal());
        assert!(ExecutionStatus::Canceled.is_terminal());
        assert!(ExecutionStatus::Timeout.is_terminal());

        assert!(!ExecutionStatus::New.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(!ExecutionStatus::Paused.is_terminal());
        assert!(!ExecutionStatus::WaitingForHuman.is_terminal());
    }

    #[test]
    fn active_states() {
        assert!(ExecutionStatus::Running.is_active());
        assert!(!ExecutionStatus::New.is_active());
        assert!(!ExecutionStatus::Paused.is_active());
    }

    #[test]
    fn paused_states() {
        assert!(ExecutionStatus::Paused.is_paused());
        assert!(ExecutionStatus::WaitingForHuman.is_paused());
        assert!(!ExecutionStatus::Running.is_paused());
    }

    #[test]
    fn success_state() {
        assert!(ExecutionStatus::Success.is_success());
        assert!(!ExecutionStatus::Error.is_success());
        assert!(!ExecutionStatus::Running.is_success());
    }

    #[test]
    fn failure_states() {
        assert!(ExecutionStatus::Error.is_failure());
        assert!(ExecutionStatus::Timeout.is_failure());
        assert!(!ExecutionStatus::Success.is_failure());
        assert!(!ExecutionStatus::Canceled.is_failure());
    }

    #[test]
    fn display_formatting() {
        assert_eq!(ExecutionStatus::New.to_string(), "new");
        assert_eq!(ExecutionStatus::Running.to_string(), "running");
        assert_eq!(ExecutionStatus::Paused.to_string(), "paused");
        assert_eq!(ExecutionStatus::WaitingForHuman.to_string(), "waiting_for_human");
        assert_eq!(ExecutionStatus::Success.to_string(), "success");
        assert_eq!(ExecutionStatus::Error.to_string(), "error");
        assert_eq!(ExecutionStatus::Canceled.to_string(), "canceled");
        assert_eq!(ExecutionStatus::Timeout.to_string(), "timeout");
    }

    #[test]
    fn serde_roundtrip() {
        let statuses = [
            ExecutionStatus::New,
            ExecutionStatus::Running,
            ExecutionStatus::Paused,
            ExecutionStatus::WaitingForHuman,
            ExecutionStatus::Success,
            ExecutionStatus::Error,
            ExecutionStatus::Canceled,
            ExecutionStatus::Timeout,
        ];

        for status in &statuses {
            let json = serde_json::to_string(status).unwrap();
            let back: ExecutionStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(*status, back, "roundtrip failed for {status}");
        }
    }

    #[test]
    fn serde_rename_snake_case() {
        let json = serde_json::to_string(&ExecutionStatus::WaitingForHuman).unwrap();
        assert_eq!(json, "\"waiting_for_human\"");

        let json = serde_json::to_string(&ExecutionStatus::New).unwrap();
        assert_eq!(json, "\"new\"");
    }

    #[test]
    fn copy_semantics() {
        let a = ExecutionStatus::Running;
        let b = a;
        assert_eq!(a, b);
    }
}
