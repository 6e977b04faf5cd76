use serde::{Deserialize, Serialize};

/// The lifecycle state of a single node activation within a running
/// execution. Distinct from `NodeExecution.status` (`nebula-execution`),
/// which additionally distinguishes `WAITING_INPUT`; `NodeState` is the
/// DAG-scheduling view used by the dependency graph's readiness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Pending,
    Ready,
    Running,
    Completed,
    Failed,
    Retrying,
    Cancelled,
    Skipped,
}

impl NodeState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Skipped
        )
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Retrying)
    }

    /// A node is "provably satisfied" for a downstream readiness check once
    /// it has either completed (possibly producing `null`) or been
    /// definitively skipped (e.g. the non-taken branch of an `IF`).
    #[must_use]
    pub const fn satisfies_readiness(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Retrying => "retrying",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}
