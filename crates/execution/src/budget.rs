//! Resource limits enforced across an entire execution (§5 "concurrency &
//! isolation" and §4.2.2's fan-out concurrency cap).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Resource budget for an entire workflow execution.
///
/// Enforced by `nebula-engine`'s driver loop across all nodes; individual
/// runners do not see or enforce these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionBudget {
    /// Maximum sibling activations run concurrently for one `iteration`
    /// fan-out (§5: "default 4, configurable").
    pub max_fan_out_concurrency: usize,
    /// Maximum total retry attempts across all nodes in the execution.
    pub max_total_retries: u32,
    /// Maximum wall-clock time for the entire execution.
    pub max_wall_time: Duration,
}

impl Default for ExecutionBudget {
    fn default() -> Self {
        Self {
            max_fan_out_concurrency: 4,
            max_total_retries: 50,
            max_wall_time: Duration::from_secs(3600),
        }
    }
}
