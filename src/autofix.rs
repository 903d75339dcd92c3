//! Best-effort correction of a task's classification and estimate.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::priority;
use crate::suitability;
use crate::task::TaskRecord;

/// Estimate drift tolerated before the stored estimate is replaced, in minutes.
pub const ESTIMATE_TOLERANCE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFix {
    /// The corrected task; equal to the input when nothing changed.
    pub task: TaskRecord,
    pub fixed: bool,
    pub changes: Vec<String>,
}

/// Re-derive an auto-assigned tier from the subtask count and refresh a
/// stale time estimate. Manually set tiers are never touched.
pub fn auto_fix(task: &TaskRecord, config: &Config) -> AutoFix {
    let mut fixed = task.clone();
    let mut changes = Vec::new();

    if task.is_auto_priority {
        let expected = priority::classify(task.subtask_count(), config);
        if expected != task.priority_tier {
            fixed = fixed.with_priority(expected, true, config);
            changes.push(format!(
                "Priority {} -> {} ({} subtasks), time {} -> {} min",
                task.priority_tier,
                expected,
                task.subtask_count(),
                task.allocated_time,
                fixed.allocated_time
            ));
        }
    }

    let estimate = suitability::analyze(&fixed).estimated_time;
    if estimate.abs_diff(task.estimated_time) > ESTIMATE_TOLERANCE {
        fixed = fixed.with_estimate(estimate);
        changes.push(format!("Estimate {} -> {} min", task.estimated_time, estimate));
    }

    AutoFix { fixed: !changes.is_empty(), task: fixed, changes }
}
