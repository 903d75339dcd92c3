//! Task data structures and their state transitions.
//!
//! A [`TaskRecord`] is created once by the parser from a document snapshot.
//! Every change afterwards goes through a transition method that takes the
//! record by reference and returns an updated copy, so related fields (tier
//! and time allocation, status and remaining time) always move together.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::fields::*;

/// Where a task came from, used to write edits back to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub document: String,
    /// Zero-based line index of the task line.
    pub line: usize,
    /// The task line exactly as it appeared in the snapshot.
    pub raw: String,
}

/// A nested checkbox line under a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskRecord {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub task_id: String,
    /// Effort estimate in `1..=5`.
    pub complexity: u8,
}

/// One change of a task's assigned date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleEvent {
    pub at_utc: i64,
    pub reason: String,
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
}

/// A parsed checklist task with its classification and scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority_tier: PriorityTier,
    pub is_auto_priority: bool,
    /// Minutes budgeted by the tier's time allocation.
    pub allocated_time: u32,
    pub remaining_time: u32,
    /// Complexity-derived estimate in minutes.
    pub estimated_time: u32,
    pub subtasks: Vec<SubtaskRecord>,
    pub assigned_date: Option<NaiveDate>,
    pub original_assigned_date: Option<NaiveDate>,
    /// The date is carried by a date tag rather than a bare date in the
    /// title, so rendering writes the tag back.
    #[serde(default)]
    pub date_from_tag: bool,
    pub reschedules: Vec<RescheduleEvent>,
    pub needs_reschedule_warning: bool,
    pub completed: bool,
    pub completed_at_utc: Option<i64>,
    pub created_at_utc: i64,
    pub source: SourceLocation,
    pub parent_id: Option<String>,
    pub child_ids: BTreeSet<String>,
    /// Tags in source order, without the leading `#`.
    pub tags: Vec<String>,
}

impl TaskRecord {
    pub fn subtask_count(&self) -> usize {
        self.subtasks.len()
    }

    pub fn reschedule_count(&self) -> usize {
        self.reschedules.len()
    }

    pub fn status(&self) -> Status {
        if self.completed {
            Status::Done
        } else {
            Status::Todo
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Move `Todo -> Done`, zeroing the remaining time.
    pub fn complete(&self, now_utc: i64) -> TaskRecord {
        if self.completed {
            return self.clone();
        }
        TaskRecord {
            completed: true,
            completed_at_utc: Some(now_utc),
            remaining_time: 0,
            ..self.clone()
        }
    }

    /// Move `Done -> Todo`, restoring the full allocation.
    pub fn reopen(&self) -> TaskRecord {
        if !self.completed {
            return self.clone();
        }
        TaskRecord {
            completed: false,
            completed_at_utc: None,
            remaining_time: self.allocated_time,
            ..self.clone()
        }
    }

    /// Set the tier and its time allocation in one step.
    pub fn with_priority(&self, tier: PriorityTier, is_auto: bool, config: &Config) -> TaskRecord {
        let allocated = config.time.minutes_for(tier);
        TaskRecord {
            priority_tier: tier,
            is_auto_priority: is_auto,
            allocated_time: allocated,
            remaining_time: if self.completed { 0 } else { allocated },
            ..self.clone()
        }
    }

    pub fn with_estimate(&self, minutes: u32) -> TaskRecord {
        TaskRecord {
            estimated_time: minutes,
            ..self.clone()
        }
    }

    /// Move the assigned date to `to`, recording why.
    pub fn reschedule(&self, to: NaiveDate, reason: &str, now_utc: i64, config: &Config) -> TaskRecord {
        let mut reschedules = self.reschedules.clone();
        reschedules.push(RescheduleEvent {
            at_utc: now_utc,
            reason: reason.to_owned(),
            from: self.assigned_date,
            to,
        });
        TaskRecord {
            assigned_date: Some(to),
            date_from_tag: true,
            original_assigned_date: self.original_assigned_date.or(self.assigned_date).or(Some(to)),
            needs_reschedule_warning: reschedules.len() >= config.reschedule_warning_threshold,
            reschedules,
            ..self.clone()
        }
    }
}
