//! Formatting helpers for terminal output.

use chrono::{Local, NaiveDate};

use crate::dates::format_relative;
use crate::fields::*;
use crate::task::TaskRecord;

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "Todo",
        Status::Done => "Done",
    }
}

/// Tier letter with a marker for manual overrides, e.g. `B` or `B*`.
pub fn format_tier(task: &TaskRecord) -> String {
    if task.is_auto_priority {
        task.priority_tier.to_string()
    } else {
        format!("{}*", task.priority_tier)
    }
}

pub fn format_severity(s: Severity) -> &'static str {
    match s {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
    }
}

pub fn format_urgency(u: Urgency) -> &'static str {
    match u {
        Urgency::None => "none",
        Urgency::Low => "low",
        Urgency::Medium => "medium",
        Urgency::High => "high",
    }
}

pub fn format_issue_kind(k: IssueKind) -> &'static str {
    match k {
        IssueKind::TooComplex => "too complex",
        IssueKind::InconsistentComplexity => "inconsistent complexity",
        IssueKind::TimeMismatch => "time mismatch",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Print tasks as a table.
pub fn print_table(tasks: &[&TaskRecord]) {
    println!(
        "{:<22} {:<5} {:<4} {:<5} {:<6} {:<10} {}",
        "ID", "Stat", "Tier", "Subs", "Est", "Due", "Title [tags]"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        println!(
            "{:<22} {:<5} {:<4} {:<5} {:<6} {:<10} {}{}",
            truncate(&t.id, 22),
            format_status(t.status()),
            format_tier(t),
            t.subtask_count(),
            format!("{}m", t.estimated_time),
            format_due(t.assigned_date, today),
            t.title,
            tags
        );
    }
}

fn format_due(date: Option<NaiveDate>, today: NaiveDate) -> String {
    truncate(&format_relative(date, today), 10)
}
