//! Rendering task records back into checklist lines.
//!
//! This is the inverse of the parser, used to write edits back into the
//! source document.

use crate::config::{Config, DATE_PLACEHOLDER};
use crate::fields::PriorityTier;
use crate::parser::{self, is_date_tag, is_priority_tag};
use crate::task::TaskRecord;

/// Extra indentation for subtask lines under their task.
const SUBTASK_INDENT: &str = "  ";

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Render the date tag for a date through the configured template.
pub fn date_tag(date: chrono::NaiveDate, config: &Config) -> String {
    config
        .date_tag_template
        .replacen(DATE_PLACEHOLDER, &date.format(&config.date_format).to_string(), 1)
}

/// Render a task line: checkbox, title, then the tags in their original
/// order.
///
/// A manual tier keeps its written tag when that tag still names it and
/// is otherwise written as `#priority/<X>`; an auto tier is never written.
/// The date tag is rendered through the template when the date came from a
/// tag or was rescheduled; a bare date stays in the title as written.
/// Missing priority and date tags are appended. Indentation and bullet are
/// taken from the source line.
pub fn serialize(task: &TaskRecord, config: &Config) -> String {
    let (indent, bullet) = match parser::parse_checkbox_line(&task.source.raw) {
        Some(line) => (line.indent.to_owned(), line.bullet),
        None => (String::new(), '-'),
    };
    let manual = !task.is_auto_priority;
    let dated = task.assigned_date.filter(|_| task.date_from_tag);

    let mut parts: Vec<String> = Vec::new();
    if !task.title.is_empty() {
        parts.push(task.title.clone());
    }
    let mut priority_written = false;
    let mut date_written = false;
    for tag in &task.tags {
        if is_priority_tag(tag) {
            if manual && !priority_written {
                parts.push(priority_tag(tag, task.priority_tier));
                priority_written = true;
            }
        } else if task.date_from_tag && is_date_tag(tag, config) {
            if let Some(date) = dated.filter(|_| !date_written) {
                parts.push(date_tag(date, config));
                date_written = true;
            }
        } else {
            parts.push(format!("#{tag}"));
        }
    }
    if manual && !priority_written {
        parts.push(format!("#priority/{}", task.priority_tier));
    }
    if let Some(date) = dated.filter(|_| !date_written) {
        parts.push(date_tag(date, config));
    }

    let mut line = format!("{indent}{bullet} {}", checkbox(task.completed));
    if !parts.is_empty() {
        line.push(' ');
        line.push_str(&parts.join(" "));
    }
    line
}

fn priority_tag(written: &str, tier: PriorityTier) -> String {
    if parser::tag_priority(written) == Some(tier) {
        format!("#{written}")
    } else {
        format!("#priority/{tier}")
    }
}

/// Render the task line followed by its subtask lines.
pub fn serialize_block(task: &TaskRecord, config: &Config) -> String {
    let head = serialize(task, config);
    let indent = parser::parse_checkbox_line(&task.source.raw).map_or("", |l| l.indent);
    let mut lines = vec![head];
    for subtask in &task.subtasks {
        let mut line = format!("{indent}{SUBTASK_INDENT}- {}", checkbox(subtask.completed));
        if !subtask.title.is_empty() {
            line.push(' ');
            line.push_str(&subtask.title);
        }
        lines.push(line);
    }
    lines.join("\n")
}
