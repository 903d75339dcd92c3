//! Line-oriented extraction of checklist tasks from document text.
//!
//! A task line is an optionally indented `-` or `*` bullet followed by a
//! `[ ]`, `[x]` or `[X]` checkbox. Checkbox lines indented deeper than a task
//! and directly following it (blank lines allowed) are its subtasks. Parsing
//! never fails: lines that do not match are simply skipped.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use tracing::debug;

use crate::compile;
use crate::complexity;
use crate::config::{Config, DATE_PLACEHOLDER};
use crate::fields::PriorityTier;
use crate::priority;
use crate::suitability;
use crate::task::{SourceLocation, SubtaskRecord, TaskRecord};

static CHECKBOX_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(\s*)([-*]) \[([ xX])\](?:\s+(.*))?$"));
static TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"#[\w/-]+"));
static BARE_ISO_DATE: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(\d{4}-\d{2}-\d{2})\b"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

/// The pieces of a single bullet + checkbox line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxLine<'a> {
    pub indent: &'a str,
    pub bullet: char,
    pub checked: bool,
    /// Everything after the checkbox, untrimmed of tags.
    pub text: &'a str,
}

impl CheckboxLine<'_> {
    /// Indentation width in columns, tabs counting as four.
    pub fn indent_width(&self) -> usize {
        self.indent.chars().map(|c| if c == '\t' { 4 } else { 1 }).sum()
    }
}

/// Match a single line against the bullet + checkbox syntax.
pub fn parse_checkbox_line(line: &str) -> Option<CheckboxLine<'_>> {
    let caps = CHECKBOX_LINE.captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let bullet = caps.get(2)?.as_str().chars().next()?;
    let checked = caps.get(3)?.as_str() != " ";
    let text = caps.get(4).map_or("", |m| m.as_str().trim_end());
    Some(CheckboxLine { indent, bullet, checked, text })
}

/// Tag-safe record id: the document path without its extension, with
/// every character a tag cannot hold turned into `-`, then the line index.
///
/// `notes/week 12.md` line 4 becomes `notes/week-12-4`, which can be
/// written as `#parent/notes/week-12-4`.
pub fn record_id(document: &str, line: usize) -> String {
    let stem = Path::new(document).with_extension("");
    let slug: String = stem
        .to_string_lossy()
        .trim_start_matches(['.', '/'])
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '_' | '/' | '-') { c } else { '-' })
        .collect();
    format!("{slug}-{line}")
}

/// All `#tag` tokens in order of appearance, without the `#`, deduplicated.
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for m in TAG.find_iter(text) {
        push_unique(&mut tags, &m.as_str()[1..]);
    }
    tags
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_owned());
    }
}

/// Remove tag tokens and collapse the remaining whitespace.
pub fn strip_tags(text: &str) -> String {
    let without = TAG.replace_all(text, " ");
    WHITESPACE_RUN.replace_all(without.trim(), " ").into_owned()
}

/// Split tag-free text into a title (first line) and description (the rest).
pub fn split_title_description(text: &str) -> (String, String) {
    let mut lines = text.lines();
    let title = lines.next().map(strip_tags).unwrap_or_default();
    let description = lines.map(strip_tags).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n");
    (title, description)
}

/// Valid configured date tags with their byte offsets, and the text with
/// those tags blanked out so every other offset stays put.
fn take_date_tags(text: &str, config: &Config) -> (Vec<(usize, String)>, String) {
    let mut masked = text.to_owned();
    let mut found = Vec::new();
    let Some(re) = date_tag_regex(config) else {
        return (found, masked);
    };
    for caps in re.captures_iter(text) {
        let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else { continue };
        if let Err(e) = NaiveDate::parse_from_str(value.as_str(), &config.date_format) {
            debug!(value = value.as_str(), error = %e, "ignoring malformed date tag");
            continue;
        }
        found.push((whole.start(), whole.as_str().to_owned()));
        masked.replace_range(whole.range(), &" ".repeat(whole.len()));
    }
    (found, masked)
}

/// All tags of a task line in order of appearance, without the `#`,
/// deduplicated.
///
/// Configured date tags are read whole before the generic scan, so a date
/// format containing characters such as `.` stays inside its tag.
pub fn line_tags(text: &str, config: &Config) -> Vec<String> {
    let (mut found, masked) = take_date_tags(text, config);
    found.extend(TAG.find_iter(&masked).map(|m| (m.start(), m.as_str().to_owned())));
    found.sort_by_key(|(start, _)| *start);

    let mut tags = Vec::new();
    for (_, token) in &found {
        push_unique(&mut tags, token.strip_prefix('#').unwrap_or(token));
    }
    tags
}

/// Title and description of a task line with every tag removed.
pub fn line_title(text: &str, config: &Config) -> (String, String) {
    split_title_description(&take_date_tags(text, config).1)
}

/// Tier named by a manual priority tag (`priority/b` or a bare `B`).
pub fn tag_priority(tag: &str) -> Option<PriorityTier> {
    let lower = tag.to_ascii_lowercase();
    PriorityTier::from_letter(lower.strip_prefix("priority/").unwrap_or(&lower))
}

/// Whether a tag (without `#`) is one of the manual priority forms.
pub fn is_priority_tag(tag: &str) -> bool {
    tag_priority(tag).is_some()
}

/// The first `#priority/<X>` or bare `#<X>` tag in the text, if any.
///
/// A letter followed by further tag characters (`#deploy`, `#b-side`) is
/// not an override.
pub fn manual_priority(text: &str) -> Option<PriorityTier> {
    extract_tags(text).iter().find_map(|t| tag_priority(t))
}

fn date_tag_regex(config: &Config) -> Option<Regex> {
    let escaped = regex::escape(&config.date_tag_template);
    Regex::new(&escaped.replacen(DATE_PLACEHOLDER, r"([^\s#]+)", 1)).ok()
}

/// The date carried by the first valid configured date tag.
pub fn tagged_due_date(text: &str, config: &Config) -> Option<NaiveDate> {
    let re = date_tag_regex(config)?;
    let date = re
        .captures_iter(text)
        .find_map(|caps| NaiveDate::parse_from_str(caps.get(1)?.as_str(), &config.date_format).ok());
    date
}

/// The first bare `YYYY-MM-DD` token anywhere in the text.
pub fn bare_due_date(text: &str) -> Option<NaiveDate> {
    BARE_ISO_DATE
        .captures_iter(text)
        .find_map(|caps| NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok())
}

/// The assigned date carried by the line, if any.
///
/// The configured date tag is tried first; failing that, a bare
/// `YYYY-MM-DD` token anywhere in the text. Unparseable dates are ignored.
pub fn parse_due_date(text: &str, config: &Config) -> Option<NaiveDate> {
    tagged_due_date(text, config).or_else(|| bare_due_date(text))
}

/// Whether a tag (without `#`) is the configured date tag with a valid date.
pub fn is_date_tag(tag: &str, config: &Config) -> bool {
    let Some(re) = date_tag_regex(config) else { return false };
    let hashed = format!("#{tag}");
    re.captures(&hashed)
        .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0 && m.end() == hashed.len()))
        .and_then(|caps| caps.get(1))
        .is_some_and(|value| NaiveDate::parse_from_str(value.as_str(), &config.date_format).is_ok())
}

/// Parse every task in a document using the current time as creation time.
pub fn parse_document(text: &str, document: &str, config: &Config) -> Vec<TaskRecord> {
    parse_document_at(text, document, config, Utc::now().timestamp())
}

/// Parse every task in a document with an explicit creation timestamp.
pub fn parse_document_at(text: &str, document: &str, config: &Config, now_utc: i64) -> Vec<TaskRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(head) = parse_checkbox_line(lines[i]) else {
            i += 1;
            continue;
        };

        let mut subtask_lines = Vec::new();
        let mut next = i + 1;
        let mut j = i + 1;
        while j < lines.len() {
            if lines[j].trim().is_empty() {
                j += 1;
                continue;
            }
            match parse_checkbox_line(lines[j]) {
                Some(sub) if sub.indent_width() > head.indent_width() => {
                    subtask_lines.push((j, sub));
                    j += 1;
                    next = j;
                }
                _ => break,
            }
        }

        records.push(build_record(document, i, lines[i], &head, &subtask_lines, config, now_utc));
        i = next;
    }

    debug!(document, tasks = records.len(), "parsed document");
    records
}

fn build_record(
    document: &str,
    line: usize,
    raw: &str,
    head: &CheckboxLine<'_>,
    subtask_lines: &[(usize, CheckboxLine<'_>)],
    config: &Config,
    now_utc: i64,
) -> TaskRecord {
    let id = record_id(document, line);
    let tags = line_tags(head.text, config);
    let (title, description) = line_title(head.text, config);

    let subtasks: Vec<SubtaskRecord> = subtask_lines
        .iter()
        .map(|(sub_line, sub)| SubtaskRecord {
            id: record_id(document, *sub_line),
            title: sub.text.trim().to_owned(),
            completed: sub.checked,
            task_id: id.clone(),
            complexity: complexity::score(sub.text),
        })
        .collect();

    let manual = tags.iter().find_map(|t| tag_priority(t));
    let (tier, is_auto) = priority::resolve(subtasks.len(), manual, config);
    let allocated = priority::allocated_minutes(tier, config);
    let tagged_due = tagged_due_date(head.text, config);
    let due = tagged_due.or_else(|| bare_due_date(head.text));

    TaskRecord {
        id,
        title,
        description,
        priority_tier: tier,
        is_auto_priority: is_auto,
        allocated_time: allocated,
        remaining_time: if head.checked { 0 } else { allocated },
        estimated_time: suitability::estimate_minutes(&subtasks),
        subtasks,
        assigned_date: due,
        original_assigned_date: due,
        date_from_tag: tagged_due.is_some(),
        reschedules: Vec::new(),
        needs_reschedule_warning: config.reschedule_warning_threshold == 0,
        completed: head.checked,
        completed_at_utc: None,
        created_at_utc: now_utc,
        source: SourceLocation {
            document: document.to_owned(),
            line,
            raw: raw.to_owned(),
        },
        parent_id: None,
        child_ids: Default::default(),
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<TaskRecord> {
        parse_document_at(text, "notes.md", &Config::default(), 0)
    }

    #[test]
    fn recognises_checkbox_syntax() {
        assert!(parse_checkbox_line("- [ ] a").is_some());
        assert!(parse_checkbox_line("* [x] a").is_some());
        assert!(parse_checkbox_line("    - [X] a").is_some());
        assert!(parse_checkbox_line("- [ ]").is_some());
        assert!(parse_checkbox_line("- [y] a").is_none());
        assert!(parse_checkbox_line("-[ ] a").is_none());
        assert!(parse_checkbox_line("+ [ ] a").is_none());
        assert!(parse_checkbox_line("- [ ]a").is_none());
        assert!(parse_checkbox_line("1. [ ] a").is_none());
    }

    #[test]
    fn nested_lines_become_subtasks() {
        let tasks = parse("# Notes\n- [ ] Parent\n  - [ ] one\n\n  - [x] two\n- [ ] Sibling\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Parent");
        assert_eq!(tasks[0].subtask_count(), 2);
        assert_eq!(tasks[0].subtasks[0].id, "notes-2");
        assert_eq!(tasks[0].subtasks[1].title, "two");
        assert!(tasks[0].subtasks[1].completed);
        assert_eq!(tasks[0].subtasks[1].task_id, "notes-1");
        assert_eq!(tasks[1].title, "Sibling");
        assert_eq!(tasks[1].subtask_count(), 0);
    }

    #[test]
    fn prose_line_ends_the_subtask_block() {
        let tasks = parse("- [ ] Parent\n  - [ ] one\n  some prose\n  - [ ] orphan\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].subtask_count(), 1);
        assert_eq!(tasks[1].title, "orphan");
        assert_eq!(tasks[1].source.line, 3);
    }

    #[test]
    fn indented_tasks_need_deeper_subtasks() {
        let tasks = parse("  - [ ] A\n  - [ ] B\n    - [ ] B1\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].subtask_count(), 0);
        assert_eq!(tasks[1].subtask_count(), 1);
    }

    #[test]
    fn tags_are_collected_and_removed_from_title() {
        let tasks = parse("- [ ] Ship #project/alpha the   release #work-item #project/alpha\n");
        assert_eq!(tasks[0].title, "Ship the release");
        assert_eq!(tasks[0].tags, vec!["project/alpha".to_owned(), "work-item".to_owned()]);
        assert_eq!(tasks[0].description, "");
    }

    #[test]
    fn empty_title_is_accepted() {
        let tasks = parse("- [ ]\n* [x] #B\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "");
        assert_eq!(tasks[1].title, "");
        assert!(tasks[1].completed);
    }

    #[test]
    fn manual_priority_forms() {
        assert_eq!(manual_priority("x #priority/a y"), Some(PriorityTier::A));
        assert_eq!(manual_priority("x #C"), Some(PriorityTier::C));
        assert_eq!(manual_priority("x #deploy #b"), Some(PriorityTier::B));
        assert_eq!(manual_priority("#ab #abc"), None);
        assert_eq!(manual_priority("#priority/E"), None);
        assert_eq!(manual_priority("#D then #priority/A"), Some(PriorityTier::D));
        assert_eq!(manual_priority("#priority/B then #A"), Some(PriorityTier::B));
        assert_eq!(manual_priority("#b-side"), None);
    }

    #[test]
    fn record_ids_fit_in_a_tag() {
        assert_eq!(record_id("notes.md", 4), "notes-4");
        assert_eq!(record_id("./plans/week 12.md", 0), "plans/week-12-0");
        assert_eq!(record_id("/tmp/a.b/todo.txt", 7), "tmp/a-b/todo-7");
        let id = record_id("plans/week 12.md", 3);
        assert_eq!(extract_tags(&format!("x #parent/{id}")), vec![format!("parent/{id}")]);
    }

    #[test]
    fn override_beats_subtask_count() {
        let tasks = parse("- [ ] Tiny #A\n- [ ] Bad #priority/Z\n  - [ ] one\n  - [ ] two\n");
        assert_eq!(tasks[0].priority_tier, PriorityTier::A);
        assert!(!tasks[0].is_auto_priority);
        assert_eq!(tasks[1].priority_tier, PriorityTier::C);
        assert!(tasks[1].is_auto_priority);
    }

    #[test]
    fn priority_tag_detection() {
        assert!(is_priority_tag("priority/a"));
        assert!(is_priority_tag("Priority/B"));
        assert!(is_priority_tag("d"));
        assert!(!is_priority_tag("priority/x"));
        assert!(!is_priority_tag("deploy"));
    }

    #[test]
    fn due_dates_from_tag_or_bare_token() {
        let config = Config::default();
        let d = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(parse_due_date("Call #due/2024-06-03", &config), Some(d));
        assert_eq!(parse_due_date("Call on 2024-06-03", &config), Some(d));
        assert_eq!(parse_due_date("Call #due/2024-02-30", &config), None);
        assert_eq!(parse_due_date("Call #due/tomorrow", &config), None);
        assert_eq!(parse_due_date("Call soon", &config), None);
    }

    #[test]
    fn custom_date_template_and_format() {
        let config = Config {
            date_tag_template: "#on/%date%".into(),
            date_format: "%d.%m.%Y".into(),
            ..Config::default()
        };
        let d = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(parse_due_date("Call #on/03.06.2024", &config), Some(d));
        assert!(is_date_tag("on/03.06.2024", &config));
        assert!(!is_date_tag("due/2024-06-03", &config));
    }

    #[test]
    fn date_tag_with_dots_stays_whole() {
        let config = Config {
            date_tag_template: "#on/%date%".into(),
            date_format: "%d.%m.%Y".into(),
            ..Config::default()
        };
        let tasks = parse_document_at("- [ ] Call #on/03.06.2024 #home\n", "t.md", &config, 0);
        assert_eq!(tasks[0].title, "Call");
        assert_eq!(tasks[0].tags, vec!["on/03.06.2024".to_owned(), "home".to_owned()]);
        assert!(tasks[0].date_from_tag);
        assert_eq!(line_tags("#on/32.13.2024 x", &config), vec!["on/32".to_owned()]);
    }

    #[test]
    fn bare_date_is_not_a_tag() {
        let tasks = parse("- [ ] Call on 2024-06-03 #sprint/2024-06-10\n");
        assert_eq!(tasks[0].assigned_date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert!(!tasks[0].date_from_tag);
        assert_eq!(tasks[0].tags, vec!["sprint/2024-06-10".to_owned()]);

        let tasks = parse("- [ ] Call on 2024-06-03 #due/2024-06-10\n");
        assert_eq!(tasks[0].assigned_date, NaiveDate::from_ymd_opt(2024, 6, 10));
        assert!(tasks[0].date_from_tag);
    }

    #[test]
    fn parsed_due_date_sets_both_dates() {
        let tasks = parse("- [ ] Renew passport #due/2025-01-31\n");
        let d = NaiveDate::from_ymd_opt(2025, 1, 31);
        assert_eq!(tasks[0].assigned_date, d);
        assert_eq!(tasks[0].original_assigned_date, d);
        assert_eq!(tasks[0].reschedule_count(), 0);
    }

    #[test]
    fn checked_task_has_no_remaining_time() {
        let tasks = parse("- [x] Done already\n- [ ] Open\n");
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].remaining_time, 0);
        assert_eq!(tasks[1].remaining_time, tasks[1].allocated_time);
    }

    #[test]
    fn malformed_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("just text\n[ ] no bullet\n-- [x] double\n").is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "- [ ] A #b\n  - [ ] design api\n  - [ ] write tests\n* [x] B\n";
        assert_eq!(parse(text), parse(text));
    }
}
