//! Breakdown suggestions: proposes smaller tasks built from groups of an
//! existing task's subtasks.
//!
//! Subtasks are grouped by lexical category first. When that yields no
//! group of two or more and the task is large, they are banded by
//! complexity instead.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::compile;
use crate::config::Config;
use crate::fields::{Category, PriorityTier};
use crate::task::{SubtaskRecord, TaskRecord};

/// Subtask count above which the complexity-band fallback applies.
pub const FALLBACK_MIN_SUBTASKS: usize = 6;
const COMPLEX_TASKS_MINUTES: u32 = 30;
const QUICK_TASKS_MINUTES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSuggestion {
    pub title: String,
    pub tier: PriorityTier,
    pub subtasks: Vec<String>,
    /// Minutes.
    pub estimated_time: u32,
    pub reasoning: String,
}

/// Category patterns in matching order; first match wins.
static CATEGORY_PATTERNS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    vec![
        (Category::Design, compile(r"\b(?:design|mockup|wireframe|prototype|sketch|layout|ui\b|ux\b)")),
        (Category::Implementation, compile(r"\b(?:implement|build|develop|code|coding|program|integrate|refactor)")),
        (Category::Testing, compile(r"\b(?:test|qa\b|verify|validate|debug)")),
        (Category::Research, compile(r"\b(?:research|investigate|analy[sz]e|explore|study|compare|evaluate)")),
        (Category::Documentation, compile(r"\b(?:document|docs\b|readme|write up|manual|guide)")),
        (Category::Planning, compile(r"\b(?:plan|schedule|organi[sz]e|prepare|outline|estimate|roadmap)")),
        (Category::Deployment, compile(r"\b(?:deploy|release|launch|publish|ship|rollout)")),
    ]
});

/// Category of a subtask title; `General` when nothing matches.
pub fn categorize(title: &str) -> Category {
    let text = title.to_lowercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&text))
        .map_or(Category::General, |(category, _)| *category)
}

/// Group subtasks by category, keeping first-encounter order for both the
/// groups and their members.
pub fn group_by_category(subtasks: &[SubtaskRecord]) -> Vec<(Category, Vec<&SubtaskRecord>)> {
    let mut groups: Vec<(Category, Vec<&SubtaskRecord>)> = Vec::new();
    for subtask in subtasks {
        let category = categorize(&subtask.title);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(subtask),
            None => groups.push((category, vec![subtask])),
        }
    }
    groups
}

/// Tier for a group from its average complexity and size.
pub fn group_tier(members: &[&SubtaskRecord]) -> PriorityTier {
    let count = members.len();
    if count == 0 {
        return PriorityTier::D;
    }
    let total: u32 = members.iter().map(|s| u32::from(s.complexity)).sum();
    // avg >= n  <=>  total >= n * count
    let avg_at_least = |n: u32| total >= n * count as u32;
    if avg_at_least(4) || count >= 6 {
        PriorityTier::A
    } else if avg_at_least(3) || count >= 4 {
        PriorityTier::B
    } else if avg_at_least(2) || count >= 2 {
        PriorityTier::C
    } else {
        PriorityTier::D
    }
}

/// Propose smaller tasks for `task`. Never emits a group of one.
pub fn suggest_breakdown(task: &TaskRecord, config: &Config) -> Vec<BreakdownSuggestion> {
    let suggestions: Vec<BreakdownSuggestion> = group_by_category(&task.subtasks)
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(category, members)| {
            let tier = group_tier(&members);
            BreakdownSuggestion {
                title: format!("{} - {}", task.title, category.name()),
                tier,
                subtasks: titles(&members),
                estimated_time: config.time.minutes_for(tier),
                reasoning: format!("Groups {} {} subtasks together", members.len(), category.name()),
            }
        })
        .collect();

    if suggestions.is_empty() && task.subtask_count() > FALLBACK_MIN_SUBTASKS {
        return suggest_by_complexity(task, config);
    }
    suggestions
}

fn suggest_by_complexity(task: &TaskRecord, config: &Config) -> Vec<BreakdownSuggestion> {
    let high = band(task, |c| c >= 4);
    let medium = band(task, |c| (2..=3).contains(&c));
    let low = band(task, |c| c < 2);

    let mut suggestions = Vec::new();
    if !high.is_empty() {
        suggestions.push(BreakdownSuggestion {
            title: "Complex Tasks".into(),
            tier: PriorityTier::A,
            subtasks: titles(&high),
            estimated_time: COMPLEX_TASKS_MINUTES,
            reasoning: format!("{} high-complexity subtasks need focused time", high.len()),
        });
    }
    if !medium.is_empty() {
        let tier = if medium.len() >= 4 { PriorityTier::B } else { PriorityTier::C };
        suggestions.push(BreakdownSuggestion {
            title: "Standard Tasks".into(),
            tier,
            subtasks: titles(&medium),
            estimated_time: config.time.minutes_for(tier),
            reasoning: format!("{} medium-complexity subtasks", medium.len()),
        });
    }
    if !low.is_empty() {
        suggestions.push(BreakdownSuggestion {
            title: "Quick Tasks".into(),
            tier: PriorityTier::C,
            subtasks: titles(&low),
            estimated_time: QUICK_TASKS_MINUTES,
            reasoning: format!("{} quick subtasks can be batched", low.len()),
        });
    }
    suggestions
}

fn band(task: &TaskRecord, keep: impl Fn(u8) -> bool) -> Vec<&SubtaskRecord> {
    task.subtasks.iter().filter(|s| keep(s.complexity)).collect()
}

fn titles(members: &[&SubtaskRecord]) -> Vec<String> {
    members.iter().map(|s| s.title.clone()).collect()
}
