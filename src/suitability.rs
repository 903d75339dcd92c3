//! Suitability analysis: does a task's shape still fit the fixed
//! tier/time model?
//!
//! Three independent checks run against a task. Each may raise one issue;
//! the most severe issue decides the recommended action.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::compile;
use crate::fields::*;
use crate::task::{SubtaskRecord, TaskRecord};

/// Subtask count above which a task is too big regardless of wording.
pub const MAX_SUBTASKS: usize = 10;
/// Distinct complexity keywords that mark a task as too big.
pub const KEYWORD_LIMIT: usize = 3;
/// Largest complexity spread tolerated between subtasks.
pub const MAX_COMPLEXITY_SPREAD: u8 = 3;
/// Estimate for a task without subtasks, in minutes.
pub const DEFAULT_ESTIMATE: u32 = 30;
/// Minutes of effort per complexity point.
pub const MINUTES_PER_POINT: u32 = 10;

const COMPLEXITY_KEYWORDS: [&str; 15] = [
    "research",
    "analyze",
    "design",
    "implement",
    "test",
    "deploy",
    "multiple",
    "various",
    "several",
    "comprehensive",
    "complete",
    "system",
    "platform",
    "architecture",
    "infrastructure",
];

/// One word-start pattern per keyword, matching the complexity scorer.
static KEYWORD_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| COMPLEXITY_KEYWORDS.iter().map(|k| compile(&format!(r"\b{k}"))).collect());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitabilityIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
}

/// Outcome of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitabilityReport {
    pub issues: Vec<SuitabilityIssue>,
    pub recommended_action: RecommendedAction,
    /// Complexity-derived estimate the time check used, in minutes.
    pub estimated_time: u32,
}

impl SuitabilityReport {
    pub fn is_problematic(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn high_severity_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::High).count()
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Effort estimate from subtask complexity: ten minutes per point, or a
/// flat half hour for a task without subtasks.
pub fn estimate_minutes(subtasks: &[SubtaskRecord]) -> u32 {
    if subtasks.is_empty() {
        return DEFAULT_ESTIMATE;
    }
    subtasks.iter().map(|s| u32::from(s.complexity) * MINUTES_PER_POINT).sum()
}

/// Run every check against a task.
pub fn analyze(task: &TaskRecord) -> SuitabilityReport {
    let estimated_time = estimate_minutes(&task.subtasks);
    let issues: Vec<SuitabilityIssue> = [
        check_too_complex(task),
        check_inconsistent_complexity(task),
        check_time_mismatch(task, estimated_time),
    ]
    .into_iter()
    .flatten()
    .collect();

    let recommended_action = if issues.iter().any(|i| i.severity == Severity::High) {
        RecommendedAction::Required
    } else if !issues.is_empty() {
        RecommendedAction::Suggested
    } else {
        RecommendedAction::None
    };

    SuitabilityReport { issues, recommended_action, estimated_time }
}

fn keyword_hits(task: &TaskRecord) -> usize {
    let text = format!("{} {}", task.title, task.description).to_lowercase();
    KEYWORD_PATTERNS.iter().filter(|k| k.is_match(&text)).count()
}

fn check_too_complex(task: &TaskRecord) -> Option<SuitabilityIssue> {
    let count = task.subtask_count();
    let hits = keyword_hits(task);
    if count <= MAX_SUBTASKS && hits < KEYWORD_LIMIT {
        return None;
    }
    let message = if count > MAX_SUBTASKS {
        format!("Task has {count} subtasks, more than {MAX_SUBTASKS} fit in one sitting")
    } else {
        format!("Task description mentions {hits} complexity indicators")
    };
    Some(SuitabilityIssue {
        kind: IssueKind::TooComplex,
        severity: Severity::High,
        message,
        suggestion: "Split this task into several smaller, focused tasks".into(),
    })
}

fn check_inconsistent_complexity(task: &TaskRecord) -> Option<SuitabilityIssue> {
    if task.subtask_count() < 3 {
        return None;
    }
    let scores = task.subtasks.iter().map(|s| s.complexity);
    let max = scores.clone().max()?;
    let min = scores.min()?;
    if max - min <= MAX_COMPLEXITY_SPREAD {
        return None;
    }
    Some(SuitabilityIssue {
        kind: IssueKind::InconsistentComplexity,
        severity: Severity::Medium,
        message: format!("Subtask complexity ranges from {min} to {max}"),
        suggestion: "Group subtasks of similar complexity into separate tasks".into(),
    })
}

fn check_time_mismatch(task: &TaskRecord, estimated: u32) -> Option<SuitabilityIssue> {
    // Compared in tenths to stay in integers: estimated > 1.5 * allocated.
    if u64::from(estimated) * 10 <= u64::from(task.allocated_time) * 15 {
        return None;
    }
    Some(SuitabilityIssue {
        kind: IssueKind::TimeMismatch,
        severity: Severity::High,
        message: format!(
            "Estimated {estimated} min exceeds the {} min allocated to tier {}",
            task.allocated_time, task.priority_tier
        ),
        suggestion: "Break the task down or move it to a tier with a larger time budget".into(),
    })
}

/// How pressing a breakdown is for this report.
pub fn urgency(report: &SuitabilityReport) -> Urgency {
    match report.recommended_action {
        RecommendedAction::None => Urgency::None,
        RecommendedAction::Required => Urgency::High,
        RecommendedAction::Suggested => {
            if report.high_severity_count() > 0 {
                Urgency::High
            } else if report.issues.iter().any(|i| i.severity == Severity::Medium) {
                Urgency::Medium
            } else {
                Urgency::Low
            }
        }
    }
}

/// One-line description of a report.
pub fn summary(report: &SuitabilityReport) -> String {
    let count = report.issues.len();
    if count == 0 {
        return "No issues found".into();
    }
    let plural = if count == 1 { "issue" } else { "issues" };
    let verdict = match report.recommended_action {
        RecommendedAction::Required => "breakdown required",
        _ => "breakdown advisable",
    };
    format!("{count} {plural} found ({} high severity), {verdict}", report.high_severity_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::tests::record;

    fn with_scores(mut task: TaskRecord, scores: &[u8]) -> TaskRecord {
        task.subtasks = scores
            .iter()
            .enumerate()
            .map(|(i, &complexity)| SubtaskRecord {
                id: format!("doc-{}", i + 1),
                title: format!("step {i}"),
                completed: false,
                task_id: task.id.clone(),
                complexity,
            })
            .collect();
        task
    }

    #[test]
    fn eleven_flat_subtasks_are_too_complex() {
        let task = with_scores(record(PriorityTier::A, 30), &[1; 11]);
        let report = analyze(&task);
        assert!(report.has(IssueKind::TooComplex));
        assert!(!report.has(IssueKind::InconsistentComplexity));
        assert_eq!(report.recommended_action, RecommendedAction::Required);
        assert_eq!(urgency(&report), Urgency::High);
    }

    #[test]
    fn keywords_in_title_trigger_too_complex() {
        let mut task = record(PriorityTier::D, 60);
        task.title = "Research and design the platform".into();
        assert!(analyze(&task).has(IssueKind::TooComplex));

        task.title = "Research the platform".into();
        assert!(!analyze(&task).has(IssueKind::TooComplex));

        task.description = "then deploy it".into();
        assert!(analyze(&task).has(IssueKind::TooComplex));
    }

    #[test]
    fn keywords_only_count_at_word_start() {
        let mut task = record(PriorityTier::D, 60);
        task.title = "Retest the subsystem replatforming".into();
        assert!(!analyze(&task).has(IssueKind::TooComplex));

        task.title = "Testing systems on several platforms".into();
        assert!(analyze(&task).has(IssueKind::TooComplex));
    }

    #[test]
    fn wide_spread_is_inconsistent() {
        let task = with_scores(record(PriorityTier::D, 60), &[1, 1, 1, 5, 5]);
        let report = analyze(&task);
        assert!(report.has(IssueKind::InconsistentComplexity));
        assert_ne!(report.recommended_action, RecommendedAction::None);
    }

    #[test]
    fn spread_needs_three_subtasks() {
        let task = with_scores(record(PriorityTier::D, 60), &[1, 5]);
        assert!(!analyze(&task).has(IssueKind::InconsistentComplexity));
        let task = with_scores(record(PriorityTier::D, 60), &[1, 4, 4]);
        assert!(!analyze(&task).has(IssueKind::InconsistentComplexity));
    }

    #[test]
    fn medium_only_is_suggested() {
        let task = with_scores(record(PriorityTier::D, 60), &[1, 1, 5]);
        let report = analyze(&task);
        assert_eq!(report.estimated_time, 70);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.recommended_action, RecommendedAction::Suggested);
        assert_eq!(urgency(&report), Urgency::Medium);
        assert_eq!(summary(&report), "1 issue found (0 high severity), breakdown advisable");
    }

    #[test]
    fn tier_d_over_ninety_minutes_is_time_mismatch() {
        let task = with_scores(record(PriorityTier::D, 60), &[5, 4]);
        assert_eq!(analyze(&task).estimated_time, 90);
        assert!(!analyze(&task).has(IssueKind::TimeMismatch));

        let task = with_scores(record(PriorityTier::D, 60), &[5, 4, 1]);
        let report = analyze(&task);
        assert_eq!(report.estimated_time, 100);
        assert!(report.has(IssueKind::TimeMismatch));
        assert_eq!(report.recommended_action, RecommendedAction::Required);
    }

    #[test]
    fn task_without_subtasks_estimates_thirty() {
        let report = analyze(&record(PriorityTier::C, 10));
        assert_eq!(report.estimated_time, 30);
        assert!(report.has(IssueKind::TimeMismatch));

        let report = analyze(&record(PriorityTier::D, 60));
        assert!(!report.is_problematic());
        assert_eq!(report.recommended_action, RecommendedAction::None);
        assert_eq!(urgency(&report), Urgency::None);
        assert_eq!(summary(&report), "No issues found");
    }

    #[test]
    fn summary_counts_high_issues() {
        let task = with_scores(record(PriorityTier::A, 30), &[1, 1, 1, 5, 5, 1, 1, 1, 1, 1, 1]);
        let report = analyze(&task);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(summary(&report), "3 issues found (2 high severity), breakdown required");
    }
}
