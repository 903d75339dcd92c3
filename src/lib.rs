//! # Checklist triage
//!
//! Turns checkbox lines embedded in plain-text documents into structured
//! tasks, sizes them, and flags the ones whose shape no longer fits a fixed
//! priority/time budget.
//!
//! ## Pipeline
//!
//! - **Extraction** ([`parser`]): every `- [ ]` / `* [x]` line becomes a task;
//!   deeper-indented checkbox lines directly below it become its subtasks.
//!   `#tags` are collected, and `#priority/B` or a bare `#B` pins the tier.
//! - **Scoring** ([`complexity`]): each subtask gets a 1-5 score from the
//!   verbs and qualifiers in its title.
//! - **Classification** ([`priority`]): the subtask count picks a tier
//!   (A >= 6, B >= 4, C >= 2, D otherwise) and the tier picks a time budget.
//! - **Analysis** ([`suitability`]): tasks that are too big, too uneven or
//!   over their time budget are flagged.
//! - **Breakdown** ([`breakdown`]): flagged tasks get proposals for smaller
//!   tasks built from their subtasks.
//!
//! ## Example
//!
//! ```
//! use checklist_triage::{analyze, parse_document_at, Config, PriorityTier, RecommendedAction};
//!
//! let text = "- [ ] Plan vacation\n  - [ ] Book flights\n  - [ ] Reserve hotel\n  - [ ] Plan itinerary\n  - [ ] Research visa requirements\n";
//! let tasks = parse_document_at(text, "trip.md", &Config::default(), 0);
//!
//! assert_eq!(tasks.len(), 1);
//! assert_eq!(tasks[0].priority_tier, PriorityTier::B);
//! assert_eq!(analyze(&tasks[0]).recommended_action, RecommendedAction::Required);
//! ```
//!
//! All core functions are pure over a document snapshot and an explicit
//! [`Config`]; only the [`cmd`] layer touches the file system.

pub mod autofix;
pub mod breakdown;
pub mod cli;
pub mod cmd;
pub mod complexity;
pub mod config;
pub mod dates;
pub mod display;
pub mod error;
pub mod fields;
pub mod parser;
pub mod priority;
pub mod project;
pub mod relations;
pub mod render;
pub mod suitability;
pub mod task;

pub use autofix::{auto_fix, AutoFix};
pub use breakdown::{suggest_breakdown, BreakdownSuggestion};
pub use config::Config;
pub use error::{Result, TriageError};
pub use fields::*;
pub use parser::{parse_document, parse_document_at};
pub use project::group_by_project;
pub use relations::link_relationships;
pub use render::{serialize, serialize_block};
pub use suitability::{analyze, SuitabilityIssue, SuitabilityReport};
pub use task::{RescheduleEvent, SourceLocation, SubtaskRecord, TaskRecord};

/// Compile one of the crate's built-in patterns. They are string literals,
/// so a failure here is a bug rather than bad input.
pub(crate) fn compile(pattern: &str) -> regex::Regex {
    match regex::Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("built-in pattern {pattern:?} is invalid: {err}"),
    }
}
