//! Enumerations and field types for checklist tasks.
//!
//! This module defines the structured values that classify tasks and the
//! results of analysing them: priority tiers, completion status, suitability
//! issue kinds and severities, and breakdown categories.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority bucket governing a task's nominal time budget.
///
/// Ordering follows importance: `D < C < B < A`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum PriorityTier {
    A,
    B,
    C,
    D,
}

impl PriorityTier {
    /// Parse a single tier letter, case-insensitively.
    pub fn from_letter(s: &str) -> Option<PriorityTier> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Some(PriorityTier::A),
            "B" => Some(PriorityTier::B),
            "C" => Some(PriorityTier::C),
            "D" => Some(PriorityTier::D),
            _ => None,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            PriorityTier::A => "A",
            PriorityTier::B => "B",
            PriorityTier::C => "C",
            PriorityTier::D => "D",
        }
    }

    /// Numeric rank used for ordering, `D = 0` up to `A = 3`.
    pub fn rank(self) -> u8 {
        match self {
            PriorityTier::A => 3,
            PriorityTier::B => 2,
            PriorityTier::C => 1,
            PriorityTier::D => 0,
        }
    }
}

impl PartialOrd for PriorityTier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityTier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    Done,
}

/// The structural mismatch a suitability check detected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    TooComplex,
    InconsistentComplexity,
    TimeMismatch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// What the analyzer recommends doing about a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendedAction {
    None,
    Suggested,
    Required,
}

/// How pressing a breakdown is, derived from a suitability report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    None,
    Low,
    Medium,
    High,
}

/// Lexical category a subtask falls into when suggesting a breakdown.
///
/// Declaration order is the matching order: the first category whose
/// keywords match a subtask wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Design,
    Implementation,
    Testing,
    Research,
    Documentation,
    Planning,
    Deployment,
    General,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Design => "Design",
            Category::Implementation => "Implementation",
            Category::Testing => "Testing",
            Category::Research => "Research",
            Category::Documentation => "Documentation",
            Category::Planning => "Planning",
            Category::Deployment => "Deployment",
            Category::General => "General",
        }
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Tier,
    Due,
    Line,
}
