//! Configuration consumed by the parsing and analysis core.
//!
//! A [`Config`] is an immutable value passed explicitly into every core
//! function. It can be loaded from a TOML file where every field is optional.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TriageError};
use crate::fields::PriorityTier;

/// Placeholder replaced by the formatted date inside [`Config::date_tag_template`].
pub const DATE_PLACEHOLDER: &str = "%date%";

/// Complete configuration surface of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum subtask counts for the automatic tiers.
    pub thresholds: TierThresholds,
    /// Per-task time allocation for each tier, in minutes.
    pub time: TimeTable,
    /// Reschedule count at which a task gets flagged.
    pub reschedule_warning_threshold: usize,
    /// Template for date tags, must contain `%date%`.
    pub date_tag_template: String,
    /// chrono format string for the `%date%` value.
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            time: TimeTable::default(),
            reschedule_warning_threshold: 3,
            date_tag_template: format!("#due/{DATE_PLACEHOLDER}"),
            date_format: "%Y-%m-%d".to_owned(),
        }
    }
}

/// Subtask-count thresholds; `D` is whatever falls below `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { a: 6, b: 4, c: 2 }
    }
}

/// Fixed per-task time budget per tier, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeTable {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl Default for TimeTable {
    fn default() -> Self {
        Self { a: 30, b: 30, c: 10, d: 60 }
    }
}

impl TimeTable {
    pub fn minutes_for(&self, tier: PriorityTier) -> u32 {
        match tier {
            PriorityTier::A => self.a,
            PriorityTier::B => self.b,
            PriorityTier::C => self.c,
            PriorityTier::D => self.d,
        }
    }
}

impl Config {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, falling back to
    /// `$HOME/.triage.toml` and then to the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Config::from_toml(&fs::read_to_string(path)?);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading config");
                Config::from_toml(&fs::read_to_string(&path)?)
            }
            _ => {
                debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Check the invariants the classifier and date handling rely on.
    pub fn validate(&self) -> Result<()> {
        let t = self.thresholds;
        if t.c == 0 || t.b < t.c || t.a < t.b {
            return Err(TriageError::InvalidConfig(format!(
                "thresholds must satisfy a >= b >= c >= 1 (got a={}, b={}, c={})",
                t.a, t.b, t.c
            )));
        }
        if !self.date_tag_template.contains(DATE_PLACEHOLDER) {
            return Err(TriageError::InvalidConfig(format!(
                "date_tag_template '{}' has no {DATE_PLACEHOLDER} placeholder",
                self.date_tag_template
            )));
        }
        if !self.date_tag_template.starts_with('#') || self.date_tag_template.chars().any(char::is_whitespace) {
            return Err(TriageError::InvalidConfig(format!(
                "date_tag_template '{}' must be a single '#' tag",
                self.date_tag_template
            )));
        }
        let sample = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default();
        let mut rendered = String::new();
        if write!(rendered, "{}", sample.format(&self.date_format)).is_err() {
            return Err(TriageError::InvalidConfig(format!("date_format '{}' is not a valid format", self.date_format)));
        }
        if NaiveDate::parse_from_str(&rendered, &self.date_format).ok() != Some(sample) {
            return Err(TriageError::InvalidConfig(format!(
                "date_format '{}' does not round-trip a full date",
                self.date_format
            )));
        }
        // A date tag ends at whitespace or the next '#'.
        if rendered.chars().any(|c| c.is_whitespace() || c == '#') {
            return Err(TriageError::InvalidConfig(format!(
                "date_format '{}' produces whitespace or '#', which cannot sit inside a tag",
                self.date_format
            )));
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    match std::env::var("HOME") {
        Ok(home) => Some(PathBuf::from(home).join(".triage.toml")),
        Err(_) => {
            warn!("HOME is not set, using default configuration");
            None
        }
    }
}
