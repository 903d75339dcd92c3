//! Errors raised by the host-facing surface: configuration, document I/O
//! and write-back. The parsing and analysis core never fails.

use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

pub type Result<T> = StdResult<T, TriageError>;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No task found matching '{0}'")]
    TaskNotFound(String),

    #[error("Multiple tasks match '{query}':\n{}\nPlease use the task id instead.", .candidates.join("\n"))]
    AmbiguousTask { query: String, candidates: Vec<String> },

    #[error("Could not understand date '{0}'")]
    InvalidDate(String),

    #[error("Line {line} changed on disk since it was read; re-run to pick up the new content")]
    StaleSource { line: usize },
}
