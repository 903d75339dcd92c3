//! Command implementations for the CLI interface.
//!
//! These handlers are the host side of the crate: they read documents from
//! disk, hand snapshots to the parsing and analysis core, print results and
//! write edited task lines back.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::autofix::auto_fix;
use crate::breakdown::{suggest_breakdown, BreakdownSuggestion};
use crate::config::Config;
use crate::dates::{format_relative, parse_date_input};
use crate::display::*;
use crate::error::{Result, TriageError};
use crate::fields::*;
use crate::parser::parse_document;
use crate::project::{group_by_project, project_display_name, projects_of};
use crate::relations::link_relationships;
use crate::render::serialize;
use crate::suitability::{analyze, summary, urgency, SuitabilityReport};
use crate::task::TaskRecord;

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks with optional filters.
    List {
        /// Markdown documents to read.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Filter by project tag, e.g. project/alpha.
        #[arg(long)]
        project: Option<String>,
        /// Filter by tag (without '#').
        #[arg(long)]
        tag: Option<String>,
        /// Only tasks with suitability issues.
        #[arg(long)]
        problematic: bool,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Line)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id, alias or title.
    View {
        file: PathBuf,
        task: String,
    },

    /// Report suitability issues for every open task.
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Also report tasks without issues.
        #[arg(long)]
        all: bool,
    },

    /// Suggest how to split a task into smaller ones.
    Breakdown {
        file: PathBuf,
        task: String,
    },

    /// Re-check an `export` snapshot against the current configuration.
    Fix {
        /// JSON file written by `triage export --output`.
        snapshot: PathBuf,
        /// Rewrite the snapshot with the corrected records.
        #[arg(long)]
        write: bool,
    },

    /// Mark a task done and write it back.
    Complete {
        file: PathBuf,
        task: String,
    },

    /// Reopen a completed task and write it back.
    Reopen {
        file: PathBuf,
        task: String,
    },

    /// Move a task's date: YYYY-MM-DD, "today", "tomorrow", "in 3d", "next friday".
    Reschedule {
        file: PathBuf,
        task: String,
        when: String,
        /// Why the date moved.
        #[arg(long, default_value = "Rescheduled manually")]
        reason: String,
    },

    /// Show task counts per project.
    Projects {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show tag usage counts.
    Tags {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Export tasks with their analysis as JSON.
    Export {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output file (defaults to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Read and parse documents, then link relationships across the batch.
pub fn load_tasks(files: &[PathBuf], config: &Config) -> Result<Vec<TaskRecord>> {
    let mut tasks = Vec::new();
    for path in files {
        let text = fs::read_to_string(path)?;
        tasks.extend(parse_document(&text, &path.display().to_string(), config));
    }
    link_relationships(&mut tasks);
    debug!(documents = files.len(), tasks = tasks.len(), "loaded tasks");
    Ok(tasks)
}

/// Resolve a task by id, `#id/` alias or title (case-insensitive).
pub fn resolve_task<'a>(query: &str, tasks: &'a [TaskRecord]) -> Result<&'a TaskRecord> {
    if let Some(task) = tasks.iter().find(|t| t.id == query) {
        return Ok(task);
    }
    let alias = format!("id/{query}");
    if let Some(task) = tasks.iter().find(|t| t.has_tag(&alias)) {
        return Ok(task);
    }

    let matches: Vec<&TaskRecord> = tasks.iter().filter(|t| t.title.eq_ignore_ascii_case(query)).collect();
    match matches.as_slice() {
        [] => Err(TriageError::TaskNotFound(query.to_owned())),
        [task] => Ok(*task),
        _ => Err(TriageError::AmbiguousTask {
            query: query.to_owned(),
            candidates: matches.iter().map(|t| format!("  {}: {}", t.id, t.title)).collect(),
        }),
    }
}

/// Replace the task's source line in its document, refusing if the line
/// changed since the snapshot was taken.
pub fn write_back(task: &TaskRecord, new_line: &str) -> Result<()> {
    let path = Path::new(&task.source.document);
    let text = fs::read_to_string(path)?;
    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();

    let line = task.source.line;
    let Some(current) = lines.get_mut(line) else {
        return Err(TriageError::StaleSource { line });
    };
    let crlf = current.ends_with('\r');
    if current.trim_end_matches('\r') != task.source.raw {
        return Err(TriageError::StaleSource { line });
    }
    *current = if crlf { format!("{new_line}\r") } else { new_line.to_owned() };

    write_atomically(path, &lines.join("\n"))?;
    info!(document = %path.display(), line, "wrote task back");
    Ok(())
}

/// Write through a sibling temp file and rename it over `path`. The temp
/// file is removed again if any step fails.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("triage.tmp");
    let written = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(contents.as_bytes())?;
            f.flush()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            debug!(tmp = %tmp.display(), error = %cleanup, "could not remove temp file");
        }
        return Err(e.into());
    }
    Ok(())
}

pub fn cmd_list(
    tasks: &[TaskRecord],
    all: bool,
    project: Option<String>,
    tag: Option<String>,
    problematic: bool,
    sort: SortKey,
    limit: Option<usize>,
) {
    let project = project.map(|p| p.trim_start_matches('#').to_lowercase());
    let tag = tag.map(|t| t.trim_start_matches('#').to_owned());

    let mut rows: Vec<&TaskRecord> = tasks
        .iter()
        .filter(|t| all || !t.completed)
        .filter(|t| project.as_ref().map_or(true, |p| projects_of(t).contains(p)))
        .filter(|t| tag.as_ref().map_or(true, |tag| t.has_tag(tag)))
        .filter(|t| !problematic || analyze(t).is_problematic())
        .collect();

    match sort {
        SortKey::Tier => rows.sort_by(|a, b| b.priority_tier.cmp(&a.priority_tier)),
        // Undated tasks last.
        SortKey::Due => rows.sort_by_key(|t| (t.assigned_date.is_none(), t.assigned_date)),
        SortKey::Line => {}
    }
    if let Some(n) = limit {
        rows.truncate(n);
    }

    if rows.is_empty() {
        println!("No tasks found matching the criteria.");
        return;
    }
    print_table(&rows);
}

pub fn cmd_view(task: &TaskRecord) {
    let today = Local::now().date_naive();
    let report = analyze(task);
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", format_status(task.status()));
    println!(
        "Tier:         {} ({})",
        task.priority_tier,
        if task.is_auto_priority { "auto" } else { "manual" }
    );
    println!(
        "Time:         {} min allocated, {} min remaining, {} min estimated",
        task.allocated_time, task.remaining_time, task.estimated_time
    );
    println!(
        "Due:          {}",
        match task.assigned_date {
            Some(d) => format!("{d} ({})", format_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!("Parent:       {}", task.parent_id.as_deref().unwrap_or("-"));
    if !task.child_ids.is_empty() {
        println!("Children:     {}", task.child_ids.iter().cloned().collect::<Vec<_>>().join(", "));
    }
    println!("Tags:         {}", if task.tags.is_empty() { "-".into() } else { task.tags.join(",") });
    if let Some(at) = task.completed_at_utc.and_then(|ts| Utc.timestamp_opt(ts, 0).single()) {
        println!("Completed:    {}", at.to_rfc3339());
    }
    if !task.description.is_empty() {
        println!("Description:\n{}\n", task.description);
    }

    println!("Subtasks ({}):", task.subtask_count());
    for s in &task.subtasks {
        println!("  [{}] {} (complexity {})", if s.completed { "x" } else { " " }, s.title, s.complexity);
    }
    println!("Suitability:  {}", summary(&report));
    for issue in &report.issues {
        println!("  - {} [{}]: {}", format_issue_kind(issue.kind), format_severity(issue.severity), issue.message);
    }
}

pub fn cmd_analyze(tasks: &[TaskRecord], all: bool) {
    let mut flagged = 0;
    for task in tasks.iter().filter(|t| !t.completed) {
        let report = analyze(task);
        if !report.is_problematic() && !all {
            continue;
        }
        if report.is_problematic() {
            flagged += 1;
        }
        println!("{} {} [{}] urgency {}", task.id, task.title, format_tier(task), format_urgency(urgency(&report)));
        println!("  {}", summary(&report));
        for issue in &report.issues {
            println!("  - {}: {}", format_issue_kind(issue.kind), issue.message);
            println!("    {}", issue.suggestion);
        }
    }
    println!("{flagged} task(s) flagged.");
}

pub fn cmd_breakdown(task: &TaskRecord, config: &Config) {
    let suggestions = suggest_breakdown(task, config);
    if suggestions.is_empty() {
        println!("No breakdown suggested for '{}'.", task.title);
        return;
    }
    for s in suggestions {
        println!("{} [tier {}, {} min]", s.title, s.tier, s.estimated_time);
        println!("  {}", s.reasoning);
        for title in &s.subtasks {
            println!("  - [ ] {title}");
        }
    }
}

/// Auto-fix every record of an `export` snapshot against the current
/// configuration and report the changes. Records drift when thresholds or
/// the time table change after the export; with `write` the snapshot is
/// rewritten with the corrected records and a fresh analysis.
pub fn cmd_fix(snapshot: &Path, write: bool, config: &Config) -> Result<usize> {
    let tasks = load_snapshot(snapshot)?;
    let mut corrected = Vec::with_capacity(tasks.len());
    let mut fixed = 0;
    for task in &tasks {
        let result = auto_fix(task, config);
        if result.fixed {
            fixed += 1;
            println!("{} {}", task.id, task.title);
            for change in &result.changes {
                println!("  {change}");
            }
        }
        corrected.push(result.task);
    }
    println!("{fixed} task(s) adjusted.");

    if write && fixed > 0 {
        write_atomically(snapshot, &export_json(&corrected, config)?)?;
        info!(snapshot = %snapshot.display(), fixed, "rewrote snapshot");
    }
    Ok(fixed)
}

pub fn cmd_complete(task: &TaskRecord, config: &Config) -> Result<()> {
    if task.completed {
        println!("{} is already done.", task.id);
        return Ok(());
    }
    let done = task.complete(Utc::now().timestamp());
    write_back(&done, &serialize(&done, config))?;
    println!("Marked done: {}", task.title);
    Ok(())
}

pub fn cmd_reopen(task: &TaskRecord, config: &Config) -> Result<()> {
    if !task.completed {
        println!("{} is already open.", task.id);
        return Ok(());
    }
    let open = task.reopen();
    write_back(&open, &serialize(&open, config))?;
    println!("Reopened {}", task.id);
    Ok(())
}

pub fn cmd_reschedule(task: &TaskRecord, when: &str, reason: &str, config: &Config) -> Result<()> {
    let today = Local::now().date_naive();
    let Some(to) = parse_date_input(when, today) else {
        return Err(TriageError::InvalidDate(when.to_owned()));
    };
    let moved = task.reschedule(to, reason, Utc::now().timestamp(), config);
    write_back(&moved, &serialize(&moved, config))?;
    let from = task.assigned_date.map_or_else(|| "-".to_owned(), |d| d.to_string());
    println!("Rescheduled {}: {from} -> {to} ({})", task.title, format_relative(Some(to), today));
    Ok(())
}

pub fn cmd_projects(tasks: &[TaskRecord]) {
    println!("{:<28} {:<6} {}", "Project", "Count", "Open");
    for (key, members) in group_by_project(tasks) {
        let open = members.iter().filter(|t| !t.completed).count();
        println!("{:<28} {:<6} {}", truncate(&project_display_name(&key), 28), members.len(), open);
    }
}

pub fn cmd_tags(tasks: &[TaskRecord]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for t in tasks {
        for tag in &t.tags {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    println!("{:<24} {}", "Tag", "Count");
    for (tag, count) in counts {
        println!("{:<24} {}", truncate(tag, 24), count);
    }
}

#[derive(Serialize)]
struct ExportEntry<'a> {
    task: &'a TaskRecord,
    suitability: SuitabilityReport,
    urgency: Urgency,
    breakdown: Vec<BreakdownSuggestion>,
}

/// The part of an export entry read back by `fix`; analysis is recomputed.
#[derive(Deserialize)]
struct SnapshotEntry {
    task: TaskRecord,
}

fn export_json(tasks: &[TaskRecord], config: &Config) -> Result<String> {
    let entries: Vec<ExportEntry<'_>> = tasks
        .iter()
        .map(|task| {
            let suitability = analyze(task);
            ExportEntry {
                task,
                urgency: urgency(&suitability),
                breakdown: suggest_breakdown(task, config),
                suitability,
            }
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Records stored in a snapshot written by `export`.
pub fn load_snapshot(path: &Path) -> Result<Vec<TaskRecord>> {
    let entries: Vec<SnapshotEntry> = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(entries.into_iter().map(|e| e.task).collect())
}

pub fn cmd_export(tasks: &[TaskRecord], output: Option<PathBuf>, config: &Config) -> Result<()> {
    let json = export_json(tasks, config)?;
    match output {
        Some(path) => {
            write_atomically(&path, &json)?;
            println!("Exported {} task(s) to {}", tasks.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
