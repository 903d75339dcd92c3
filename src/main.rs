//! # triage - checklist task triage CLI
//!
//! Reads markdown (or any plain-text) documents, turns their checkbox lines
//! into prioritised, time-boxed tasks and reports the ones that should be
//! broken down.
//!
//! ## Quick Start
//!
//! ```bash
//! # Tasks in a document, highest tier first
//! triage list notes.md --sort tier
//!
//! # Which tasks are overloaded, and why
//! triage analyze notes.md
//!
//! # How to split one of them
//! triage breakdown notes.md "Plan vacation"
//!
//! # Tick a task off (rewrites its line in place)
//! triage complete notes.md "Plan vacation"
//! ```
//!
//! ## Key Commands
//!
//! - `triage list` - tasks with tier, estimate and due date
//! - `triage view` - one task with subtasks, scores and suitability
//! - `triage analyze` - suitability report for open tasks
//! - `triage breakdown` - suggested smaller tasks
//! - `triage fix` - re-check an exported snapshot after a config change
//! - `triage reschedule` - move a task's date tag
//! - `triage export` - JSON dump of tasks and their analysis
//!
//! Thresholds, time budgets and the date tag format are read from
//! `~/.triage.toml` (or `--config`); every field is optional.

use std::io::stderr;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use checklist_triage::cli::Cli;
use checklist_triage::cmd::*;
use checklist_triage::config::Config;
use checklist_triage::error::Result;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(stderr).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let load_config = || Config::load(cli.config.as_deref());

    match cli.command {
        Commands::Completions { shell } => cmd_completions(shell),

        Commands::List { files, all, project, tag, problematic, sort, limit } => {
            let tasks = load_tasks(&files, &load_config()?)?;
            cmd_list(&tasks, all, project, tag, problematic, sort, limit);
        }

        Commands::View { file, task } => {
            let tasks = load_tasks(&[file], &load_config()?)?;
            cmd_view(resolve_task(&task, &tasks)?);
        }

        Commands::Analyze { files, all } => cmd_analyze(&load_tasks(&files, &load_config()?)?, all),

        Commands::Breakdown { file, task } => {
            let config = load_config()?;
            let tasks = load_tasks(&[file], &config)?;
            cmd_breakdown(resolve_task(&task, &tasks)?, &config);
        }

        Commands::Fix { snapshot, write } => {
            cmd_fix(&snapshot, write, &load_config()?)?;
        }

        Commands::Complete { file, task } => {
            let config = load_config()?;
            let tasks = load_tasks(&[file], &config)?;
            cmd_complete(resolve_task(&task, &tasks)?, &config)?;
        }

        Commands::Reopen { file, task } => {
            let config = load_config()?;
            let tasks = load_tasks(&[file], &config)?;
            cmd_reopen(resolve_task(&task, &tasks)?, &config)?;
        }

        Commands::Reschedule { file, task, when, reason } => {
            let config = load_config()?;
            let tasks = load_tasks(&[file], &config)?;
            cmd_reschedule(resolve_task(&task, &tasks)?, &when, &reason, &config)?;
        }

        Commands::Projects { files } => cmd_projects(&load_tasks(&files, &load_config()?)?),

        Commands::Tags { files } => cmd_tags(&load_tasks(&files, &load_config()?)?),

        Commands::Export { files, output } => {
            let config = load_config()?;
            cmd_export(&load_tasks(&files, &config)?, output, &config)?;
        }
    }
    Ok(())
}
