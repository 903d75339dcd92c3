use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Checklist triage: prioritise markdown checklists and spot tasks that need
/// breaking down.
/// Settings default to ~/.triage.toml or a path passed via --config.
#[derive(Parser)]
#[command(name = "triage", version, about = "Checklist task triage CLI")]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
