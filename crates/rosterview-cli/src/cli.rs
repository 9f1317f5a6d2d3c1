//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// rosterview - Registrar shift counts from the roster
#[derive(Debug, Parser)]
#[command(name = "rosterview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ROSTERVIEW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Log filter directive, e.g. `rosterview_api=debug` (overrides -v and RUST_LOG)
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shift counts per registrar, broken down by event
    Registrars(ReportArgs),

    /// Shift counts per event, broken down by registrar
    Events(ReportArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by the report commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReportArgs {
    /// First day of the report (YYYY-MM-DD, default: two months ago)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the report (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Give up fetching after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
