//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Logvet -- log diagnostics tooling.
///
/// Use `logvet <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logvet", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logvet.toml configuration file.
    #[arg(short, long, default_value = "logvet.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diagnose a local log file.
    Check(CheckArgs),

    /// List the diagnosis rule set.
    Rules(RulesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- check ----

/// Run the diagnosis rule set over a log file on disk.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the log file.
    pub path: PathBuf,
}

// ---- rules ----

/// List the diagnosis rule set.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Show full match patterns instead of truncating them.
    #[arg(long)]
    pub full: bool,
}

// ---- config ----

/// Manage logvet configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, diagnosis, retraction, fetch, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}
