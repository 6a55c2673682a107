//! CLI argument definitions for logvet-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Logvet log diagnostics daemon.
///
/// Watches inbound submissions for paste links, fetches the referenced
/// logs, evaluates the diagnosis rule set, posts actionable reports, and
/// runs the retraction workflow for each posted report.
#[derive(Parser, Debug)]
#[command(name = "logvet-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to logvet.toml configuration file.
    #[arg(short, long, default_value = "/etc/logvet/logvet.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}
