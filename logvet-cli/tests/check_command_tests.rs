//! Integration tests for `logvet check` and `logvet config` commands.
//!
//! Exercises command handlers end to end with real files on disk.

use std::fs;

use tempfile::TempDir;

use logvet_cli::cli::{CheckArgs, ConfigAction, ConfigArgs, OutputFormat};
use logvet_cli::commands;
use logvet_cli::error::CliError;
use logvet_cli::output::OutputWriter;

fn writer() -> OutputWriter {
    OutputWriter::new(OutputFormat::Json)
}

#[tokio::test]
async fn check_clean_log_succeeds() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let log_path = temp_dir.path().join("latest.log");
    fs::write(&log_path, "[12:00:00] [main/INFO]: game loaded fine").expect("should write log");

    let args = CheckArgs {
        path: log_path.clone(),
    };
    let result = commands::check::execute(args, &temp_dir.path().join("logvet.toml"), &writer()).await;

    assert!(result.is_ok(), "clean log should exit successfully");
}

#[tokio::test]
async fn check_troubled_log_reports_findings() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let log_path = temp_dir.path().join("crash.log");
    fs::write(
        &log_path,
        "Exception: java.lang.OutOfMemoryError: Java heap space",
    )
    .expect("should write log");

    let args = CheckArgs {
        path: log_path.clone(),
    };
    let result = commands::check::execute(args, &temp_dir.path().join("logvet.toml"), &writer()).await;

    match result {
        Err(CliError::Findings(n)) => assert_eq!(n, 1),
        other => panic!("expected Findings error, got {other:?}"),
    }
}

#[tokio::test]
async fn check_missing_log_file_is_io_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let args = CheckArgs {
        path: temp_dir.path().join("nope.log"),
    };
    let result = commands::check::execute(args, &temp_dir.path().join("logvet.toml"), &writer()).await;

    assert!(matches!(result, Err(CliError::Io(_))));
}

#[tokio::test]
async fn check_with_broken_config_fails() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let log_path = temp_dir.path().join("latest.log");
    fs::write(&log_path, "fine").expect("should write log");

    let config_path = temp_dir.path().join("logvet.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"").expect("should write bad config");

    let args = CheckArgs { path: log_path };
    let result = commands::check::execute(args, &config_path, &writer()).await;

    assert!(matches!(result, Err(CliError::Config(_))));
}

#[tokio::test]
async fn config_validate_accepts_valid_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logvet.toml");

    let valid_config = r#"
[general]
log_level = "info"
log_format = "json"

[retraction]
timeout_secs = 60
privileged_actors = [42]
"#;
    fs::write(&config_path, valid_config).expect("should write config");

    let args = ConfigArgs {
        action: ConfigAction::Validate,
    };
    let result = commands::config::execute(args, &config_path, &writer()).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn config_validate_rejects_zero_timeout() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logvet.toml");

    fs::write(&config_path, "[retraction]\ntimeout_secs = 0\n").expect("should write config");

    let args = ConfigArgs {
        action: ConfigAction::Validate,
    };
    let result = commands::config::execute(args, &config_path, &writer()).await;

    match result {
        Err(CliError::Config(_)) => {}
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[tokio::test]
async fn config_show_unknown_section_fails() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logvet.toml");
    fs::write(&config_path, "").expect("should write config");

    let args = ConfigArgs {
        action: ConfigAction::Show {
            section: Some("ebpf".to_owned()),
        },
    };
    let result = commands::config::execute(args, &config_path, &writer()).await;

    assert!(matches!(result, Err(CliError::Command(_))));
}

#[tokio::test]
async fn rules_command_lists_builtins() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let args = logvet_cli::cli::RulesArgs { full: false };
    let result =
        commands::rules::execute(args, &temp_dir.path().join("logvet.toml"), &writer()).await;

    assert!(result.is_ok());
}
