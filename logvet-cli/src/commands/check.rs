//! `logvet check` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logvet_core::types::{LogDocument, Severity};
use logvet_diagnosis::builtin::engine_with_builtins;

use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `check` command.
///
/// Reads a log file from disk, runs the diagnosis rule set over it, and
/// renders the resulting report. Exits with a non-zero code when the
/// report carries findings so the command composes in scripts.
pub async fn execute(
    args: CheckArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config_lenient(config_path).await?;

    let engine = engine_with_builtins(&config.diagnosis)
        .map_err(|e| CliError::Command(format!("failed to build rule engine: {e}")))?;

    info!(path = %args.path.display(), "reading log file");
    let text = tokio::fs::read_to_string(&args.path).await?;
    let document = LogDocument::new(text);

    let report = engine.evaluate(&document);
    let finding_count = report.len();

    let payload = CheckReport {
        source: args.path.display().to_string(),
        total: finding_count,
        findings: report
            .iter()
            .map(|f| FindingEntry {
                severity: f.severity,
                message: f.message.clone(),
            })
            .collect(),
    };

    writer.render(&payload)?;

    if finding_count > 0 {
        return Err(CliError::Findings(finding_count));
    }
    Ok(())
}

/// Diagnosis report for one log file.
#[derive(Serialize)]
pub struct CheckReport {
    /// Path of the checked log file.
    pub source: String,
    /// Number of findings.
    pub total: usize,
    /// Findings in rule registration order.
    pub findings: Vec<FindingEntry>,
}

#[derive(Serialize)]
pub struct FindingEntry {
    pub severity: Severity,
    pub message: String,
}

impl Render for CheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if self.findings.is_empty() {
            writeln!(w, "{}: no problems found", self.source)?;
            return Ok(());
        }

        writeln!(
            w,
            "{} ({} finding{})",
            self.source.bold(),
            self.total,
            if self.total == 1 { "" } else { "s" }
        )?;
        writeln!(w)?;

        for finding in &self.findings {
            let label = match finding.severity {
                Severity::Severe => finding.severity.label().red().bold(),
                Severity::Important => finding.severity.label().yellow().bold(),
                Severity::Warning => finding.severity.label().normal(),
            };
            writeln!(
                w,
                "{} [{}] {}",
                finding.severity.glyph(),
                label,
                finding.message
            )?;
        }

        Ok(())
    }
}
