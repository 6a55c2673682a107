//! `logvet rules` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use logvet_diagnosis::builtin::engine_with_builtins;

use crate::cli::RulesArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

const PATTERN_PREVIEW_LEN: usize = 48;

/// Execute the `rules` command.
pub async fn execute(
    args: RulesArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config_lenient(config_path).await?;

    let engine = engine_with_builtins(&config.diagnosis)
        .map_err(|e| CliError::Command(format!("failed to build rule engine: {e}")))?;

    let report = RuleListReport {
        total: engine.rule_count(),
        rules: engine
            .rules()
            .map(|rule| RuleEntry {
                id: rule.id().to_owned(),
                policy: rule.policy().to_string(),
                pattern: if args.full {
                    rule.pattern_str().to_owned()
                } else {
                    truncate_pattern(rule.pattern_str())
                },
            })
            .collect(),
    };

    writer.render(&report)?;
    Ok(())
}

fn truncate_pattern(pattern: &str) -> String {
    if pattern.chars().count() <= PATTERN_PREVIEW_LEN {
        return pattern.to_owned();
    }
    let preview: String = pattern.chars().take(PATTERN_PREVIEW_LEN).collect();
    format!("{preview}...")
}

/// Rule listing, in registration (evaluation) order.
#[derive(Serialize)]
pub struct RuleListReport {
    pub total: usize,
    pub rules: Vec<RuleEntry>,
}

#[derive(Serialize)]
pub struct RuleEntry {
    pub id: String,
    pub policy: String,
    pub pattern: String,
}

impl Render for RuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Diagnosis Rules ({} total)", self.total.to_string().bold())?;
        writeln!(w)?;
        writeln!(w, "{:<28} {:<12} Pattern", "ID", "Policy")?;
        writeln!(w, "{}", "-".repeat(72))?;

        for rule in &self.rules {
            writeln!(w, "{:<28} {:<12} {}", rule.id, rule.policy, rule.pattern)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_pattern_unchanged() {
        assert_eq!(truncate_pattern("-Xmx"), "-Xmx");
    }

    #[test]
    fn test_truncate_long_pattern() {
        let long = "x".repeat(100);
        let truncated = truncate_pattern(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), PATTERN_PREVIEW_LEN + 3);
    }

    #[test]
    fn test_render_text_lists_rules() {
        let report = RuleListReport {
            total: 2,
            rules: vec![
                RuleEntry {
                    id: "out_of_memory".to_owned(),
                    policy: "first-match".to_owned(),
                    pattern: "java".to_owned(),
                },
                RuleEntry {
                    id: "ram_amount".to_owned(),
                    policy: "last-match".to_owned(),
                    pattern: "-Xmx".to_owned(),
                },
            ],
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("should render");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("2 total"));
        assert!(output.contains("out_of_memory"));
        assert!(output.contains("last-match"));
    }
}
