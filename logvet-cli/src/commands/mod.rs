//! Command handlers -- one module per subcommand

use std::path::Path;

use logvet_core::config::LogvetConfig;

use crate::error::CliError;

pub mod check;
pub mod config;
pub mod rules;

/// Load configuration, falling back to defaults when the file is absent.
///
/// `check` and `rules` work fine without a config file; only an existing
/// but broken file is an error.
pub(crate) async fn load_config_lenient(path: &Path) -> Result<LogvetConfig, CliError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        LogvetConfig::load(path)
            .await
            .map_err(|e| CliError::Config(e.to_string()))
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(LogvetConfig::default())
    }
}
