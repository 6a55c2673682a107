use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use logvet_core::collaborator::{ArtifactVenue, IdentityResolver, ReportPoster};
use logvet_core::config::LogvetConfig;
use logvet_daemon::bridge::{self, StdioBridge};
use logvet_daemon::cli::DaemonCli;
use logvet_daemon::fetch::HttpLogFetcher;
use logvet_daemon::logging;
use logvet_daemon::orchestrator::{self, Collaborators, Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let mut config = LogvetConfig::load(&cli.config).await.map_err(|e| {
        anyhow::anyhow!("failed to load config {}: {}", cli.config.display(), e)
    })?;

    // CLI flags win over config file and environment
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if cli.validate {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logvet-daemon starting");

    // Stdio bridge doubles as poster, venue and identity resolver
    let stdio = Arc::new(StdioBridge::new());
    let fetcher = Arc::new(
        HttpLogFetcher::new(&config.fetch)
            .map_err(|e| anyhow::anyhow!("failed to build http fetcher: {}", e))?,
    );
    let collaborators = Collaborators {
        fetcher,
        poster: Arc::clone(&stdio) as Arc<dyn ReportPoster>,
        venue: Arc::clone(&stdio) as Arc<dyn ArtifactVenue>,
        resolver: Arc::clone(&stdio) as Arc<dyn IdentityResolver>,
    };

    let (mut orchestrator, handle) = Orchestrator::build_from_config(config, collaborators)?;

    let reader = tokio::spawn(bridge::run_reader(stdio, handle.clone()));

    let signal_handle = handle.clone();
    tokio::spawn(async move {
        match orchestrator::wait_for_shutdown_signal().await {
            Ok(signal) => tracing::info!(signal, "shutdown signal received"),
            Err(e) => tracing::error!(error = %e, "failed to install signal handlers"),
        }
        signal_handle.shutdown();
    });

    tracing::info!("logvet-daemon running");
    orchestrator.run().await?;
    reader.abort();

    tracing::info!("logvet-daemon shut down");
    Ok(())
}
