//! Tracing setup for the daemon process.
//!
//! The `[general]` config section picks the output format and the
//! fallback filter level. A `RUST_LOG` environment variable, when set,
//! takes precedence over the configured level.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use logvet_core::config::GeneralConfig;

/// Install the global tracing subscriber. Call once at startup.
///
/// `log_format` selects `"json"` (one machine-readable line per event,
/// the production default) or `"pretty"` (colored multi-line output for
/// local runs).
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let initialized = match config.log_format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ));
        }
    };

    initialized.map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))
}
