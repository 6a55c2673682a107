//! Submission orchestration -- collaborator wiring and the main event loop.
//!
//! The [`Orchestrator`] is the central coordinator of `logvet-daemon`.
//! It loads configuration, builds the rule engine and session manager,
//! and runs the main event loop:
//!
//! 1. Inbound submission -> extract paste links -> fetch each log
//! 2. Evaluate the rule set -> post the report iff it is actionable
//! 3. Posted report -> open a retraction session
//! 4. Retraction request -> resolve identity -> route to the session
//!
//! Each submission is processed in its own task; posted artifact ids
//! flow back to the loop over an internal channel so session bookkeeping
//! stays single-owner.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use logvet_core::collaborator::{ArtifactVenue, IdentityResolver, LogFetcher, ReportPoster};
use logvet_core::config::LogvetConfig;
use logvet_core::metrics as metric_names;
use logvet_core::types::{ActorId, ArtifactId};
use logvet_diagnosis::RuleEngine;
use logvet_diagnosis::builtin::engine_with_builtins;
use logvet_retraction::{RetractionError, SessionManager};

use crate::link::extract_raw_links;
use crate::metrics_server;

/// Channel capacity constants.
const SUBMISSION_CHANNEL_CAPACITY: usize = 256;
const REQUEST_CHANNEL_CAPACITY: usize = 256;
const POSTED_CHANNEL_CAPACITY: usize = 64;

/// The external collaborators the daemon is wired to.
///
/// Production wiring uses the HTTP fetcher plus a chat-platform adapter;
/// tests inject mocks.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn LogFetcher>,
    pub poster: Arc<dyn ReportPoster>,
    pub venue: Arc<dyn ArtifactVenue>,
    pub resolver: Arc<dyn IdentityResolver>,
}

/// An inbound submission that may reference logs through paste links.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Id of the submission artifact (the message carrying the links).
    pub artifact: ArtifactId,
    /// Free-form submission text.
    pub text: String,
}

/// A request to retract a posted report.
#[derive(Debug, Clone)]
pub struct RetractionRequest {
    /// Id of the posted report artifact.
    pub artifact: ArtifactId,
    /// The actor asking for retraction; authorization is decided after
    /// identity resolution.
    pub actor: ActorId,
}

/// Sending half of the orchestrator's inbound channels.
///
/// Held by the platform adapter (and by tests) to feed the event loop.
#[derive(Clone)]
pub struct OrchestratorHandle {
    submission_tx: mpsc::Sender<Submission>,
    request_tx: mpsc::Sender<RetractionRequest>,
    shutdown_tx: broadcast::Sender<()>,
}

impl OrchestratorHandle {
    /// Feed a submission into the event loop.
    pub async fn submit(&self, submission: Submission) -> Result<()> {
        self.submission_tx
            .send(submission)
            .await
            .map_err(|_| anyhow::anyhow!("orchestrator is not running"))
    }

    /// Feed a retraction request into the event loop.
    pub async fn request_retraction(&self, request: RetractionRequest) -> Result<()> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| anyhow::anyhow!("orchestrator is not running"))
    }

    /// Signal the event loop to shut down.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// The main daemon orchestrator.
pub struct Orchestrator {
    config: LogvetConfig,
    engine: Arc<RuleEngine>,
    collaborators: Collaborators,
    sessions: SessionManager,
    submission_rx: mpsc::Receiver<Submission>,
    request_rx: mpsc::Receiver<RetractionRequest>,
    posted_tx: mpsc::Sender<ArtifactId>,
    posted_rx: mpsc::Receiver<ArtifactId>,
    shutdown_tx: broadcast::Sender<()>,
    start_time: Instant,
}

impl Orchestrator {
    /// Load configuration from disk and build the orchestrator.
    pub async fn build(
        config_path: &std::path::Path,
        collaborators: Collaborators,
    ) -> Result<(Self, OrchestratorHandle)> {
        let config = LogvetConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config, collaborators)
    }

    /// Build from an already-loaded configuration.
    ///
    /// Useful for testing or when config has already been loaded.
    pub fn build_from_config(
        config: LogvetConfig,
        collaborators: Collaborators,
    ) -> Result<(Self, OrchestratorHandle)> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        // Install metrics recorder before anything records
        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
            record_daemon_metrics();
        }

        let engine = Arc::new(
            engine_with_builtins(&config.diagnosis)
                .map_err(|e| anyhow::anyhow!("failed to build rule engine: {}", e))?,
        );
        info!(rules = engine.rule_count(), "rule engine initialized");

        let sessions =
            SessionManager::new(&config.retraction, Arc::clone(&collaborators.venue));

        let (submission_tx, submission_rx) = mpsc::channel(SUBMISSION_CHANNEL_CAPACITY);
        let (request_tx, request_rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let (posted_tx, posted_rx) = mpsc::channel(POSTED_CHANNEL_CAPACITY);
        let (shutdown_tx, _) = broadcast::channel(16);

        let handle = OrchestratorHandle {
            submission_tx,
            request_tx,
            shutdown_tx: shutdown_tx.clone(),
        };

        Ok((
            Self {
                config,
                engine,
                collaborators,
                sessions,
                submission_rx,
                request_rx,
                posted_tx,
                posted_rx,
                shutdown_tx,
                start_time: Instant::now(),
            },
            handle,
        ))
    }

    /// Run the main event loop until a shutdown signal arrives.
    pub async fn run(&mut self) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let mut uptime_updater_task = if self.config.metrics.enabled {
            let shutdown_rx = self.shutdown_tx.subscribe();
            Some(spawn_uptime_updater(self.start_time, shutdown_rx))
        } else {
            None
        };

        info!("entering main event loop");
        loop {
            tokio::select! {
                Some(submission) = self.submission_rx.recv() => {
                    self.spawn_submission_task(submission);
                }
                Some(posted) = self.posted_rx.recv() => {
                    self.open_session(posted);
                }
                Some(request) = self.request_rx.recv() => {
                    self.handle_retraction_request(request).await;
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        if let Some(task) = uptime_updater_task.take() {
            let _ = self.shutdown_tx.send(());
            let _ = task.await;
        }

        self.sessions.shutdown();
        info!("orchestrator shut down");
        Ok(())
    }

    /// Process one submission in its own task.
    fn spawn_submission_task(&self, submission: Submission) {
        let engine = Arc::clone(&self.engine);
        let fetcher = Arc::clone(&self.collaborators.fetcher);
        let poster = Arc::clone(&self.collaborators.poster);
        let posted_tx = self.posted_tx.clone();
        let trace_id = uuid::Uuid::new_v4();

        tokio::spawn(async move {
            process_submission(engine, fetcher, poster, posted_tx, submission, trace_id).await;
        });
    }

    /// Open a retraction session for a freshly posted report.
    fn open_session(&mut self, posted: ArtifactId) {
        metrics::counter!(metric_names::DAEMON_REPORTS_POSTED_TOTAL).increment(1);
        match self.sessions.open(posted.clone()) {
            Ok(()) => debug!(artifact = %posted, "retraction session opened"),
            Err(RetractionError::AlreadyOpen(_)) => {
                warn!(artifact = %posted, "retraction session already open for artifact");
            }
        }
    }

    /// Resolve the requester's identity and route the signal.
    ///
    /// Resolution failures are absorbed: an unidentifiable actor cannot
    /// be authorized, so the signal is dropped.
    async fn handle_retraction_request(&mut self, request: RetractionRequest) {
        let identity = match self.collaborators.resolver.resolve(request.actor).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(actor = %request.actor, error = %e, "failed to resolve actor identity, ignoring signal");
                return;
            }
        };

        if self.sessions.signal(&request.artifact, identity).await {
            debug!(artifact = %request.artifact, "retraction signal delivered");
        } else {
            debug!(artifact = %request.artifact, "retraction signal for unknown or closed session");
        }
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &LogvetConfig {
        &self.config
    }
}

/// Fetch, evaluate and post for every paste link in one submission.
///
/// A fetch failure skips that link; an empty report posts nothing.
async fn process_submission(
    engine: Arc<RuleEngine>,
    fetcher: Arc<dyn LogFetcher>,
    poster: Arc<dyn ReportPoster>,
    posted_tx: mpsc::Sender<ArtifactId>,
    submission: Submission,
    trace_id: uuid::Uuid,
) {
    let links = extract_raw_links(&submission.text);
    if links.is_empty() {
        return;
    }
    debug!(%trace_id, artifact = %submission.artifact, links = links.len(), "processing submission");

    for link in links {
        let document = match fetcher.fetch(&link).await {
            Ok(document) => document,
            Err(e) => {
                // Unreadable log -> no report for this link
                warn!(%trace_id, url = link, error = %e, "failed to fetch log document");
                continue;
            }
        };

        let report = engine.evaluate(&document);
        if !report.is_actionable() {
            // Silence: a clean log gets no response at all
            debug!(%trace_id, url = link, "report not actionable, staying silent");
            continue;
        }

        match poster.post(&submission.artifact, &report).await {
            Ok(posted) => {
                info!(%trace_id, artifact = %posted, findings = report.len(), "diagnostic report posted");
                if posted_tx.send(posted).await.is_err() {
                    debug!(%trace_id, "orchestrator loop gone, dropping posted artifact");
                }
            }
            Err(e) => {
                warn!(%trace_id, error = %e, "failed to post diagnostic report");
            }
        }
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
pub async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Record daemon-level build info metrics.
///
/// This should be called once during orchestrator initialization.
fn record_daemon_metrics() {
    metrics::gauge!(metric_names::DAEMON_BUILD_INFO, "version" => env!("CARGO_PKG_VERSION"))
        .set(1.0);
}

/// Spawn a background task that periodically updates the uptime metric.
///
/// Updates every 10 seconds to keep the metric fresh for Prometheus scrapes.
fn spawn_uptime_updater(
    start_time: Instant,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(10));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let uptime_secs = start_time.elapsed().as_secs();
                    #[allow(clippy::cast_precision_loss)]
                    metrics::gauge!(metric_names::DAEMON_UPTIME_SECONDS).set(uptime_secs as f64);
                }
                _ = shutdown_rx.recv() => {
                    debug!("uptime updater shutting down");
                    break;
                }
            }
        }
    })
}
