//! Stdio bridge -- the daemon's wire surface for platform adapters.
//!
//! Chat-platform integration lives outside this process. Whatever hosts
//! the daemon speaks newline-delimited JSON over the standard streams:
//! inbound events (submissions, retraction requests) arrive on stdin,
//! outbound commands (post, delete, withdraw marker) leave on stdout.
//!
//! The bridge doubles as the [`ReportPoster`], [`ArtifactVenue`] and
//! [`IdentityResolver`] collaborators. Identity resolution is fed by the
//! inbound stream: every retraction event carries the requester's top
//! rank, which the bridge holds until the resolver consumes it. Each
//! entry serves exactly one resolution, so the cache stays bounded by
//! the number of in-flight retraction requests.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use logvet_core::collaborator::{ArtifactVenue, BoxFuture, IdentityResolver, ReportPoster};
use logvet_core::error::LogvetError;
use logvet_core::types::{ActorId, ActorIdentity, ArtifactId, DiagnosticReport, RankId};

use crate::orchestrator::{OrchestratorHandle, RetractionRequest, Submission};

/// One inbound event, one JSON object per stdin line.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A submission whose text may carry paste links.
    Submission { artifact: String, text: String },
    /// A request to retract a posted report.
    Retract {
        artifact: String,
        actor: u64,
        #[serde(default)]
        top_rank: Option<u64>,
    },
}

/// Title line of every posted report.
const REPORT_TITLE: &str = "Automated Response (Warning: Experimental)";

/// One outbound command, one JSON object per stdout line.
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OutboundCommand<'a> {
    /// Post a rendered diagnostic report in reply to a submission.
    Post {
        in_reply_to: &'a str,
        artifact: &'a str,
        title: &'a str,
        fields: Vec<PostField>,
    },
    /// Delete a posted report artifact.
    Delete { artifact: &'a str },
    /// Withdraw the retraction affordance, leaving the artifact up.
    WithdrawMarker { artifact: &'a str },
}

/// One rendered finding: severity heading plus message body.
#[derive(Debug, Serialize)]
pub struct PostField {
    pub heading: String,
    pub body: String,
}

/// Render a report into posted fields, one per finding, in report order.
fn render_fields(report: &DiagnosticReport) -> Vec<PostField> {
    report
        .iter()
        .map(|finding| PostField {
            heading: format!("{} {}", finding.severity.glyph(), finding.severity.label()),
            body: finding.message.clone(),
        })
        .collect()
}

/// Stdio-backed collaborator set.
pub struct StdioBridge {
    stdout: Mutex<tokio::io::Stdout>,
    identities: RwLock<HashMap<ActorId, ActorIdentity>>,
}

impl StdioBridge {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
            identities: RwLock::new(HashMap::new()),
        }
    }

    /// Cache an identity observed on the inbound stream.
    async fn record_identity(&self, identity: ActorIdentity) {
        self.identities.write().await.insert(identity.actor_id, identity);
    }

    /// Serialize a command and write it as one stdout line.
    async fn emit(&self, command: &OutboundCommand<'_>) -> Result<(), LogvetError> {
        let mut line = serde_json::to_string(command)
            .map_err(|e| LogvetError::Collaborator(format!("failed to encode command: {e}")))?;
        line.push('\n');

        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| LogvetError::Collaborator(format!("failed to write command: {e}")))?;
        stdout
            .flush()
            .await
            .map_err(|e| LogvetError::Collaborator(format!("failed to flush command: {e}")))?;
        Ok(())
    }
}

impl Default for StdioBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPoster for StdioBridge {
    fn post<'a>(
        &'a self,
        in_reply_to: &'a ArtifactId,
        report: &'a DiagnosticReport,
    ) -> BoxFuture<'a, Result<ArtifactId, LogvetError>> {
        Box::pin(async move {
            let artifact = ArtifactId::new(uuid::Uuid::new_v4().to_string());
            self.emit(&OutboundCommand::Post {
                in_reply_to: in_reply_to.as_str(),
                artifact: artifact.as_str(),
                title: REPORT_TITLE,
                fields: render_fields(report),
            })
            .await?;
            Ok(artifact)
        })
    }
}

impl ArtifactVenue for StdioBridge {
    fn delete_artifact<'a>(
        &'a self,
        artifact: &'a ArtifactId,
    ) -> BoxFuture<'a, Result<(), LogvetError>> {
        Box::pin(async move {
            self.emit(&OutboundCommand::Delete {
                artifact: artifact.as_str(),
            })
            .await
        })
    }

    fn withdraw_marker<'a>(
        &'a self,
        artifact: &'a ArtifactId,
    ) -> BoxFuture<'a, Result<(), LogvetError>> {
        Box::pin(async move {
            self.emit(&OutboundCommand::WithdrawMarker {
                artifact: artifact.as_str(),
            })
            .await
        })
    }
}

impl IdentityResolver for StdioBridge {
    /// Entries are consumed on resolution. Every retraction event is
    /// followed by exactly one resolve, so the cache cannot grow without
    /// bound.
    fn resolve(&self, actor: ActorId) -> BoxFuture<'_, Result<ActorIdentity, LogvetError>> {
        Box::pin(async move {
            self.identities.write().await.remove(&actor).ok_or_else(|| {
                LogvetError::Collaborator(format!("no identity recorded for actor {actor}"))
            })
        })
    }
}

/// Read inbound events from stdin until EOF, feeding the orchestrator.
///
/// EOF means the hosting adapter is gone; the orchestrator is asked to
/// shut down.
pub async fn run_reader(bridge: Arc<StdioBridge>, handle: OrchestratorHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("stdin closed, requesting shutdown");
                handle.shutdown();
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to read stdin, requesting shutdown");
                handle.shutdown();
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let event: InboundEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "discarding malformed inbound event");
                continue;
            }
        };

        match event {
            InboundEvent::Submission { artifact, text } => {
                let submission = Submission {
                    artifact: ArtifactId::new(artifact),
                    text,
                };
                if handle.submit(submission).await.is_err() {
                    debug!("orchestrator gone, stopping reader");
                    return;
                }
            }
            InboundEvent::Retract {
                artifact,
                actor,
                top_rank,
            } => {
                let actor = ActorId(actor);
                bridge
                    .record_identity(ActorIdentity {
                        actor_id: actor,
                        top_rank_id: top_rank.map(RankId),
                    })
                    .await;
                let request = RetractionRequest {
                    artifact: ArtifactId::new(artifact),
                    actor,
                };
                if handle.request_retraction(request).await.is_err() {
                    debug!("orchestrator gone, stopping reader");
                    return;
                }
            }
        }
    }
}
