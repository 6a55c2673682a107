//! 철회 세션 -- 게시물 하나의 철회 대기 상태 기계
//!
//! 리포트가 게시되면 세션이 열리고 고정 마감 시각까지 철회 신호를
//! 기다립니다.
//!
//! # 상태 전이
//! ```text
//! AwaitingVote ─ 권한 있는 신호 ──→ Deleted   (게시물 삭제)
//!              ─ 마감 도달 ───────→ Expired   (표식만 거둠, 게시물 유지)
//! ```
//!
//! - 비권한 신호는 무시되며 마감을 재설정하지 않습니다 (마감은
//!   `sleep_until` 고정 시각).
//! - 종단 전이는 세션당 정확히 한 번입니다. 신호와 타이머의 경합은
//!   `AtomicBool` compare-exchange로 선착순 해소되며, 패자의 동작은
//!   no-op입니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::counter;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

use logvet_core::collaborator::ArtifactVenue;
use logvet_core::metrics as metric_names;
use logvet_core::types::{ActorIdentity, ArtifactId};

use crate::auth::AuthorizationPolicy;

/// 세션 종료 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 권한 있는 신호로 게시물이 삭제됨
    Deleted,
    /// 마감까지 신호가 없어 게시물이 영구히 남음
    Expired,
}

impl SessionOutcome {
    /// 메트릭 레이블 값
    pub fn label(self) -> &'static str {
        match self {
            Self::Deleted => "retracted",
            Self::Expired => "expired",
        }
    }
}

/// 철회 세션
///
/// [`run`](Self::run)이 종료될 때까지 신호 채널과 마감 타이머를
/// 경쟁시킵니다. 세션은 독립 태스크로 실행되며 태스크 간 락이 없습니다.
pub struct RetractionSession {
    artifact: ArtifactId,
    deadline: Instant,
    policy: Arc<AuthorizationPolicy>,
    venue: Arc<dyn ArtifactVenue>,
    signals: mpsc::Receiver<ActorIdentity>,
    /// 종단 전이 가드 -- false→true 전환에 성공한 쪽만 동작을 수행
    finished: AtomicBool,
}

impl RetractionSession {
    /// 세션을 생성하고 신호 송신 핸들을 함께 반환합니다.
    ///
    /// 마감은 생성 시각 기준 고정 시각입니다. 이후 어떤 신호도
    /// 마감을 옮기지 못합니다.
    pub fn open(
        artifact: ArtifactId,
        timeout: Duration,
        policy: Arc<AuthorizationPolicy>,
        venue: Arc<dyn ArtifactVenue>,
    ) -> (Self, mpsc::Sender<ActorIdentity>) {
        let (tx, rx) = mpsc::channel(16);
        let session = Self {
            artifact,
            deadline: Instant::now() + timeout,
            policy,
            venue,
            signals: rx,
            finished: AtomicBool::new(false),
        };
        counter!(metric_names::RETRACTION_SESSIONS_OPENED_TOTAL).increment(1);
        (session, tx)
    }

    /// 세션 대상 게시물 ID를 반환합니다.
    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }

    /// 종단 전이를 시도합니다. 이 세션에서 처음이면 true.
    fn try_finish(&self) -> bool {
        self.finished
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 세션을 종료까지 구동합니다.
    ///
    /// 항상 정확히 하나의 [`SessionOutcome`]으로 끝납니다. 협력자
    /// 실패는 로그로 남기고 종료 결과에는 영향을 주지 않습니다.
    pub async fn run(mut self) -> SessionOutcome {
        let outcome = loop {
            tokio::select! {
                maybe_signal = self.signals.recv() => {
                    match maybe_signal {
                        Some(identity) => {
                            if !self.policy.is_authorized(&identity) {
                                // 무시. 마감은 고정이므로 재설정되지 않습니다.
                                debug!(
                                    artifact = %self.artifact,
                                    signaler = %identity,
                                    "ignoring unauthorized retraction signal"
                                );
                                counter!(metric_names::RETRACTION_UNAUTHORIZED_SIGNALS_TOTAL)
                                    .increment(1);
                                continue;
                            }
                            if self.try_finish() {
                                info!(
                                    artifact = %self.artifact,
                                    signaler = %identity,
                                    "retraction authorized, deleting artifact"
                                );
                                if let Err(e) = self.venue.delete_artifact(&self.artifact).await {
                                    error!(artifact = %self.artifact, error = %e, "failed to delete artifact");
                                }
                                break SessionOutcome::Deleted;
                            }
                            break SessionOutcome::Expired;
                        }
                        None => {
                            // 모든 송신자가 사라짐 -- 마감까지만 기다립니다
                            sleep_until(self.deadline).await;
                            break self.expire().await;
                        }
                    }
                }
                _ = sleep_until(self.deadline) => {
                    break self.expire().await;
                }
            }
        };

        counter!(
            metric_names::RETRACTION_SESSIONS_CLOSED_TOTAL,
            metric_names::LABEL_OUTCOME => outcome.label()
        )
        .increment(1);
        outcome
    }

    async fn expire(&self) -> SessionOutcome {
        if self.try_finish() {
            info!(artifact = %self.artifact, "retraction window expired, artifact stays");
            if let Err(e) = self.venue.withdraw_marker(&self.artifact).await {
                warn!(artifact = %self.artifact, error = %e, "failed to withdraw retraction marker");
            }
            return SessionOutcome::Expired;
        }
        SessionOutcome::Deleted
    }
}
