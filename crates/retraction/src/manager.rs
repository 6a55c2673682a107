//! 세션 매니저 -- 게시물당 하나의 철회 세션 관리
//!
//! 세션은 독립 태스크로 실행됩니다. 매니저는 게시물 ID로 신호를
//! 라우팅하고, 동일 게시물에 대한 중복 세션을 거부하며, 종료된
//! 세션을 회수합니다.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::gauge;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use logvet_core::collaborator::ArtifactVenue;
use logvet_core::config::RetractionConfig;
use logvet_core::metrics as metric_names;
use logvet_core::types::{ActorIdentity, ArtifactId};

use crate::auth::AuthorizationPolicy;
use crate::error::RetractionError;
use crate::session::{RetractionSession, SessionOutcome};

/// 열린 세션의 핸들
struct OpenSession {
    signals: mpsc::Sender<ActorIdentity>,
    task: JoinHandle<SessionOutcome>,
}

/// 철회 세션 매니저
///
/// # 사용 예시
/// ```ignore
/// let mut manager = SessionManager::new(&config.retraction, venue);
/// manager.open(posted_artifact)?;
///
/// // 철회 신호 수신 시
/// manager.signal(&artifact, identity).await;
/// ```
pub struct SessionManager {
    sessions: HashMap<ArtifactId, OpenSession>,
    policy: Arc<AuthorizationPolicy>,
    venue: Arc<dyn ArtifactVenue>,
    timeout: Duration,
}

impl SessionManager {
    /// 설정과 venue 협력자로 매니저를 생성합니다.
    pub fn new(config: &RetractionConfig, venue: Arc<dyn ArtifactVenue>) -> Self {
        Self {
            sessions: HashMap::new(),
            policy: Arc::new(AuthorizationPolicy::from_config(config)),
            venue,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// 게시물에 대한 철회 세션을 엽니다.
    ///
    /// 동일 게시물에 이미 세션이 열려 있으면 에러를 반환합니다.
    pub fn open(&mut self, artifact: ArtifactId) -> Result<(), RetractionError> {
        self.reap();
        if self.sessions.contains_key(&artifact) {
            return Err(RetractionError::AlreadyOpen(artifact));
        }

        let (session, signals) = RetractionSession::open(
            artifact.clone(),
            self.timeout,
            Arc::clone(&self.policy),
            Arc::clone(&self.venue),
        );
        let task = tokio::spawn(session.run());
        self.sessions.insert(artifact, OpenSession { signals, task });
        gauge!(metric_names::RETRACTION_SESSIONS_OPEN).set(self.sessions.len() as f64);
        Ok(())
    }

    /// 철회 신호를 해당 세션으로 라우팅합니다.
    ///
    /// 세션이 없는 게시물에 대한 신호는 무시되며 `false`를 반환합니다.
    /// 이미 종료된 세션으로의 전송 실패도 무시 대상입니다.
    pub async fn signal(&mut self, artifact: &ArtifactId, identity: ActorIdentity) -> bool {
        let Some(open) = self.sessions.get(artifact) else {
            debug!(artifact = %artifact, "retraction signal for unknown artifact, ignoring");
            return false;
        };

        if open.signals.send(identity).await.is_err() {
            // 세션이 방금 종료됨 -- 회수하고 무시
            self.reap();
            return false;
        }
        true
    }

    /// 종료된 세션을 회수합니다.
    pub fn reap(&mut self) {
        self.sessions.retain(|artifact, open| {
            if open.task.is_finished() {
                debug!(artifact = %artifact, "reaping finished retraction session");
                false
            } else {
                true
            }
        });
        gauge!(metric_names::RETRACTION_SESSIONS_OPEN).set(self.sessions.len() as f64);
    }

    /// 현재 열린 세션 수를 반환합니다.
    pub fn open_count(&mut self) -> usize {
        self.reap();
        self.sessions.len()
    }

    /// 남아 있는 모든 세션을 중단합니다.
    ///
    /// 데몬 종료 시 호출합니다. 진행 중이던 세션의 게시물은
    /// 삭제되지 않은 채 남습니다.
    pub fn shutdown(&mut self) {
        for (artifact, open) in self.sessions.drain() {
            debug!(artifact = %artifact, "aborting retraction session on shutdown");
            open.task.abort();
        }
        gauge!(metric_names::RETRACTION_SESSIONS_OPEN).set(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use logvet_core::collaborator::BoxFuture;
    use logvet_core::error::LogvetError;
    use logvet_core::types::{ActorId, RankId};

    #[derive(Default)]
    struct RecordingVenue {
        deleted: Mutex<Vec<ArtifactId>>,
    }

    impl ArtifactVenue for RecordingVenue {
        fn delete_artifact<'a>(
            &'a self,
            artifact: &'a ArtifactId,
        ) -> BoxFuture<'a, Result<(), LogvetError>> {
            Box::pin(async move {
                self.deleted.lock().unwrap().push(artifact.clone());
                Ok(())
            })
        }

        fn withdraw_marker<'a>(
            &'a self,
            _artifact: &'a ArtifactId,
        ) -> BoxFuture<'a, Result<(), LogvetError>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn config() -> RetractionConfig {
        RetractionConfig {
            timeout_secs: 120,
            privileged_actors: vec![1],
            privileged_ranks: vec![9],
        }
    }

    fn privileged() -> ActorIdentity {
        ActorIdentity {
            actor_id: ActorId(1),
            top_rank_id: None,
        }
    }

    fn by_rank() -> ActorIdentity {
        ActorIdentity {
            actor_id: ActorId(77),
            top_rank_id: Some(RankId(9)),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn open_and_signal_deletes() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue.clone());

        manager.open(ArtifactId::new("post-1")).unwrap();
        assert_eq!(manager.open_count(), 1);

        let delivered = manager
            .signal(&ArtifactId::new("post-1"), privileged())
            .await;
        assert!(delivered);

        // 세션 태스크가 삭제를 마칠 때까지
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(manager.open_count(), 0);
        assert_eq!(venue.deleted.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rank_based_signal_deletes() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue.clone());

        manager.open(ArtifactId::new("post-2")).unwrap();
        manager.signal(&ArtifactId::new("post-2"), by_rank()).await;

        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(venue.deleted.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_open_is_rejected() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue);

        manager.open(ArtifactId::new("post-3")).unwrap();
        let err = manager.open(ArtifactId::new("post-3")).unwrap_err();
        assert!(matches!(err, RetractionError::AlreadyOpen(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn signal_for_unknown_artifact_is_ignored() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue.clone());

        let delivered = manager
            .signal(&ArtifactId::new("missing"), privileged())
            .await;
        assert!(!delivered);
        assert!(venue.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_sessions_are_reaped_and_artifact_can_reopen() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue);

        manager.open(ArtifactId::new("post-4")).unwrap();
        tokio::time::advance(Duration::from_secs(121)).await;
        tokio::task::yield_now().await;

        assert_eq!(manager.open_count(), 0);
        // 만료 후에는 같은 ID로 새 세션을 열 수 있습니다
        manager.open(ArtifactId::new("post-4")).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn independent_sessions_do_not_interfere() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue.clone());

        manager.open(ArtifactId::new("a")).unwrap();
        manager.open(ArtifactId::new("b")).unwrap();
        assert_eq!(manager.open_count(), 2);

        manager.signal(&ArtifactId::new("a"), privileged()).await;
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1)).await;

        // a만 삭제, b는 계속 대기
        assert_eq!(venue.deleted.lock().unwrap().len(), 1);
        assert_eq!(venue.deleted.lock().unwrap()[0], ArtifactId::new("a"));
        assert_eq!(manager.open_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_remaining_sessions() {
        let venue = Arc::new(RecordingVenue::default());
        let mut manager = SessionManager::new(&config(), venue.clone());

        manager.open(ArtifactId::new("post-5")).unwrap();
        manager.shutdown();
        assert_eq!(manager.open_count(), 0);

        // 중단된 세션은 아무 협력자도 호출하지 않습니다
        tokio::time::advance(Duration::from_secs(200)).await;
        assert!(venue.deleted.lock().unwrap().is_empty());
    }
}
