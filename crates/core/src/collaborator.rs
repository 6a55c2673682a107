//! 협력자 trait -- 외부 세계와의 경계 추상화
//!
//! 진단/철회 로직은 로그를 어디서 가져오고 리포트를 어디에 게시하는지
//! 알지 못합니다. 네 가지 협력자 trait이 그 경계를 정의합니다:
//!
//! - [`LogFetcher`]: 링크로부터 로그 문서 본문을 조회
//! - [`ReportPoster`]: 진단 리포트를 게시하고 게시물 ID를 반환
//! - [`ArtifactVenue`]: 게시물을 삭제 (철회 실행)
//! - [`IdentityResolver`]: 행위자 ID로 신원(최상위 직급 포함)을 조회
//!
//! 모든 trait은 `BoxFuture`를 반환하는 dyn-compatible 형태로,
//! `Arc<dyn LogFetcher>` 등으로 런타임에 교체할 수 있습니다.
//! 테스트에서는 mock 구현을 주입합니다.

use std::future::Future;
use std::pin::Pin;

use crate::error::{LogvetError, RetrievalError};
use crate::types::{ActorId, ActorIdentity, ArtifactId, DiagnosticReport, LogDocument};

/// dyn-compatible trait에서 async 메서드를 표현하기 위한 boxed future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ─── LogFetcher ──────────────────────────────────────────────────────

/// 로그 문서 조회 협력자
///
/// URL에서 로그 본문을 가져옵니다. 조회 실패는 [`RetrievalError`]로
/// 보고되며, 이 경우 리포트는 생성되지 않습니다 (부분 리포트 없음).
pub trait LogFetcher: Send + Sync {
    /// URL에서 로그 문서를 조회합니다.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<LogDocument, RetrievalError>>;
}

// ─── ReportPoster ────────────────────────────────────────────────────

/// 진단 리포트 게시 협력자
///
/// 리포트를 제출물에 대한 응답으로 게시하고, 게시된 게시물의 ID를
/// 반환합니다. 이 ID가 철회 세션의 대상이 됩니다.
pub trait ReportPoster: Send + Sync {
    /// 리포트를 게시하고 게시물 ID를 반환합니다.
    fn post<'a>(
        &'a self,
        in_reply_to: &'a ArtifactId,
        report: &'a DiagnosticReport,
    ) -> BoxFuture<'a, Result<ArtifactId, LogvetError>>;
}

// ─── ArtifactVenue ───────────────────────────────────────────────────

/// 게시물 조작 협력자
///
/// 철회 승인 시 게시물을 삭제하고, 세션 만료 시 철회 안내 표식만
/// 거두어 게시물은 영구히 남깁니다.
pub trait ArtifactVenue: Send + Sync {
    /// 게시물을 삭제합니다.
    fn delete_artifact<'a>(
        &'a self,
        artifact: &'a ArtifactId,
    ) -> BoxFuture<'a, Result<(), LogvetError>>;

    /// 게시물의 철회 안내 표식을 거둡니다. 게시물 본문은 유지됩니다.
    fn withdraw_marker<'a>(
        &'a self,
        artifact: &'a ArtifactId,
    ) -> BoxFuture<'a, Result<(), LogvetError>>;
}

// ─── IdentityResolver ────────────────────────────────────────────────

/// 행위자 신원 조회 협력자
///
/// 철회 신호를 보낸 행위자의 신원(최상위 직급 포함)을 조회합니다.
/// 권한 판정은 [`crate::config::RetractionConfig`]의 ID 목록과
/// 비교하여 이루어집니다.
pub trait IdentityResolver: Send + Sync {
    /// 행위자의 신원을 조회합니다.
    fn resolve(&self, actor: ActorId) -> BoxFuture<'_, Result<ActorIdentity, LogvetError>>;
}
