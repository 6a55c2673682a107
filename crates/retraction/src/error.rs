//! 철회 워크플로우 에러 타입

use logvet_core::error::LogvetError;
use logvet_core::types::ArtifactId;

/// 철회 도메인 에러
///
/// 비권한 신호, 알 수 없는 게시물, 방금 종료된 세션으로의 신호는
/// 에러가 아니라 무시 대상이므로 여기에 나타나지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum RetractionError {
    /// 동일한 게시물에 대한 세션이 이미 열려 있음
    #[error("retraction session already open for artifact '{0}'")]
    AlreadyOpen(ArtifactId),
}

impl From<RetractionError> for LogvetError {
    fn from(err: RetractionError) -> Self {
        LogvetError::Retraction(err.to_string())
    }
}
