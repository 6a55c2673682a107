//! 에러 타입 -- 도메인별 에러 정의

/// Logvet 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogvetError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 문서 조회 에러
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// 진단 엔진 에러
    #[error("diagnosis error: {0}")]
    Diagnosis(String),

    /// 철회 워크플로우 에러
    #[error("retraction error: {0}")]
    Retraction(String),

    /// 협력자(게시/신원 조회) 에러
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 로그 문서 조회 에러
///
/// 코어 경계를 넘어 보고되는 유일한 실패 유형입니다.
/// 조회 실패 시 리포트는 생성되지 않습니다 (부분 리포트 없음).
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// 잘못된 URL
    #[error("invalid log url: {0}")]
    InvalidUrl(String),

    /// 네트워크 요청 실패
    #[error("request failed for {url}: {reason}")]
    RequestFailed { url: String, reason: String },

    /// 응답 본문을 읽을 수 없음
    #[error("unreadable response body from {url}: {reason}")]
    UnreadableBody { url: String, reason: String },

    /// 요청 시간 초과
    #[error("request timed out for {url}")]
    TimedOut { url: String },
}
