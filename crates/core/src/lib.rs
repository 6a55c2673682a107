//! Logvet 공통 타입, trait, 에러, 설정
//!
//! 모든 Logvet 크레이트가 공유하는 기반 크레이트입니다:
//!
//! - [`types`]: 도메인 타입 (로그 문서, 진단 항목, 리포트, 신원)
//! - [`error`]: 에러 타입 계층
//! - [`config`]: `logvet.toml` 설정 로딩과 환경변수 오버라이드
//! - [`collaborator`]: 외부 세계 경계 trait (조회, 게시, 삭제, 신원)
//! - [`metrics`]: Prometheus 메트릭 이름 상수

pub mod collaborator;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, LogvetError, RetrievalError};

// 설정
pub use config::LogvetConfig;

// 협력자 trait
pub use collaborator::{ArtifactVenue, BoxFuture, IdentityResolver, LogFetcher, ReportPoster};

// 도메인 타입
pub use types::{
    ActorId, ActorIdentity, ArtifactId, DiagnosticReport, Finding, LogDocument, RankId, Severity,
};
