//! Logvet 리포트 철회 워크플로우
//!
//! 게시된 진단 리포트를 제한 시간 안에 권한 있는 행위자가 철회할 수
//! 있게 합니다. 제한 시간이 지나면 게시물은 영구히 남습니다.
//!
//! # 아키텍처
//! - [`auth`]: 권한 술어 (행위자 ID 집합 OR 직급 ID 집합)
//! - [`session`]: 게시물 하나의 대기 상태 기계
//! - [`manager`]: 게시물당 하나의 세션 라우팅 및 회수

pub mod auth;
pub mod error;
pub mod manager;
pub mod session;

pub use auth::AuthorizationPolicy;
pub use error::RetractionError;
pub use manager::SessionManager;
pub use session::{RetractionSession, SessionOutcome};
