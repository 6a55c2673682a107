//! Logvet 규칙 엔진 및 내장 진단 규칙
//!
//! 자유 형식 로그 텍스트를 심각도가 붙은 진단 항목의 순서 있는
//! 리포트로 변환합니다.
//!
//! # 아키텍처
//! - [`rule`]: 규칙 데이터 구조 (패턴 + 정책 + 빌더)
//! - [`engine`]: 규칙 등록 및 평가 코디네이터
//! - [`builtin`]: MultiMC 런처 로그 진단 규칙 세트
//!
//! # 사용 예시
//! ```
//! use logvet_core::config::DiagnosisConfig;
//! use logvet_core::types::LogDocument;
//! use logvet_diagnosis::builtin::engine_with_builtins;
//!
//! # fn main() -> Result<(), logvet_diagnosis::DiagnosisError> {
//! let engine = engine_with_builtins(&DiagnosisConfig::default())?;
//! let report = engine.evaluate(&LogDocument::new("java.lang.OutOfMemoryError"));
//! assert!(report.is_actionable());
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod engine;
pub mod error;
pub mod rule;

pub use engine::RuleEngine;
pub use error::DiagnosisError;
pub use rule::{MatchPolicy, Rule, RuleBuilder};
