//! 진단 엔진 에러 타입
//!
//! [`DiagnosisError`]는 규칙 등록과 빌더 내부에서 발생하는 에러를 표현합니다.
//! `From<DiagnosisError> for LogvetError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 평가 중 빌더가 반환한 `Err`는 엔진이 규칙 경계에서 흡수하므로
//! `evaluate` 자체는 실패하지 않습니다.

use logvet_core::error::LogvetError;

/// 진단 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    /// 규칙 패턴 컴파일 실패
    #[error("invalid pattern for rule '{rule_id}': {reason}")]
    InvalidPattern {
        /// 문제가 된 규칙 ID
        rule_id: String,
        /// 컴파일 실패 사유
        reason: String,
    },

    /// 동일한 ID의 규칙이 이미 등록됨
    #[error("rule already registered: {rule_id}")]
    DuplicateRule { rule_id: String },

    /// 빌더가 기대한 캡처 그룹이 없음
    #[error("missing capture group '{group}' in rule '{rule_id}'")]
    MissingCapture { rule_id: String, group: String },

    /// 캡처된 수치 파싱 실패
    #[error("failed to parse captured value '{value}' in rule '{rule_id}'")]
    NumberParse { rule_id: String, value: String },
}

impl From<DiagnosisError> for LogvetError {
    fn from(err: DiagnosisError) -> Self {
        LogvetError::Diagnosis(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_display() {
        let err = DiagnosisError::InvalidPattern {
            rule_id: "ram_amount".to_owned(),
            reason: "unclosed group".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ram_amount"));
        assert!(msg.contains("unclosed group"));
    }

    #[test]
    fn duplicate_rule_display() {
        let err = DiagnosisError::DuplicateRule {
            rule_id: "out_of_memory".to_owned(),
        };
        assert!(err.to_string().contains("out_of_memory"));
    }

    #[test]
    fn converts_to_logvet_error() {
        let err = DiagnosisError::NumberParse {
            rule_id: "ram_amount".to_owned(),
            value: "99999999999999999999".to_owned(),
        };
        let top: LogvetError = err.into();
        assert!(matches!(top, LogvetError::Diagnosis(_)));
    }
}
