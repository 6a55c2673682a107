//! 규칙 데이터 구조 정의
//!
//! [`Rule`]은 미리 컴파일된 정규식 패턴과 빌더 클로저의 쌍입니다.
//! 패턴은 "이 규칙이 관심 있는 로그인가"를, 빌더는 "캡처로부터
//! 어떤 진단 항목을 만들 것인가"를 결정합니다.
//!
//! 빌더의 세 가지 결과:
//! - `Ok(Some(finding))`: 진단 항목 생성
//! - `Ok(None)`: 구조적으로 매칭했지만 규칙이 진단을 사양 (예: 수치가
//!   허용 대역 안)
//! - `Err(_)`: 규칙 내부 실패. 엔진이 규칙 경계에서 흡수합니다.

use std::fmt;

use regex::{Captures, Regex};

use logvet_core::types::Finding;

use crate::error::DiagnosisError;

/// 한 문서 안에 패턴이 여러 번 나타날 때 어느 매칭을 빌더에 넘길지
///
/// 원 구현은 항상 첫 매칭을 사용했으므로 기본값은 [`FirstMatch`]입니다.
/// "가장 최근 발생"이 의미 있는 규칙을 위해 [`LastMatch`]를 제공합니다.
///
/// [`FirstMatch`]: MatchPolicy::FirstMatch
/// [`LastMatch`]: MatchPolicy::LastMatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// 문서에서 가장 먼저 나타나는 매칭 사용
    #[default]
    FirstMatch,
    /// 문서에서 가장 나중에 나타나는 매칭 사용
    LastMatch,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => write!(f, "first-match"),
            Self::LastMatch => write!(f, "last-match"),
        }
    }
}

/// 캡처로부터 진단 항목을 만드는 빌더 클로저
pub type RuleBuilder =
    Box<dyn Fn(&Captures<'_>) -> Result<Option<Finding>, DiagnosisError> + Send + Sync>;

/// 진단 규칙 -- 패턴 + 매칭 정책 + 빌더
pub struct Rule {
    /// 규칙 고유 ID (예: `"ram_amount"`)
    id: String,
    /// 미리 컴파일된 패턴
    pattern: Regex,
    /// 매칭 선택 정책
    policy: MatchPolicy,
    /// 진단 항목 빌더
    builder: RuleBuilder,
}

impl Rule {
    /// 패턴을 컴파일하여 규칙을 생성합니다.
    ///
    /// 패턴이 유효한 정규식이 아니면 [`DiagnosisError::InvalidPattern`]을
    /// 반환합니다.
    pub fn new(
        id: impl Into<String>,
        pattern: &str,
        builder: RuleBuilder,
    ) -> Result<Self, DiagnosisError> {
        Self::with_policy(id, pattern, MatchPolicy::default(), builder)
    }

    /// 매칭 정책을 지정하여 규칙을 생성합니다.
    pub fn with_policy(
        id: impl Into<String>,
        pattern: &str,
        policy: MatchPolicy,
        builder: RuleBuilder,
    ) -> Result<Self, DiagnosisError> {
        let id = id.into();
        let pattern = Regex::new(pattern).map_err(|e| DiagnosisError::InvalidPattern {
            rule_id: id.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            id,
            pattern,
            policy,
            builder,
        })
    }

    /// 규칙 ID를 반환합니다.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 패턴 원문을 반환합니다.
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// 매칭 정책을 반환합니다.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// 문서에서 정책에 따른 캡처를 선택합니다.
    ///
    /// 패턴이 문서에 나타나지 않으면 `None`을 반환합니다.
    pub(crate) fn select_captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        match self.policy {
            MatchPolicy::FirstMatch => self.pattern.captures(text),
            MatchPolicy::LastMatch => self.pattern.captures_iter(text).last(),
        }
    }

    /// 선택된 캡처에 빌더를 적용합니다.
    pub(crate) fn build(
        &self,
        captures: &Captures<'_>,
    ) -> Result<Option<Finding>, DiagnosisError> {
        (self.builder)(captures)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("pattern", &self.pattern.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
