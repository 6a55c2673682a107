//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 진단 엔진과 철회 워크플로우가 공유하는 데이터 구조를 정의합니다.
//! 각 크레이트는 이 타입들을 사용하여 결과와 이벤트를 교환합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 로그 문서
///
/// 붙여넣기 호스팅에서 가져온 원시 로그 텍스트 한 덩어리를 나타냅니다.
/// 불변이며, 크기 제한은 문서를 가져오는 협력자(fetcher)의 책임입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDocument(String);

impl LogDocument {
    /// 원시 텍스트에서 로그 문서를 생성합니다.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// 문서 내용을 문자열 슬라이스로 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 문서 길이 (바이트)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 문서가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for LogDocument {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for LogDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 심각도 레벨
///
/// 진단 결과의 심각도를 나타냅니다. 표시 그룹핑 전용이며
/// 엔진 제어 흐름에는 사용되지 않습니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Warning < Important < Severe`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 경고 -- 동작에는 지장이 없으나 권장하지 않는 상태
    #[default]
    Warning,
    /// 중요 -- 문제를 일으킬 가능성이 높은 상태
    Important,
    /// 심각 -- 거의 확실하게 문제의 원인인 상태
    Severe,
}

impl Severity {
    /// 표시용 글리프를 반환합니다.
    ///
    /// 표현 협력자가 필드 제목에 사용합니다.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Warning => "\u{26a0}",
            Self::Important => "\u{2757}",
            Self::Severe => "\u{203c}",
        }
    }

    /// 표시용 레이블을 반환합니다.
    pub fn label(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Important => "Important",
            Self::Severe => "Severe",
        }
    }

    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Some(Self::Warning),
            "important" => Some(Self::Important),
            "severe" => Some(Self::Severe),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 진단 결과 항목
///
/// 발화한 규칙 하나가 생성한 심각도 태그 메시지입니다.
/// 생성 후 불변이며, 동등성은 구조적으로 비교됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 심각도
    pub severity: Severity,
    /// 사용자에게 표시할 해결 안내 메시지
    pub message: String,
}

impl Finding {
    /// 새 진단 항목을 생성합니다.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// 진단 리포트
///
/// 한 번의 평가에서 생성된 Finding의 순서 있는 모음입니다.
/// 순서는 규칙 등록 순서를 따르며, 텍스트 내 매치 위치와 무관합니다.
/// 빈 리포트는 "문제 없음"을 의미하는 정상 종료값입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    findings: Vec<Finding>,
}

impl DiagnosticReport {
    /// 빈 리포트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finding 목록에서 리포트를 생성합니다.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// 리포트 끝에 Finding을 추가합니다.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// 게시 여부를 결정하는 유일한 술어입니다.
    ///
    /// Finding이 하나 이상 있을 때만 true를 반환합니다.
    /// false이면 하류 렌더링/게시가 일어나지 않아야 합니다.
    pub fn is_actionable(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Finding 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// 리포트가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Finding 목록을 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    /// Finding 슬라이스를 반환합니다.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

impl IntoIterator for DiagnosticReport {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticReport {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

/// 행위자 ID
///
/// 채팅 플랫폼의 사용자 식별자입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 직급(역할) ID
///
/// 행위자에게 부여된 최상위 직급의 식별자입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankId(pub u64);

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 게시물 ID
///
/// 표현 협력자가 리포트를 게시한 뒤 반환하는 불투명 식별자입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    /// 새 게시물 ID를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// ID 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 행위자 신원
///
/// 신원 협력자가 반환하는 행위자의 식별 정보입니다.
/// 철회 워크플로우의 권한 술어만 소비합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    /// 행위자 ID
    pub actor_id: ActorId,
    /// 최상위 직급 ID (직급이 없으면 None)
    pub top_rank_id: Option<RankId>,
}

impl fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.top_rank_id {
            Some(rank) => write!(f, "actor={} rank={}", self.actor_id, rank),
            None => write!(f, "actor={} rank=none", self.actor_id),
        }
    }
}
