//! 규칙 엔진 -- 로그 문서 평가 코디네이터
//!
//! [`RuleEngine`]은 등록된 규칙을 등록 순서대로 평가하여
//! [`DiagnosticReport`]를 생성합니다.
//!
//! # 평가 계약
//! - `evaluate`는 (규칙 집합, 문서)의 순수 함수입니다. 내부 상태를
//!   변경하지 않으므로 `&self`로 동시에 호출할 수 있습니다.
//! - 각 규칙은 한 번의 평가에서 최대 하나의 진단 항목을 냅니다.
//! - 리포트의 항목 순서는 문서 내 매칭 위치와 무관하게 항상
//!   규칙 등록 순서입니다.
//! - 빌더의 `Err`는 규칙 경계에서 흡수됩니다. 해당 규칙만 항목 없이
//!   넘어가고 나머지 규칙은 계속 평가됩니다.

use metrics::{counter, histogram};
use tracing::{debug, warn};

use logvet_core::metrics as metric_names;
use logvet_core::types::{DiagnosticReport, LogDocument};

use crate::error::DiagnosisError;
use crate::rule::Rule;

/// 규칙 엔진
///
/// # 사용 예시
/// ```ignore
/// let mut engine = RuleEngine::new();
/// engine.register(rule)?;
///
/// let report = engine.evaluate(&document);
/// if report.is_actionable() {
///     // 게시
/// }
/// ```
pub struct RuleEngine {
    /// 등록 순서가 보존되는 규칙 목록
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// 빈 엔진을 생성합니다.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// 규칙을 등록합니다.
    ///
    /// 등록 순서가 보존되며, 리포트의 항목 순서를 결정합니다.
    /// 동일한 ID의 규칙이 이미 등록되어 있으면 에러를 반환합니다.
    pub fn register(&mut self, rule: Rule) -> Result<(), DiagnosisError> {
        if self.rules.iter().any(|r| r.id() == rule.id()) {
            return Err(DiagnosisError::DuplicateRule {
                rule_id: rule.id().to_owned(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// 등록된 규칙 수를 반환합니다.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 등록된 규칙을 등록 순서대로 순회합니다.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// 로그 문서에 대해 모든 규칙을 평가합니다.
    ///
    /// 항상 리포트를 반환합니다. 아무 규칙도 진단을 내지 않으면
    /// 빈(비실행성) 리포트입니다.
    pub fn evaluate(&self, document: &LogDocument) -> DiagnosticReport {
        let started = std::time::Instant::now();
        let mut report = DiagnosticReport::new();

        for rule in &self.rules {
            let Some(captures) = rule.select_captures(document.as_str()) else {
                continue;
            };

            match rule.build(&captures) {
                Ok(Some(finding)) => {
                    debug!(rule = rule.id(), severity = %finding.severity, "rule produced finding");
                    counter!(
                        metric_names::DIAGNOSIS_FINDINGS_TOTAL,
                        metric_names::LABEL_SEVERITY => finding.severity.label()
                    )
                    .increment(1);
                    report.push(finding);
                }
                Ok(None) => {
                    // 구조적 매칭이지만 규칙이 진단을 사양
                    debug!(rule = rule.id(), "rule matched but declined");
                }
                Err(e) => {
                    // 규칙 내부 실패는 이 규칙에만 국한됩니다
                    warn!(rule = rule.id(), error = %e, "rule builder failed, skipping");
                    counter!(
                        metric_names::DIAGNOSIS_RULE_FAILURES_TOTAL,
                        metric_names::LABEL_RULE => rule.id().to_owned()
                    )
                    .increment(1);
                }
            }
        }

        counter!(metric_names::DIAGNOSIS_DOCUMENTS_EVALUATED_TOTAL).increment(1);
        histogram!(metric_names::DIAGNOSIS_EVALUATION_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        report
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{MatchPolicy, RuleBuilder};
    use logvet_core::types::{Finding, Severity};

    fn fixed_builder(severity: Severity, message: &str) -> RuleBuilder {
        let message = message.to_owned();
        Box::new(move |_| Ok(Some(Finding::new(severity, message.clone()))))
    }

    fn declining_builder() -> RuleBuilder {
        Box::new(|_| Ok(None))
    }

    fn failing_builder(rule_id: &str) -> RuleBuilder {
        let rule_id = rule_id.to_owned();
        Box::new(move |_| {
            Err(DiagnosisError::NumberParse {
                rule_id: rule_id.clone(),
                value: "bogus".to_owned(),
            })
        })
    }

    #[test]
    fn engine_starts_empty() {
        let engine = RuleEngine::new();
        assert_eq!(engine.rule_count(), 0);
    }

    #[test]
    fn register_rejects_duplicate_id() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("dup", "a", fixed_builder(Severity::Warning, "a")).unwrap())
            .unwrap();
        let err = engine
            .register(Rule::new("dup", "b", fixed_builder(Severity::Warning, "b")).unwrap())
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::DuplicateRule { .. }));
        assert_eq!(engine.rule_count(), 1);
    }

    #[test]
    fn evaluate_empty_engine_yields_empty_report() {
        let engine = RuleEngine::new();
        let report = engine.evaluate(&LogDocument::new("anything"));
        assert!(!report.is_actionable());
    }

    #[test]
    fn evaluate_collects_matching_rules_in_registration_order() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("late", "zebra", fixed_builder(Severity::Warning, "z")).unwrap())
            .unwrap();
        engine
            .register(Rule::new("early", "alpha", fixed_builder(Severity::Severe, "a")).unwrap())
            .unwrap();

        // 문서에서는 alpha가 먼저 나타나지만 리포트 순서는 등록 순서
        let report = engine.evaluate(&LogDocument::new("alpha then zebra"));
        let messages: Vec<&str> = report.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["z", "a"]);
    }

    #[test]
    fn evaluate_skips_non_matching_rules() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("hit", "present", fixed_builder(Severity::Warning, "hit")).unwrap())
            .unwrap();
        engine
            .register(
                Rule::new("miss", "absent", fixed_builder(Severity::Warning, "miss")).unwrap(),
            )
            .unwrap();

        let report = engine.evaluate(&LogDocument::new("present"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.iter().next().unwrap().message, "hit");
    }

    #[test]
    fn declining_rule_yields_no_finding() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("decline", "match", declining_builder()).unwrap())
            .unwrap();

        let report = engine.evaluate(&LogDocument::new("match"));
        assert!(!report.is_actionable());
    }

    #[test]
    fn builder_failure_is_isolated_to_its_rule() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("before", "log", fixed_builder(Severity::Warning, "b")).unwrap())
            .unwrap();
        engine
            .register(Rule::new("broken", "log", failing_builder("broken")).unwrap())
            .unwrap();
        engine
            .register(Rule::new("after", "log", fixed_builder(Severity::Severe, "a")).unwrap())
            .unwrap();

        let report = engine.evaluate(&LogDocument::new("log"));
        let messages: Vec<&str> = report.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "a"]);
    }

    #[test]
    fn each_rule_fires_at_most_once() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("once", "dup", fixed_builder(Severity::Warning, "once")).unwrap())
            .unwrap();

        let report = engine.evaluate(&LogDocument::new("dup dup dup dup"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn evaluate_is_deterministic() {
        let mut engine = RuleEngine::new();
        engine
            .register(Rule::new("r1", "aaa", fixed_builder(Severity::Warning, "1")).unwrap())
            .unwrap();
        engine
            .register(Rule::new("r2", "bbb", fixed_builder(Severity::Severe, "2")).unwrap())
            .unwrap();

        let doc = LogDocument::new("bbb aaa bbb");
        let first = engine.evaluate(&doc);
        let second = engine.evaluate(&doc);
        assert_eq!(first, second);
    }

    #[test]
    fn last_match_policy_feeds_builder_latest_captures() {
        let mut engine = RuleEngine::new();
        let builder: RuleBuilder = Box::new(|caps| {
            let val = caps.get(1).map(|m| m.as_str().to_owned()).unwrap_or_default();
            Ok(Some(Finding::new(Severity::Warning, val)))
        });
        engine
            .register(
                Rule::with_policy("latest", r"state=(\w+)", MatchPolicy::LastMatch, builder)
                    .unwrap(),
            )
            .unwrap();

        let report = engine.evaluate(&LogDocument::new("state=starting state=crashed"));
        assert_eq!(report.iter().next().unwrap().message, "crashed");
    }
}
