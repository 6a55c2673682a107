//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logvet_`
//! - 모듈명: `diagnosis_`, `retraction_`, `fetch_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logvet_core::metrics::DIAGNOSIS_DOCUMENTS_EVALUATED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (warning, important, severe)
pub const LABEL_SEVERITY: &str = "severity";

/// 규칙 ID 레이블 키
pub const LABEL_RULE: &str = "rule";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 철회 종료 사유 레이블 키 (retracted, expired)
pub const LABEL_OUTCOME: &str = "outcome";

// ─── Diagnosis 메트릭 ──────────────────────────────────────────────

/// Diagnosis: 평가된 로그 문서 수 (counter)
pub const DIAGNOSIS_DOCUMENTS_EVALUATED_TOTAL: &str = "logvet_diagnosis_documents_evaluated_total";

/// Diagnosis: 생성된 진단 항목 수 (counter, label: severity)
pub const DIAGNOSIS_FINDINGS_TOTAL: &str = "logvet_diagnosis_findings_total";

/// Diagnosis: 규칙 빌더 내부 실패 수 (counter, label: rule)
pub const DIAGNOSIS_RULE_FAILURES_TOTAL: &str = "logvet_diagnosis_rule_failures_total";

/// Diagnosis: 문서 한 건 평가 소요 시간 (histogram, 초)
pub const DIAGNOSIS_EVALUATION_DURATION_SECONDS: &str =
    "logvet_diagnosis_evaluation_duration_seconds";

// ─── Fetch 메트릭 ──────────────────────────────────────────────────

/// Fetch: 로그 조회 요청 수 (counter, label: result)
pub const FETCH_REQUESTS_TOTAL: &str = "logvet_fetch_requests_total";

/// Fetch: 로그 조회 소요 시간 (histogram, 초)
pub const FETCH_DURATION_SECONDS: &str = "logvet_fetch_duration_seconds";

// ─── Retraction 메트릭 ─────────────────────────────────────────────

/// Retraction: 열린 철회 세션 수 (counter)
pub const RETRACTION_SESSIONS_OPENED_TOTAL: &str = "logvet_retraction_sessions_opened_total";

/// Retraction: 종료된 세션 수 (counter, label: outcome)
pub const RETRACTION_SESSIONS_CLOSED_TOTAL: &str = "logvet_retraction_sessions_closed_total";

/// Retraction: 무시된 비권한 신호 수 (counter)
pub const RETRACTION_UNAUTHORIZED_SIGNALS_TOTAL: &str =
    "logvet_retraction_unauthorized_signals_total";

/// Retraction: 현재 열려 있는 세션 수 (gauge)
pub const RETRACTION_SESSIONS_OPEN: &str = "logvet_retraction_sessions_open";

// ─── Daemon 메트릭 ─────────────────────────────────────────────────

/// Daemon: 게시된 리포트 수 (counter)
pub const DAEMON_REPORTS_POSTED_TOTAL: &str = "logvet_daemon_reports_posted_total";

/// Daemon: 가동 시간 (gauge, 초)
pub const DAEMON_UPTIME_SECONDS: &str = "logvet_daemon_uptime_seconds";

/// Daemon: 빌드 정보 (gauge, 항상 1, labels: version)
pub const DAEMON_BUILD_INFO: &str = "logvet_daemon_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 문서 평가 소요 시간 히스토그램 버킷 (초)
///
/// 10us ~ 1s 범위, 정규식 평가는 CPU 바운드
pub const EVALUATION_DURATION_BUCKETS: [f64; 8] =
    [0.00001, 0.0001, 0.001, 0.01, 0.05, 0.1, 0.5, 1.0];

/// 로그 조회 소요 시간 히스토그램 버킷 (초)
///
/// 10ms ~ 30s 범위 (네트워크 I/O 포함)
pub const FETCH_DURATION_BUCKETS: [f64; 8] = [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `logvet-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Diagnosis
    describe_counter!(
        DIAGNOSIS_DOCUMENTS_EVALUATED_TOTAL,
        "Total number of log documents evaluated by the rule engine"
    );
    describe_counter!(
        DIAGNOSIS_FINDINGS_TOTAL,
        "Total number of findings produced, by severity"
    );
    describe_counter!(
        DIAGNOSIS_RULE_FAILURES_TOTAL,
        "Total number of rule builder failures isolated per rule"
    );
    describe_histogram!(
        DIAGNOSIS_EVALUATION_DURATION_SECONDS,
        "Time to evaluate a single log document in seconds"
    );

    // Fetch
    describe_counter!(
        FETCH_REQUESTS_TOTAL,
        "Total number of log document fetch attempts, by result"
    );
    describe_histogram!(
        FETCH_DURATION_SECONDS,
        "Time to fetch a single log document in seconds"
    );

    // Retraction
    describe_counter!(
        RETRACTION_SESSIONS_OPENED_TOTAL,
        "Total number of retraction sessions opened"
    );
    describe_counter!(
        RETRACTION_SESSIONS_CLOSED_TOTAL,
        "Total number of retraction sessions closed, by outcome"
    );
    describe_counter!(
        RETRACTION_UNAUTHORIZED_SIGNALS_TOTAL,
        "Total number of retraction signals ignored for lack of authorization"
    );
    describe_gauge!(
        RETRACTION_SESSIONS_OPEN,
        "Number of retraction sessions currently open"
    );

    // Daemon
    describe_counter!(
        DAEMON_REPORTS_POSTED_TOTAL,
        "Total number of diagnostic reports posted"
    );
    describe_gauge!(DAEMON_UPTIME_SECONDS, "Logvet daemon uptime in seconds");
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}
