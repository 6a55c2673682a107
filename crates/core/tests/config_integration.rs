//! logvet.toml 통합 설정 테스트
//!
//! - logvet.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use logvet_core::config::LogvetConfig;
use logvet_core::error::{ConfigError, LogvetError};

// =============================================================================
// logvet.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../logvet.toml.example");
    let config = LogvetConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../logvet.toml.example");
    let config = LogvetConfig::parse(content).expect("should parse");
    config.validate().expect("example config should validate");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../logvet.toml.example");
    let from_file = LogvetConfig::parse(content).expect("should parse");
    let from_code = LogvetConfig::default();

    // 예시 파일의 모든 값이 코드 Default 구현과 일치하는지 확인
    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);

    assert_eq!(
        from_file.diagnosis.java_download_url,
        from_code.diagnosis.java_download_url
    );
    assert_eq!(
        from_file.diagnosis.java_help_url,
        from_code.diagnosis.java_help_url
    );
    assert_eq!(
        from_file.diagnosis.ram_guide_url,
        from_code.diagnosis.ram_guide_url
    );
    assert_eq!(
        from_file.diagnosis.forge_info_url,
        from_code.diagnosis.forge_info_url
    );
    assert_eq!(
        from_file.diagnosis.id_limit_mod_url,
        from_code.diagnosis.id_limit_mod_url
    );

    assert_eq!(
        from_file.retraction.timeout_secs,
        from_code.retraction.timeout_secs
    );
    assert_eq!(
        from_file.retraction.privileged_actors,
        from_code.retraction.privileged_actors
    );
    assert_eq!(
        from_file.retraction.privileged_ranks,
        from_code.retraction.privileged_ranks
    );

    assert_eq!(from_file.fetch.timeout_secs, from_code.fetch.timeout_secs);

    assert_eq!(from_file.metrics.enabled, from_code.metrics.enabled);
    assert_eq!(from_file.metrics.listen_addr, from_code.metrics.listen_addr);
    assert_eq!(from_file.metrics.port, from_code.metrics.port);
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_only_retraction_section() {
    let toml = r#"
[retraction]
timeout_secs = 30
privileged_actors = [185461862878543872]
"#;
    let config = LogvetConfig::parse(toml).expect("should parse");

    assert_eq!(config.retraction.timeout_secs, 30);
    assert_eq!(config.retraction.privileged_actors, vec![185461862878543872]);
    // 나머지 섹션은 기본값
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.fetch.timeout_secs, 10);
    assert!(!config.metrics.enabled);
}

#[test]
fn partial_config_only_diagnosis_links() {
    let toml = r#"
[diagnosis]
ram_guide_url = "https://internal.example/ram-guide"
"#;
    let config = LogvetConfig::parse(toml).expect("should parse");

    assert_eq!(config.diagnosis.ram_guide_url, "https://internal.example/ram-guide");
    // 다른 링크는 기본값 유지
    assert_eq!(
        config.diagnosis.java_download_url,
        "https://java.com/en/download/manual.jsp"
    );
}

#[test]
fn empty_file_loads_all_defaults() {
    let config = LogvetConfig::parse("").expect("empty config should parse");
    config.validate().expect("defaults should validate");
    assert_eq!(config.retraction.timeout_secs, 120);
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
fn env_override_beats_file_value() {
    let toml = r#"
[retraction]
timeout_secs = 60
"#;
    let mut config = LogvetConfig::parse(toml).expect("should parse");
    assert_eq!(config.retraction.timeout_secs, 60);

    // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("LOGVET_RETRACTION_TIMEOUT_SECS", "15") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var("LOGVET_RETRACTION_TIMEOUT_SECS") };

    assert_eq!(config.retraction.timeout_secs, 15);
}

#[test]
fn env_override_privileged_list() {
    let mut config = LogvetConfig::default();

    // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("LOGVET_RETRACTION_PRIVILEGED_RANKS", "100,200") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var("LOGVET_RETRACTION_PRIVILEGED_RANKS") };

    assert_eq!(config.retraction.privileged_ranks, vec![100, 200]);
}

#[test]
fn invalid_env_value_keeps_file_value() {
    let mut config = LogvetConfig::default();

    // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("LOGVET_FETCH_TIMEOUT_SECS", "ten") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var("LOGVET_FETCH_TIMEOUT_SECS") };

    assert_eq!(config.fetch.timeout_secs, 10);
}

// =============================================================================
// 에러 케이스 테스트
// =============================================================================

#[test]
fn malformed_toml_is_parse_error() {
    let result = LogvetConfig::parse("[general\nlog_level = \"info\"");
    assert!(matches!(
        result,
        Err(LogvetError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn wrong_value_type_is_parse_error() {
    let result = LogvetConfig::parse("[retraction]\ntimeout_secs = \"soon\"");
    assert!(matches!(
        result,
        Err(LogvetError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[tokio::test]
async fn load_missing_file_is_not_found() {
    let result = LogvetConfig::load("/nonexistent/logvet.toml").await;
    assert!(matches!(
        result,
        Err(LogvetError::Config(ConfigError::FileNotFound { .. }))
    ));
}

#[tokio::test]
async fn load_applies_env_overrides_after_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(file, "[general]\nlog_level = \"debug\"").expect("should write");

    // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("LOGVET_GENERAL_LOG_LEVEL", "warn") };
    let config = LogvetConfig::load(file.path()).await.expect("should load");
    unsafe { std::env::remove_var("LOGVET_GENERAL_LOG_LEVEL") };

    assert_eq!(config.general.log_level, "warn");
}
