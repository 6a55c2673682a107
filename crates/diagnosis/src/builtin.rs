//! 내장 진단 규칙 -- MultiMC 런처 로그 진단 세트
//!
//! 여덟 개의 규칙이 고정된 등록 순서로 제공됩니다. 해결 안내 링크는
//! [`DiagnosisConfig`]에서 주입되어 빌더 클로저에 캡처됩니다.
//!
//! 수치 추출 규칙(`ram_amount`)은 캡처된 값이 허용 대역 안이면
//! `Ok(None)`으로 진단을 사양합니다.

use logvet_core::config::DiagnosisConfig;
use logvet_core::types::{Finding, Severity};

use crate::engine::RuleEngine;
use crate::error::DiagnosisError;
use crate::rule::Rule;

/// RAM 하한 (MB) -- 미만이면 너무 적음
const RAM_FLOOR_MB: u64 = 2000;
/// RAM 상한 (MB) -- 초과면 너무 많음
const RAM_CEILING_MB: u64 = 10000;

/// 내장 규칙 세트로 채운 엔진을 생성합니다.
pub fn engine_with_builtins(config: &DiagnosisConfig) -> Result<RuleEngine, DiagnosisError> {
    let mut engine = RuleEngine::new();
    for rule in builtin_rules(config)? {
        engine.register(rule)?;
    }
    Ok(engine)
}

/// 내장 규칙을 고정된 등록 순서로 생성합니다.
pub fn builtin_rules(config: &DiagnosisConfig) -> Result<Vec<Rule>, DiagnosisError> {
    Ok(vec![
        multimc_in_program_files()?,
        server_java(config)?,
        buildsystem_forge(config)?,
        java_version(config)?,
        id_range_exceeded(config)?,
        out_of_memory()?,
        java_architecture(config)?,
        ram_amount(config)?,
    ])
}

/// MultiMC가 Program Files에 설치됨
fn multimc_in_program_files() -> Result<Rule, DiagnosisError> {
    Rule::new(
        "multimc_in_program_files",
        r"Minecraft folder is:\nC:/Program Files",
        Box::new(|_| {
            Ok(Some(Finding::new(
                Severity::Severe,
                "Your MultiMC installation is in Program Files, where MultiMC doesn't have permission to write.\nMove it somewhere else, like your Desktop.",
            )))
        }),
    )
}

/// 서버용 Java 사용 중
fn server_java(config: &DiagnosisConfig) -> Result<Rule, DiagnosisError> {
    let help_url = config.java_help_url.clone();
    Rule::new(
        "server_java",
        r"-Bit Server VM warning",
        Box::new(move |_| {
            Ok(Some(Finding::new(
                Severity::Severe,
                format!(
                    "You're using the server version of Java. [See here for help installing the correct version.]({help_url})"
                ),
            )))
        }),
    )
}

/// 미지원 Minecraft 버전용 Forge 사용 시도
fn buildsystem_forge(config: &DiagnosisConfig) -> Result<Rule, DiagnosisError> {
    let info_url = config.forge_info_url.clone();
    Rule::new(
        "buildsystem_forge",
        r"net\.minecraftforge/(?P<major>(2[5-9]|30))\.[0-9]+\.[0-9]+\.json",
        Box::new(move |caps| {
            let major = caps
                .name("major")
                .ok_or_else(|| DiagnosisError::MissingCapture {
                    rule_id: "buildsystem_forge".to_owned(),
                    group: "major".to_owned(),
                })?;
            let mc_version = match major.as_str() {
                "25" => "1.13.2",
                "26" => "1.14.2",
                "27" => "1.14.3",
                "28" => "1.14.4",
                "29" => "1.15",
                "30" => "1.15.1",
                _ => "<unknown version>",
            };
            Ok(Some(Finding::new(
                Severity::Severe,
                format!(
                    "You're trying to use Forge for Minecraft version {mc_version}. This is not supported by MultiMC. For more information, please see [this link.]({info_url})"
                ),
            )))
        }),
    )
}

/// Java 8 이외의 버전 사용 중
fn java_version(config: &DiagnosisConfig) -> Result<Rule, DiagnosisError> {
    let help_url = config.java_help_url.clone();
    Rule::new(
        "java_version",
        r"Java is version (1.)??(?P<ver>6|7|9|10|11|12)+\..+,",
        Box::new(move |caps| {
            let ver = caps
                .name("ver")
                .ok_or_else(|| DiagnosisError::MissingCapture {
                    rule_id: "java_version".to_owned(),
                    group: "ver".to_owned(),
                })?;
            Ok(Some(Finding::new(
                Severity::Severe,
                format!(
                    "You're using Java {}. Versions other than Java 8 are not designed to be used with Minecraft and may cause issues. [See here for help installing the correct version.]({help_url})",
                    ver.as_str()
                ),
            )))
        }),
    )
}

/// 하드코딩된 블록 ID 한도 초과
fn id_range_exceeded(config: &DiagnosisConfig) -> Result<Rule, DiagnosisError> {
    let mod_url = config.id_limit_mod_url.clone();
    Rule::new(
        "id_range_exceeded",
        r"java\.lang\.RuntimeException: Invalid id 4096 - maximum id range exceeded\.",
        Box::new(move |_| {
            Ok(Some(Finding::new(
                Severity::Severe,
                format!(
                    "You've exceeded the hardcoded ID Limit. Remove some mods, or install [this one]({mod_url})"
                ),
            )))
        }),
    )
}

/// 메모리 부족으로 중단
fn out_of_memory() -> Result<Rule, DiagnosisError> {
    Rule::new(
        "out_of_memory",
        r"java\.lang\.OutOfMemoryError",
        Box::new(|_| {
            Ok(Some(Finding::new(
                Severity::Severe,
                "You've run out of memory. You should allocate more, although the exact value depends on how many mods you have installed.",
            )))
        }),
    )
}

/// 32비트 Java와 64비트 시스템의 불일치
fn java_architecture(config: &DiagnosisConfig) -> Result<Rule, DiagnosisError> {
    let download_url = config.java_download_url.clone();
    Rule::new(
        "java_architecture",
        r"Your Java architecture is not matching your system architecture\.",
        Box::new(move |_| {
            Ok(Some(Finding::new(
                Severity::Important,
                format!(
                    "You're using 32-bit Java. You should install 64-bit Java from [this link]({download_url})."
                ),
            )))
        }),
    )
}

/// 할당된 RAM이 너무 적거나 너무 많음
///
/// `RAM_FLOOR_MB..=RAM_CEILING_MB` 대역 안의 값은 진단을 내지 않습니다.
fn ram_amount(config: &DiagnosisConfig) -> Result<Rule, DiagnosisError> {
    let guide_url = config.ram_guide_url.clone();
    Rule::new(
        "ram_amount",
        r"-Xmx(?P<amount>\d+)m[,\]]",
        Box::new(move |caps| {
            let raw = caps
                .name("amount")
                .ok_or_else(|| DiagnosisError::MissingCapture {
                    rule_id: "ram_amount".to_owned(),
                    group: "amount".to_owned(),
                })?;
            let megabytes: u64 =
                raw.as_str()
                    .parse()
                    .map_err(|_| DiagnosisError::NumberParse {
                        rule_id: "ram_amount".to_owned(),
                        value: raw.as_str().to_owned(),
                    })?;
            let gigabytes = megabytes as f64 / 1000.0;

            if megabytes < RAM_FLOOR_MB {
                Ok(Some(Finding::new(
                    Severity::Important,
                    format!(
                        "You have only allocated {gigabytes:.1}GB of RAM to Minecraft. This is too little, and you should raise it to at least 2GB"
                    ),
                )))
            } else if megabytes > RAM_CEILING_MB {
                Ok(Some(Finding::new(
                    Severity::Warning,
                    format!(
                        "You have allocated {gigabytes:.1}GB of RAM to Minecraft. [This is too much and can cause lagspikes.]({guide_url})"
                    ),
                )))
            } else {
                // 허용 대역 안 -- 진단 없음
                Ok(None)
            }
        }),
    )
}
