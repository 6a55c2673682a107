//! 설정 관리 -- logvet.toml 파싱 및 런타임 설정
//!
//! [`LogvetConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//! 프로세스 시작 시 한 번 로드되며 이후 불변으로 취급됩니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGVET_RETRACTION_TIMEOUT_SECS=120` 형식)
//! 3. 설정 파일 (`logvet.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logvet_core::error::LogvetError> {
//! use logvet_core::config::LogvetConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogvetConfig::load("logvet.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogvetConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogvetError};

/// Logvet 통합 설정
///
/// `logvet.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogvetConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 진단 규칙 설정 (해결 안내 링크)
    #[serde(default)]
    pub diagnosis: DiagnosisConfig,
    /// 철회 워크플로우 설정
    #[serde(default)]
    pub retraction: RetractionConfig,
    /// 로그 조회 설정
    #[serde(default)]
    pub fetch: FetchConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl LogvetConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogvetError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogvetError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogvetError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogvetError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogvetError> {
        toml::from_str(toml_str).map_err(|e| {
            LogvetError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGVET_{SECTION}_{FIELD}`
    /// 예: `LOGVET_RETRACTION_TIMEOUT_SECS=60`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGVET_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGVET_GENERAL_LOG_FORMAT");

        // Diagnosis
        override_string(
            &mut self.diagnosis.java_download_url,
            "LOGVET_DIAGNOSIS_JAVA_DOWNLOAD_URL",
        );
        override_string(
            &mut self.diagnosis.java_help_url,
            "LOGVET_DIAGNOSIS_JAVA_HELP_URL",
        );
        override_string(
            &mut self.diagnosis.ram_guide_url,
            "LOGVET_DIAGNOSIS_RAM_GUIDE_URL",
        );
        override_string(
            &mut self.diagnosis.forge_info_url,
            "LOGVET_DIAGNOSIS_FORGE_INFO_URL",
        );
        override_string(
            &mut self.diagnosis.id_limit_mod_url,
            "LOGVET_DIAGNOSIS_ID_LIMIT_MOD_URL",
        );

        // Retraction
        override_u64(
            &mut self.retraction.timeout_secs,
            "LOGVET_RETRACTION_TIMEOUT_SECS",
        );
        override_u64_csv(
            &mut self.retraction.privileged_actors,
            "LOGVET_RETRACTION_PRIVILEGED_ACTORS",
        );
        override_u64_csv(
            &mut self.retraction.privileged_ranks,
            "LOGVET_RETRACTION_PRIVILEGED_RANKS",
        );

        // Fetch
        override_u64(&mut self.fetch.timeout_secs, "LOGVET_FETCH_TIMEOUT_SECS");

        // Metrics
        override_bool(&mut self.metrics.enabled, "LOGVET_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "LOGVET_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "LOGVET_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogvetError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.retraction.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retraction.timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.port".to_owned(),
                reason: "must be greater than 0 when metrics are enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 진단 규칙 설정
///
/// 규칙 빌더가 메시지에 삽입하는 해결 안내 링크 문자열입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// Java 다운로드 링크
    pub java_download_url: String,
    /// 올바른 Java 설치 안내 링크
    pub java_help_url: String,
    /// RAM 할당 가이드 링크
    pub ram_guide_url: String,
    /// 미지원 Forge 안내 링크
    pub forge_info_url: String,
    /// ID 한도 해제 모드 링크
    pub id_limit_mod_url: String,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            java_download_url: "https://java.com/en/download/manual.jsp".to_owned(),
            java_help_url: "https://github.com/MultiMC/MultiMC5/wiki/Using-the-right-Java"
                .to_owned(),
            ram_guide_url: "https://vazkii.net/#blog/ram-explanation".to_owned(),
            forge_info_url: "https://multimc.org/posts/forge-114.html".to_owned(),
            id_limit_mod_url: "https://www.curseforge.com/minecraft/mc-mods/notenoughids"
                .to_owned(),
        }
    }
}

/// 철회 워크플로우 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetractionConfig {
    /// 철회 대기 시간 (초) -- 만료 후에는 게시물이 영구히 남습니다
    pub timeout_secs: u64,
    /// 철회 권한이 있는 행위자 ID 목록
    pub privileged_actors: Vec<u64>,
    /// 철회 권한이 있는 직급 ID 목록 (행위자의 최상위 직급과 비교)
    pub privileged_ranks: Vec<u64>,
}

impl Default for RetractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            privileged_actors: Vec::new(),
            privileged_ranks: Vec::new(),
        }
    }
}

/// 로그 조회 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTP 요청 시간 제한 (초)
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// Prometheus 익스포터 바인드 주소
    pub listen_addr: String,
    /// Prometheus 익스포터 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9400,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64_csv(target: &mut Vec<u64>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        let parsed: Result<Vec<u64>, _> =
            val.split(',').map(|s| s.trim().parse::<u64>()).collect();
        match parsed {
            Ok(ids) => *target = ids,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 list from env var, ignoring"
            ),
        }
    }
}
