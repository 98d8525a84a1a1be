//! 설정 관리 -- eqalert.toml 파싱 및 런타임 설정
//!
//! [`EqAlertConfig`]는 데몬과 분류 파이프라인의 설정을 담는 최상위 구조체입니다.
//! 분류 규칙 자체는 설정 대상이 아니며, 여기서는 채널 크기, 로깅, 메트릭 같은
//! 배선(wiring) 값만 다룹니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`EQALERT_CLASSIFIER_EVENT_CHANNEL_CAPACITY=512` 형식)
//! 3. 설정 파일 (`eqalert.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), eqalert_core::error::EqAlertError> {
//! use eqalert_core::config::EqAlertConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = EqAlertConfig::load("eqalert.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = EqAlertConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, EqAlertError};

/// 채널 용량 상한
pub const MAX_CHANNEL_CAPACITY: usize = 1_000_000;

/// eqalert 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EqAlertConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분류 파이프라인 설정
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl EqAlertConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, EqAlertError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, EqAlertError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, EqAlertError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EqAlertError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                EqAlertError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, EqAlertError> {
        toml::from_str(toml_str).map_err(|e| {
            EqAlertError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `EQALERT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "EQALERT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "EQALERT_GENERAL_LOG_FORMAT");

        // Classifier
        override_usize(
            &mut self.classifier.line_channel_capacity,
            "EQALERT_CLASSIFIER_LINE_CHANNEL_CAPACITY",
        );
        override_usize(
            &mut self.classifier.event_channel_capacity,
            "EQALERT_CLASSIFIER_EVENT_CHANNEL_CAPACITY",
        );
        override_usize(
            &mut self.classifier.diagnostic_channel_capacity,
            "EQALERT_CLASSIFIER_DIAGNOSTIC_CHANNEL_CAPACITY",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "EQALERT_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "EQALERT_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "EQALERT_METRICS_PORT");
        override_string(&mut self.metrics.endpoint, "EQALERT_METRICS_ENDPOINT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), EqAlertError> {
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

        let capacities = [
            (
                "classifier.line_channel_capacity",
                self.classifier.line_channel_capacity,
            ),
            (
                "classifier.event_channel_capacity",
                self.classifier.event_channel_capacity,
            ),
            (
                "classifier.diagnostic_channel_capacity",
                self.classifier.diagnostic_channel_capacity,
            ),
        ];
        for (field, value) in capacities {
            if value == 0 || value > MAX_CHANNEL_CAPACITY {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("must be between 1 and {MAX_CHANNEL_CAPACITY}, got {value}"),
                }
                .into());
            }
        }

        if self.metrics.enabled {
            if self.metrics.listen_addr.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.listen_addr".to_owned(),
                    reason: "listen_addr must not be empty when metrics are enabled".to_owned(),
                }
                .into());
            }
            if self.metrics.port == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.port".to_owned(),
                    reason: "port must be greater than 0".to_owned(),
                }
                .into());
            }
            if !self.metrics.endpoint.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.endpoint".to_owned(),
                    reason: "endpoint must start with '/'".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

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
            log_format: "pretty".to_owned(),
        }
    }
}

/// 분류 파이프라인 설정
///
/// 채널 크기만 조정하며 분류 결과에는 영향을 주지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// 인바운드 라인 채널 용량
    pub line_channel_capacity: usize,
    /// 아웃바운드 이벤트 채널 용량
    pub event_channel_capacity: usize,
    /// 진단 채널 용량
    pub diagnostic_channel_capacity: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            line_channel_capacity: 1024,
            event_channel_capacity: 1024,
            diagnostic_channel_capacity: 256,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 바인딩 주소
    pub listen_addr: String,
    /// 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9102,
            endpoint: "/metrics".to_owned(),
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

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
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

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = EqAlertConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.classifier.line_channel_capacity, 1024);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.endpoint, "/metrics");
    }

    #[test]
    fn default_config_passes_validation() {
        EqAlertConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = EqAlertConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.classifier.event_channel_capacity, 1024);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[classifier]
event_channel_capacity = 64
"#;
        let config = EqAlertConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // 나머지 필드는 기본값 유지
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.classifier.event_channel_capacity, 64);
        assert_eq!(config.classifier.line_channel_capacity, 1024);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "json"

[classifier]
line_channel_capacity = 4096
event_channel_capacity = 2048
diagnostic_channel_capacity = 16

[metrics]
enabled = true
listen_addr = "0.0.0.0"
port = 9300
endpoint = "/metrics"
"#;
        let config = EqAlertConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.classifier.line_channel_capacity, 4096);
        assert_eq!(config.classifier.diagnostic_channel_capacity, 16);
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.port, 9300);
        config.validate().unwrap();
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = EqAlertConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            EqAlertError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = EqAlertConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = EqAlertConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let mut config = EqAlertConfig::default();
        config.classifier.event_channel_capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("classifier.event_channel_capacity"));
    }

    #[test]
    fn validate_rejects_oversized_capacity() {
        let mut config = EqAlertConfig::default();
        config.classifier.line_channel_capacity = MAX_CHANNEL_CAPACITY + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("classifier.line_channel_capacity"));
    }

    #[test]
    fn validate_checks_metrics_only_when_enabled() {
        let mut config = EqAlertConfig::default();
        config.metrics.port = 0;
        // 비활성화 상태면 메트릭 검증을 건너뜀
        config.validate().unwrap();

        config.metrics.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.port"));
    }

    #[test]
    fn validate_rejects_relative_endpoint() {
        let mut config = EqAlertConfig::default();
        config.metrics.enabled = true;
        config.metrics.endpoint = "metrics".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.endpoint"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 환경변수 동시 접근이 없습니다.
        unsafe { std::env::set_var("TEST_EQALERT_STR", "overridden") };
        override_string(&mut val, "TEST_EQALERT_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_EQALERT_STR") };
    }

    #[test]
    #[serial]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 7usize;
        // SAFETY: serial 테스트로 환경변수 동시 접근이 없습니다.
        unsafe { std::env::set_var("TEST_EQALERT_USIZE_BAD", "lots") };
        override_usize(&mut val, "TEST_EQALERT_USIZE_BAD");
        assert_eq!(val, 7);
        unsafe { std::env::remove_var("TEST_EQALERT_USIZE_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_bool_valid() {
        let mut val = false;
        // SAFETY: serial 테스트로 환경변수 동시 접근이 없습니다.
        unsafe { std::env::set_var("TEST_EQALERT_BOOL", "true") };
        override_bool(&mut val, "TEST_EQALERT_BOOL");
        assert!(val);
        unsafe { std::env::remove_var("TEST_EQALERT_BOOL") };
    }

    #[test]
    #[serial]
    fn env_override_u16_out_of_range_keeps_original() {
        let mut val = 9102u16;
        // SAFETY: serial 테스트로 환경변수 동시 접근이 없습니다.
        unsafe { std::env::set_var("TEST_EQALERT_PORT", "70000") };
        override_u16(&mut val, "TEST_EQALERT_PORT");
        assert_eq!(val, 9102);
        unsafe { std::env::remove_var("TEST_EQALERT_PORT") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_EQALERT_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = EqAlertConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = EqAlertConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(
            config.classifier.diagnostic_channel_capacity,
            parsed.classifier.diagnostic_channel_capacity
        );
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = EqAlertConfig::from_file("/nonexistent/path/eqalert.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EqAlertError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
