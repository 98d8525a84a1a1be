//! 분류 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`ClassifierConfig`](eqalert_core::config::ClassifierConfig)를
//! 기반으로 파이프라인 배선(채널 용량)을 결정합니다. 분류 규칙은 설정 대상이 아닙니다.
//!
//! # 사용 예시
//! ```ignore
//! use eqalert_core::config::EqAlertConfig;
//! use eqalert_log_pipeline::config::PipelineConfig;
//!
//! let core_config = EqAlertConfig::default();
//! let config = PipelineConfig::from_core(&core_config.classifier);
//! ```

use serde::{Deserialize, Serialize};

use eqalert_core::config::{ClassifierConfig, MAX_CHANNEL_CAPACITY};

use crate::error::LogPipelineError;

/// 분류 파이프라인 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 인바운드 라인 채널 용량 (빌더가 채널을 생성할 때만 사용)
    pub line_channel_capacity: usize,
    /// 아웃바운드 이벤트 채널 용량 (빌더가 채널을 생성할 때만 사용)
    pub event_channel_capacity: usize,
    /// 진단 채널 용량
    pub diagnostic_channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_core(&ClassifierConfig::default())
    }
}

impl PipelineConfig {
    /// core의 `ClassifierConfig`에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &ClassifierConfig) -> Self {
        Self {
            line_channel_capacity: core.line_channel_capacity,
            event_channel_capacity: core.event_channel_capacity,
            diagnostic_channel_capacity: core.diagnostic_channel_capacity,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        let fields = [
            ("line_channel_capacity", self.line_channel_capacity),
            ("event_channel_capacity", self.event_channel_capacity),
            ("diagnostic_channel_capacity", self.diagnostic_channel_capacity),
        ];
        for (field, value) in fields {
            if value == 0 || value > MAX_CHANNEL_CAPACITY {
                return Err(LogPipelineError::Config {
                    field: field.to_owned(),
                    reason: format!("must be 1-{MAX_CHANNEL_CAPACITY}"),
                });
            }
        }
        Ok(())
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 라인 채널 용량을 설정합니다.
    pub fn line_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.line_channel_capacity = capacity;
        self
    }

    /// 이벤트 채널 용량을 설정합니다.
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.event_channel_capacity = capacity;
        self
    }

    /// 진단 채널 용량을 설정합니다.
    pub fn diagnostic_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.diagnostic_channel_capacity = capacity;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
