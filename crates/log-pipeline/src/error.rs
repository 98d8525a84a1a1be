//! 분류 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 분류 파이프라인 구성 단계에서 발생하는 에러를 표현합니다.
//! 라인 단위 처리 중에는 에러가 전파되지 않고 진단(diagnostic)으로 기록됩니다.
//! `From<LogPipelineError> for EqAlertError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use eqalert_core::error::{EqAlertError, PipelineError};

/// 분류 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 규칙 유효성 검증 실패
    #[error("rule validation error: rule '{rule_id}': {reason}")]
    RuleValidation {
        /// 문제가 된 규칙 위치 (`group[index]`)
        rule_id: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LogPipelineError> for EqAlertError {
    fn from(err: LogPipelineError) -> Self {
        EqAlertError::Pipeline(PipelineError::InitFailed(err.to_string()))
    }
}
