//! 에러 타입 -- 도메인별 에러 정의

/// eqalert 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum EqAlertError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 이미 실행 중인 파이프라인을 다시 시작
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인을 정지
    #[error("pipeline is not running")]
    NotRunning,

    /// 취소 신호가 이미 발생한 상태에서 시작
    #[error("pipeline cancellation already requested")]
    Cancelled,

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 워커 태스크 비정상 종료
    #[error("pipeline worker failed: {0}")]
    WorkerFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: EqAlertError = ConfigError::InvalidValue {
            field: "classifier.event_channel_capacity".to_owned(),
            reason: "must be greater than 0".to_owned(),
        }
        .into();
        assert!(matches!(err, EqAlertError::Config(_)));
        assert!(err.to_string().contains("classifier.event_channel_capacity"));
    }

    #[test]
    fn pipeline_error_display() {
        let err = EqAlertError::from(PipelineError::AlreadyRunning);
        assert_eq!(err.to_string(), "pipeline error: pipeline is already running");
        let err = EqAlertError::from(PipelineError::Cancelled);
        assert_eq!(
            err.to_string(),
            "pipeline error: pipeline cancellation already requested"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: EqAlertError = io.into();
        assert!(matches!(err, EqAlertError::Io(_)));
    }
}
