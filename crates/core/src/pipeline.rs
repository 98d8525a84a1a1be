//! 파이프라인 trait -- 모듈 확장 포인트 정의

use std::fmt;
use std::future::Future;

use crate::error::EqAlertError;
use crate::types::{Category, Envelope};

/// 모듈 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 정상 동작
    Healthy,
    /// 동작은 하지만 성능 저하 또는 부분 장애
    Degraded(String),
    /// 동작 불가
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 동작 불가 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}

/// 생명주기를 가진 파이프라인 trait
///
/// 데몬은 이 trait으로 파이프라인을 시작, 정지, 상태 확인합니다.
pub trait Pipeline: Send {
    /// 파이프라인을 시작합니다.
    ///
    /// 이미 실행 중이면 에러를 반환합니다.
    fn start(&mut self) -> impl Future<Output = Result<(), EqAlertError>> + Send;

    /// 파이프라인을 정지합니다.
    ///
    /// 처리 중인 라인은 끝까지 처리하거나 발행 없이 버립니다.
    fn stop(&mut self) -> impl Future<Output = Result<(), EqAlertError>> + Send;

    /// 현재 상태를 반환합니다.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}

/// 라인 분류기 trait
///
/// 엔벨로프 추출과 카테고리 결정을 담당합니다. 두 연산 모두 순수 함수이며,
/// 워커 태스크와 여러 스레드에서 락 없이 공유됩니다.
pub trait LineClassifier: Send + Sync {
    /// 라인에서 엔벨로프를 추출합니다. 형식이 맞지 않으면 `None`입니다.
    fn extract(&self, line: &str) -> Option<Envelope>;

    /// 페이로드의 카테고리를 결정합니다. 모든 문자열에 대해 정의됩니다.
    fn categorize(&self, payload: &str) -> Category;
}
