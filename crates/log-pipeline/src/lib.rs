#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`envelope`]: 타임스탬프 엔벨로프 추출
//! - [`rule`]: 규칙 테이블과 카테고리 캐스케이드
//! - [`classifier`]: 엔벨로프 추출 + 캐스케이드를 묶은 기본 분류기
//! - [`diagnostic`]: 진단 메시지와 싱크 구현
//! - [`worker`]: 인바운드 큐를 소비하는 분류 워커
//! - [`pipeline`]: 워커 생명주기 관리 (Pipeline trait 구현)
//! - [`fan_out`]: 이벤트 스트림 복제
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! RawLine -> EnvelopeExtractor -> Cascade -> ClassifiedEvent -> downstream
//!                 |                  |
//!            Unenveloped           Fault  ---> DiagnosticSink
//! ```

pub mod classifier;
pub mod config;
pub mod diagnostic;
pub mod envelope;
pub mod error;
pub mod fan_out;
pub mod pipeline;
pub mod rule;
pub mod worker;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{ClassificationPipeline, ClassificationPipelineBuilder};
pub use worker::{ClassificationWorker, PipelineStats, StatsSnapshot, WorkerExit};
pub use fan_out::spawn_fan_out;

// 분류
pub use classifier::Classifier;
pub use envelope::EnvelopeExtractor;
pub use rule::{Cascade, RuleMatch};

// 진단
pub use diagnostic::{ChannelSink, ClassificationStage, Diagnostic, DiagnosticSink, MemorySink, TracingSink};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::LogPipelineError;
