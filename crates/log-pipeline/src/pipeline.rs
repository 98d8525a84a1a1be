//! 파이프라인 오케스트레이션 -- 분류 워커의 생명주기를 관리합니다.
//!
//! [`ClassificationPipeline`]은 core의 [`Pipeline`](eqalert_core::pipeline::Pipeline) trait을
//! 구현하여 `eqalert-daemon`에서 start/stop/health_check로 관리됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! producers -> mpsc<RawLine> -> ClassificationWorker -> mpsc<ClassifiedEvent> -> downstream
//!                                      |
//!                                DiagnosticSink
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use eqalert_core::error::{EqAlertError, PipelineError};
use eqalert_core::event::ClassifiedEvent;
use eqalert_core::pipeline::{HealthStatus, LineClassifier, Pipeline};
use eqalert_core::types::RawLine;

use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::diagnostic::{DiagnosticSink, TracingSink};
use crate::error::LogPipelineError;
use crate::worker::{ClassificationWorker, PipelineStats, StatsSnapshot, WorkerExit};

type WorkerHandle = JoinHandle<(mpsc::Receiver<RawLine>, WorkerExit)>;

/// 파이프라인 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    /// 초기화됨, 아직 시작하지 않음
    Initialized,
    /// 실행 중
    Running,
    /// 정지됨
    Stopped,
}

/// 분류 파이프라인
///
/// # 사용 예시
/// ```ignore
/// use eqalert_log_pipeline::ClassificationPipelineBuilder;
///
/// let (line_tx, line_rx) = tokio::sync::mpsc::channel(1024);
/// let (mut pipeline, event_rx) = ClassificationPipelineBuilder::new()
///     .line_receiver(line_rx)
///     .build()?;
///
/// pipeline.start().await?;
/// ```
pub struct ClassificationPipeline {
    /// 파이프라인 설정
    config: PipelineConfig,
    /// 현재 상태
    state: PipelineState,
    /// 라인 분류기 (엔벨로프 + 캐스케이드)
    classifier: Arc<dyn LineClassifier>,
    /// 진단 싱크
    diagnostics: Arc<dyn DiagnosticSink>,
    /// 인바운드 수신 채널 (실행 중에는 워커가 소유)
    line_rx: Option<mpsc::Receiver<RawLine>>,
    /// 빌더가 인바운드 채널을 만든 경우의 송신측
    line_tx: Option<mpsc::Sender<RawLine>>,
    /// 아웃바운드 송신 채널
    event_tx: mpsc::Sender<ClassifiedEvent>,
    /// 상위 취소 토큰
    cancel: CancellationToken,
    /// 현재 워커의 취소 토큰
    worker_cancel: Option<CancellationToken>,
    /// 워커 태스크 핸들
    worker: Option<WorkerHandle>,
    /// 카운터
    stats: Arc<PipelineStats>,
    /// 마지막 워커 종료 사유
    last_exit: Option<WorkerExit>,
}

impl ClassificationPipeline {
    /// 현재 상태를 반환합니다.
    pub fn state_name(&self) -> &str {
        match self.state {
            PipelineState::Initialized => "initialized",
            PipelineState::Running => "running",
            PipelineState::Stopped => "stopped",
        }
    }

    /// 파이프라인 설정을 반환합니다.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 카운터 스냅샷을 반환합니다.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// 마지막 워커 종료 사유를 반환합니다.
    pub fn last_exit(&self) -> Option<WorkerExit> {
        self.last_exit
    }

    /// 빌더가 만든 인바운드 채널의 송신측을 복제합니다.
    ///
    /// 외부 `line_receiver`를 설정한 경우 `None`입니다.
    /// 파이프라인이 송신측을 보유하므로 이 채널은 파이프라인이 drop될 때까지 닫히지 않습니다.
    pub fn line_sender(&self) -> Option<mpsc::Sender<RawLine>> {
        self.line_tx.clone()
    }

    /// 입력이 끝나 워커가 스스로 종료할 때까지 기다립니다.
    ///
    /// 모든 생산자가 인바운드 채널을 닫으면 워커는 남은 라인을 처리한 뒤 종료합니다.
    /// 종료 후 파이프라인은 정지 상태가 됩니다.
    ///
    /// 취소 안전(cancel-safe)합니다. `select!`에서 중간에 drop되어도
    /// 워커 핸들은 유지되므로 이후 `stop()`으로 정리할 수 있습니다.
    pub async fn wait(&mut self) -> Result<WorkerExit, EqAlertError> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::NotRunning.into());
        }
        let result = self.join_worker().await;
        self.state = PipelineState::Stopped;
        result
    }

    async fn join_worker(&mut self) -> Result<WorkerExit, EqAlertError> {
        let Some(handle) = self.worker.as_mut() else {
            return Err(PipelineError::NotRunning.into());
        };
        let joined = handle.await;
        self.worker = None;
        self.worker_cancel = None;
        match joined {
            Ok((line_rx, exit)) => {
                self.line_rx = Some(line_rx);
                self.last_exit = Some(exit);
                Ok(exit)
            }
            Err(e) => {
                tracing::error!(error = %e, "classification worker task failed");
                Err(PipelineError::WorkerFailed(e.to_string()).into())
            }
        }
    }
}

impl Pipeline for ClassificationPipeline {
    async fn start(&mut self) -> Result<(), EqAlertError> {
        if self.state == PipelineState::Running {
            return Err(PipelineError::AlreadyRunning.into());
        }
        // 상위 토큰이 이미 취소됐다면 워커는 시작 즉시 끝나므로 거부
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled.into());
        }

        let line_rx = self.line_rx.take().ok_or_else(|| {
            PipelineError::InitFailed("line receiver is no longer available".to_owned())
        })?;

        tracing::info!("starting classification pipeline");

        let token = self.cancel.child_token();
        let worker = ClassificationWorker::new(
            Arc::clone(&self.classifier),
            line_rx,
            self.event_tx.clone(),
            Arc::clone(&self.diagnostics),
            Arc::clone(&self.stats),
        );
        self.worker = Some(tokio::spawn(worker.run(token.clone())));
        self.worker_cancel = Some(token);
        self.last_exit = None;

        self.state = PipelineState::Running;
        tracing::info!("classification pipeline started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), EqAlertError> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::NotRunning.into());
        }

        tracing::info!("stopping classification pipeline");

        if let Some(token) = self.worker_cancel.take() {
            token.cancel();
        }
        let result = self.join_worker().await;
        self.state = PipelineState::Stopped;
        let exit = result?;

        let stats = self.stats.snapshot();
        tracing::info!(
            exit = ?exit,
            received = stats.received,
            published = stats.published,
            rejected = stats.rejected,
            faults = stats.faults,
            "classification pipeline stopped"
        );
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PipelineState::Running => match &self.worker {
                Some(handle) if handle.is_finished() => {
                    HealthStatus::Degraded("classification worker exited".to_owned())
                }
                Some(_) => HealthStatus::Healthy,
                None => HealthStatus::Unhealthy("worker missing".to_owned()),
            },
            PipelineState::Initialized => HealthStatus::Unhealthy("not started".to_owned()),
            PipelineState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
        }
    }
}

/// 분류 파이프라인 빌더
///
/// 채널을 지정하지 않으면 설정된 용량으로 새 채널을 생성합니다.
pub struct ClassificationPipelineBuilder {
    config: PipelineConfig,
    line_rx: Option<mpsc::Receiver<RawLine>>,
    event_tx: Option<mpsc::Sender<ClassifiedEvent>>,
    classifier: Option<Arc<dyn LineClassifier>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    cancel: Option<CancellationToken>,
}

impl ClassificationPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            line_rx: None,
            event_tx: None,
            classifier: None,
            diagnostics: None,
            cancel: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 외부 인바운드 수신 채널을 설정합니다.
    ///
    /// 모든 송신측이 drop되면 워커는 남은 라인을 처리하고 종료합니다.
    pub fn line_receiver(mut self, rx: mpsc::Receiver<RawLine>) -> Self {
        self.line_rx = Some(rx);
        self
    }

    /// 외부 아웃바운드 송신 채널을 설정합니다.
    pub fn event_sender(mut self, tx: mpsc::Sender<ClassifiedEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// 라인 분류기를 교체합니다. 기본값은 내장 규칙의 [`Classifier`]입니다.
    pub fn classifier(mut self, classifier: Arc<dyn LineClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// 진단 싱크를 설정합니다. 기본값은 [`TracingSink`]입니다.
    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// 상위 취소 토큰을 설정합니다.
    ///
    /// 이 토큰이 취소되면 워커도 종료합니다.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// 파이프라인을 빌드합니다.
    ///
    /// # Returns
    /// - `ClassificationPipeline`: 파이프라인 인스턴스
    /// - `Option<mpsc::Receiver<ClassifiedEvent>>`: 이벤트 수신 채널
    ///   (외부 event_sender를 설정한 경우 None)
    pub fn build(
        self,
    ) -> Result<(ClassificationPipeline, Option<mpsc::Receiver<ClassifiedEvent>>), LogPipelineError>
    {
        self.config.validate()?;

        let (line_tx, line_rx) = match self.line_rx {
            Some(rx) => (None, rx),
            None => {
                let (tx, rx) = mpsc::channel(self.config.line_channel_capacity);
                (Some(tx), rx)
            }
        };

        let (event_tx, event_rx) = match self.event_tx {
            Some(tx) => (tx, None),
            None => {
                let (tx, rx) = mpsc::channel(self.config.event_channel_capacity);
                (tx, Some(rx))
            }
        };

        let classifier: Arc<dyn LineClassifier> = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(Classifier::new()?),
        };

        let pipeline = ClassificationPipeline {
            config: self.config,
            state: PipelineState::Initialized,
            classifier,
            diagnostics: self.diagnostics.unwrap_or_else(|| Arc::new(TracingSink)),
            line_rx: Some(line_rx),
            line_tx,
            event_tx,
            cancel: self.cancel.unwrap_or_default(),
            worker_cancel: None,
            worker: None,
            stats: Arc::new(PipelineStats::default()),
            last_exit: None,
        };

        Ok((pipeline, event_rx))
    }
}

impl Default for ClassificationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
