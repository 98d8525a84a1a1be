//! 분류 워커 -- 인바운드 큐를 소비하고 이벤트를 발행하는 단일 태스크
//!
//! 워커는 인바운드 라인 채널의 유일한 소비자이자 아웃바운드 이벤트 채널의
//! 유일한 생산자입니다. 이벤트는 큐에서 꺼낸 순서대로 발행됩니다.
//!
//! 대기 지점은 두 곳뿐입니다: 입력 대기와 발행 시 백프레셔.
//! 두 곳 모두 취소 신호를 먼저 확인하므로, 신호 이후에는 큐에 남은
//! 입력이 있어도 새 이벤트를 발행하지 않습니다.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use eqalert_core::event::ClassifiedEvent;
use eqalert_core::metrics as m;
use eqalert_core::pipeline::LineClassifier;
use eqalert_core::types::RawLine;

use crate::diagnostic::{ClassificationStage, Diagnostic, DiagnosticSink};

/// 파이프라인 카운터
#[derive(Debug, Default)]
pub struct PipelineStats {
    received: AtomicU64,
    published: AtomicU64,
    rejected: AtomicU64,
    faults: AtomicU64,
}

impl PipelineStats {
    /// 현재 카운터 값을 복사합니다.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
        }
    }
}

/// 카운터 스냅샷
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// 큐에서 꺼낸 라인 수
    pub received: u64,
    /// 발행한 이벤트 수
    pub published: u64,
    /// 엔벨로프가 없어 버린 라인 수
    pub rejected: u64,
    /// 포착된 내부 장애 수
    pub faults: u64,
}

/// 워커 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// 취소 신호
    Cancelled,
    /// 모든 생산자가 인바운드 채널을 닫음
    InputClosed,
    /// 다운스트림이 아웃바운드 채널을 닫음
    OutputClosed,
}

/// 분류 워커
pub struct ClassificationWorker {
    classifier: Arc<dyn LineClassifier>,
    line_rx: mpsc::Receiver<RawLine>,
    event_tx: mpsc::Sender<ClassifiedEvent>,
    diagnostics: Arc<dyn DiagnosticSink>,
    stats: Arc<PipelineStats>,
}

impl ClassificationWorker {
    /// 새 워커를 생성합니다.
    pub fn new(
        classifier: Arc<dyn LineClassifier>,
        line_rx: mpsc::Receiver<RawLine>,
        event_tx: mpsc::Sender<ClassifiedEvent>,
        diagnostics: Arc<dyn DiagnosticSink>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            classifier,
            line_rx,
            event_tx,
            diagnostics,
            stats,
        }
    }

    /// 워커 루프를 실행합니다.
    ///
    /// 종료 시 인바운드 수신 채널을 돌려주어 재시작을 지원합니다.
    pub async fn run(mut self, cancel: CancellationToken) -> (mpsc::Receiver<RawLine>, WorkerExit) {
        info!("classification worker started");

        let exit = loop {
            let raw = tokio::select! {
                biased;
                _ = cancel.cancelled() => break WorkerExit::Cancelled,
                line = self.line_rx.recv() => match line {
                    Some(line) => line,
                    None => break WorkerExit::InputClosed,
                },
            };

            let Some(event) = self.process(&raw) else {
                continue;
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break WorkerExit::Cancelled,
                result = self.event_tx.send(event) => {
                    if result.is_err() {
                        break WorkerExit::OutputClosed;
                    }
                    self.stats.published.fetch_add(1, Ordering::Relaxed);
                    metrics::counter!(m::CLASSIFIER_EVENTS_PUBLISHED_TOTAL).increment(1);
                }
            }
        };

        info!(exit = ?exit, "classification worker stopped");
        (self.line_rx, exit)
    }

    /// 라인 하나를 처리합니다.
    ///
    /// 각 단계의 패닉은 라인 경계에서 포착되어 진단으로 보고됩니다.
    fn process(&self, raw: &RawLine) -> Option<ClassifiedEvent> {
        let started = Instant::now();
        self.stats.received.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(m::CLASSIFIER_LINES_RECEIVED_TOTAL).increment(1);

        let line = raw.as_str();
        let classifier = &*self.classifier;

        let envelope = match panic::catch_unwind(AssertUnwindSafe(|| classifier.extract(line))) {
            Ok(Some(envelope)) => envelope,
            Ok(None) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(m::CLASSIFIER_LINES_REJECTED_TOTAL).increment(1);
                self.diagnostics.record(Diagnostic::Unenveloped {
                    line: line.trim().to_owned(),
                });
                return None;
            }
            Err(payload) => {
                self.fault(ClassificationStage::Envelope, line, payload);
                return None;
            }
        };

        let category = match panic::catch_unwind(AssertUnwindSafe(|| {
            classifier.categorize(&envelope.payload)
        })) {
            Ok(category) => category,
            Err(payload) => {
                self.fault(ClassificationStage::Cascade, line, payload);
                return None;
            }
        };

        metrics::histogram!(m::CLASSIFIER_CLASSIFY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(m::CLASSIFIER_CATEGORY_EVENTS_TOTAL, m::LABEL_CATEGORY => category.as_str())
            .increment(1);
        debug!(category = %category, timestamp = %envelope.timestamp, "classified line");

        Some(ClassifiedEvent::new(envelope, category))
    }

    fn fault(&self, stage: ClassificationStage, line: &str, payload: Box<dyn Any + Send>) {
        self.stats.faults.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(m::CLASSIFIER_FAULTS_TOTAL, m::LABEL_STAGE => stage.as_str()).increment(1);
        self.diagnostics.record(Diagnostic::Fault {
            stage,
            line: line.to_owned(),
            reason: panic_message(payload.as_ref()),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::diagnostic::MemorySink;
    use eqalert_core::types::{Category, Envelope};
    use std::time::Duration;

    struct Setup {
        line_tx: mpsc::Sender<RawLine>,
        event_rx: mpsc::Receiver<ClassifiedEvent>,
        sink: Arc<MemorySink>,
        stats: Arc<PipelineStats>,
        worker: ClassificationWorker,
    }

    fn setup(classifier: Arc<dyn LineClassifier>) -> Setup {
        let (line_tx, line_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        let sink = Arc::new(MemorySink::new());
        let stats = Arc::new(PipelineStats::default());
        let worker = ClassificationWorker::new(
            classifier,
            line_rx,
            event_tx,
            sink.clone(),
            stats.clone(),
        );
        Setup {
            line_tx,
            event_rx,
            sink,
            stats,
            worker,
        }
    }

    struct PanickingCascade;

    impl LineClassifier for PanickingCascade {
        fn extract(&self, line: &str) -> Option<Envelope> {
            Some(Envelope {
                timestamp: "00:00:00.00".to_owned(),
                payload: line.to_owned(),
            })
        }

        fn categorize(&self, payload: &str) -> Category {
            if payload.contains("boom") {
                panic!("cascade blew up");
            }
            Category::Say
        }
    }

    #[tokio::test]
    async fn input_closed_ends_worker() {
        let s = setup(Arc::new(Classifier::new().unwrap()));
        s.line_tx
            .send(RawLine::from("[Fri Dec 01 12:34:56 2023] You are hungry."))
            .await
            .unwrap();
        drop(s.line_tx);

        let (_rx, exit) = tokio::time::timeout(
            Duration::from_secs(5),
            s.worker.run(CancellationToken::new()),
        )
        .await
        .unwrap();
        assert_eq!(exit, WorkerExit::InputClosed);

        let mut event_rx = s.event_rx;
        assert_eq!(event_rx.recv().await.unwrap().category, Category::YouHungry);
        assert_eq!(s.stats.snapshot().published, 1);
    }

    #[tokio::test]
    async fn panic_in_cascade_is_isolated() {
        let s = setup(Arc::new(PanickingCascade));
        for line in ["first", "boom", "third"] {
            s.line_tx.send(RawLine::from(line)).await.unwrap();
        }
        drop(s.line_tx);

        let (_rx, exit) = tokio::time::timeout(
            Duration::from_secs(5),
            s.worker.run(CancellationToken::new()),
        )
        .await
        .unwrap();
        assert_eq!(exit, WorkerExit::InputClosed);

        let mut event_rx = s.event_rx;
        assert_eq!(event_rx.recv().await.unwrap().payload, "first");
        assert_eq!(event_rx.recv().await.unwrap().payload, "third");

        let diagnostics = s.sink.snapshot();
        assert_eq!(diagnostics.len(), 1);
        match &diagnostics[0] {
            Diagnostic::Fault {
                stage,
                line,
                reason,
            } => {
                assert_eq!(*stage, ClassificationStage::Cascade);
                assert_eq!(line, "boom");
                assert_eq!(reason, "cascade blew up");
            }
            other => panic!("unexpected diagnostic: {other:?}"),
        }
        assert_eq!(s.stats.snapshot().faults, 1);
    }

    #[tokio::test]
    async fn output_closed_ends_worker() {
        let s = setup(Arc::new(Classifier::new().unwrap()));
        drop(s.event_rx);
        s.line_tx
            .send(RawLine::from("[Fri Dec 01 12:34:56 2023] You are hungry."))
            .await
            .unwrap();

        let (_rx, exit) = tokio::time::timeout(
            Duration::from_secs(5),
            s.worker.run(CancellationToken::new()),
        )
        .await
        .unwrap();
        assert_eq!(exit, WorkerExit::OutputClosed);
        assert_eq!(s.stats.snapshot().published, 0);
    }

    #[test]
    fn panic_message_variants() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
