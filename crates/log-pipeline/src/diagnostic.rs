//! 진단 싱크 -- 엔벨로프 불일치와 내부 장애를 외부로 보고
//!
//! 파이프라인은 전역 로거 대신 주입된 [`DiagnosticSink`]로 진단을 보냅니다.
//! 싱크는 단방향이며 파이프라인을 블로킹하지 않아야 합니다.
//!
//! - [`TracingSink`]: `tracing` 이벤트로 기록 (기본값)
//! - [`ChannelSink`]: 유한 채널로 전달, 가득 차면 드롭 후 카운트
//! - [`MemorySink`]: 메모리에 누적 (단발성 분류, 테스트)

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info};

use eqalert_core::metrics as m;

/// 장애가 발생한 처리 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStage {
    /// 엔벨로프 추출
    Envelope,
    /// 카테고리 결정
    Cascade,
}

impl ClassificationStage {
    /// 단계 이름을 반환합니다.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Envelope => "envelope",
            Self::Cascade => "cascade",
        }
    }
}

impl fmt::Display for ClassificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사람이 읽을 수 있는 진단 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 엔벨로프 형식이 아니어서 버린 라인
    Unenveloped {
        /// 원본 라인 (앞뒤 공백 제거)
        line: String,
    },
    /// 라인 처리 중 포착된 내부 장애
    Fault {
        /// 장애 단계
        stage: ClassificationStage,
        /// 원본 라인
        line: String,
        /// 장애 사유 (패닉 메시지)
        reason: String,
    },
}

impl Diagnostic {
    /// 원본 라인을 반환합니다.
    pub fn line(&self) -> &str {
        match self {
            Self::Unenveloped { line } | Self::Fault { line, .. } => line,
        }
    }

    /// 내부 장애인지 확인합니다.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unenveloped { line } => write!(f, "cannot process: {line}"),
            Self::Fault {
                stage,
                line,
                reason,
            } => write!(f, "error in {stage} stage: {reason}: {line}"),
        }
    }
}

/// 진단 싱크 trait
///
/// `record`는 워커 루프에서 직접 호출되므로 블로킹하면 안 됩니다.
pub trait DiagnosticSink: Send + Sync {
    /// 진단을 기록합니다.
    fn record(&self, diagnostic: Diagnostic);
}

/// `tracing`으로 기록하는 싱크
///
/// 엔벨로프 불일치는 `info`, 내부 장애는 `error` 레벨입니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::Unenveloped { line } => {
                info!(line = %line, "{diagnostic}");
            }
            Diagnostic::Fault {
                stage,
                line,
                reason,
            } => {
                error!(stage = %stage, line = %line, reason = %reason, "line classification fault");
            }
        }
    }
}

/// 유한 채널로 전달하는 싱크
///
/// 수신 측이 느리면 `try_send`가 실패하고 진단은 드롭됩니다.
pub struct ChannelSink {
    tx: mpsc::Sender<Diagnostic>,
    dropped: AtomicU64,
}

impl ChannelSink {
    /// 주어진 용량의 채널과 함께 싱크를 생성합니다.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Diagnostic>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::from_sender(tx), rx)
    }

    /// 외부 송신 채널로 싱크를 생성합니다.
    pub fn from_sender(tx: mpsc::Sender<Diagnostic>) -> Self {
        Self {
            tx,
            dropped: AtomicU64::new(0),
        }
    }

    /// 드롭된 진단 수를 반환합니다.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for ChannelSink {
    fn record(&self, diagnostic: Diagnostic) {
        if self.tx.try_send(diagnostic).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            metrics::counter!(m::CLASSIFIER_DIAGNOSTICS_DROPPED_TOTAL).increment(1);
        }
    }
}

/// 메모리에 누적하는 싱크
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// 빈 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 진단의 복사본을 반환합니다.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 기록된 진단 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// 기록된 진단이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unenveloped(line: &str) -> Diagnostic {
        Diagnostic::Unenveloped {
            line: line.to_owned(),
        }
    }

    #[test]
    fn unenveloped_display_uses_cannot_process_wording() {
        assert_eq!(
            unenveloped("Logging to 'eqlog.txt' is now *ON*.").to_string(),
            "cannot process: Logging to 'eqlog.txt' is now *ON*."
        );
    }

    #[test]
    fn fault_display_names_the_stage() {
        let diagnostic = Diagnostic::Fault {
            stage: ClassificationStage::Cascade,
            line: "[Fri Dec 01 12:34:56 2023] boom".to_owned(),
            reason: "regex exploded".to_owned(),
        };
        let msg = diagnostic.to_string();
        assert!(msg.contains("cascade"));
        assert!(msg.contains("regex exploded"));
        assert!(msg.contains("boom"));
        assert!(diagnostic.is_fault());
    }

    #[test]
    fn diagnostic_serializes_with_kind_tag() {
        let diagnostic = Diagnostic::Fault {
            stage: ClassificationStage::Envelope,
            line: "x".to_owned(),
            reason: "y".to_owned(),
        };
        let value = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(value["kind"], "fault");
        assert_eq!(value["stage"], "envelope");
    }

    #[test]
    fn memory_sink_accumulates() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.record(unenveloped("a"));
        sink.record(unenveloped("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.snapshot()[1].line(), "b");
    }

    #[tokio::test]
    async fn channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new(4);
        sink.record(unenveloped("hello"));
        assert_eq!(rx.recv().await.unwrap().line(), "hello");
        assert_eq!(sink.dropped_count(), 0);
    }

    #[test]
    fn channel_sink_drops_when_full() {
        let (sink, _rx) = ChannelSink::new(1);
        sink.record(unenveloped("1"));
        sink.record(unenveloped("2"));
        sink.record(unenveloped("3"));
        assert_eq!(sink.dropped_count(), 2);
    }

    #[test]
    fn channel_sink_counts_closed_receiver_as_drop() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        sink.record(unenveloped("lost"));
        assert_eq!(sink.dropped_count(), 1);
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.record(unenveloped("banner"));
        TracingSink.record(Diagnostic::Fault {
            stage: ClassificationStage::Envelope,
            line: "x".to_owned(),
            reason: "y".to_owned(),
        });
    }
}
