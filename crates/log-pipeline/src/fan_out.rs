//! 이벤트 팬아웃 -- 하나의 이벤트 스트림을 여러 소비자에게 복제
//!
//! 각 소비자는 같은 순서로 모든 이벤트를 받습니다. 느린 소비자는
//! 백프레셔로 전체 스트림을 늦춥니다. 수신 측을 닫은 소비자는 목록에서 제외됩니다.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use eqalert_core::event::ClassifiedEvent;

/// 팬아웃 태스크를 시작합니다.
///
/// 입력이 닫히거나, 남은 소비자가 없거나, 취소되면 종료하며
/// 전달한 이벤트 수를 반환합니다.
pub fn spawn_fan_out(
    mut events: mpsc::Receiver<ClassifiedEvent>,
    mut outputs: Vec<mpsc::Sender<ClassifiedEvent>>,
    cancel: CancellationToken,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut forwarded = 0u64;

        while !outputs.is_empty() {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            let mut closed = Vec::new();
            for (idx, tx) in outputs.iter().enumerate() {
                if tx.send(event.clone()).await.is_err() {
                    closed.push(idx);
                }
            }
            for idx in closed.into_iter().rev() {
                outputs.swap_remove(idx);
                tracing::debug!(remaining = outputs.len(), "fan-out consumer closed");
            }
            forwarded += 1;
        }

        forwarded
    })
}
