//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 분류 파이프라인은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `eqalert_`
//! - 모듈명: `classifier_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(eqalert_core::metrics::CLASSIFIER_LINES_RECEIVED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 카테고리 레이블 키 (와이어 태그)
pub const LABEL_CATEGORY: &str = "category";

/// 처리 단계 레이블 키 (envelope, cascade)
pub const LABEL_STAGE: &str = "stage";

// ─── Classifier 메트릭 ─────────────────────────────────────────────

/// Classifier: 수신한 라인 수 (counter)
pub const CLASSIFIER_LINES_RECEIVED_TOTAL: &str = "eqalert_classifier_lines_received_total";

/// Classifier: 발행한 이벤트 수 (counter)
pub const CLASSIFIER_EVENTS_PUBLISHED_TOTAL: &str = "eqalert_classifier_events_published_total";

/// Classifier: 엔벨로프가 없어 버린 라인 수 (counter)
pub const CLASSIFIER_LINES_REJECTED_TOTAL: &str = "eqalert_classifier_lines_rejected_total";

/// Classifier: 라인 처리 중 포착된 내부 장애 수 (counter, label: stage)
pub const CLASSIFIER_FAULTS_TOTAL: &str = "eqalert_classifier_faults_total";

/// Classifier: 카테고리별 이벤트 수 (counter, label: category)
pub const CLASSIFIER_CATEGORY_EVENTS_TOTAL: &str = "eqalert_classifier_category_events_total";

/// Classifier: 버퍼가 가득 차 드롭된 진단 메시지 수 (counter)
pub const CLASSIFIER_DIAGNOSTICS_DROPPED_TOTAL: &str =
    "eqalert_classifier_diagnostics_dropped_total";

/// Classifier: 라인 하나의 분류 소요 시간 (histogram, 초)
pub const CLASSIFIER_CLASSIFY_DURATION_SECONDS: &str =
    "eqalert_classifier_classify_duration_seconds";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 분류 소요 시간 히스토그램 버킷 (초)
///
/// 1us ~ 10ms 범위. 캐스케이드 전체 순회도 밀리초 미만입니다.
pub const CLASSIFY_DURATION_BUCKETS: [f64; 8] = [
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.01,
];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        CLASSIFIER_LINES_RECEIVED_TOTAL,
        "Total number of raw log lines taken off the inbound queue"
    );
    describe_counter!(
        CLASSIFIER_EVENTS_PUBLISHED_TOTAL,
        "Total number of classified events published downstream"
    );
    describe_counter!(
        CLASSIFIER_LINES_REJECTED_TOTAL,
        "Total number of lines dropped because they had no timestamp envelope"
    );
    describe_counter!(
        CLASSIFIER_FAULTS_TOTAL,
        "Total number of internal faults caught at the line boundary, by stage"
    );
    describe_counter!(
        CLASSIFIER_CATEGORY_EVENTS_TOTAL,
        "Classified events per category tag"
    );
    describe_counter!(
        CLASSIFIER_DIAGNOSTICS_DROPPED_TOTAL,
        "Diagnostics discarded because the diagnostic buffer was full"
    );
    describe_histogram!(
        CLASSIFIER_CLASSIFY_DURATION_SECONDS,
        "Time to extract and classify a single line in seconds"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        CLASSIFIER_LINES_RECEIVED_TOTAL,
        CLASSIFIER_EVENTS_PUBLISHED_TOTAL,
        CLASSIFIER_LINES_REJECTED_TOTAL,
        CLASSIFIER_FAULTS_TOTAL,
        CLASSIFIER_CATEGORY_EVENTS_TOTAL,
        CLASSIFIER_DIAGNOSTICS_DROPPED_TOTAL,
        CLASSIFIER_CLASSIFY_DURATION_SECONDS,
    ];

    #[test]
    fn all_metrics_start_with_eqalert_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("eqalert_classifier_"),
                "Metric '{}' does not start with 'eqalert_classifier_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in ALL_METRIC_NAMES
            .iter()
            .filter(|n| **n != CLASSIFIER_CLASSIFY_DURATION_SECONDS)
        {
            assert!(name.ends_with("_total"), "counter '{}' lacks _total", name);
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        // 레코더 없이 호출해도 패닉하지 않아야 함
        describe_all();
    }

    #[test]
    fn classify_duration_buckets_are_sorted() {
        let buckets = CLASSIFY_DURATION_BUCKETS;
        for i in 1..buckets.len() {
            assert!(
                buckets[i] > buckets[i - 1],
                "Bucket values must be in ascending order"
            );
        }
    }
}
