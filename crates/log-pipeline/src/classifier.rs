//! 기본 라인 분류기 -- 엔벨로프 추출기와 캐스케이드의 조합

use std::sync::Arc;

use eqalert_core::event::ClassifiedEvent;
use eqalert_core::pipeline::LineClassifier;
use eqalert_core::types::{Category, Envelope};

use crate::envelope::EnvelopeExtractor;
use crate::error::LogPipelineError;
use crate::rule::{Cascade, RuleMatch};

/// 내장 규칙 테이블을 사용하는 분류기
///
/// 캐스케이드는 `Arc`로 공유되므로 복제 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct Classifier {
    extractor: EnvelopeExtractor,
    cascade: Arc<Cascade>,
}

impl Classifier {
    /// 내장 규칙으로 분류기를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Self::with_cascade(Arc::new(Cascade::new()?))
    }

    /// 이미 컴파일된 캐스케이드로 분류기를 생성합니다.
    pub fn with_cascade(cascade: Arc<Cascade>) -> Result<Self, LogPipelineError> {
        Ok(Self {
            extractor: EnvelopeExtractor::new()?,
            cascade,
        })
    }

    /// 공유 캐스케이드를 반환합니다.
    pub fn cascade(&self) -> &Arc<Cascade> {
        &self.cascade
    }

    /// 한 줄을 끝까지 분류합니다. 엔벨로프가 없으면 `None`입니다.
    pub fn classify_line(&self, line: &str) -> Option<ClassifiedEvent> {
        let envelope = self.extract(line)?;
        let category = self.categorize(&envelope.payload);
        Some(ClassifiedEvent::new(envelope, category))
    }

    /// 페이로드에 매칭된 규칙 위치를 반환합니다.
    pub fn explain(&self, payload: &str) -> Option<RuleMatch> {
        self.cascade.explain(payload)
    }
}

impl LineClassifier for Classifier {
    fn extract(&self, line: &str) -> Option<Envelope> {
        self.extractor.extract(line)
    }

    fn categorize(&self, payload: &str) -> Category {
        self.cascade.classify(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_line_end_to_end() {
        let classifier = Classifier::new().unwrap();
        let event = classifier
            .classify_line("[Fri Dec 01 12:34:56 2023] You have entered Blackburrow.")
            .unwrap();
        assert_eq!(event.timestamp, "12:34:56.00");
        assert_eq!(event.category, Category::YouNewZone);
        assert_eq!(event.payload, "You have entered Blackburrow.");
    }

    #[test]
    fn classify_line_without_envelope() {
        let classifier = Classifier::new().unwrap();
        assert!(classifier.classify_line("Welcome to level 10!").is_none());
    }

    #[test]
    fn clones_share_the_cascade() {
        let classifier = Classifier::new().unwrap();
        let clone = classifier.clone();
        assert!(Arc::ptr_eq(classifier.cascade(), clone.cascade()));
    }
}
