//! 분류 이벤트 -- 파이프라인이 다운스트림에 발행하는 메시지
//!
//! [`ClassifiedEvent`]는 엔벨로프와 카테고리를 묶은 구조체이며,
//! 다운스트림 소비자(알림, 상태 추적)와의 와이어 형식이기도 합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Category, Envelope};

/// 예약 필드 값
///
/// 분류 파이프라인은 예약 필드에 항상 이 값을 기록합니다.
pub const RESERVED_SENTINEL: &str = "null";

/// 분류된 이벤트
///
/// JSON 필드 순서는 `timestamp`, `category`, `payload`, `reserved1`, `reserved2`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// `HH:MM:SS.00` 타임스탬프
    pub timestamp: String,
    /// 결정된 카테고리
    pub category: Category,
    /// 원본 페이로드
    pub payload: String,
    /// 예약 필드 (항상 `"null"`)
    pub reserved1: String,
    /// 예약 필드 (항상 `"null"`)
    pub reserved2: String,
}

impl ClassifiedEvent {
    /// 엔벨로프와 카테고리로 이벤트를 생성합니다.
    pub fn new(envelope: Envelope, category: Category) -> Self {
        Self {
            timestamp: envelope.timestamp,
            category,
            payload: envelope.payload,
            reserved1: RESERVED_SENTINEL.to_owned(),
            reserved2: RESERVED_SENTINEL.to_owned(),
        }
    }

    /// 한 줄 JSON으로 직렬화합니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ClassifiedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.category, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassifiedEvent {
        ClassifiedEvent::new(
            Envelope {
                timestamp: "12:34:56.00".to_owned(),
                payload: "You have entered Blackburrow.".to_owned(),
            },
            Category::YouNewZone,
        )
    }

    #[test]
    fn reserved_fields_carry_sentinel() {
        let event = sample();
        assert_eq!(event.reserved1, RESERVED_SENTINEL);
        assert_eq!(event.reserved2, RESERVED_SENTINEL);
    }

    #[test]
    fn json_shape_and_field_order() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"12:34:56.00","category":"you_new_zone","payload":"You have entered Blackburrow.","reserved1":"null","reserved2":"null"}"#
        );
    }

    #[test]
    fn json_escapes_payload_quotes() {
        let event = ClassifiedEvent::new(
            Envelope {
                timestamp: "01:02:03.00".to_owned(),
                payload: r#"Soandso says, "hi""#.to_owned(),
            },
            Category::Undetermined,
        );
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["payload"], r#"Soandso says, "hi""#);
        assert_eq!(value["category"], "undetermined");
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(
            sample().to_string(),
            "[12:34:56.00] you_new_zone: You have entered Blackburrow."
        );
    }
}
