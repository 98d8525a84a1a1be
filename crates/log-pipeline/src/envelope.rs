//! 엔벨로프 추출기 -- 타임스탬프 접두어 검증 및 페이로드 분리
//!
//! 로그 라인 형식:
//! ```text
//! [Fri Dec 01 12:34:56 2023] You have entered Blackburrow.
//! ```
//! 요일/월은 영어 3글자 약어, 일은 두 자리, 연도는 네 자리입니다.
//! 타임스탬프는 `HH:MM:SS`에 고정 접미어 `.00`을 붙여 반환합니다.

use regex::Regex;

use eqalert_core::types::Envelope;

use crate::error::LogPipelineError;

const ENVELOPE_PATTERN: &str = r"^\[(?:Fri|Mon|S(?:at|un)|T(?:hu|ue)|Wed) (?:A(?:pr|ug)|Dec|Feb|J(?:an|u[ln])|Ma[ry]|Nov|Oct|Sep) [0-9]{2} ([0-9]{2}:[0-9]{2}:[0-9]{2}) [0-9]{4}\] (.+)$";

/// 타임스탬프 소수부 접미어
pub const TIMESTAMP_SUFFIX: &str = ".00";

/// 엔벨로프 추출기
///
/// 정규식은 생성 시 한 번만 컴파일합니다.
#[derive(Debug, Clone)]
pub struct EnvelopeExtractor {
    regex: Regex,
}

impl EnvelopeExtractor {
    /// 새 추출기를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            regex: Regex::new(ENVELOPE_PATTERN)?,
        })
    }

    /// 라인에서 엔벨로프를 추출합니다.
    ///
    /// 앞뒤 공백은 매칭 전에 제거합니다. 형식이 맞지 않으면 `None`입니다
    /// (배너, 빈 줄, 줄바꿈된 라인 등 정상적인 입력입니다).
    pub fn extract(&self, line: &str) -> Option<Envelope> {
        let caps = self.regex.captures(line.trim())?;
        let time = caps.get(1)?.as_str();
        let payload = caps.get(2)?.as_str();
        Some(Envelope {
            timestamp: format!("{time}{TIMESTAMP_SUFFIX}"),
            payload: payload.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EnvelopeExtractor {
        EnvelopeExtractor::new().unwrap()
    }

    #[test]
    fn extracts_timestamp_and_payload() {
        let envelope = extractor()
            .extract("[Fri Dec 01 12:34:56 2023] You have entered Blackburrow.")
            .unwrap();
        assert_eq!(envelope.timestamp, "12:34:56.00");
        assert_eq!(envelope.payload, "You have entered Blackburrow.");
    }

    #[test]
    fn missing_bracket_fails() {
        assert!(extractor().extract("Dec 01 12:34:56 2023] hi").is_none());
    }

    #[test]
    fn empty_and_blank_lines_fail() {
        assert!(extractor().extract("").is_none());
        assert!(extractor().extract("   \t").is_none());
    }

    #[test]
    fn empty_payload_fails() {
        assert!(extractor().extract("[Mon Jan 02 03:04:05 2023] ").is_none());
        assert!(extractor().extract("[Mon Jan 02 03:04:05 2023]").is_none());
    }

    #[test]
    fn unknown_weekday_or_month_fails() {
        assert!(
            extractor()
                .extract("[Fry Dec 01 12:34:56 2023] hi")
                .is_none()
        );
        assert!(
            extractor()
                .extract("[Fri Dez 01 12:34:56 2023] hi")
                .is_none()
        );
        assert!(
            extractor()
                .extract("[fri dec 01 12:34:56 2023] hi")
                .is_none()
        );
    }

    #[test]
    fn single_digit_day_fails() {
        assert!(extractor().extract("[Fri Dec 1 12:34:56 2023] hi").is_none());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let envelope = extractor()
            .extract("  [Sat Jul 15 23:59:59 2023] You are hungry.\r\n")
            .unwrap();
        assert_eq!(envelope.timestamp, "23:59:59.00");
        assert_eq!(envelope.payload, "You are hungry.");
    }

    #[test]
    fn payload_keeps_inner_brackets() {
        let envelope = extractor()
            .extract("[Thu Mar 09 01:02:03 2023] [ANONYMOUS] Someone  <Guild>")
            .unwrap();
        assert_eq!(envelope.payload, "[ANONYMOUS] Someone  <Guild>");
    }

    #[test]
    fn all_weekdays_and_months_accepted() {
        let extractor = extractor();
        for day in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
            for month in [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ] {
                let line = format!("[{day} {month} 01 00:00:00 2024] x");
                assert!(extractor.extract(&line).is_some(), "{line}");
            }
        }
    }
}
