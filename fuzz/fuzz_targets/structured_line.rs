#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use eqalert_log_pipeline::Classifier;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 퍼저용 구조적 입력 -- 항상 유효한 엔벨로프를 만든다
#[derive(Arbitrary, Debug)]
struct FuzzLine {
    weekday: u8,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    year: u16,
    payload: String,
}

fuzz_target!(|input: FuzzLine| {
    let payload = input.payload.trim();
    // 엔벨로프는 한 물리 라인만 다룬다
    if payload.is_empty() || payload.contains('\n') {
        return;
    }

    let line = format!(
        "[{} {} {:02} {:02}:{:02}:{:02} {:04}] {}",
        WEEKDAYS[usize::from(input.weekday) % WEEKDAYS.len()],
        MONTHS[usize::from(input.month) % MONTHS.len()],
        input.day % 100,
        input.hour % 100,
        input.minute % 100,
        input.second % 100,
        input.year % 10000,
        payload,
    );

    let classifier = Classifier::new().expect("builtin tables compile");
    let event = classifier
        .classify_line(&line)
        .expect("well-formed envelope must be accepted");
    assert_eq!(event.payload, payload);
    assert!(event.timestamp.ends_with(".00"));
});
