#![no_main]

use eqalert_log_pipeline::EnvelopeExtractor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let extractor = EnvelopeExtractor::new().expect("envelope pattern compiles");

    // 패닉 없이 Some 또는 None, Some이면 페이로드는 비어 있지 않아야 한다
    if let Some(envelope) = extractor.extract(line) {
        assert!(!envelope.payload.is_empty());
        assert_eq!(envelope.timestamp.len(), "HH:MM:SS.00".len());
    }
});
