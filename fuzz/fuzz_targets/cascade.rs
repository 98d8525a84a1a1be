#![no_main]

use std::sync::OnceLock;

use eqalert_log_pipeline::Cascade;
use libfuzzer_sys::fuzz_target;

static CASCADE: OnceLock<Cascade> = OnceLock::new();

fuzz_target!(|payload: &str| {
    let cascade = CASCADE.get_or_init(|| Cascade::new().expect("builtin tables compile"));

    // 모든 문자열에 대해 정의되고 결정적이어야 한다
    let first = cascade.classify(payload);
    assert_eq!(first, cascade.classify(payload));
    if let Some(m) = cascade.explain(payload) {
        assert_eq!(m.category, first);
    }
});
