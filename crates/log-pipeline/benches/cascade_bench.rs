//! 분류 캐스케이드 벤치마크
//!
//! 그룹 우선순위 위치별 분류 비용과 전체 라인 처리 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use eqalert_log_pipeline::{Cascade, Classifier};

const PAYLOADS: &[(&str, &str)] = &[
    ("melee", "Tanar'Ri hits you for 25 points of damage."),
    ("spell", "You begin casting Fireball."),
    ("received_chat", "Grimlock tells you, 'need a port?'"),
    ("system_message", "Welcome to level 10!"),
    ("who", "There are 42 players in East Commonlands."),
    ("pet", "a wolf says, 'Following you, Master.'"),
    ("undetermined", "asdkjasd random unmatched text 123"),
];

fn bench_cascade_classify(c: &mut Criterion) {
    let cascade = Cascade::new().expect("builtin tables compile");
    let mut group = c.benchmark_group("cascade_classify");

    for (name, payload) in PAYLOADS {
        group.bench_with_input(BenchmarkId::from_parameter(name), payload, |b, payload| {
            b.iter(|| cascade.classify(black_box(payload)));
        });
    }

    group.finish();
}

fn bench_classify_line_throughput(c: &mut Criterion) {
    let classifier = Classifier::new().expect("builtin tables compile");
    let lines: Vec<String> = PAYLOADS
        .iter()
        .cycle()
        .take(1000)
        .map(|(_, p)| format!("[Fri Dec 01 12:34:56 2023] {p}"))
        .collect();

    let mut group = c.benchmark_group("classify_line");
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("mixed_1000", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(classifier.classify_line(black_box(line)));
            }
        });
    });
    group.finish();
}

fn bench_cascade_compile(c: &mut Criterion) {
    c.bench_function("cascade_compile", |b| {
        b.iter(|| Cascade::new().expect("builtin tables compile"));
    });
}

criterion_group!(
    benches,
    bench_cascade_classify,
    bench_classify_line_throughput,
    bench_cascade_compile
);
criterion_main!(benches);
