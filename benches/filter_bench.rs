//! Filter 벤치마크
//!
//! 환경 변수 크기와 패턴 수에 따른 필터링 성능 측정

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use envprops::FilterBuilder;

fn environment(size: usize) -> Vec<(String, String)> {
    (0..size)
        .map(|i| {
            let key = match i % 4 {
                0 => format!("KAFKA_SETTING_NUMBER_{}", i),
                1 => format!("APP_FEATURE_{}_ENABLED", i),
                2 => format!("SYSTEM_VAR_{}", i),
                _ => format!("UNRELATED{}", i),
            };
            (key, format!("value-{}", i))
        })
        .collect()
}

fn benchmark_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [16usize, 128, 1024] {
        let filter = FilterBuilder::with_environment(environment(size))
            .pattern("^KAFKA_(.+)$")
            .unwrap()
            .pattern("^APP_(.+)_ENABLED$")
            .unwrap()
            .build();

        group.bench_with_input(BenchmarkId::new("two_patterns", size), &filter, |b, f| {
            b.iter(|| f.filter().unwrap())
        });
    }

    let filter = FilterBuilder::with_environment(environment(128))
        .pattern("^KAFKA_(.+)$")
        .unwrap()
        .lower_case_key(false)
        .clear_key_replacements()
        .build();

    group.bench_with_input(BenchmarkId::new("no_transform", 128), &filter, |b, f| {
        b.iter(|| f.filter().unwrap())
    });

    group.finish();
}

criterion_group!(benches, benchmark_filter);
criterion_main!(benches);
