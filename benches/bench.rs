// Criterion benchmarks for KK360 API

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kk360_api::core::match_availability;

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn week_slots(count: usize, step: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}-{:02}:00", DAYS[(i * step) % DAYS.len()], 6 + (i * step) % 16))
        .collect()
}

fn bench_typical_week(c: &mut Criterion) {
    let tutor = week_slots(20, 1);
    let student = week_slots(10, 3);
    let subjects = vec!["Math".to_string(), "Physics".to_string(), "Chemistry".to_string()];

    c.bench_function("match_availability_week", |b| {
        b.iter(|| match_availability(black_box(&tutor), black_box(&student), black_box(&subjects)))
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_availability_scaling");
    let subjects = vec!["Math".to_string(), "Biology".to_string()];

    for size in [10, 100, 1000, 10000].iter() {
        let tutor = week_slots(*size, 1);
        let student = week_slots(*size / 2, 2);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| match_availability(black_box(&tutor), black_box(&student), black_box(&subjects)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_typical_week, bench_scaling);
criterion_main!(benches);
