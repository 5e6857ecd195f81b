//! Benchmarks for rule-base construction and single inference calls

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sugeno_engine::presets::{self, INDICATOR_TRAINING};

fn bench_rule_base_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_base_build");

    group.bench_function("production_planning", |b| {
        b.iter(|| presets::production_planning().unwrap())
    });
    group.bench_function("indicator_weighted_243", |b| {
        b.iter(|| presets::indicator_scoring_weighted().unwrap())
    });
    group.bench_function("indicator_lookup_243", |b| {
        b.iter(|| presets::indicator_scoring(presets::bundled_consequents().unwrap()).unwrap())
    });

    group.finish();
}

fn bench_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference");

    let production = presets::production_planning().unwrap();
    group.bench_function("production_score", |b| {
        b.iter(|| production.score(black_box(&[1170.0, 678.5])).unwrap())
    });

    let indicators = presets::indicator_scoring(presets::bundled_consequents().unwrap()).unwrap();
    let inputs: Vec<[f64; 5]> = INDICATOR_TRAINING
        .iter()
        .map(|row| [row[0], row[1], row[2], row[3], row[4]])
        .collect();

    group.bench_function("indicator_score_training_set", |b| {
        b.iter(|| {
            for row in &inputs {
                black_box(indicators.score(black_box(row)).unwrap());
            }
        })
    });
    group.bench_function("indicator_infer_with_trace", |b| {
        b.iter(|| indicators.infer(black_box(&inputs[0])).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_rule_base_build, bench_inference);
criterion_main!(benches);
