//! Criterion benchmarks for whole-event generation, per process and mixed.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mbr_bench::{legacy_profile, tevatron_profile};
use mbr_core::ProcessKind;
use mbr_engine::{generate_batch, EventGenerator, GenerationStats};
use mbr_test_utils::seeded;

fn bench_per_process(c: &mut Criterion) {
    let generator = EventGenerator::new(tevatron_profile(1)).unwrap();
    let mut group = c.benchmark_group("event_by_process");
    for kind in ProcessKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            let mut rng = seeded(7);
            let mut stats = GenerationStats::default();
            b.iter(|| black_box(generator.generate_process(kind, &mut rng, &mut stats)));
        });
    }
    group.finish();
}

fn bench_mixture(c: &mut Criterion) {
    for (name, config) in [("mixture_renormalized", tevatron_profile(1)), ("mixture_legacy", legacy_profile(1))] {
        let generator = EventGenerator::new(config).unwrap();
        c.bench_function(name, |b| {
            let mut rng = seeded(11);
            let mut stats = GenerationStats::default();
            b.iter(|| black_box(generator.next_event(&mut rng, &mut stats)));
        });
    }
}

fn bench_batch(c: &mut Criterion) {
    let generator = EventGenerator::new(tevatron_profile(1)).unwrap();
    let mut group = c.benchmark_group("batch_1000");
    group.sample_size(10);
    for workers in [1, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| black_box(generate_batch(&generator, 3, workers, 1_000)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_per_process, bench_mixture, bench_batch);
criterion_main!(benches);
