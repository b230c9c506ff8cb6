//! Criterion benchmarks for configuration validation and table setup.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mbr_bench::{legacy_profile, tevatron_profile};
use mbr_engine::EventGenerator;
use mbr_xsec::CrossSectionModel;

fn bench_tables(c: &mut Criterion) {
    let renormalized = tevatron_profile(1);
    let legacy = legacy_profile(1);
    c.bench_function("table_renormalized", |b| {
        b.iter(|| black_box(CrossSectionModel::initialize(&renormalized)))
    });
    c.bench_function("table_legacy", |b| b.iter(|| black_box(CrossSectionModel::initialize(&legacy))));
    c.bench_function("generator_new", |b| {
        b.iter(|| black_box(EventGenerator::new(renormalized.clone())))
    });
}

criterion_group!(benches, bench_tables);
criterion_main!(benches);
