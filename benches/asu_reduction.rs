use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use miller_symmetry::dataset::{Column, ColumnKind, ReflectionBatch};
use miller_symmetry::reflections::{hkl_to_asu, hkl_to_observed, MillerIndex};
use miller_symmetry::{AnomalousSuffixes, MergeState, SpaceGroup};

// Every index in [-n, n]³ except the origin
fn index_box(n: i32) -> Vec<MillerIndex> {
    let mut hkls = Vec::new();
    for h in -n..=n {
        for k in -n..=n {
            for l in -n..=n {
                if [h, k, l] != [0, 0, 0] {
                    hkls.push([h, k, l]);
                }
            }
        }
    }
    hkls
}

/// ASU reduction and expansion throughput for a few representative groups
fn bench_asu_reduction(c: &mut Criterion) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();

    let hkls = index_box(12);
    let mut group = c.benchmark_group("asu_reduction");

    for name in ["P 1", "P 21 21 21", "P 43 21 2", "P 2 3"] {
        let sg = SpaceGroup::from_name(name).unwrap();
        group.bench_with_input(BenchmarkId::new("hkl_to_asu", name), &hkls, |b, hkls| {
            b.iter(|| hkl_to_asu(black_box(hkls), &sg))
        });

        let reduced = hkl_to_asu(&hkls, &sg).unwrap();
        group.bench_with_input(BenchmarkId::new("hkl_to_observed", name), &reduced, |b, m| {
            b.iter(|| hkl_to_observed(black_box(&m.hkls), black_box(&m.isym), &sg))
        });
    }

    group.finish();
}

/// Merged Friedel unstacking on a P1 table with one amplitude and one phase column
fn bench_unstack_anomalous(c: &mut Criterion) {
    let hkls = index_box(10);
    let n = hkls.len();
    let batch = ReflectionBatch::new(hkls)
        .with_column(Column::float("F", ColumnKind::Amplitude, vec![1.0; n]).unwrap())
        .unwrap()
        .with_column(Column::float("PHIF", ColumnKind::Phase, vec![45.0; n]).unwrap())
        .unwrap();
    let sg = SpaceGroup::from_name("P 1").unwrap();
    let suffixes = AnomalousSuffixes::default();

    c.bench_function("unstack_anomalous_p1", |b| {
        b.iter(|| {
            miller_symmetry::dataset::unstack_anomalous(
                black_box(&batch),
                &sg,
                MergeState::Merged,
                None,
                &suffixes,
            )
        })
    });
}

criterion_group!(benches, bench_asu_reduction, bench_unstack_anomalous);
criterion_main!(benches);
