//! Range-set merge benchmarks.
//!
//! Measures:
//! - Union / intersection cost of each merge strategy for balanced and
//!   lopsided operand sizes
//! - Compression and decompression of region boundaries
//! - Circle rasterization at increasing orders

use celestial_region::{Geometry, MergeStrategy, RangeSet, SetOperation};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Test Data Generation
// ============================================================================

/// `n` intervals of width `width` spaced `stride` apart, starting at `offset`.
fn generate_set(n: u64, stride: u64, width: u64, offset: u64) -> RangeSet {
    let mut set = RangeSet::with_capacity(n as usize);
    for i in 0..n {
        let a = offset + i * stride;
        set.append(a, a + width).unwrap();
    }
    set
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_merge_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_strategies");

    let big = generate_set(100_000, 100, 40, 0);
    for small_n in [10u64, 1_000, 100_000] {
        let stride = 10_000_000 / small_n;
        let small = generate_set(small_n, stride, stride / 3, 17);
        group.throughput(Throughput::Elements(small_n + 100_000));

        for strategy in [
            MergeStrategy::Sweep,
            MergeStrategy::SearchFirst,
            MergeStrategy::SearchSecond,
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("union_{:?}", strategy), small_n),
                &small,
                |b, small| {
                    b.iter(|| {
                        black_box(big.combine_with(small, SetOperation::Union, strategy).nranges())
                    });
                },
            );
        }

        group.bench_with_input(
            BenchmarkId::new("union_selected", small_n),
            &small,
            |b, small| b.iter(|| black_box(big.union(small).nranges())),
        );
        group.bench_with_input(
            BenchmarkId::new("intersection_selected", small_n),
            &small,
            |b, small| b.iter(|| black_box(big.intersection(small).nranges())),
        );
        group.bench_with_input(
            BenchmarkId::new("overlaps_selected", small_n),
            &small,
            |b, small| b.iter(|| black_box(big.overlaps(small))),
        );
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for n in [100u64, 10_000, 1_000_000] {
        let set = generate_set(n, 1 << 20, 1 << 12, 1 << 30);
        let compressed = set.to_compressed();
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("compress", n), &set, |b, set| {
            b.iter(|| black_box(set.to_compressed().len()))
        });
        group.bench_with_input(
            BenchmarkId::new("decompress", n),
            &compressed,
            |b, data| b.iter(|| black_box(RangeSet::from_compressed(data).unwrap().nranges())),
        );
    }

    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize_circle");
    let circle = Geometry::circle(83.633, 22.014, 2.0).unwrap();

    for order in [6u8, 9, 12] {
        group.bench_with_input(BenchmarkId::new("to_region", order), &order, |b, &order| {
            b.iter(|| black_box(circle.to_region(order).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge_strategies, bench_codec, bench_rasterize);
criterion_main!(benches);
