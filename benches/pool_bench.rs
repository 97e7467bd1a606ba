//! Benchmarks for pool byte extraction.
//!
//! Measures single-byte consume throughput under the default compaction
//! policy and the extremes (never / every byte), plus block fills.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sha256rng::{Compaction, HashAlgorithm, Pool, PoolConfig};

const STREAM_BYTES: u64 = 64 * 1024;

fn seeded_pool(config: PoolConfig) -> Pool {
    let mut pool = Pool::new(config);
    pool.pool_str("benchmark").unwrap();
    pool
}

/// Byte-at-a-time consumption across compaction policies.
fn bench_consume(c: &mut Criterion) {
    let mut group = c.benchmark_group("consume");
    group.throughput(Throughput::Bytes(STREAM_BYTES));

    let policies = [
        ("half", Compaction::HALF),
        ("every_byte", Compaction::Offset(0)),
        ("never", Compaction::Never),
    ];
    for (name, compaction) in policies {
        group.bench_with_input(BenchmarkId::from_parameter(name), &compaction, |b, &compaction| {
            b.iter(|| {
                let mut pool = seeded_pool(PoolConfig {
                    compaction,
                    ..Default::default()
                });
                for _ in 0..STREAM_BYTES {
                    black_box(pool.consume().unwrap());
                }
            });
        });
    }
    group.finish();
}

/// Block fills with each digest algorithm.
fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    group.throughput(Throughput::Bytes(STREAM_BYTES));

    for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm),
            &algorithm,
            |b, &algorithm| {
                let mut buf = vec![0u8; STREAM_BYTES as usize];
                b.iter(|| {
                    let mut pool = seeded_pool(PoolConfig::with_algorithm(algorithm));
                    pool.fill(&mut buf).unwrap();
                    black_box(&buf);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_consume, bench_fill);
criterion_main!(benches);
