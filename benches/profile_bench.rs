//! Benchmarks for the profiling pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pattern_profiler::{cluster_strings, tokenize, ProfileOptions, Profiler};

/// Generate a structured sample column for benchmarking
fn generate_column(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("ORD-{:06}", i),
            1 => format!("user{}@example.com", i),
            2 => format!("20{:02}-Q{}", i % 25, i % 4 + 1),
            _ => format!("SKU_{:04}_{:02}", i, i % 50),
        })
        .collect()
}

/// Benchmark tokenization of representative values
fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    let test_cases = vec![
        ("account_code", "ACC-00123"),
        ("email", "user42@example.com"),
        ("timestamp", "2024-01-15T10:30:00Z"),
        ("sentence", "the quick brown fox jumps over it"),
    ];

    for (name, value) in test_cases {
        group.bench_with_input(BenchmarkId::new("value", name), &value, |b, value| {
            b.iter(|| black_box(tokenize(value)));
        });
    }

    group.finish();
}

/// Benchmark clustering with varying column sizes
fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");
    let options = ProfileOptions::default();

    for count in [100, 500, 2000].iter() {
        let values = generate_column(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(
            BenchmarkId::new("cluster_strings", count),
            &values,
            |b, values| {
                b.iter(|| black_box(cluster_strings(values, &options)));
            },
        );
    }

    group.finish();
}

/// Benchmark end-to-end profiling with varying column sizes
fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");

    for count in [100, 500, 2000].iter() {
        let values = generate_column(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("profile", count), &values, |b, values| {
            b.iter(|| {
                let profiler = Profiler::new();
                black_box(profiler.profile(values))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_clustering, bench_profile);
criterion_main!(benches);
