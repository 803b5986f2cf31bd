//! Benchmarks for fraction arithmetic
//!
//! Measures performance of:
//! - GCD at increasing operand sizes
//! - Reduction of unreduced products
//! - Parsing the `N/D` text form

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fraction_arith::{gcd, multiply_fractions, parse_fraction, reduce_fraction, Fraction};

/// Benchmark GCD with consecutive Fibonacci numbers (worst case for Euclid)
fn bench_gcd(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcd");

    let pairs = [(13u64, 8u64), (6765, 4181), (832_040, 514_229), (102_334_155, 63_245_986)];
    for (a, b) in pairs {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(a), &(a, b), |bench, &(a, b)| {
            bench.iter(|| gcd(black_box(a), black_box(b)))
        });
    }
    group.finish();
}

/// Benchmark reducing the product of every pair of classroom fractions
fn bench_reduce_products(c: &mut Criterion) {
    let fractions: Vec<Fraction> = (1..=10u64)
        .flat_map(|n| (1..=10u64).map(move |d| Fraction { numerator: n, denominator: d }))
        .collect();

    c.bench_function("reduce_all_products", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for &x in &fractions {
                for &y in &fractions {
                    if let Ok(product) = multiply_fractions(black_box(x), black_box(y)) {
                        acc += reduce_fraction(product).numerator;
                    }
                }
            }
            acc
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_fraction", |b| {
        b.iter(|| parse_fraction(black_box("123456/789012")))
    });
}

criterion_group!(benches, bench_gcd, bench_reduce_products, bench_parse);
criterion_main!(benches);
