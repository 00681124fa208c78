/*!
 * Ordering Benchmarks
 * Multi-key ordering against the standard stable sort
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fiche::ordering::ValueComparer;
use fiche::{order_values, OrderByExt, SafeRandom, RandomSource, SortDirection, Value};

fn pairs(count: usize) -> Vec<(u32, u32)> {
    let random = SafeRandom::new();
    (0..count)
        .map(|_| (random.next_u32() % 64, random.next_u32()))
        .collect()
}

fn bench_two_key_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_key_ordering");

    for size in [100usize, 1_000, 10_000] {
        let data = pairs(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("order_by_then_by", size), &data, |b, data| {
            b.iter(|| {
                data.order_by(|p| p.0)
                    .then_by_descending(|p| p.1)
                    .to_vec()
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("std_sort_by", size), &data, |b, data| {
            b.iter(|| {
                let mut sorted = black_box(data.clone());
                sorted.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
                sorted
            });
        });
    }

    group.finish();
}

fn bench_dynamic_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_ordering");

    for size in [100usize, 1_000] {
        let items = pairs(size)
            .into_iter()
            .map(|(k, _)| Value::from(k))
            .collect();
        let source = Value::list("List", items);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                order_values(black_box(source), |v| v.clone())
                    .unwrap()
                    .then_by_with(|v: &Value| v.clone(), ValueComparer, SortDirection::Descending)
                    .to_vec()
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_two_key_ordering, bench_dynamic_ordering);
criterion_main!(benches);
