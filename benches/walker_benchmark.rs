/*!
 * Graph Walker Benchmarks
 * Deep clone and deep equality over chains and shared-reference lists
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fiche::{deep_clone, deep_equals, TypeDescriptor, TypeRegistry, Value};

fn register() {
    TypeRegistry::global()
        .register(
            TypeDescriptor::class("BenchNode")
                .auto_property("Value")
                .public_field("next"),
        )
        .unwrap();
}

fn chain(length: usize) -> Value {
    let registry = TypeRegistry::global();
    let mut head = Value::Null;
    for i in 0..length {
        let mut node = registry.instantiate("BenchNode").unwrap();
        node.set_field("Value", i as i64).unwrap();
        node.set_field("next", head).unwrap();
        head = node;
    }
    head
}

fn bench_deep_clone(c: &mut Criterion) {
    register();
    let mut group = c.benchmark_group("deep_clone");

    for length in [10usize, 100, 500] {
        let graph = chain(length);
        group.bench_with_input(BenchmarkId::new("chain", length), &graph, |b, graph| {
            b.iter(|| deep_clone(black_box(graph)).unwrap());
        });
    }

    let shared = chain(10);
    let list = Value::list("List", vec![shared; 200]);
    group.bench_function("shared_list", |b| {
        b.iter(|| deep_clone(black_box(&list)).unwrap());
    });

    group.finish();
}

fn bench_deep_equals(c: &mut Criterion) {
    register();
    let mut group = c.benchmark_group("deep_equals");

    for length in [10usize, 100, 500] {
        let graph = chain(length);
        let clone = deep_clone(&graph).unwrap();
        group.bench_with_input(
            BenchmarkId::new("chain", length),
            &(graph, clone),
            |b, (graph, clone)| {
                b.iter(|| deep_equals(black_box(graph), black_box(clone)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_deep_clone, bench_deep_equals);
criterion_main!(benches);
