//! Category normalization benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recondash::normalize_financial_categories;
use serde_json::{json, Map, Value};

/// Record list with a mix of amount fields and junk entries
fn create_record_list(size: usize) -> Value {
    let records: Vec<Value> = (0..size)
        .map(|i| match i % 4 {
            0 => json!({"name": format!("cat-{}", i), "total": i as f64 * 1.5}),
            1 => json!({"name": format!("cat-{}", i), "value": -(i as f64)}),
            2 => json!({"name": format!("cat-{}", i), "amount": "invalid"}),
            _ => Value::Null,
        })
        .collect();
    Value::Array(records)
}

/// Keyed map of summaries and bare numbers
fn create_keyed_map(size: usize) -> Value {
    let mut map = Map::new();
    for i in 0..size {
        let entry = if i % 2 == 0 {
            json!({"total_amount": i, "total": 1})
        } else {
            json!(i as f64 * -2.0)
        };
        map.insert(format!("cat-{}", i), entry);
    }
    Value::Object(map)
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_financial_categories");

    for size in [10, 100, 1000] {
        let list = create_record_list(size);
        group.bench_with_input(BenchmarkId::new("record_list", size), &list, |b, input| {
            b.iter(|| normalize_financial_categories(black_box(Some(input))))
        });

        let map = create_keyed_map(size);
        group.bench_with_input(BenchmarkId::new("keyed_map", size), &map, |b, input| {
            b.iter(|| normalize_financial_categories(black_box(Some(input))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
