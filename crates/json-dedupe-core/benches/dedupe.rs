use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use json_dedupe_core::{deduplicate, normalize, parse_items, parse_value, JsonValue};

fn records(n: usize) -> Vec<JsonValue> {
    let text = format!(
        "[{}]",
        (0..n)
            .map(|i| {
                let id = i % (n / 4).max(1);
                if i % 2 == 0 {
                    format!(
                        r#"{{"id":{id},"tags":["a","b"],"items":[{{"k":{id}}},{{"k":1}}]}}"#
                    )
                } else {
                    format!(
                        r#"{{"items":[{{"k":1}},{{"k":{id}}}],"id":{id},"tags":["a","b"]}}"#
                    )
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    );
    parse_items(&text).unwrap()
}

fn bench_normalize(c: &mut Criterion) {
    let value = parse_value(
        r#"{"user":{"name":"John","preferences":["reading","gaming"]},"scores":[1,2,3],"rows":[{"b":2},{"a":1},[3,2,1]]}"#,
    )
    .unwrap();
    c.bench_function("normalize_nested_document", |b| {
        b.iter(|| normalize(black_box(&value)).unwrap())
    });
}

fn bench_deduplicate(c: &mut Criterion) {
    let items = records(1_000);
    c.bench_function("deduplicate_1000_records", |b| {
        b.iter(|| deduplicate(black_box(&items)).unwrap())
    });
}

criterion_group!(benches, bench_normalize, bench_deduplicate);
criterion_main!(benches);
