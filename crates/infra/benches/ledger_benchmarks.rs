use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stocktally_infra::services::QueryEngine;
use stocktally_infra::{FsLedgerStore, LedgerStore, StoreConfig};
use stocktally_inventory::{RawRow, aggregate};

fn sheet(rows: usize) -> Vec<RawRow> {
    let mut out = vec![vec![
        "Company".to_string(),
        "Finish".to_string(),
        "Item No".to_string(),
        "Quantity".to_string(),
    ]];
    for i in 0..rows {
        out.push(vec![
            format!("Company-{}", i % 8),
            format!("Finish-{}", i % 12),
            format!("I-{i:05}"),
            (i % 50).to_string(),
        ]);
    }
    out
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for size in [100usize, 1_000, 10_000] {
        let rows = sheet(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| aggregate(black_box(rows)).map(|a| a.companies.len()))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let store = FsLedgerStore::open(&StoreConfig::new(tmp.path()), "csv").expect("open store");
    let aggregation = aggregate(&sheet(5_000)).expect("aggregate");
    store.put("bench", &aggregation.companies).expect("put");
    let engine = QueryEngine::new(store);

    let mut group = c.benchmark_group("query_scan");
    group.bench_function("low_stock", |b| b.iter(|| engine.low_stock(black_box(5))));
    group.bench_function("search_single_token", |b| {
        b.iter(|| engine.search(black_box("I-0012")))
    });
    group.bench_function("search_finish_and_item", |b| {
        b.iter(|| engine.search(black_box("Finish-3 I-00")))
    });
    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_queries);
criterion_main!(benches);
