use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use transit_forest::{AccountName, ForestConfig, IndexedForest, RemotePath};

fn file_paths(count: usize) -> Vec<RemotePath> {
    (0..count)
        .map(|i| RemotePath::new(format!("/bench/d{}/s{}/f{i}.bin", i % 16, i % 7)).unwrap())
        .collect()
}

fn register_then_unregister(c: &mut Criterion) {
    let account = AccountName::new("bench@host").unwrap();
    let paths = file_paths(1_000);

    let mut group = c.benchmark_group("register_unregister");
    for (name, config) in [
        ("sharded", ForestConfig::default()),
        ("locked", ForestConfig::locked()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            let forest = IndexedForest::with_config(config).unwrap();
            b.iter(|| {
                for (i, path) in paths.iter().enumerate() {
                    forest.register(&account, path, Some(i));
                }
                for path in &paths {
                    black_box(forest.unregister(&account, path));
                }
            });
        });
    }
    group.finish();
}

fn lookup_hit(c: &mut Criterion) {
    let account = AccountName::new("bench@host").unwrap();
    let paths = file_paths(10_000);
    let forest = IndexedForest::new();
    for (i, path) in paths.iter().enumerate() {
        forest.register(&account, path, Some(i));
    }

    c.bench_function("lookup_hit", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % paths.len();
            black_box(forest.lookup(&account, &paths[i]))
        });
    });
}

criterion_group!(benches, register_then_unregister, lookup_hit);
criterion_main!(benches);
