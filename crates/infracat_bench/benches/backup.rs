//! Backup export/import benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use infracat_bench::utils::seed_catalog;
use infracat_core::{BackupManager, BackupSnapshot, Component, Providers};
use tempfile::TempDir;

fn seeded(clusters: usize, nodes_per_cluster: usize) -> BackupSnapshot {
    let providers = Providers::in_memory();
    seed_catalog(&providers, clusters, nodes_per_cluster).unwrap();
    BackupManager::with_defaults(providers)
        .export(Component::All)
        .unwrap()
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for clusters in [1, 10, 50] {
        let providers = Providers::in_memory();
        seed_catalog(&providers, clusters, 20).unwrap();
        let manager = BackupManager::with_defaults(providers);

        group.throughput(Throughput::Elements((clusters * 21 + 1) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(clusters), &clusters, |b, _| {
            b.iter(|| black_box(manager.export(Component::All).unwrap()));
        });
    }

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    group.sample_size(20);

    for clusters in [1, 10] {
        let snapshot = seeded(clusters, 20);
        group.throughput(Throughput::Elements(snapshot.count(Component::All) as u64));

        group.bench_with_input(BenchmarkId::new("memory", clusters), &snapshot, |b, s| {
            b.iter(|| {
                let manager = BackupManager::with_defaults(Providers::in_memory());
                black_box(manager.import(Component::All, s).unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("file", clusters), &snapshot, |b, s| {
            b.iter(|| {
                let dir = TempDir::new().unwrap();
                let manager = BackupManager::with_defaults(Providers::open(dir.path()).unwrap());
                black_box(manager.import(Component::All, s).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let snapshot = seeded(10, 20);
    let json = snapshot.to_json().unwrap();

    c.bench_function("snapshot_to_json", |b| {
        b.iter(|| black_box(snapshot.to_json().unwrap()));
    });
    c.bench_function("snapshot_from_json", |b| {
        b.iter(|| black_box(BackupSnapshot::from_json(&json).unwrap()));
    });
}

criterion_group!(benches, bench_export, bench_import, bench_json);
criterion_main!(benches);
