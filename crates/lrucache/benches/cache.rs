use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lrucache::{LruCache, ShardedLruCache, SyncLruCache};

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("lru_1kb", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        let data = vec![b'x'; 1024];

        for i in 0..100u64 {
            cache.put(i, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 100)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_put_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_evict");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for capacity in [16usize, 1024, 65536] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut cache = LruCache::new(capacity).unwrap();
                let mut counter = 0u64;

                // Every put after warm-up inserts a new key and evicts one
                b.iter(|| {
                    black_box(cache.put(counter, counter));
                    counter += 1;
                });
            },
        );
    }

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write_sync", |b| {
        let cache = SyncLruCache::new(1000).unwrap();

        for i in 0..100u64 {
            cache.put(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 100)));
            } else {
                black_box(cache.put(counter, counter));
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_4_threads");
    group.sample_size(20);
    group.throughput(Throughput::Elements(4 * 1000));

    group.bench_function("sync", |b| {
        let cache = SyncLruCache::new(4096).unwrap();
        b.iter(|| run_threads(|key| {
            cache.put(key, key);
            black_box(cache.get(&key));
        }));
    });

    group.bench_function("sharded_16", |b| {
        let cache = ShardedLruCache::new(4096, 16).unwrap();
        b.iter(|| run_threads(|key| {
            cache.put(key, key);
            black_box(cache.get(&key));
        }));
    });

    group.finish();
}

fn run_threads<F>(op: F)
where
    F: Fn(u64) + Sync,
{
    thread::scope(|s| {
        for t in 0..4u64 {
            let op = &op;
            s.spawn(move || {
                for i in 0..1000u64 {
                    op(t * 1000 + i);
                }
            });
        }
    });
}

criterion_group!(
    benches,
    bench_get_hit,
    bench_put_evict,
    bench_mixed_50_50,
    bench_contended
);
criterion_main!(benches);
