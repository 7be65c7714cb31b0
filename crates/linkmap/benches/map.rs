use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use linkmap::{ChainedMap, LinkedHashMap};

fn bench_chained_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_insert");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_1k_keys", |b| {
        b.iter(|| {
            let mut map = ChainedMap::new();
            for i in 0..1000u64 {
                map.insert(black_box(i), i);
            }
            black_box(map.len())
        });
    });

    group.finish();
}

fn bench_chained_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_find");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("find_hot", |b| {
        let mut map = ChainedMap::new();
        for i in 0..1000u64 {
            map.insert(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(map.find(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_linked_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("linked_insert");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_1k_keys", |b| {
        b.iter(|| {
            let mut map = LinkedHashMap::new();
            for i in 0..1000u64 {
                map.insert(black_box(i), i).unwrap();
            }
            black_box(map.len())
        });
    });

    group.bench_function("overwrite_hot", |b| {
        let mut map = LinkedHashMap::new();
        for i in 0..100u64 {
            map.insert(i, i).unwrap();
        }

        let mut counter = 0u64;
        b.iter(|| {
            map.insert(counter % 100, counter).unwrap();
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_chained_insert,
    bench_chained_find,
    bench_linked_insert
);
criterion_main!(benches);
