use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dynlist::DynamicArray;
use dynlist::runtime::{int_type, string_type};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

fn shuffled(n: usize) -> Vec<i32> {
    let mut values: Vec<i32> = (0..n as i32).collect();
    values.shuffle(&mut StdRng::seed_from_u64(7));
    values
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("append_int_1000", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new(int_type()).unwrap();
            for i in 0..1000 {
                array.append(black_box(&i)).unwrap();
            }
            array
        })
    });

    let words: Vec<String> = (0..1000).map(|i| format!("word{i}")).collect();
    c.bench_function("append_string_1000", |b| {
        b.iter(|| DynamicArray::from_slice(string_type(), black_box(&words)).unwrap())
    });
}

fn bench_qsort(c: &mut Criterion) {
    let mut group = c.benchmark_group("qsort");
    for n in [100, 1_000, 10_000] {
        let input = DynamicArray::from_slice(int_type(), &shuffled(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter_batched(
                || input.try_clone().unwrap(),
                |mut array| {
                    array.qsort();
                    array
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut sorted = DynamicArray::from_slice(int_type(), &shuffled(10_000)).unwrap();
    sorted.qsort();
    c.bench_function("bsearch_10000", |b| b.iter(|| sorted.bsearch(black_box(&7_777))));
    c.bench_function("index_10000", |b| b.iter(|| sorted.index(black_box(&7_777))));
}

fn bench_remove_all(c: &mut Criterion) {
    let values: Vec<i32> = (0..10_000).map(|i| i % 10).collect();
    let input = DynamicArray::from_slice(int_type(), &values).unwrap();
    c.bench_function("remove_all_10000", |b| {
        b.iter_batched(
            || input.try_clone().unwrap(),
            |mut array| array.remove_all(black_box(&3)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_append, bench_qsort, bench_search, bench_remove_all);
criterion_main!(benches);
