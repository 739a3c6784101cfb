use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use lumen_common::{collections::*, dynarr};

const SIZES: [usize; 3] = [16, 256, 4096];

fn dynarr_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("DynArr::push", n), &n, |b, &n| b.iter(|| {
            let mut arr = DynArr::<u32>::new();
            for i in 0..n as u32 {
                arr.push(i);
            }
            arr
        }));
        group.bench_with_input(BenchmarkId::new("DynArr<Pow2>::push", n), &n, |b, &n| b.iter(|| {
            let mut arr = DynArr::<u32, Pow2ReserveStrategy>::new();
            for i in 0..n as u32 {
                arr.push(i);
            }
            arr
        }));
        group.bench_with_input(BenchmarkId::new("DynArr<ThreeHalves>::push", n), &n, |b, &n| b.iter(|| {
            let mut arr = DynArr::<u32, ThreeHalvesReserveStrategy>::new();
            for i in 0..n as u32 {
                arr.push(i);
            }
            arr
        }));
        group.bench_with_input(BenchmarkId::new("DynArr::reserve+push", n), &n, |b, &n| b.iter(|| {
            let mut arr = DynArr::<u32>::new();
            arr.reserve(n);
            for i in 0..n as u32 {
                let _ = arr.push_within_capacity(i);
            }
            arr
        }));
        group.bench_with_input(BenchmarkId::new("Vec::push", n), &n, |b, &n| b.iter(|| {
            let mut vec = Vec::<u32>::new();
            for i in 0..n as u32 {
                vec.push(i);
            }
            vec
        }));
    }
    group.finish();
}

fn dynarr_insert_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_erase");
    for n in [16usize, 256] {
        group.bench_with_input(BenchmarkId::new("DynArr::insert(front)", n), &n, |b, &n| b.iter(|| {
            let mut arr = DynArr::<u64>::new();
            for i in 0..n as u64 {
                arr.insert(0, i);
            }
            arr
        }));
        group.bench_with_input(BenchmarkId::new("DynArr::insert(middle)", n), &n, |b, &n| b.iter(|| {
            let mut arr = DynArr::<u64>::new();
            for i in 0..n as u64 {
                arr.insert(arr.len() / 2, i);
            }
            arr
        }));
        group.bench_with_input(BenchmarkId::new("Vec::insert(front)", n), &n, |b, &n| b.iter(|| {
            let mut vec = Vec::<u64>::new();
            for i in 0..n as u64 {
                vec.insert(0, i);
            }
            vec
        }));
        group.bench_with_input(BenchmarkId::new("DynArr::erase(front)", n), &n, |b, &n| b.iter_batched(
            || DynArr::<u64>::with_len_with(n, || 7),
            |mut arr| {
                while !arr.is_empty() {
                    arr.erase(0);
                }
                arr
            },
            BatchSize::SmallInput,
        ));
    }
    group.finish();
}

fn dynarr_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy");
    for n in [16usize, 256] {
        let src = dynarr![String::from("lumen"); n];

        group.bench_with_input(BenchmarkId::new("DynArr::clone", n), &src, |b, src| b.iter(|| {
            black_box(src).clone()
        }));

        // Reuse path: the target already has room for every element
        let mut dst = DynArr::<String>::with_len_with(n, String::new);
        group.bench_with_input(BenchmarkId::new("DynArr::clone_from(reuse)", n), &src, |b, src| b.iter(|| {
            dst.clone_from(black_box(src));
        }));

        // Copy-and-swap path: the target is too small and gets replaced every time
        group.bench_with_input(BenchmarkId::new("DynArr::clone_from(realloc)", n), &src, |b, src| b.iter_batched(
            DynArr::<String>::new,
            |mut dst| {
                dst.clone_from(black_box(src));
                dst
            },
            BatchSize::SmallInput,
        ));
    }
    group.finish();
}

fn dynarr_index(c: &mut Criterion) {
    let arr = dynarr![5; 100];
    c.bench_function("DynArr::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(arr[i]);
        }
    }));
}

criterion_group!(dynarr,
    dynarr_growth,
    dynarr_insert_erase,
    dynarr_copy,
    dynarr_index
);
criterion_main!(dynarr);
