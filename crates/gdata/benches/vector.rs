use std::collections::VecDeque;

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};

use gdata::{ErasedVector, Vector};

// Fast mode: FAST_BENCH=1 cargo bench -p gdata --bench vector
fn is_fast_mode() -> bool {
    std::env::var("FAST_BENCH")
        .map(|v| v == "1")
        .unwrap_or(false)
}

fn configure_group(group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>) {
    if is_fast_mode() {
        group.measurement_time(std::time::Duration::from_millis(500));
        group.sample_size(10);
    } else {
        group.measurement_time(std::time::Duration::from_secs(3));
        group.sample_size(50);
    }
}

const SIZES: [usize; 4] = [100, 1_000, 10_000, 100_000];

// =============================================================================
// Pushes
// =============================================================================

fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back");
    configure_group(&mut group);

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |b, &s| {
            b.iter(|| {
                let mut deque = VecDeque::new();
                for i in 0..s {
                    deque.push_back(i as u32);
                }
                black_box(deque)
            });
        });

        group.bench_with_input(BenchmarkId::new("Vector", size), &size, |b, &s| {
            b.iter(|| {
                let mut vector = Vector::new();
                for i in 0..s {
                    vector.push_back(i as u32).expect("Failed to push_back(..)");
                }
                black_box(vector)
            });
        });

        group.bench_with_input(BenchmarkId::new("ErasedVector", size), &size, |b, &s| {
            b.iter(|| {
                let mut vector = ErasedVector::new(4).expect("Failed to create vector");
                for i in 0..s {
                    vector
                        .push_back(1, Some(&(i as u32).to_ne_bytes()))
                        .expect("Failed to push_back(..)");
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

fn bench_push_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_front");
    configure_group(&mut group);

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |b, &s| {
            b.iter(|| {
                let mut deque = VecDeque::new();
                for i in 0..s {
                    deque.push_front(i as u32);
                }
                black_box(deque)
            });
        });

        group.bench_with_input(BenchmarkId::new("Vector", size), &size, |b, &s| {
            b.iter(|| {
                let mut vector = Vector::new();
                for i in 0..s {
                    vector.push_front(i as u32).expect("Failed to push_front(..)");
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Pops
// =============================================================================

fn bench_drain_both_ends(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain_both_ends");
    configure_group(&mut group);

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let data: Vec<u32> = (0..size as u32).collect();

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &data, |b, data| {
            b.iter_batched(
                || data.iter().copied().collect::<VecDeque<_>>(),
                |mut deque| {
                    while deque.pop_front().is_some() {
                        black_box(deque.pop_back());
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("Vector", size), &data, |b, data| {
            b.iter_batched(
                || Vector::from_slice(data).expect("Failed to from_slice(..)"),
                |mut vector| {
                    while vector.pop_front().is_some() {
                        black_box(vector.pop_back());
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_back, bench_push_front, bench_drain_both_ends);
criterion_main!(benches);
