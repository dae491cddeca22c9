use std::hint::black_box;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use core_affinity::CoreId;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use crossbeam_utils::Backoff;
use spsc_queue::SpscQueue;

const THROUGHPUT_N: u64 = 5_000_000;
const LATENCY_ITERS_PER_SAMPLE: u64 = 100_000;

#[inline]
fn pin_current(core: Option<CoreId>) {
    if let Some(core_id) = core {
        let _ = core_affinity::set_for_current(core_id);
    }
}

fn affinity_pair(core_ids: &[CoreId]) -> (Option<CoreId>, Option<CoreId>) {
    let producer_core = core_ids.first().cloned();
    let consumer_core = core_ids.get(1).cloned();

    match (producer_core, consumer_core) {
        (Some(p), Some(c)) if p.id != c.id => (Some(p), Some(c)),
        (Some(p), _) => (Some(p), None),
        _ => (None, None),
    }
}

fn run_spsc_timed_case<const N: usize>(n: u64, core_ids: &[CoreId]) -> Duration {
    let (producer_core, consumer_core) = affinity_pair(core_ids);
    let queue = SpscQueue::<u64, N>::boxed();
    let (mut producer, mut consumer) = queue.split().expect("fresh queue must split");
    let barrier = Arc::new(Barrier::new(3));

    thread::scope(|scope| {
        let prod_barrier = barrier.clone();
        let producer_handle = scope.spawn(move || {
            pin_current(producer_core);
            prod_barrier.wait();
            let backoff = Backoff::new();
            for sequence in 0..n {
                let value = black_box(sequence);
                while !producer.enqueue(value) {
                    backoff.spin();
                }
                backoff.reset();
            }
            n
        });

        let cons_barrier = barrier.clone();
        let consumer_handle = scope.spawn(move || {
            pin_current(consumer_core);
            cons_barrier.wait();
            let mut expected_sequence = 0u64;

            while expected_sequence < n {
                if let Some(value) = consumer.dequeue() {
                    assert_eq!(
                        black_box(value),
                        expected_sequence,
                        "spsc FIFO violation"
                    );
                    expected_sequence += 1;
                    continue;
                }
                std::hint::spin_loop();
            }

            assert!(consumer.dequeue().is_none());
            expected_sequence
        });

        barrier.wait();
        let start = Instant::now();

        let produced = producer_handle.join().unwrap();
        let consumed = consumer_handle.join().unwrap();
        let elapsed = start.elapsed();

        assert_eq!(produced, n);
        assert_eq!(consumed, n);

        elapsed
    })
}

fn run_spsc_iters<const N: usize>(iters: u64, n: u64, core_ids: &[CoreId]) -> Duration {
    let mut total = Duration::ZERO;
    for _ in 0..iters {
        total += run_spsc_timed_case::<N>(n, core_ids);
    }
    total
}

fn bench_spsc_throughput(c: &mut Criterion) {
    let core_ids = core_affinity::get_core_ids().unwrap_or_default();
    let mut group = c.benchmark_group("spsc_throughput_1p1c");
    group.throughput(Throughput::Elements(THROUGHPUT_N));

    group.bench_with_input(
        BenchmarkId::from_parameter(1024usize),
        &1024usize,
        |b, _| {
            b.iter_custom(|iters| run_spsc_iters::<1024>(iters, THROUGHPUT_N, &core_ids));
        },
    );
    group.bench_with_input(
        BenchmarkId::from_parameter(16384usize),
        &16384usize,
        |b, _| {
            b.iter_custom(|iters| run_spsc_iters::<16384>(iters, THROUGHPUT_N, &core_ids));
        },
    );
    group.bench_with_input(
        BenchmarkId::from_parameter(262144usize),
        &262144usize,
        |b, _| {
            b.iter_custom(|iters| run_spsc_iters::<262144>(iters, THROUGHPUT_N, &core_ids));
        },
    );

    group.finish();
}

fn bench_spsc_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_single_thread_cap_1024");

    group.bench_function("enqueue_rejected_when_full", |b| {
        let queue = SpscQueue::<u64, 1024>::new();
        let (mut producer, _consumer) = queue.split().unwrap();
        while producer.enqueue(0) {}
        b.iter(|| black_box(producer.enqueue(black_box(123))));
    });

    group.bench_function("dequeue_refill_near_full", |b| {
        let queue = SpscQueue::<u64, 1024>::new();
        let (mut producer, mut consumer) = queue.split().unwrap();
        for value in 0..1023 {
            assert!(producer.enqueue(value));
        }
        b.iter(|| {
            black_box(consumer.dequeue());
            black_box(producer.enqueue(42));
        });
    });

    group.finish();
}

fn bench_spsc_roundtrip_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_latency_1p1c_single_thread");
    group.throughput(Throughput::Elements(LATENCY_ITERS_PER_SAMPLE));

    group.bench_function("roundtrip_cap_1024", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;

            for _ in 0..iters {
                let queue = SpscQueue::<u64, 1024>::new();
                let (mut producer, mut consumer) = queue.split().unwrap();
                let sample_start = Instant::now();

                for sequence in 0..LATENCY_ITERS_PER_SAMPLE {
                    while !producer.enqueue(black_box(sequence)) {
                        std::hint::spin_loop();
                    }

                    let popped = loop {
                        if let Some(v) = consumer.dequeue() {
                            break v;
                        }
                        std::hint::spin_loop();
                    };

                    assert_eq!(black_box(popped), sequence);
                }

                assert!(consumer.dequeue().is_none());
                total += sample_start.elapsed();
            }

            total
        })
    });

    group.finish();
}

fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(12))
        .sample_size(20)
}

criterion_group!(
    name = benches;
    config = criterion_config();
    targets = bench_spsc_throughput, bench_spsc_single_thread, bench_spsc_roundtrip_latency
);
criterion_main!(benches);
