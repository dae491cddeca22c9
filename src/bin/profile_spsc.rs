use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use core_affinity::CoreId;
use crossbeam_utils::Backoff;
use spsc_queue::SpscQueue;
use std::hint::black_box;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Sustained one-producer/one-consumer transfer, sized for perf and flamegraphs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Values transferred after warmup.
    #[arg(short = 'n', long, default_value_t = 20_000_000)]
    iterations: u64,

    /// Values transferred before the measured run starts.
    #[arg(long, default_value_t = 5_000_000)]
    warmup: u64,

    /// Queue capacity: 1024, 16384 or 262144.
    #[arg(short, long, default_value_t = 1024)]
    capacity: usize,

    /// Pin producer and consumer to the first two cores.
    #[arg(long)]
    pin: bool,
}

#[derive(Debug)]
struct Report {
    elapsed: Duration,
    checksum: u64,
}

#[cfg(feature = "profiling")]
#[inline(never)]
pub fn hot_loop_marker() {
    core::hint::black_box(());
}

fn main() -> Result<()> {
    spsc_queue::init_tracing();
    let args = Args::parse();
    if args.iterations == 0 {
        bail!("--iterations must be at least 1");
    }

    let cores = if args.pin {
        core_affinity::get_core_ids().context("could not list cores for pinning")?
    } else {
        Vec::new()
    };

    let report = match args.capacity {
        1024 => run::<1024>(&args, &cores)?,
        16384 => run::<16384>(&args, &cores)?,
        262144 => run::<262144>(&args, &cores)?,
        other => bail!("unsupported capacity {other}; choose 1024, 16384 or 262144"),
    };

    let ns = report.elapsed.as_nanos() as f64;
    let iterations = args.iterations as f64;
    info!(
        capacity = args.capacity,
        iterations = args.iterations,
        elapsed_ns = report.elapsed.as_nanos() as u64,
        throughput_m_msg_s = iterations / report.elapsed.as_secs_f64() / 1e6,
        latency_ns_per_msg = ns / iterations,
        checksum = report.checksum,
        "transfer finished"
    );
    Ok(())
}

fn run<const N: usize>(args: &Args, cores: &[CoreId]) -> Result<Report> {
    let queue = SpscQueue::<u64, N>::boxed();
    let (mut producer, mut consumer) = queue.split()?;
    let barrier = Barrier::new(3);
    let (warmup, iterations) = (args.warmup, args.iterations);
    let producer_core = cores.first().cloned();
    let consumer_core = cores.get(1).cloned();

    thread::scope(|scope| {
        let producer_handle = thread::Builder::new()
            .name("spsc-producer".to_owned())
            .spawn_scoped(scope, || {
                if let Some(core) = producer_core {
                    let _ = core_affinity::set_for_current(core);
                }
                let backoff = Backoff::new();
                for i in 0..warmup + iterations {
                    if i == warmup {
                        barrier.wait();
                    }
                    #[cfg(feature = "profiling")]
                    hot_loop_marker();
                    let value = black_box(i);
                    while !producer.enqueue(value) {
                        backoff.spin();
                    }
                    backoff.reset();
                }
            })
            .context("failed to spawn producer thread")?;

        let consumer_handle = thread::Builder::new()
            .name("spsc-consumer".to_owned())
            .spawn_scoped(scope, || {
                if let Some(core) = consumer_core {
                    let _ = core_affinity::set_for_current(core);
                }
                let mut checksum = 0u64;
                for i in 0..warmup + iterations {
                    if i == warmup {
                        barrier.wait();
                    }
                    #[cfg(feature = "profiling")]
                    hot_loop_marker();
                    let value = loop {
                        if let Some(v) = consumer.dequeue() {
                            break v;
                        }
                        std::hint::spin_loop();
                    };
                    checksum = checksum.wrapping_add(black_box(value));
                }
                checksum
            })
            .context("failed to spawn consumer thread")?;

        barrier.wait();
        let start = Instant::now();

        producer_handle
            .join()
            .map_err(|_| anyhow!("producer thread panicked"))?;
        let checksum = consumer_handle
            .join()
            .map_err(|_| anyhow!("consumer thread panicked"))?;

        Ok(Report {
            elapsed: start.elapsed(),
            checksum,
        })
    })
}
