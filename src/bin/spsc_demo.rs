use anyhow::{Context, Result, anyhow};
use clap::Parser;
use spsc_queue::SpscQueue;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Drives a capacity-4 queue from two threads running at different speeds, so
/// both "full" and "empty" outcomes show up in the log.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Enqueue attempts made by the producer, and dequeue attempts by the consumer.
    #[arg(short, long, default_value_t = 12)]
    rounds: u32,

    /// Pause after each enqueue attempt, in milliseconds.
    #[arg(long, default_value_t = 100)]
    producer_delay_ms: u64,

    /// Pause before each dequeue attempt, in milliseconds.
    #[arg(long, default_value_t = 250)]
    consumer_delay_ms: u64,
}

fn main() -> Result<()> {
    spsc_queue::init_tracing();
    let args = Args::parse();
    let producer_delay = Duration::from_millis(args.producer_delay_ms);
    let consumer_delay = Duration::from_millis(args.consumer_delay_ms);

    let mut queue = SpscQueue::<u32, 4>::new();
    let (mut producer, mut consumer) = queue.split()?;

    thread::scope(|scope| -> Result<()> {
        let producer_handle = thread::Builder::new()
            .name("demo-producer".to_owned())
            .spawn_scoped(scope, move || {
                for value in 0..args.rounds {
                    if !producer.enqueue(value) {
                        warn!(value, "failed to enqueue, queue full");
                    }
                    thread::sleep(producer_delay);
                }
            })
            .context("failed to spawn producer thread")?;

        let consumer_handle = thread::Builder::new()
            .name("demo-consumer".to_owned())
            .spawn_scoped(scope, move || {
                for _ in 0..args.rounds {
                    thread::sleep(consumer_delay);
                    info!(window = %consumer.window(), "queue contents");
                    match consumer.dequeue() {
                        Some(value) => info!(value, "dequeued"),
                        None => info!("queue empty"),
                    }
                }
            })
            .context("failed to spawn consumer thread")?;

        producer_handle
            .join()
            .map_err(|_| anyhow!("producer thread panicked"))?;
        consumer_handle
            .join()
            .map_err(|_| anyhow!("consumer thread panicked"))?;
        Ok(())
    })?;

    let len = queue.len();
    info!(left_over = %queue.window(), len, "both threads finished");
    Ok(())
}
