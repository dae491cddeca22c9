//! Single-producer/single-consumer lock-free ring buffer.
//!
//! [`SpscQueue`] owns the slots and the two monotonic counters. Call
//! `split()` (or `producer()` / `consumer()`) to obtain the one
//! [`Producer`] and the one [`Consumer`] allowed to exist at a time, then move
//! each handle to its thread.

pub mod consumer;
pub mod producer;
pub mod queue;

/// SPSC consumer handle.
pub use consumer::Consumer;
/// SPSC producer handle.
pub use producer::Producer;
/// SPSC ring buffer storage and endpoint claims.
pub use queue::SpscQueue;
