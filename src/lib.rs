//! Fixed-capacity lock-free single-producer/single-consumer queue.
//!
//! An [`SpscQueue<T, N>`] moves `Copy` values from one producer thread to one
//! consumer thread through `N` slots, `N` a power of two. Neither side ever
//! blocks: [`Producer::enqueue`] returns `false` on a full queue and
//! [`Consumer::dequeue`] returns `None` on an empty one, leaving retry policy
//! to the caller.
//!
//! ```
//! use spsc_queue::SpscQueue;
//!
//! let queue = SpscQueue::<u32, 4>::new();
//! let (mut producer, mut consumer) = queue.split()?;
//!
//! assert!(producer.enqueue(7));
//! assert_eq!(consumer.dequeue(), Some(7));
//! assert_eq!(consumer.dequeue(), None);
//! # Ok::<(), spsc_queue::SpscError>(())
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
extern crate std;

pub mod cache_padding;

pub mod error;

pub mod precondition;

pub mod spsc;

pub mod trace;

pub mod window;

pub use error::SpscError;

pub use precondition::Element;

pub use spsc::{Consumer, Producer, SpscQueue};

pub use trace::init_tracing;

pub use window::Window;
