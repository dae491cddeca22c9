use super::consumer::Consumer;
use super::producer::Producer;
use crate::cache_padding::CachePadded;
use crate::error::SpscError;
use crate::precondition::{CapacityCheck, Element};
use crate::trace;
use crate::window::Window;
use core::cell::UnsafeCell;
use core::fmt;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(feature = "std")]
use std::boxed::Box;

/// Storage for a lock-free single-producer/single-consumer ring buffer.
///
/// `head` counts every value ever published by the producer and `tail` every
/// value ever taken by the consumer. Neither is reduced modulo the capacity;
/// a slot index is `counter & (N - 1)`, so `head - tail` is always the exact
/// number of occupied slots and all `N` slots are usable.
///
/// # Capacity semantics
/// `N` must be a non-zero power of two, checked at compile time.
///
/// # Example
///
/// ```
/// use spsc_queue::SpscQueue;
///
/// let queue = SpscQueue::<u64, 4>::new();
/// let (mut producer, mut consumer) = queue.split().unwrap();
///
/// std::thread::scope(|s| {
///     s.spawn(move || {
///         for value in 0..100 {
///             while !producer.enqueue(value) {
///                 std::hint::spin_loop();
///             }
///         }
///     });
///
///     for expected in 0..100 {
///         let value = loop {
///             if let Some(value) = consumer.dequeue() {
///                 break value;
///             }
///             std::hint::spin_loop();
///         };
///         assert_eq!(value, expected);
///     }
/// });
/// ```
#[repr(C)]
pub struct SpscQueue<T, const N: usize>
where
    T: Element,
{
    pub(super) head: CachePadded<AtomicUsize>,
    pub(super) tail: CachePadded<AtomicUsize>,
    producer_claimed: AtomicBool,
    consumer_claimed: AtomicBool,
    pub(super) ring: [UnsafeCell<MaybeUninit<T>>; N],
}

// SAFETY: a slot is only written by the producer while it lies outside the
// published `tail..head` window and only read by the consumer while inside it.
// The release stores and acquire loads of `head` and `tail` order every slot
// access against the counter update that hands the slot over.
unsafe impl<T: Element, const N: usize> Sync for SpscQueue<T, N> {}

impl<T, const N: usize> Default for SpscQueue<T, N>
where
    T: Element,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> SpscQueue<T, N>
where
    T: Element,
{
    /// Creates an empty queue with all `N` slots inline.
    ///
    /// Usable in `static` items. For large `N` prefer [`SpscQueue::boxed`],
    /// which never places the slots on the stack.
    pub const fn new() -> Self {
        let () = CapacityCheck::<N>::OK;
        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            producer_claimed: AtomicBool::new(false),
            consumer_claimed: AtomicBool::new(false),
            ring: [const { UnsafeCell::new(MaybeUninit::uninit()) }; N],
        }
    }

    /// Allocates an empty queue directly on the heap.
    #[cfg(feature = "std")]
    pub fn boxed() -> Box<Self> {
        let () = CapacityCheck::<N>::OK;
        let queue = Box::<Self>::new_zeroed();
        trace::trace!(
            capacity = N,
            bytes = core::mem::size_of::<Self>(),
            "allocated boxed queue"
        );
        // SAFETY: zero is a valid `AtomicUsize` (counter 0) and a valid
        // `AtomicBool` (unclaimed); slots are `MaybeUninit` and need no
        // initialization. `CachePadded` only adds alignment.
        unsafe { queue.assume_init() }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots at some instant during the call.
    ///
    /// The two counters are loaded one after the other, not as a pair, so
    /// under concurrent use the result may be off by in-flight operations.
    /// Meant for monitoring; never decide whether to enqueue or dequeue on it.
    #[inline]
    pub fn len(&self) -> usize {
        // Tail first: any head observed afterwards is at least this tail.
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        head.wrapping_sub(tail).min(N)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Claims the producer role.
    ///
    /// The handle resumes from the live counters, so a queue can be handed to
    /// a new producer after the previous handle is dropped.
    pub fn producer(&self) -> Result<Producer<'_, T, N>, SpscError> {
        if self
            .producer_claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            trace::warn!(capacity = N, "rejected second producer claim");
            return Err(SpscError::ProducerClaimed);
        }

        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        trace::debug!(head, tail, capacity = N, "producer claimed");

        Ok(Producer {
            queue: self,
            head,
            cached_tail: tail,
        })
    }

    /// Claims the consumer role. See [`SpscQueue::producer`].
    pub fn consumer(&self) -> Result<Consumer<'_, T, N>, SpscError> {
        if self
            .consumer_claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            trace::warn!(capacity = N, "rejected second consumer claim");
            return Err(SpscError::ConsumerClaimed);
        }

        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        trace::debug!(head, tail, capacity = N, "consumer claimed");

        Ok(Consumer {
            queue: self,
            tail,
            cached_head: head,
        })
    }

    /// Claims both roles at once.
    pub fn split(&self) -> Result<(Producer<'_, T, N>, Consumer<'_, T, N>), SpscError> {
        let producer = self.producer()?;
        let consumer = self.consumer()?;
        Ok((producer, consumer))
    }

    pub(super) fn release_producer(&self) {
        self.producer_claimed.store(false, Ordering::Release);
    }

    pub(super) fn release_consumer(&self) {
        self.consumer_claimed.store(false, Ordering::Release);
    }

    /// Occupied values, oldest first, for logging and inspection.
    ///
    /// Exclusive access means no handle is alive, so nothing can change the
    /// window while it is read.
    pub fn window(&mut self) -> Window<'_, T> {
        let tail = *self.tail.get_mut();
        let head = *self.head.get_mut();
        Window::new(&self.ring, tail, head)
    }
}

impl<T, const N: usize> fmt::Debug for SpscQueue<T, N>
where
    T: Element,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpscQueue")
            .field("capacity", &N)
            .field("head", &self.head.load(Ordering::Acquire))
            .field("tail", &self.tail.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    enum Op {
        Enqueue(u64),
        Dequeue,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![any::<u64>().prop_map(Op::Enqueue), Just(Op::Dequeue)]
    }

    proptest! {
        #[test]
        fn behaves_like_a_bounded_fifo(ops in proptest::collection::vec(op_strategy(), 0..512)) {
            let queue = SpscQueue::<u64, 8>::new();
            let (mut producer, mut consumer) = queue.split().unwrap();
            let mut model = VecDeque::new();

            for op in &ops {
                match *op {
                    Op::Enqueue(value) => {
                        let accepted = producer.enqueue(value);
                        prop_assert_eq!(accepted, model.len() < 8, "enqueue fails iff full");
                        if accepted {
                            model.push_back(value);
                        }
                    }
                    Op::Dequeue => {
                        prop_assert_eq!(consumer.dequeue(), model.pop_front(), "FIFO order");
                    }
                }
                prop_assert!(queue.len() <= queue.capacity());
                prop_assert_eq!(queue.len(), model.len());
            }
        }
    }
}
