use super::queue::SpscQueue;
use crate::precondition::{CapacityCheck, Element};
use crate::trace;
use core::sync::atomic::Ordering;

/// Write end of an [`SpscQueue`].
///
/// At most one exists per queue at a time. Dropping it gives the producer role
/// back to the queue.
pub struct Producer<'a, T, const N: usize>
where
    T: Element,
{
    pub(super) queue: &'a SpscQueue<T, N>,
    /// Local copy of the published head; only this handle advances it.
    pub(super) head: usize,
    /// Last tail observed. Never ahead of the real tail.
    pub(super) cached_tail: usize,
}

impl<T, const N: usize> Drop for Producer<'_, T, N>
where
    T: Element,
{
    fn drop(&mut self) {
        trace::debug!(head = self.head, "producer released");
        self.queue.release_producer();
    }
}

impl<T, const N: usize> Producer<'_, T, N>
where
    T: Element,
{
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Slots that can be filled without failing. A lower bound while the
    /// consumer is running.
    #[inline]
    pub fn free_space(&mut self) -> usize {
        let free = N - self.head.wrapping_sub(self.cached_tail);
        if free != 0 {
            return free;
        }

        self.cached_tail = self.queue.tail.load(Ordering::Acquire);
        N - self.head.wrapping_sub(self.cached_tail)
    }

    #[inline]
    pub fn is_full(&mut self) -> bool {
        self.free_space() == 0
    }

    /// Occupied slots as seen from the producer. An upper bound while the
    /// consumer is running.
    #[inline]
    pub fn len(&mut self) -> usize {
        self.cached_tail = self.queue.tail.load(Ordering::Acquire);
        self.head.wrapping_sub(self.cached_tail)
    }

    /// Copies `value` into the next slot and publishes it.
    ///
    /// Returns `false` without touching the queue when all `N` slots are
    /// occupied. Never blocks and never retries.
    #[cfg_attr(feature = "profiling", inline(never))]
    #[cfg_attr(not(feature = "profiling"), inline(always))]
    #[must_use = "a full queue rejects the value"]
    pub fn enqueue(&mut self, value: T) -> bool {
        // check whether the queue is full and refresh the cached tail if necessary
        if self.head.wrapping_sub(self.cached_tail) >= N {
            self.cached_tail = self.queue.tail.load(Ordering::Acquire);

            if self.head.wrapping_sub(self.cached_tail) >= N {
                return false;
            }
        }

        let slot = self.head & CapacityCheck::<N>::MASK;

        // SAFETY: `head - tail < N`, so the consumer released this slot (the
        // acquire load of tail above, or an earlier one, ordered that release
        // before this write) and will not read it until head is published.
        unsafe { (*self.queue.ring.get_unchecked(slot).get()).write(value) };

        self.head = self.head.wrapping_add(1);

        self.queue.head.store(self.head, Ordering::Release);

        true
    }
}
