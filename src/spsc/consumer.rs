use super::queue::SpscQueue;
use crate::precondition::{CapacityCheck, Element};
use crate::trace;
use crate::window::Window;
use core::sync::atomic::Ordering;

/// Read end of an [`SpscQueue`].
///
/// At most one exists per queue at a time. Dropping it gives the consumer role
/// back to the queue.
pub struct Consumer<'a, T, const N: usize>
where
    T: Element,
{
    pub(super) queue: &'a SpscQueue<T, N>,
    pub(super) tail: usize,
    pub(super) cached_head: usize,
}

impl<T, const N: usize> Drop for Consumer<'_, T, N>
where
    T: Element,
{
    fn drop(&mut self) {
        trace::debug!(tail = self.tail, "consumer released");
        self.queue.release_consumer();
    }
}

impl<T, const N: usize> Consumer<'_, T, N>
where
    T: Element,
{
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Values ready to dequeue. A lower bound while the producer is running.
    #[inline]
    pub fn len(&mut self) -> usize {
        self.cached_head = self.queue.head.load(Ordering::Acquire);
        self.cached_head.wrapping_sub(self.tail)
    }

    #[inline]
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Copies the oldest value out and releases its slot to the producer.
    ///
    /// Returns `None` without touching the queue when nothing is published.
    #[cfg_attr(feature = "profiling", inline(never))]
    #[cfg_attr(not(feature = "profiling"), inline(always))]
    pub fn dequeue(&mut self) -> Option<T> {
        if self.tail == self.cached_head {
            self.cached_head = self.queue.head.load(Ordering::Acquire);

            if self.tail == self.cached_head {
                return None;
            }
        }

        let slot = self.tail & CapacityCheck::<N>::MASK;

        // SAFETY: `tail < head` and the acquire load of head synchronized with
        // the release store that published this slot, so it is initialized and
        // the producer will not overwrite it until tail moves past it.
        let value = unsafe { (*self.queue.ring.get_unchecked(slot).get()).assume_init_read() };

        self.tail = self.tail.wrapping_add(1);

        self.queue.tail.store(self.tail, Ordering::Release);

        Some(value)
    }

    /// Published values not yet dequeued, oldest first.
    ///
    /// Safe while the producer keeps running: it never writes inside the
    /// window, and the window cannot shrink while it is borrowed.
    pub fn window(&mut self) -> Window<'_, T> {
        self.cached_head = self.queue.head.load(Ordering::Acquire);
        Window::new(&self.queue.ring, self.tail, self.cached_head)
    }
}
