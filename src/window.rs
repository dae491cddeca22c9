//! Read-only view of the occupied part of a queue.

use core::cell::UnsafeCell;
use core::fmt;
use core::iter::FusedIterator;
use core::mem::MaybeUninit;

/// Copies of the values between `tail` and `head`, oldest first.
///
/// `Display` renders `[v0 v1 v2]`, `Debug` renders a list. Neither consumes
/// anything from the queue.
pub struct Window<'a, T> {
    ring: &'a [UnsafeCell<MaybeUninit<T>>],
    next: usize,
    end: usize,
}

impl<'a, T: Copy> Window<'a, T> {
    /// Callers guarantee every slot in `tail..head` is initialized and stays
    /// unwritten for `'a`.
    pub(crate) fn new(ring: &'a [UnsafeCell<MaybeUninit<T>>], tail: usize, head: usize) -> Self {
        debug_assert!(ring.len().is_power_of_two());
        debug_assert!(head.wrapping_sub(tail) <= ring.len());
        Self {
            ring,
            next: tail,
            end: head,
        }
    }
}

impl<T> Clone for Window<'_, T> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring,
            next: self.next,
            end: self.end,
        }
    }
}

impl<T: Copy> Iterator for Window<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.next == self.end {
            return None;
        }
        let slot = self.next & (self.ring.len() - 1);
        self.next = self.next.wrapping_add(1);

        // SAFETY: `slot` lies in the initialized, unwritten range promised to `new`.
        Some(unsafe { (*self.ring.get_unchecked(slot).get()).assume_init_read() })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.wrapping_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<T: Copy> ExactSizeIterator for Window<'_, T> {}

impl<T: Copy> FusedIterator for Window<'_, T> {}

impl<T: Copy + fmt::Display> fmt::Display for Window<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.clone().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(&value, f)?;
        }
        f.write_str("]")
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Window<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
