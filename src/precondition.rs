//! Compile-time preconditions on queue parameters.
//!
//! Both checks run before any queue value can exist: the element bound is a
//! trait bound, and the capacity check is a constant evaluated when a
//! constructor is instantiated for a concrete `N`.
//!
//! A capacity that is not a power of two does not compile:
//!
//! ```compile_fail
//! let queue = spsc_queue::SpscQueue::<u32, 3>::new();
//! ```
//!
//! ```compile_fail
//! let queue = spsc_queue::SpscQueue::<u32, 100>::new();
//! ```
//!
//! Neither does a zero capacity:
//!
//! ```compile_fail
//! let queue = spsc_queue::SpscQueue::<u32, 0>::new();
//! ```
//!
//! Elements that own resources are rejected:
//!
//! ```compile_fail
//! let queue = spsc_queue::SpscQueue::<String, 4>::new();
//! ```
//!
//! ```compile_fail
//! let queue = spsc_queue::SpscQueue::<*const u8, 4>::new();
//! ```

/// Values that can travel through a queue.
///
/// Slots are written and read by plain bitwise copy, with no drop glue and no
/// coordinated construction, so an element must be `Copy`. It must also be
/// `Send` because the copy is observed on another thread.
pub trait Element: Copy + Send {}

impl<T: Copy + Send> Element for T {}

pub(crate) struct CapacityCheck<const N: usize>;

impl<const N: usize> CapacityCheck<N> {
    /// Fails compilation unless `N` is a non-zero power of two.
    pub(crate) const OK: () = assert!(
        N > 0 && N.is_power_of_two(),
        "queue capacity must be a non-zero power of two"
    );

    pub(crate) const MASK: usize = N - 1;
}
