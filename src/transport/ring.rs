//! Bounded SPSC ring buffer.
//!
//! One producer (main loop), one consumer (interrupt), coordinated only
//! through the two atomic indices. One slot is always left empty so that
//! `head == tail` means empty and `head + 1 == tail` means full; a buffer of
//! `N` slots therefore holds at most `N - 1` items.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Fixed-capacity FIFO shared between the main loop and an interrupt.
pub struct RingBuffer<T, const N: usize> {
    slots: UnsafeCell<[T; N]>,
    /// Next slot to write (producer owned).
    head: AtomicUsize,
    /// Next slot to read (consumer owned).
    tail: AtomicUsize,
}

// SAFETY: a slot is written only by the producer while it lies outside
// [tail, head), and read only by the consumer while it lies inside. The
// Release store on each index publishes the slot contents to the other side.
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}
unsafe impl<T: Send, const N: usize> Send for RingBuffer<T, N> {}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    const MASK: usize = N - 1;

    /// Create an empty buffer, every slot pre-filled with `fill`.
    pub const fn new(fill: T) -> Self {
        assert!(N.is_power_of_two() && N >= 2, "Ring size must be a power of 2");

        Self {
            slots: UnsafeCell::new([fill; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Append an item (producer side).
    ///
    /// Hands the item back if the buffer is full.
    #[inline]
    pub fn push(&self, item: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & Self::MASK;

        if next == self.tail.load(Ordering::Acquire) {
            return Err(item);
        }

        // SAFETY: `head` is outside the readable window, only we touch it.
        unsafe {
            (*self.slots.get())[head] = item;
        }

        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Remove the oldest item (consumer side).
    #[inline]
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: `tail` is inside the readable window, producer won't write it.
        let item = unsafe { (*self.slots.get())[tail] };

        self.tail.store((tail + 1) & Self::MASK, Ordering::Release);
        Some(item)
    }

    /// Number of items waiting.
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) & Self::MASK
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == Self::capacity()
    }

    /// Maximum number of items held at once.
    #[inline]
    pub const fn capacity() -> usize {
        N - 1
    }

    /// Discard everything queued (consumer side).
    #[inline]
    pub fn clear(&self) {
        let head = self.head.load(Ordering::Acquire);
        self.tail.store(head, Ordering::Release);
    }
}
