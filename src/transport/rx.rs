//! Receive path: a single-slot latch written by the RX interrupt.
//!
//! The interrupt only records the byte and raises "pending-input"; the active
//! keypress interpreter picks it up from the main loop. There is no queue: a
//! byte that arrives before the previous one was taken overwrites it. That
//! loss is counted, never prevented.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Interrupt-to-main-loop handoff for received bytes.
pub struct RxLatch {
    /// Set by the interrupt, cleared by `take()`.
    pending: AtomicBool,

    /// Last received byte (the "data register").
    byte: AtomicU8,

    /// Bytes received since boot.
    received: AtomicU32,

    /// Bytes overwritten before the main loop read them.
    lost: AtomicU32,
}

impl RxLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            byte: AtomicU8::new(0),
            received: AtomicU32::new(0),
            lost: AtomicU32::new(0),
        }
    }

    /// Body of the receive interrupt. Never blocks.
    #[inline]
    pub fn on_rx(&self, byte: u8) {
        if self.pending.load(Ordering::Acquire) {
            self.lost.fetch_add(1, Ordering::Relaxed);
        }
        self.byte.store(byte, Ordering::Release);
        self.received.fetch_add(1, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Whether a byte is waiting for the interpreter.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Read the waiting byte and lower "pending-input".
    #[inline]
    pub fn take(&self) -> Option<u8> {
        if !self.pending.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.byte.load(Ordering::Acquire);
        self.pending.store(false, Ordering::Release);
        Some(byte)
    }

    #[inline]
    pub fn received(&self) -> u32 {
        self.received.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lost(&self) -> u32 {
        self.lost.load(Ordering::Relaxed)
    }
}

impl Default for RxLatch {
    fn default() -> Self {
        Self::new()
    }
}
