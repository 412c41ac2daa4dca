//! Transmit path: bounded queue drained one byte per "data register empty"
//! interrupt.
//!
//! ```text
//! main loop                TxQueue                 TX interrupt
//! ─────────                ───────                 ────────────
//! send_byte() ──────────▶ [b0][b1][..] ──────────▶ on_tx_ready() ──▶ UDR
//! spins while full         one slot free           disarms when empty
//! ```

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use super::ring::RingBuffer;
use super::Transport;
use crate::config::TX_BUFFER_SIZE;

/// Non-blocking send probe failed: every slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxError {
    WouldBlock,
}

/// Transmit queue shared between `send` callers and the TX interrupt.
pub struct TxQueue<const N: usize = TX_BUFFER_SIZE> {
    ring: RingBuffer<u8, N>,
    /// Mirrors the "data register empty" interrupt enable bit.
    armed: AtomicBool,
}

impl<const N: usize> TxQueue<N> {
    pub const fn new() -> Self {
        Self {
            ring: RingBuffer::new(0),
            armed: AtomicBool::new(false),
        }
    }

    /// Queue one byte without waiting.
    ///
    /// Returns `Ok(true)` when this push re-armed the drain interrupt, i.e.
    /// the queue had run dry and the interrupt had switched itself off.
    #[inline]
    pub fn try_send(&self, byte: u8) -> Result<bool, TxError> {
        self.ring.push(byte).map_err(|_| TxError::WouldBlock)?;
        Ok(!self.armed.swap(true, Ordering::AcqRel))
    }

    /// Queue one byte, spinning until the interrupt frees a slot.
    pub fn send(&self, byte: u8) {
        while self.try_send(byte).is_err() {
            core::hint::spin_loop();
        }
    }

    /// Body of the "data register empty" interrupt.
    ///
    /// Yields the next byte to load into the data register, or disarms the
    /// interrupt and yields `None` once the queue is empty. Must not be
    /// preempted by a producer.
    #[inline]
    pub fn on_tx_ready(&self) -> Option<u8> {
        match self.ring.pop() {
            Some(byte) => Some(byte),
            None => {
                self.armed.store(false, Ordering::Release);
                None
            }
        }
    }

    /// Whether the drain interrupt is currently enabled.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Bytes waiting to go out.
    #[inline]
    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Maximum number of outstanding bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        RingBuffer::<u8, N>::capacity()
    }
}

impl<const N: usize> Default for TxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Transport`] writing through a [`TxQueue`].
///
/// `wait` runs each time the queue is found full. With a real drain
/// interrupt it only needs to spin; on a polled UART it pumps the queue into
/// the peripheral itself.
pub struct SerialTx<'q, W, const N: usize = TX_BUFFER_SIZE>
where
    W: FnMut(&TxQueue<N>),
{
    queue: &'q TxQueue<N>,
    wait: W,
}

impl<'q, W, const N: usize> SerialTx<'q, W, N>
where
    W: FnMut(&TxQueue<N>),
{
    pub fn new(queue: &'q TxQueue<N>, wait: W) -> Self {
        Self { queue, wait }
    }
}

impl<'q, W, const N: usize> Transport for SerialTx<'q, W, N>
where
    W: FnMut(&TxQueue<N>),
{
    fn send_byte(&mut self, byte: u8) {
        while self.queue.try_send(byte).is_err() {
            (self.wait)(self.queue);
        }
    }
}

impl<'q, W, const N: usize> fmt::Write for SerialTx<'q, W, N>
where
    W: FnMut(&TxQueue<N>),
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_str(s);
        Ok(())
    }
}
