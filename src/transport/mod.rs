//! Byte transport between the operator's terminal and the shell.
//!
//! The only code touching interrupt context lives here:
//! - [`RxLatch::on_rx`] is the receive interrupt body
//! - [`TxQueue::on_tx_ready`] is the "data register empty" interrupt body
//!
//! Everything else talks to the terminal through [`Transport`].

pub mod ring;
pub mod rx;
pub mod tx;

pub use ring::RingBuffer;
pub use rx::RxLatch;
pub use tx::{SerialTx, TxError, TxQueue};

/// Outgoing byte stream capability.
///
/// Implementors provide `send_byte` plus `core::fmt::Write` (usually by
/// forwarding `write_str` to `send_str`), so handlers can use `write!`.
pub trait Transport: core::fmt::Write {
    /// Send one byte, waiting for buffer space if needed.
    fn send_byte(&mut self, byte: u8);

    /// Send every byte of `text`.
    fn send_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.send_byte(byte);
        }
    }
}
