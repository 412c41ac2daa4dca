//! UART glue for the transport.
//!
//! The IDF driver owns the real interrupts and FIFOs, so the two interrupt
//! bodies of the transport are run from the main loop instead: received
//! bytes go through [`RxLatch::on_rx`] one at a time, and the TX queue is
//! drained with [`TxQueue::on_tx_ready`].

use embedded_hal::delay::DelayNs;
use esp_idf_svc::hal::delay::{FreeRtos, NON_BLOCK};
use esp_idf_svc::hal::uart::UartDriver;

use crate::transport::{RxLatch, TxQueue};

/// Move at most one received byte into the latch.
///
/// Only reads when the latch is free, so the driver FIFO holds further
/// bytes instead of overwriting the pending one.
pub fn poll_rx(uart: &UartDriver<'_>, latch: &RxLatch) {
    if latch.is_pending() {
        return;
    }
    let mut byte = [0u8; 1];
    if let Ok(1) = uart.read(&mut byte, NON_BLOCK) {
        latch.on_rx(byte[0]);
    }
}

/// Write everything queued for transmission.
pub fn drain_tx<const N: usize>(uart: &UartDriver<'_>, queue: &TxQueue<N>) {
    let mut chunk = [0u8; N];
    let mut len = 0;
    while let Some(byte) = queue.on_tx_ready() {
        chunk[len] = byte;
        len += 1;
        if len == chunk.len() {
            let _ = uart.write(&chunk[..len]);
            len = 0;
        }
    }
    if len > 0 {
        let _ = uart.write(&chunk[..len]);
    }
}

/// Delay that keeps feeding the RX latch while it waits.
///
/// Long operations such as the idle ramp poll the latch for new input; with
/// a polled UART that only works if something reads the driver meanwhile.
pub struct RxPumpDelay<'u, 'd> {
    uart: &'u UartDriver<'d>,
    latch: &'u RxLatch,
}

impl<'u, 'd> RxPumpDelay<'u, 'd> {
    pub fn new(uart: &'u UartDriver<'d>, latch: &'u RxLatch) -> Self {
        Self { uart, latch }
    }
}

impl DelayNs for RxPumpDelay<'_, '_> {
    fn delay_ns(&mut self, ns: u32) {
        FreeRtos::delay_us(ns.div_ceil(1000));
        poll_rx(self.uart, self.latch);
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
        poll_rx(self.uart, self.latch);
    }
}
