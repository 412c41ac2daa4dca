//! Transport tests: TX queue backpressure and ordering, RX latch handoff

mod common;

use common::CaptureTx;
use servo_console::transport::{RingBuffer, RxLatch, SerialTx, Transport, TxError, TxQueue};

#[test]
fn test_queue_of_eight_holds_seven() {
    let queue = TxQueue::<8>::new();
    assert_eq!(queue.capacity(), 7);

    for byte in 0..7u8 {
        assert!(queue.try_send(byte).is_ok(), "byte {} should fit", byte);
    }
    assert!(queue.is_full());
    assert_eq!(queue.try_send(7), Err(TxError::WouldBlock));
    assert_eq!(queue.pending(), 7);
}

#[test]
fn test_drain_restores_capacity_in_order() {
    let queue = TxQueue::<8>::new();
    for byte in 0..7u8 {
        queue.try_send(byte).unwrap();
    }

    assert_eq!(queue.on_tx_ready(), Some(0));
    assert!(queue.try_send(7).is_ok());

    let drained: Vec<u8> = std::iter::from_fn(|| queue.on_tx_ready()).collect();
    assert_eq!(drained, [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(queue.pending(), 0);
}

#[test]
fn test_fifo_across_many_wraps() {
    let queue = TxQueue::<8>::new();
    let mut drained = Vec::new();

    for byte in 0..=255u8 {
        if queue.is_full() {
            drained.extend(queue.on_tx_ready());
        }
        queue.try_send(byte).unwrap();
    }
    drained.extend(std::iter::from_fn(|| queue.on_tx_ready()));

    let expected: Vec<u8> = (0..=255u8).collect();
    assert_eq!(drained, expected);
}

#[test]
fn test_interrupt_armed_only_on_transition() {
    let queue = TxQueue::<8>::new();

    assert_eq!(queue.try_send(b'a'), Ok(true));
    assert_eq!(queue.try_send(b'b'), Ok(false));

    while queue.on_tx_ready().is_some() {}
    assert!(!queue.is_armed());

    assert_eq!(queue.try_send(b'c'), Ok(true));
}

#[test]
fn test_send_blocks_until_consumer_drains() {
    use std::sync::Arc;
    use std::thread;

    let queue = Arc::new(TxQueue::<8>::new());
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut got = Vec::new();
            while got.len() < 100 {
                if let Some(b) = queue.on_tx_ready() {
                    got.push(b);
                }
            }
            got
        })
    };

    for byte in 0..100u8 {
        queue.send(byte);
    }

    let got = consumer.join().unwrap();
    let expected: Vec<u8> = (0..100u8).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_serial_tx_writes_formatted_text() {
    use std::fmt::Write;

    let queue = TxQueue::<64>::new();
    let mut out = Vec::new();
    {
        let mut tx = SerialTx::new(&queue, |q: &TxQueue<64>| out.extend(q.on_tx_ready()));
        write!(tx, "Level {}", 42).unwrap();
        tx.send_byte(b'!');
    }
    out.extend(std::iter::from_fn(|| queue.on_tx_ready()));
    assert_eq!(out, b"Level 42!");
}

#[test]
fn test_rx_latch_single_slot() {
    let rx = RxLatch::new();

    rx.on_rx(b'x');
    assert!(rx.is_pending());
    assert_eq!(rx.take(), Some(b'x'));
    assert!(!rx.is_pending());

    // A second byte before the first is taken replaces it.
    rx.on_rx(b'1');
    rx.on_rx(b'2');
    assert_eq!(rx.take(), Some(b'2'));
    assert_eq!(rx.lost(), 1);
    assert_eq!(rx.received(), 3);
}

#[test]
fn test_ring_capacity_is_one_less_than_slots() {
    assert_eq!(RingBuffer::<u8, 64>::capacity(), 63);
    assert_eq!(RingBuffer::<u32, 2>::capacity(), 1);
}

#[test]
fn test_capture_transport_send_str() {
    let mut out = CaptureTx::new();
    out.send_str("ok\r\n");
    assert_eq!(out.text(), "ok\r\n");
}
