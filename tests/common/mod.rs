//! Shared test doubles: capturing transport, recording delay, shell rig.

#![allow(dead_code)]

use std::fmt;

use embedded_hal::delay::DelayNs;
use servo_console::config::BoardProfile;
use servo_console::{MemoryTimer, PwmTimer, RxLatch, Shell, Transport};

/// Transport that keeps everything sent.
#[derive(Default)]
pub struct CaptureTx {
    pub bytes: Vec<u8>,
}

impl CaptureTx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Everything captured so far; clears the capture.
    pub fn take(&mut self) -> String {
        let text = self.text();
        self.bytes.clear();
        text
    }
}

impl Transport for CaptureTx {
    fn send_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

impl fmt::Write for CaptureTx {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_str(s);
        Ok(())
    }
}

/// Delay that records calls instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub ms_calls: Vec<u32>,
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// Delay that raises "pending-input" on its `after`-th call.
pub struct InjectingDelay<'r> {
    pub rx: &'r RxLatch,
    pub after: usize,
    pub byte: u8,
    pub calls: usize,
}

impl DelayNs for InjectingDelay<'_> {
    fn delay_ns(&mut self, _ns: u32) {
        self.calls += 1;
        if self.calls == self.after {
            self.rx.on_rx(self.byte);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms.saturating_mul(1_000_000));
    }
}

/// One memory timer per group of `profile`.
pub fn timers(profile: &BoardProfile) -> Vec<MemoryTimer> {
    profile
        .groups
        .iter()
        .map(|g| MemoryTimer::new(g.timer_id).unwrap())
        .collect()
}

/// Run `f` against a freshly bound shell on memory timers.
pub fn with_shell<R>(
    profile: BoardProfile,
    f: impl FnOnce(&mut Shell<'_>, &RxLatch, &mut CaptureTx) -> R,
) -> R {
    let mut timers = timers(&profile);
    let groups = profile
        .bind(timers.iter_mut().map(|t| t as &mut dyn PwmTimer))
        .unwrap();
    let rx = RxLatch::new();
    let mut delay = RecordingDelay::default();
    let mut shell = Shell::new(groups, &mut delay, &rx).unwrap();
    let mut out = CaptureTx::new();
    f(&mut shell, &rx, &mut out)
}

/// Deliver bytes one at a time, polling after each like the main loop.
pub fn send(shell: &mut Shell<'_>, rx: &RxLatch, out: &mut CaptureTx, bytes: &[u8]) {
    for &byte in bytes {
        rx.on_rx(byte);
        shell.poll(out);
    }
}

/// Type a full command line followed by Enter.
pub fn type_line(shell: &mut Shell<'_>, rx: &RxLatch, out: &mut CaptureTx, line: &str) {
    send(shell, rx, out, line.as_bytes());
    send(shell, rx, out, b"\r");
}

/// Level of channel `channel` in group `group`.
pub fn level(shell: &Shell<'_>, group: usize, channel: usize) -> u16 {
    shell.controller().groups()[group].channels()[channel].level
}
