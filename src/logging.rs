//! Non-blocking logging for the shell.
//!
//! ```text
//! main loop             LogStream             console
//! ─────────             ─────────             ───────
//!
//! rt_warn!() ─────────▶ [L0][L1][L2] ───────▶ `log` command / drain_to
//! never blocks           ring buffer           formats at leisure
//! ```
//!
//! Log calls never wait and never write to the terminal directly: the
//! operator's line must not be interleaved with diagnostics. Messages are
//! dropped and counted when the ring is full or another producer holds it.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::transport::RingBuffer;

/// Maximum message length; longer messages are truncated.
pub const MAX_MSG_LEN: usize = 64;

/// Log ring size (number of entries). Power of 2.
pub const LOG_BUFFER_SIZE: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Microseconds since boot.
    pub timestamp_us: i64,
    pub level: LogLevel,
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: LogEntry = LogEntry {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    pub fn message(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(text) => text,
            // Truncation may split a multibyte char; keep the valid prefix.
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring.
///
/// Built on the transport's SPSC [`RingBuffer`]; the `busy` flags turn
/// concurrent producers or consumers into drops instead of races.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    ring: RingBuffer<LogEntry, N>,
    pushing: AtomicBool,
    draining: AtomicBool,
    dropped: AtomicU32,
}

impl<const N: usize> LogStream<N> {
    pub const fn new() -> Self {
        Self {
            ring: RingBuffer::new(LogEntry::EMPTY),
            pushing: AtomicBool::new(false),
            draining: AtomicBool::new(false),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue one entry. Returns `false` if it was dropped.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        if self.pushing.swap(true, Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let mut entry = LogEntry::EMPTY;
        entry.timestamp_us = timestamp_us;
        entry.level = level;
        entry.len = msg.len().min(MAX_MSG_LEN) as u8;
        entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);

        let queued = self.ring.push(entry).is_ok();
        self.pushing.store(false, Ordering::Release);

        if !queued {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        queued
    }

    /// Take the oldest entry.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        if self.draining.swap(true, Ordering::Acquire) {
            return None;
        }
        let entry = self.ring.pop();
        self.draining.store(false, Ordering::Release);
        entry
    }

    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn has_entries(&self) -> bool {
        !self.ring.is_empty()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.ring.len()
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a fixed buffer, truncating silently.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl fmt::Write for BufWriter<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let bytes = s.as_bytes();
            let to_write = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = fmt::write(&mut writer, args);
    writer.pos
}

/// Microseconds since boot.
#[cfg(target_os = "espidf")]
pub fn timestamp_us() -> i64 {
    // SAFETY: esp_timer_get_time has no preconditions once the IDF is up.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// Monotonic stand-in off target: one tick per call.
#[cfg(not(target_os = "espidf"))]
pub fn timestamp_us() -> i64 {
    use core::sync::atomic::AtomicI64;

    static TICKS: AtomicI64 = AtomicI64::new(0);
    TICKS.fetch_add(1, Ordering::Relaxed)
}

/// Write one entry as `[timestamp] LEVEL: message\r\n`.
pub fn write_entry<W: fmt::Write + ?Sized>(out: &mut W, entry: &LogEntry) -> fmt::Result {
    write!(
        out,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Drain every queued entry into `out`. Returns the number written.
pub fn drain_to<W: fmt::Write + ?Sized, const N: usize>(stream: &LogStream<N>, out: &mut W) -> usize {
    let mut count = 0;
    while let Some(entry) = stream.drain() {
        let _ = write_entry(out, &entry);
        count += 1;
    }
    count
}

/// Log into a stream with the current timestamp.
///
/// ```ignore
/// rt_log!(LogLevel::Info, SHELL_LOG, "mode {}", name);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($crate::logging::timestamp_us(), $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_trace {
    ($stream:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Trace, $stream, $($arg)*)
    };
}
