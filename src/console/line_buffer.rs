//! Line buffer for command-mode input

use crate::config::RX_LINE_SIZE;

/// Characters a line can hold; one byte of the buffer stays reserved.
pub const LINE_CAPACITY: usize = RX_LINE_SIZE - 1;

/// The line being typed in command mode.
pub struct LineBuffer {
    buf: [u8; RX_LINE_SIZE],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; RX_LINE_SIZE],
            len: 0,
        }
    }

    /// Append a character. Returns `false` and stores nothing when full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[self.len] = c;
        self.len += 1;
        true
    }

    /// Remove the last character. Returns `false` on an empty line.
    pub fn backspace(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        true
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if no more characters fit
    pub fn is_full(&self) -> bool {
        self.len >= LINE_CAPACITY
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
