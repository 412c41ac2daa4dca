//! ANSI escape-sequence decoder.
//!
//! ```text
//!            ESC               '['
//! Normal ─────────▶ SawEscape ─────▶ SawBracket
//!   ▲                  │ other           │ 'A'..'D' → Arrow
//!   │                  ▼ (re-read)       │ other    → dropped
//!   └──────────────────┴─────────────────┘
//! ```
//!
//! CR is Enter from every state and resets the decoder. A byte that breaks
//! off an `ESC` (anything but `[`) is decoded again from `Normal`, so a
//! stray escape never eats the key after it.

const ESC: u8 = 0x1B;
const CR: u8 = b'\r';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Normal,
    SawEscape,
    SawBracket,
}

/// Cursor keys as sent after `ESC [`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Right,
    Left,
}

impl Arrow {
    fn from_letter(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Self::Up),
            b'B' => Some(Self::Down),
            b'C' => Some(Self::Right),
            b'D' => Some(Self::Left),
            _ => None,
        }
    }

    /// Final byte of the escape sequence.
    pub fn letter(self) -> u8 {
        match self {
            Self::Up => b'A',
            Self::Down => b'B',
            Self::Right => b'C',
            Self::Left => b'D',
        }
    }
}

/// One decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Arrow(Arrow),
    /// Any other byte, unchanged.
    Plain(u8),
}

#[derive(Debug, Clone)]
pub struct EscapeDecoder {
    state: DecoderState,
}

impl EscapeDecoder {
    pub const fn new() -> Self {
        Self { state: DecoderState::Normal }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = DecoderState::Normal;
    }

    /// Feed one byte. `None` while a sequence is still incomplete.
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        if byte == CR {
            self.reset();
            return Some(Key::Enter);
        }

        match (self.state, byte) {
            (_, ESC) => {
                self.state = DecoderState::SawEscape;
                None
            }
            (DecoderState::Normal, _) => Some(Key::Plain(byte)),
            (DecoderState::SawEscape, b'[') => {
                self.state = DecoderState::SawBracket;
                None
            }
            (DecoderState::SawEscape, _) => {
                self.reset();
                self.feed(byte)
            }
            (DecoderState::SawBracket, _) => {
                self.reset();
                Arrow::from_letter(byte).map(Key::Arrow)
            }
        }
    }
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new()
    }
}
