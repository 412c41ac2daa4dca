//! Game-mode key bindings.
//!
//! Arrow keys drive group 0; the same four letters typed without an escape
//! prefix drive group 1. `w`/`s` and `d`/`a` move output C of each group.

use crate::pwm::{Direction, Output};

use super::escape::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameBinding {
    pub key: u8,
    /// Key must arrive as the final byte of `ESC [`.
    pub bracketed: bool,
    pub group: usize,
    pub output: Output,
    pub direction: Direction,
}

const fn bind(key: u8, bracketed: bool, group: usize, output: Output, direction: Direction) -> GameBinding {
    GameBinding { key, bracketed, group, output, direction }
}

pub static GAME_KEYMAP: &[GameBinding] = &[
    bind(b'A', true, 0, Output::A, Direction::Up),
    bind(b'B', true, 0, Output::A, Direction::Down),
    bind(b'C', true, 0, Output::B, Direction::Up),
    bind(b'D', true, 0, Output::B, Direction::Down),
    bind(b'A', false, 1, Output::A, Direction::Up),
    bind(b'B', false, 1, Output::A, Direction::Down),
    bind(b'C', false, 1, Output::B, Direction::Up),
    bind(b'D', false, 1, Output::B, Direction::Down),
    bind(b'w', false, 0, Output::C, Direction::Up),
    bind(b's', false, 0, Output::C, Direction::Down),
    bind(b'd', false, 1, Output::C, Direction::Up),
    bind(b'a', false, 1, Output::C, Direction::Down),
];

/// Binding for a decoded key, if any.
pub fn lookup(key: Key) -> Option<&'static GameBinding> {
    let (byte, bracketed) = match key {
        Key::Arrow(arrow) => (arrow.letter(), true),
        Key::Plain(byte) => (byte, false),
        Key::Enter => return None,
    };
    GAME_KEYMAP
        .iter()
        .find(|b| b.key == byte && b.bracketed == bracketed)
}
