//! Serial command shell
//!
//! Polled from the main loop, one received byte per iteration.
//! Zero heap allocation - all fixed buffers.

pub mod commands;
pub mod controller;
pub mod error;
pub mod escape;
pub mod keymap;
pub mod line_buffer;
pub mod parser;
pub mod shell;

pub use commands::{CommandDescriptor, CommandTable, Dispatch, COMMANDS};
pub use controller::{Context, Controller, Slider};
pub use error::CommandError;
pub use escape::{Arrow, DecoderState, EscapeDecoder, Key};
pub use keymap::{GameBinding, GAME_KEYMAP};
pub use line_buffer::{LineBuffer, LINE_CAPACITY};
pub use parser::{tokenize, ArgVector};
pub use shell::Shell;
