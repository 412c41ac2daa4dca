//! Cooperative scheduler tying the transport to the interpreters.

use embedded_hal::delay::DelayNs;

use crate::config::{ConfigError, ARG_DELIMITER, VERSION};
use crate::log_globals::SHELL_LOG;
use crate::pwm::Groups;
use crate::rt_warn;
use crate::transport::{RxLatch, Transport};

use super::commands::{CommandTable, Dispatch, COMMANDS};
use super::controller::{Context, Controller};
use super::escape::{DecoderState, EscapeDecoder, Key};
use super::{tokenize, LineBuffer};

const BEL: u8 = 0x07;
const BACKSPACE: u8 = 0x08;
const DEL: u8 = 0x7F;

/// Shell state: the line being typed plus everything handlers operate on.
pub struct Shell<'a> {
    line: LineBuffer,
    /// CR seen; line waits for dispatch.
    command_ready: bool,
    decoder: EscapeDecoder,
    rx: &'a RxLatch,
    controller: Controller<'a>,
}

impl<'a> Shell<'a> {
    /// Shell over the built-in command table.
    pub fn new(groups: Groups<'a>, delay: &'a mut dyn DelayNs, rx: &'a RxLatch) -> Result<Self, ConfigError> {
        Self::with_table(groups, CommandTable::new(COMMANDS)?, delay, rx)
    }

    pub fn with_table(
        groups: Groups<'a>,
        table: CommandTable,
        delay: &'a mut dyn DelayNs,
        rx: &'a RxLatch,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            line: LineBuffer::new(),
            command_ready: false,
            decoder: EscapeDecoder::new(),
            rx,
            controller: Controller::new(groups, table, delay, rx)?,
        })
    }

    pub fn context(&self) -> Context {
        self.controller.context()
    }

    pub fn controller(&self) -> &Controller<'a> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<'a> {
        &mut self.controller
    }

    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn is_command_ready(&self) -> bool {
        self.command_ready
    }

    pub fn decoder_state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// One scheduler iteration.
    ///
    /// Takes the pending byte, if any, and hands it to the interpreter of
    /// the active context. In command mode a completed line is then
    /// tokenized and dispatched. Returns whether any work was done.
    pub fn poll(&mut self, out: &mut dyn Transport) -> bool {
        let mut worked = false;

        if let Some(byte) = self.rx.take() {
            self.feed(byte, out);
            worked = true;
        }

        if self.context() == Context::Command && self.command_ready {
            self.execute(out);
            worked = true;
        }

        worked
    }

    /// Interpret one received byte in the active context.
    pub fn feed(&mut self, byte: u8, out: &mut dyn Transport) {
        match self.context() {
            Context::Command => self.feed_line(byte, out),
            Context::Manual | Context::Game => self.feed_keypress(byte, out),
        }
    }

    fn feed_line(&mut self, byte: u8, out: &mut dyn Transport) {
        // Line is frozen until dispatched.
        if self.command_ready {
            return;
        }

        match self.decoder.feed(byte) {
            Some(Key::Enter) => self.command_ready = true,
            Some(Key::Plain(BACKSPACE | DEL)) => {
                if self.line.backspace() {
                    out.send_str("\x08 \x08");
                }
            }
            Some(Key::Plain(c @ 0x20..=0x7E)) => {
                if self.line.push(c) {
                    out.send_byte(c);
                } else {
                    out.send_byte(BEL);
                    rt_warn!(SHELL_LOG, "rx line full, dropped 0x{:02x}", c);
                }
            }
            // Arrow sequences are consumed whole so `[A` never lands in a
            // command line; other control bytes are ignored.
            _ => {}
        }
    }

    fn feed_keypress(&mut self, byte: u8, out: &mut dyn Transport) {
        let Some(key) = self.decoder.feed(byte) else {
            return;
        };

        match (self.context(), key) {
            (_, Key::Enter) => self.leave_mode(out),
            (Context::Manual, key) => self.controller.manual_key(key, out),
            (Context::Game, key) => self.controller.game_key(key),
            (Context::Command, _) => {}
        }
    }

    fn leave_mode(&mut self, out: &mut dyn Transport) {
        self.controller.exit_to_command();
        self.decoder.reset();
        self.line.clear();
        self.command_ready = false;
        out.send_str("\r\n");
        self.print_prompt(out);
    }

    /// Tokenize and dispatch the completed line, then reset it.
    fn execute(&mut self, out: &mut dyn Transport) -> Dispatch {
        out.send_str("\r\n");

        let table = self.controller.table();
        let result = {
            let args = tokenize(self.line.as_str(), ARG_DELIMITER);
            table.dispatch(&args, &mut self.controller, out)
        };

        self.line.clear();
        self.command_ready = false;

        if self.context() == Context::Command {
            self.print_prompt(out);
        }
        result
    }

    pub fn print_prompt(&self, out: &mut dyn Transport) {
        out.send_str("> ");
    }

    pub fn print_banner(&self, out: &mut dyn Transport) {
        out.send_str("\r\n");
        out.send_str(VERSION);
        out.send_str("\r\nType 'help' for commands.\r\n");
        self.print_prompt(out);
    }
}
