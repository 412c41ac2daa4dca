//! Application state reachable from command handlers and key interpreters.
//!
//! Owns the channel groups, the current selection, the active [`Context`]
//! and the manual-mode slider. The line buffer and escape decoder live in
//! [`super::Shell`], so handlers can borrow this while the argument vector
//! still borrows the line.

use embedded_hal::delay::DelayNs;

use crate::config::{ConfigError, SLIDER_WIDTH};
use crate::log_globals::SHELL_LOG;
use crate::pwm::{Channel, ChannelMut, Direction, Group, Groups, Output, Ramp, SinkError, Step};
use crate::transport::{RxLatch, Transport};
use crate::{rt_error, rt_info};

use super::commands::CommandTable;
use super::escape::{Arrow, Key};
use super::keymap::{self, GAME_KEYMAP};

/// Which interpreter consumes incoming bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Command,
    Manual,
    Game,
}

impl Context {
    pub fn name(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Manual => "manual",
            Self::Game => "game",
        }
    }
}

/// Manual-mode level bar: `pos` filled cells out of `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slider {
    pub pos: u16,
    pub width: u16,
}

pub struct Controller<'a> {
    groups: Groups<'a>,
    group: usize,
    channel: usize,
    context: Context,
    slider: Slider,
    table: CommandTable,
    delay: &'a mut dyn DelayNs,
    rx: &'a RxLatch,
}

impl<'a> Controller<'a> {
    /// Selects channel 0 of group 0.
    pub fn new(
        groups: Groups<'a>,
        table: CommandTable,
        delay: &'a mut dyn DelayNs,
        rx: &'a RxLatch,
    ) -> Result<Self, ConfigError> {
        if groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        if groups.iter().any(|g| g.channels().is_empty()) {
            return Err(ConfigError::EmptyGroup);
        }

        Ok(Self {
            groups,
            group: 0,
            channel: 0,
            context: Context::Command,
            slider: Slider::default(),
            table,
            delay,
            rx,
        })
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn slider(&self) -> Slider {
        self.slider
    }

    pub fn table(&self) -> CommandTable {
        self.table
    }

    pub fn rx(&self) -> &'a RxLatch {
        self.rx
    }

    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    /// Game mode needs a second group for its letter bindings.
    pub fn game_available(&self) -> bool {
        self.groups.len() > 1
    }

    /// Selected `(group, channel)` indices.
    pub fn selection(&self) -> (usize, usize) {
        (self.group, self.channel)
    }

    pub fn selected_group(&self) -> Option<&Group<'a>> {
        self.groups.get(self.group)
    }

    pub fn selected(&self) -> Option<&Channel> {
        self.selected_group()?.channel(self.channel)
    }

    pub fn selected_mut(&mut self) -> Option<ChannelMut<'_, 'a>> {
        self.groups.get_mut(self.group)?.channel_mut(self.channel)
    }

    /// Make group `index` current, on its first channel.
    pub fn select_group(&mut self, index: usize) -> bool {
        if index >= self.groups.len() {
            return false;
        }
        self.group = index;
        self.channel = 0;
        true
    }

    /// Make `output` of the current group the selected channel.
    pub fn select_output(&mut self, output: Output) -> bool {
        match self.selected_group().and_then(|g| g.find(output)) {
            Some(index) => {
                self.channel = index;
                true
            }
            None => false,
        }
    }

    /// Step any channel by `(group, output)`. Unknown pairs are ignored.
    pub fn step(&mut self, group: usize, output: Output, direction: Direction) -> Result<Step, SinkError> {
        let Some(group) = self.groups.get_mut(group) else {
            return Ok(Step::Saturated);
        };
        match group.find(output).and_then(|index| group.channel_mut(index)) {
            Some(mut channel) => channel.step(direction),
            None => Ok(Step::Saturated),
        }
    }

    /// Ramp the selected channel to idle; stops early on new input.
    pub fn idle(&mut self) -> Result<Ramp, SinkError> {
        let rx = self.rx;
        let Some(mut channel) = self
            .groups
            .get_mut(self.group)
            .and_then(|g| g.channel_mut(self.channel))
        else {
            return Ok(Ramp::Reached);
        };

        let ramp = channel.ramp_to_idle(&mut *self.delay, &mut || rx.is_pending())?;
        if ramp == Ramp::Interrupted {
            if let Some(channel) = self.selected() {
                rt_info!(SHELL_LOG, "idle ramp interrupted at level {}", channel.level);
            }
        }
        Ok(ramp)
    }

    // --- Context transitions ---

    /// Switch to manual mode and draw the slider at the current level.
    pub fn enter_manual(&mut self, out: &mut dyn Transport) {
        let Some(channel) = self.selected().copied() else {
            return;
        };

        let width = channel.config.steps().min(SLIDER_WIDTH);
        self.slider = Slider {
            pos: channel.offset().min(width),
            width,
        };
        self.context = Context::Manual;
        rt_info!(SHELL_LOG, "mode manual, channel {}", channel.output.letter());

        out.send_str("\r\n[MANUAL MODE] use up and down keys to change level; enter to exit\r\n");
        for _ in 0..width + 2 {
            out.send_byte(b' ');
        }
        out.send_str("]\r[");
        for _ in 0..self.slider.pos {
            out.send_byte(b'=');
        }
    }

    /// Switch to game mode and print the keymap.
    pub fn enter_game(&mut self, out: &mut dyn Transport) {
        self.context = Context::Game;
        rt_info!(SHELL_LOG, "mode game, {} groups", self.groups.len());

        out.send_str("\r\n[GAME MODE] enter to exit\r\n");
        for binding in GAME_KEYMAP.iter().filter(|b| b.group < self.groups.len()) {
            let _ = write_binding(out, binding);
        }
    }

    /// Back to command mode.
    pub fn exit_to_command(&mut self) {
        if self.context != Context::Command {
            rt_info!(SHELL_LOG, "leaving {} mode", self.context.name());
        }
        self.context = Context::Command;
    }

    // --- Key interpreters ---

    /// Manual mode: up/down arrows step the selected channel and the slider.
    pub fn manual_key(&mut self, key: Key, out: &mut dyn Transport) {
        let direction = match key {
            Key::Arrow(Arrow::Up) => Direction::Up,
            Key::Arrow(Arrow::Down) => Direction::Down,
            _ => return,
        };

        let moved = match self.selected_mut().map(|mut c| c.step(direction)) {
            Some(Ok(step)) => step == Step::Moved,
            Some(Err(_)) => {
                rt_error!(SHELL_LOG, "sink write failed in manual mode");
                false
            }
            None => false,
        };
        if !moved {
            return;
        }

        match direction {
            Direction::Up if self.slider.pos < self.slider.width => {
                out.send_byte(b'=');
                self.slider.pos += 1;
            }
            Direction::Down if self.slider.pos > 0 => {
                out.send_str("\x08 \x08");
                self.slider.pos -= 1;
            }
            _ => {}
        }
    }

    /// Game mode: static keymap lookup.
    pub fn game_key(&mut self, key: Key) {
        let Some(binding) = keymap::lookup(key) else {
            return;
        };
        if self.step(binding.group, binding.output, binding.direction).is_err() {
            rt_error!(SHELL_LOG, "sink write failed on group {}", binding.group);
        }
    }
}

fn write_binding(out: &mut dyn Transport, binding: &keymap::GameBinding) -> core::fmt::Result {
    let mut letter = [0u8; 4];
    let key: &str = match (binding.bracketed, binding.key) {
        (true, b'A') => "up",
        (true, b'B') => "down",
        (true, b'C') => "right",
        (true, b'D') => "left",
        _ => (binding.key as char).encode_utf8(&mut letter),
    };
    let sign = if binding.direction == Direction::Up { '+' } else { '-' };
    write!(
        out,
        "  {:<6} group {} channel {} {}\r\n",
        key,
        binding.group,
        binding.output.letter(),
        sign
    )
}
