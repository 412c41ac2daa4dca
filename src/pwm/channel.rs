//! Per-channel level state and the stepping operations on it.

use embedded_hal::delay::DelayNs;

use crate::config::{ConfigError, IDLE_STEP_MS};

use super::{Output, PwmTimer, SinkError};

/// Level constraints of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub max: u16,
    pub min: u16,
    pub idle: u16,
    /// Compare-register counts per level.
    pub step: u16,
}

impl ChannelConfig {
    pub const fn new(max: u16, min: u16, idle: u16, step: u16) -> Self {
        Self { max, min, idle, step }
    }

    /// Check the bounds against the group's counter top.
    pub fn validate(&self, counter_max: u16) -> Result<(), ConfigError> {
        if self.step == 0 || self.min > self.idle || self.idle > self.max {
            return Err(ConfigError::LevelBounds);
        }
        if u32::from(self.max) * u32::from(self.step) > u32::from(counter_max) {
            return Err(ConfigError::CompareOverflow);
        }
        Ok(())
    }

    /// Number of single steps between the bounds.
    pub fn steps(&self) -> u16 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Already at the bound; nothing written.
    Saturated,
}

/// Outcome of an idle ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Reached,
    /// Stopped early because input arrived.
    Interrupted,
}

/// One logical PWM output and its current level.
#[derive(Debug, Clone, Copy)]
pub struct Channel {
    pub output: Output,
    pub level: u16,
    pub config: ChannelConfig,
}

impl Channel {
    /// Slider position: distance above the lower bound.
    pub fn offset(&self) -> u16 {
        self.level - self.config.min
    }
}

/// A channel borrowed together with the timer that drives it.
pub struct ChannelMut<'g, 'a> {
    pub(super) timer: &'g mut (dyn PwmTimer + 'a),
    pub(super) channel: &'g mut Channel,
}

impl<'g, 'a> ChannelMut<'g, 'a> {
    pub fn channel(&self) -> &Channel {
        self.channel
    }

    pub fn level(&self) -> u16 {
        self.channel.level
    }

    pub fn compare(&self) -> u16 {
        self.timer.compare(self.channel.output)
    }

    /// Move one level up. Silent no-op at `max`.
    pub fn inc(&mut self) -> Result<Step, SinkError> {
        self.step(Direction::Up)
    }

    /// Move one level down. Silent no-op at `min`.
    pub fn dec(&mut self) -> Result<Step, SinkError> {
        self.step(Direction::Down)
    }

    /// Shift the compare value by one `step` and the level by one.
    ///
    /// Level only changes once the sink accepted the write.
    pub fn step(&mut self, direction: Direction) -> Result<Step, SinkError> {
        let Channel { output, level, config } = *self.channel;
        let current = self.timer.compare(output);

        let (next_level, next_compare) = match direction {
            Direction::Up if level < config.max => (level + 1, current.saturating_add(config.step)),
            Direction::Down if level > config.min => (level - 1, current.saturating_sub(config.step)),
            _ => return Ok(Step::Saturated),
        };

        self.timer.set_compare(output, next_compare)?;
        self.channel.level = next_level;
        Ok(Step::Moved)
    }

    /// One step toward the idle level, or `Saturated` if already there.
    pub fn idle_step(&mut self) -> Result<Step, SinkError> {
        let idle = self.channel.config.idle;
        match self.channel.level {
            level if level < idle => self.step(Direction::Up),
            level if level > idle => self.step(Direction::Down),
            _ => Ok(Step::Saturated),
        }
    }

    /// Ramp to the idle level one unit per [`IDLE_STEP_MS`].
    ///
    /// `interrupted` is polled before each step; when it returns true the
    /// ramp stops where it is. The level moves monotonically and never
    /// overshoots.
    pub fn ramp_to_idle(
        &mut self,
        delay: &mut dyn DelayNs,
        interrupted: &mut dyn FnMut() -> bool,
    ) -> Result<Ramp, SinkError> {
        while self.channel.level != self.channel.config.idle {
            if interrupted() {
                return Ok(Ramp::Interrupted);
            }
            delay.delay_ms(IDLE_STEP_MS);
            self.idle_step()?;
        }
        Ok(Ramp::Reached)
    }

    /// Walk to `target` in single steps, clamped to the bounds.
    pub fn set_level(&mut self, target: u16) -> Result<(), SinkError> {
        let config = self.channel.config;
        let target = target.clamp(config.min, config.max);
        while self.channel.level < target {
            self.step(Direction::Up)?;
        }
        while self.channel.level > target {
            self.step(Direction::Down)?;
        }
        Ok(())
    }
}
