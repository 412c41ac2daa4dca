//! Channels sharing one hardware timer.

use heapless::Vec;

use crate::config::{ConfigError, MAX_GROUPS, OUTPUTS_PER_TIMER};

use super::{
    Channel, ChannelConfig, ChannelMut, DutyCycle, Frequency, Output, Prescaler, PwmTimer,
    TimerSetup,
};

/// All groups of a board, in profile order.
pub type Groups<'a> = Vec<Group<'a>, MAX_GROUPS>;

pub struct Group<'a> {
    timer: &'a mut dyn PwmTimer,
    setup: TimerSetup,
    channels: Vec<Channel, OUTPUTS_PER_TIMER>,
}

impl<'a> Group<'a> {
    /// Bind a timer: select polarity, prescaler and counter top.
    pub fn configure(
        timer: &'a mut dyn PwmTimer,
        prescaler_code: u8,
        inverted: bool,
        counter_max: u16,
    ) -> Result<Self, ConfigError> {
        let prescaler = Prescaler::from_code(prescaler_code)?;
        if counter_max == 0 {
            return Err(ConfigError::ZeroCounterTop);
        }

        let setup = TimerSetup { prescaler, inverted, counter_max };
        timer.apply(&setup).map_err(|_| ConfigError::TimerRejected)?;

        Ok(Self { timer, setup, channels: Vec::new() })
    }

    /// Add a channel on `output` and park it at its idle level.
    pub fn set_channel_config(&mut self, output: Output, config: ChannelConfig) -> Result<(), ConfigError> {
        config.validate(self.setup.counter_max)?;
        if self.find(output).is_some() {
            return Err(ConfigError::DuplicateOutput);
        }

        self.timer
            .set_compare(output, config.idle * config.step)
            .map_err(|_| ConfigError::TimerRejected)?;

        self.channels
            .push(Channel { output, level: config.idle, config })
            .map_err(|_| ConfigError::TooManyChannels)
    }

    pub fn setup(&self) -> &TimerSetup {
        &self.setup
    }

    pub fn timer_id(&self) -> u8 {
        self.timer.id()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Index of the channel bound to `output`.
    pub fn find(&self, output: Output) -> Option<usize> {
        self.channels.iter().position(|c| c.output == output)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<ChannelMut<'_, 'a>> {
        let channel = self.channels.get_mut(index)?;
        Some(ChannelMut { timer: &mut *self.timer, channel })
    }

    /// Compare value currently programmed for channel `index`.
    pub fn compare(&self, index: usize) -> Option<u16> {
        let channel = self.channels.get(index)?;
        Some(self.timer.compare(channel.output))
    }

    pub fn frequency(&self) -> Frequency {
        Frequency::of(&self.setup)
    }

    pub fn duty_cycle(&self, index: usize) -> Option<DutyCycle> {
        let compare = self.compare(index)?;
        Some(DutyCycle::of(compare, self.setup.counter_max))
    }
}
