//! Board profiles: which timers drive which outputs, and channel limits.

use crate::pwm::{ChannelConfig, Group, Groups, Output, PwmTimer};

use super::ConfigError;

/// One compare output and its level constraints.
#[derive(Debug, Clone, Copy)]
pub struct ChannelProfile {
    pub output: Output,
    pub config: ChannelConfig,
}

/// One timer and the channels it drives.
#[derive(Debug, Clone, Copy)]
pub struct GroupProfile {
    /// Hardware timer number.
    pub timer_id: u8,
    /// Clock-select code, see [`crate::pwm::Prescaler::from_code`].
    pub prescaler_code: u8,
    pub inverted: bool,
    pub counter_max: u16,
    pub channels: &'static [ChannelProfile],
}

/// Complete compiled-in board description.
#[derive(Debug, Clone, Copy)]
pub struct BoardProfile {
    pub name: &'static str,
    pub groups: &'static [GroupProfile],
}

impl BoardProfile {
    /// Configure every group on the timers handed in, in profile order.
    ///
    /// Channels start at their idle level. Any error is fatal.
    pub fn bind<'a, I>(&self, timers: I) -> Result<Groups<'a>, ConfigError>
    where
        I: IntoIterator<Item = &'a mut dyn PwmTimer>,
    {
        if self.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }

        let mut timers = timers.into_iter();
        let mut groups = Groups::new();

        for profile in self.groups {
            let timer = timers.next().ok_or(ConfigError::MissingTimer)?;
            let mut group = Group::configure(
                timer,
                profile.prescaler_code,
                profile.inverted,
                profile.counter_max,
            )?;

            for channel in profile.channels {
                group.set_channel_config(channel.output, channel.config)?;
            }

            groups.push(group).map_err(|_| ConfigError::TooManyGroups)?;
        }

        Ok(groups)
    }
}

/// Servo travel used by every profile: 14..=72 counts of a 625-count top
/// at 50 Hz, roughly 0.45 ms to 2.3 ms pulses.
const SERVO: ChannelConfig = ChannelConfig::new(72, 14, 43, 1);

/// 50 Hz with prescaler /256 and a 625 top on a 16 MHz clock.
const SERVO_PRESCALER: u8 = 0x08;
const SERVO_TOP: u16 = 0x0271;

/// First revision: one servo on output B of timer 1, parked at the low end.
pub const SINGLE_SERVO: BoardProfile = BoardProfile {
    name: "single",
    groups: &[GroupProfile {
        timer_id: 1,
        prescaler_code: SERVO_PRESCALER,
        inverted: false,
        counter_max: SERVO_TOP,
        channels: &[ChannelProfile {
            output: Output::B,
            config: ChannelConfig::new(72, 14, 14, 1),
        }],
    }],
};

const THREE_SERVOS: &[ChannelProfile] = &[
    ChannelProfile { output: Output::A, config: SERVO },
    ChannelProfile { output: Output::B, config: SERVO },
    ChannelProfile { output: Output::C, config: SERVO },
];

/// All three outputs of timer 1.
pub const TRIPLE_SERVO: BoardProfile = BoardProfile {
    name: "triple",
    groups: &[GroupProfile {
        timer_id: 1,
        prescaler_code: SERVO_PRESCALER,
        inverted: false,
        counter_max: SERVO_TOP,
        channels: THREE_SERVOS,
    }],
};

/// Two timers with three servos each; enables game mode.
pub const DUAL_GROUP: BoardProfile = BoardProfile {
    name: "dual",
    groups: &[
        GroupProfile {
            timer_id: 1,
            prescaler_code: SERVO_PRESCALER,
            inverted: false,
            counter_max: SERVO_TOP,
            channels: THREE_SERVOS,
        },
        GroupProfile {
            timer_id: 3,
            prescaler_code: SERVO_PRESCALER,
            inverted: false,
            counter_max: SERVO_TOP,
            channels: THREE_SERVOS,
        },
    ],
};
