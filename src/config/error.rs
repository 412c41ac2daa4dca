//! Start-up configuration errors.
//!
//! Detected once while binding the board profile. All of them are fatal: the
//! firmware refuses to run with an unbound or inconsistent channel.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Timer number not provided by this hardware.
    UnknownTimer(u8),
    /// Prescaler code outside the supported divider table.
    InvalidPrescaler(u8),
    /// Counter top of zero gives no PWM period.
    ZeroCounterTop,
    /// Channel bounds violate `min <= idle <= max`.
    LevelBounds,
    /// `max * step` does not fit under the counter top.
    CompareOverflow,
    /// Hardware refused the timer or compare setup.
    TimerRejected,
    /// Profile lists more groups than timers handed in.
    MissingTimer,
    /// No groups configured at all.
    NoGroups,
    /// A group without any channel.
    EmptyGroup,
    TooManyGroups,
    /// More channels than compare outputs on one timer.
    TooManyChannels,
    /// Same compare output configured twice in one group.
    DuplicateOutput,
    /// Two command table entries share a name.
    DuplicateCommand(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTimer(id) => write!(f, "unknown timer id {}", id),
            Self::InvalidPrescaler(code) => write!(f, "invalid prescaler code {:#04x}", code),
            Self::ZeroCounterTop => f.write_str("counter top is zero"),
            Self::LevelBounds => f.write_str("channel bounds must satisfy min <= idle <= max"),
            Self::CompareOverflow => f.write_str("max level * step exceeds counter top"),
            Self::TimerRejected => f.write_str("timer rejected configuration"),
            Self::MissingTimer => f.write_str("not enough timers for profile"),
            Self::NoGroups => f.write_str("no channel groups configured"),
            Self::EmptyGroup => f.write_str("group has no channels"),
            Self::TooManyGroups => f.write_str("too many channel groups"),
            Self::TooManyChannels => f.write_str("too many channels for one timer"),
            Self::DuplicateOutput => f.write_str("compare output configured twice"),
            Self::DuplicateCommand(name) => write!(f, "duplicate command '{}'", name),
        }
    }
}
