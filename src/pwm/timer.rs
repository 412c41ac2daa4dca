//! Hardware channel sink.
//!
//! Everything above this trait is hardware independent. The board binary
//! implements it on real timers; [`super::MemoryTimer`] implements it in RAM.

use core::fmt;

use super::Prescaler;

/// Compare output of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    A,
    B,
    C,
}

impl Output {
    pub const ALL: [Output; 3] = [Output::A, Output::B, Output::C];

    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }

    /// Parse a channel name as typed on the console (case sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }
}

/// Per-timer settings shared by every channel of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSetup {
    pub prescaler: Prescaler,
    /// Inverted compare-output polarity.
    pub inverted: bool,
    /// Counter top; sets the PWM period.
    pub counter_max: u16,
}

/// The sink refused a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkError;

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PWM sink rejected write")
    }
}

/// One hardware timer with three compare outputs.
pub trait PwmTimer {
    /// Hardware timer number, for reports.
    fn id(&self) -> u8;

    /// Program prescaler, polarity and counter top. Enables all outputs.
    fn apply(&mut self, setup: &TimerSetup) -> Result<(), SinkError>;

    fn set_compare(&mut self, output: Output, value: u16) -> Result<(), SinkError>;

    /// Current compare value as last written.
    fn compare(&self, output: Output) -> u16;
}
