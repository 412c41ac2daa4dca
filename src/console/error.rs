//! Command error types

use core::fmt;

use crate::pwm::SinkError;

/// Failure returned by a command handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// 1: Required argument not given
    MissingArg,
    /// 2: `mode` argument not recognized or not available on this board
    UnknownMode,
    /// 3: `select` argument names no configured channel or group
    UnknownChannel,
    /// 4: Argument does not parse
    InvalidValue,
    /// 5: Value outside the channel bounds
    OutOfRange,
    /// 6: PWM sink rejected a write
    Hardware,
}

impl CommandError {
    /// Numeric code reported as `Error:<code> in Cmd:<name>`.
    pub fn code(&self) -> u8 {
        match self {
            Self::MissingArg => 1,
            Self::UnknownMode => 2,
            Self::UnknownChannel => 3,
            Self::InvalidValue => 4,
            Self::OutOfRange => 5,
            Self::Hardware => 6,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingArg => "Insufficient number of inputs",
            Self::UnknownMode => "unknown mode",
            Self::UnknownChannel => "unknown channel",
            Self::InvalidValue => "invalid value",
            Self::OutOfRange => "out of range",
            Self::Hardware => "hardware error",
        }
    }

    /// Operator typing mistakes. Reported as a plain message line, not as
    /// a coded failure.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::MissingArg | Self::UnknownMode | Self::UnknownChannel | Self::InvalidValue
        )
    }
}

impl From<SinkError> for CommandError {
    fn from(_: SinkError) -> Self {
        Self::Hardware
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:02}: {}", self.code(), self.message())
    }
}
