//! Timer clock dividers.
//!
//! Profiles carry the one-hot clock-select code used by the board's timer
//! control register; the divider actually applied is derived from it.

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl Prescaler {
    /// Decode a clock-select code. Unrecognized codes are a fatal
    /// configuration error.
    pub fn from_code(code: u8) -> Result<Self, ConfigError> {
        match code {
            0x01 => Ok(Self::Div1),
            0x02 => Ok(Self::Div8),
            0x04 => Ok(Self::Div64),
            0x08 => Ok(Self::Div256),
            0x10 => Ok(Self::Div1024),
            other => Err(ConfigError::InvalidPrescaler(other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Div1 => 0x01,
            Self::Div8 => 0x02,
            Self::Div64 => 0x04,
            Self::Div256 => 0x08,
            Self::Div1024 => 0x10,
        }
    }

    /// Multiplicative divider applied to the timer input clock.
    pub fn divider(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div8 => 8,
            Self::Div64 => 64,
            Self::Div256 => 256,
            Self::Div1024 => 1024,
        }
    }
}
