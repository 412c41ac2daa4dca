//! Frequency and duty-cycle readouts.
//!
//! Fixed point with two decimals so the no_std build never touches floats.

use core::fmt;

use crate::config::F_CPU_HZ;

use super::TimerSetup;

/// PWM frequency in hundredths of a hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Frequency {
    pub centi_hz: u32,
}

impl Frequency {
    /// `F_cpu / (2 * counter_max * prescaler)` for phase-correct PWM.
    pub fn of(setup: &TimerSetup) -> Self {
        Self::with_clock(F_CPU_HZ, setup)
    }

    pub fn with_clock(clock_hz: u32, setup: &TimerSetup) -> Self {
        let denom = 2 * u64::from(setup.counter_max) * u64::from(setup.prescaler.divider());
        let centi_hz = if denom == 0 { 0 } else { u64::from(clock_hz) * 100 / denom };
        Self { centi_hz: centi_hz as u32 }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} Hz", self.centi_hz / 100, self.centi_hz % 100)
    }
}

/// Duty cycle in hundredths of a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DutyCycle {
    pub basis_points: u32,
}

impl DutyCycle {
    /// `100 * compare / counter_max`.
    pub fn of(compare: u16, counter_max: u16) -> Self {
        let basis_points = if counter_max == 0 {
            0
        } else {
            u32::from(compare) * 10_000 / u32::from(counter_max)
        };
        Self { basis_points }
    }
}

impl fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} %", self.basis_points / 100, self.basis_points % 100)
    }
}
