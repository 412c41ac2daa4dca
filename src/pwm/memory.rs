//! In-memory [`PwmTimer`] for tests and the host simulator.

use crate::config::ConfigError;

use super::{Output, PwmTimer, SinkError, TimerSetup};

/// Timer numbers with three compare outputs on the reference board.
pub const TIMER_IDS: [u8; 4] = [1, 3, 4, 5];

#[derive(Debug)]
pub struct MemoryTimer {
    id: u8,
    setup: Option<TimerSetup>,
    compare: [u16; 3],
    writes: u32,
    fail_writes: bool,
}

impl MemoryTimer {
    pub fn new(id: u8) -> Result<Self, ConfigError> {
        if !TIMER_IDS.contains(&id) {
            return Err(ConfigError::UnknownTimer(id));
        }
        Ok(Self {
            id,
            setup: None,
            compare: [0; 3],
            writes: 0,
            fail_writes: false,
        })
    }

    /// Setup applied by the last successful [`PwmTimer::apply`].
    pub fn setup(&self) -> Option<TimerSetup> {
        self.setup
    }

    /// Number of successful compare writes.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Make every following write fail, simulating a dead peripheral.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl PwmTimer for MemoryTimer {
    fn id(&self) -> u8 {
        self.id
    }

    fn apply(&mut self, setup: &TimerSetup) -> Result<(), SinkError> {
        if self.fail_writes {
            return Err(SinkError);
        }
        self.setup = Some(*setup);
        Ok(())
    }

    fn set_compare(&mut self, output: Output, value: u16) -> Result<(), SinkError> {
        if self.fail_writes {
            return Err(SinkError);
        }
        self.compare[output.index()] = value;
        self.writes += 1;
        Ok(())
    }

    fn compare(&self, output: Output) -> u16 {
        self.compare[output.index()]
    }
}
