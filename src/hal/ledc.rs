//! LEDC-backed [`PwmTimer`].
//!
//! The LEDC timer runs at the frequency the group's setup describes; each
//! compare value is rescaled from `0..=counter_max` onto the driver's duty
//! range. LEDC has no inverted compare mode, so polarity is applied here.

use esp_idf_svc::hal::ledc::LedcDriver;

use crate::pwm::{Output, PwmTimer, SinkError, TimerSetup};

pub struct LedcTimer<'d> {
    id: u8,
    channels: [Option<LedcDriver<'d>>; 3],
    compare: [u16; 3],
    setup: Option<TimerSetup>,
}

impl<'d> LedcTimer<'d> {
    /// `channels` are indexed by output A, B, C; unwired outputs are `None`.
    pub fn new(id: u8, channels: [Option<LedcDriver<'d>>; 3]) -> Self {
        Self {
            id,
            channels,
            compare: [0; 3],
            setup: None,
        }
    }

    fn duty_for(&self, driver: &LedcDriver<'d>, value: u16) -> Result<u32, SinkError> {
        let setup = self.setup.ok_or(SinkError)?;
        let max_duty = driver.get_max_duty();
        let top = u32::from(setup.counter_max);
        let duty = (u64::from(value.min(setup.counter_max)) * u64::from(max_duty) / u64::from(top)) as u32;
        Ok(if setup.inverted { max_duty - duty } else { duty })
    }
}

impl PwmTimer for LedcTimer<'_> {
    fn id(&self) -> u8 {
        self.id
    }

    fn apply(&mut self, setup: &TimerSetup) -> Result<(), SinkError> {
        if setup.counter_max == 0 {
            return Err(SinkError);
        }
        self.setup = Some(*setup);
        Ok(())
    }

    fn set_compare(&mut self, output: Output, value: u16) -> Result<(), SinkError> {
        let idx = output.index();
        let driver = self.channels[idx].as_ref().ok_or(SinkError)?;
        let duty = self.duty_for(driver, value)?;

        let driver = self.channels[idx].as_mut().ok_or(SinkError)?;
        driver.set_duty(duty).map_err(|_| SinkError)?;
        self.compare[idx] = value;
        Ok(())
    }

    fn compare(&self, output: Output) -> u16 {
        self.compare[output.index()]
    }
}
