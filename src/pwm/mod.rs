//! PWM channel and timer abstraction.
//!
//! A [`Group`] is one hardware timer ([`PwmTimer`]) with up to three
//! [`Channel`]s. Each channel maps an integer level onto the timer's compare
//! register as `level * step`, bounded by `min..=max`.

mod channel;
mod group;
mod memory;
mod prescaler;
mod readout;
mod timer;

pub use channel::{Channel, ChannelConfig, ChannelMut, Direction, Ramp, Step};
pub use group::{Group, Groups};
pub use memory::{MemoryTimer, TIMER_IDS};
pub use prescaler::Prescaler;
pub use readout::{DutyCycle, Frequency};
pub use timer::{Output, PwmTimer, SinkError, TimerSetup};
