//! Module: config
//!
//! Purpose: Compiled-in configuration for ServoConsole.
//!
//! Nothing here is read at runtime from storage or the environment. A
//! concrete build picks one [`BoardProfile`]; earlier single-channel and
//! single-timer revisions of the firmware are just smaller profiles.

mod board;
mod error;

pub use board::{BoardProfile, ChannelProfile, GroupProfile, DUAL_GROUP, SINGLE_SERVO, TRIPLE_SERVO};
pub use error::ConfigError;

/// Firmware name, version and git hash (stamped by build.rs).
pub const VERSION: &str = env!("VERSION_STRING");

/// Timer input clock assumed by the frequency readout.
pub const F_CPU_HZ: u32 = 16_000_000;

/// Serial line speed (8N1, no flow control).
pub const BAUD_RATE: u32 = 19_200;

/// Received-line buffer size, one byte of which stays reserved.
pub const RX_LINE_SIZE: usize = 128;

/// Transmit ring size. Power of 2.
pub const TX_BUFFER_SIZE: usize = 64;

/// Maximum tokens kept from one command line; extra tokens are dropped.
pub const MAX_ARGS: usize = 24;

/// Maximum timer groups per board.
pub const MAX_GROUPS: usize = 4;

/// Compare outputs per timer (A, B, C).
pub const OUTPUTS_PER_TIMER: usize = 3;

/// Delay between single-level steps of the idle ramp.
pub const IDLE_STEP_MS: u32 = 25;

/// Widest slider drawn in manual mode.
pub const SLIDER_WIDTH: u16 = 64;

/// Token separator on the command line.
pub const ARG_DELIMITER: char = ' ';
