//! Hardware Abstraction Layer for ServoConsole.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.

pub mod ledc;
pub mod uart;

pub use ledc::LedcTimer;
