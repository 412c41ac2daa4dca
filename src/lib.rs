//! # ServoConsole
//!
//! Servo PWM controller driven from a serial command shell.
//!
//! ## Architecture
//!
//! ```text
//! RX interrupt ──▶ RxLatch ──▶ Shell::poll ──▶ Command / Manual / Game
//!                                  │                  │
//!                                  ▼                  ▼
//! TX interrupt ◀── TxQueue ◀── Transport        Group ──▶ PwmTimer
//! ```
//!
//! Interrupt bodies only move bytes and flags. Everything else runs from a
//! single cooperative loop, one context at a time. Hardware is reached only
//! through [`transport::Transport`] and [`pwm::PwmTimer`], so the whole
//! shell runs on the host against [`pwm::MemoryTimer`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod logging;
pub mod log_globals;
pub mod pwm;
pub mod transport;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use config::{BoardProfile, ConfigError};
pub use console::{CommandError, Context, Shell};
pub use log_globals::SHELL_LOG;
pub use pwm::{Group, MemoryTimer, PwmTimer};
pub use transport::{RxLatch, Transport, TxQueue};
