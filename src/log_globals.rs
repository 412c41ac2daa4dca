//! Global log stream.

use crate::logging::LogStream;

/// Shell diagnostics: mode changes, overflow, sink failures.
///
/// Single producer (main loop), drained by the `log` command.
pub static SHELL_LOG: LogStream = LogStream::new();
