//! Per-run options

use super::constants::{LOOP_TIMEOUT, PARSE_TIMEOUT};
use std::time::Duration;

/// Options for [`Interpreter::run`](super::engine::Interpreter::run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Forward parser warnings to the message sink
    pub warnings: bool,
    /// Parse watchdog, measured from parser construction
    pub parse_timeout: Duration,
    /// Watchdog armed afresh each time a `For(` loop starts
    pub loop_timeout: Duration,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_parse_timeout(mut self, timeout: Duration) -> Self {
        self.parse_timeout = timeout;
        self
    }

    pub fn with_loop_timeout(mut self, timeout: Duration) -> Self {
        self.loop_timeout = timeout;
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            warnings: false,
            parse_timeout: PARSE_TIMEOUT,
            loop_timeout: LOOP_TIMEOUT,
        }
    }
}

/// Read an initial value typed by the user.
///
/// `~` is accepted as the negative sign like in source. Blank or unparsable
/// text gives 0. Non-finite text ("inf", "NaN") passes through so the run
/// rejects it.
pub fn parse_initial_value(text: &str) -> f64 {
    text.trim().replace('~', "-").parse::<f64>().unwrap_or(0.0)
}
