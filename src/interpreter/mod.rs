//! Program execution
//!
//! - [`engine`]: the [`engine::Interpreter`] session and its `run` entry point
//! - [`config`]: per-run options (warnings, watchdog budgets)
//! - [`sink`]: the [`sink::MessageSink`] capability the host provides
//! - [`errors`]: runtime and fatal error types
//!
//! # Execution Model
//!
//! Each run resets all variables, seeds `Ans`, parses the whole source and
//! only then walks the tree. A parse error means nothing executes. A runtime
//! error stops execution where it happens; earlier `Disp` output stands.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
mod loops;
pub mod sink;
