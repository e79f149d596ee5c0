//! # Introduction
//!
//! tifor runs programs written in the For(T,R,A,N calculator language: `For(`
//! loops, `Disp` and `End` over 28 fixed numeric variables. The interpreter
//! reports through two capabilities the host implements, a
//! [`memory::VariableObserver`] and an [`interpreter::sink::MessageSink`], and
//! ships with a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Cursor → Parser → AST → Interpreter → Observer / Sink → TUI
//! ```
//!
//! 1. [`parser`]: walks the source character by character and builds the
//!    statement tree, under a parse watchdog.
//! 2. [`interpreter`]: resets the variables, seeds `Ans`, and executes the
//!    tree. Every `For(` activation has its own loop watchdog.
//! 3. [`memory`]: the variable store and number formatting.
//! 4. [`snapshot`]: [`snapshot::MockTerminal`] and [`snapshot::VariablePanel`],
//!    the recording implementations of the two capabilities.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use tifor::interpreter::{config::RunOptions, engine::Interpreter};
//! use tifor::snapshot::{MockTerminal, VariablePanel};
//!
//! let mut interp = Interpreter::new(VariablePanel::new(), MockTerminal::new());
//! interp
//!     .run("For(A,1,3\nDisp A\nEnd", 0.0, &RunOptions::default())
//!     .unwrap();
//! assert_eq!(interp.sink().get_output(), vec!["1", "2", "3"]);
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
