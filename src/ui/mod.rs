//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, initial value input
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   terminal, variables, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an [`Interpreter`]
//! hosting a [`VariablePanel`] and a [`MockTerminal`], then call [`App::run`].
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`VariablePanel`]: crate::snapshot::VariablePanel
//! [`MockTerminal`]: crate::snapshot::MockTerminal
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
