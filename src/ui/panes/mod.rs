//! TUI pane rendering modules
//!
//! - [`source`]: program text with syntax highlighting and the error line
//! - [`terminal`]: `Disp` output, warnings and errors in arrival order
//! - [`variables`]: the 28 variables after the last run
//! - [`status`]: status bar with keybindings and run state
//!
//! Each pane exports one stateless `render_*` function; scroll offsets live in
//! the [`App`](crate::ui::App) and are clamped during rendering.

pub mod source;
pub mod status;
pub mod terminal;
pub mod variables;

pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
pub use variables::render_variables_pane;
