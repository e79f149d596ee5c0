//! Main TUI application state and logic

use crate::interpreter::config::{parse_initial_value, RunOptions};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::FatalError;
use crate::snapshot::{MockTerminal, VariablePanel};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// The interpreter as the TUI hosts it
pub type HostedInterpreter = Interpreter<VariablePanel, MockTerminal>;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Terminal,
    Variables,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> terminal -> variables)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Variables,
            FocusedPane::Terminal => FocusedPane::Source,
            FocusedPane::Variables => FocusedPane::Terminal,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter instance
    pub interpreter: HostedInterpreter,

    /// The source code being executed
    pub source_code: String,

    /// Options passed to every run; `w` toggles warnings
    pub options: RunOptions,

    /// Initial value for `Ans`, as typed
    pub initial_value: String,

    /// Text being typed while editing the initial value
    pub input_buffer: Option<String>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub terminal_scroll: usize,
    pub variables_scroll: usize,

    /// Line the last fatal error points at
    pub error_line: Option<usize>,

    /// Whether the last run ended in a fatal error
    pub failed: bool,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app with the given interpreter and source code
    pub fn new(
        interpreter: HostedInterpreter,
        source_code: String,
        options: RunOptions,
        initial_value: String,
    ) -> Self {
        App {
            interpreter,
            source_code,
            options,
            initial_value,
            input_buffer: None,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            terminal_scroll: 0,
            variables_scroll: 0,
            error_line: None,
            failed: false,
            should_quit: false,
            status_message: String::from("Ready! Press r to run."),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Run the whole program once, replacing previous output
    pub fn run_program(&mut self) {
        self.interpreter.sink_mut().clear();
        self.interpreter.observer_mut().begin_run();
        let initial_value = parse_initial_value(&self.initial_value);

        let result = self
            .interpreter
            .run(&self.source_code, initial_value, &self.options);
        self.failed = result.is_err();
        match result {
            Ok(()) => {
                self.error_line = None;
                let shown = self.interpreter.sink().get_output().len();
                self.status_message = format!("Done: {} line(s) displayed", shown);
            }
            Err(FatalError::Parse(e)) => {
                self.error_line = Some(e.location.line);
                self.status_message = e.to_string();
            }
            Err(e) => {
                // No location when seeding Ans failed before any statement ran
                self.error_line = self.interpreter.current_location().map(|l| l.line);
                self.status_message = e.to_string();
            }
        }

        self.terminal_scroll = usize::MAX;
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Source (top) | Terminal (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.error_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.sink(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        super::panes::render_variables_pane(
            frame,
            columns[1],
            self.interpreter.observer(),
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        let shown_value = self
            .input_buffer
            .as_deref()
            .unwrap_or(self.initial_value.as_str());
        super::panes::render_status_bar(
            frame,
            status_area,
            &super::panes::StatusRenderData {
                message: &self.status_message,
                initial_value: shown_value,
                warnings: self.options.warnings,
                has_error: self.failed,
                is_editing: self.input_buffer.is_some(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.input_buffer.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.status_message = "Running...".to_string();
                self.run_program();
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.options.warnings = !self.options.warnings;
                self.status_message = if self.options.warnings {
                    "Warnings on".to_string()
                } else {
                    "Warnings off".to_string()
                };
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.input_buffer = Some(self.initial_value.clone());
                self.status_message = "Enter initial value for Ans".to_string();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    /// Keys while the initial value is being edited
    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.input_buffer.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Enter => {
                self.initial_value = buffer.trim().to_string();
                self.input_buffer = None;
                self.status_message = format!(
                    "Ans will start at {}",
                    parse_initial_value(&self.initial_value)
                );
            }
            KeyCode::Esc => {
                self.input_buffer = None;
                self.status_message = "Edit cancelled".to_string();
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '~' | 'e' | 'E') => {
                buffer.push(c);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Terminal => &mut self.terminal_scroll,
            FocusedPane::Variables => &mut self.variables_scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::variables::Var;
    use crossterm::event::KeyModifiers;

    fn app(source: &str) -> App {
        let interpreter = Interpreter::new(VariablePanel::new(), MockTerminal::new());
        App::new(interpreter, source.to_string(), RunOptions::default(), String::new())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_run_key_executes_program() {
        let mut app = app("For(A,1,3\nDisp A\nEnd");
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.interpreter.sink().get_output(), vec!["1", "2", "3"]);
        assert_eq!(app.interpreter.observer().value(Var::A), 4.0);
        assert!(app.interpreter.observer().changed(Var::A));
        assert_eq!(app.error_line, None);

        // A second run replaces the output
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.interpreter.sink().get_output().len(), 3);
    }

    #[test]
    fn test_edit_initial_value() {
        let mut app = app("Disp Ans");
        press(&mut app, KeyCode::Char('i'));
        for c in "~12".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.initial_value, "~15");

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.interpreter.sink().get_output(), vec!["-15"]);
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut app = app("");
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Char('7'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.initial_value, "");
        assert!(app.input_buffer.is_none());
    }

    #[test]
    fn test_warnings_toggle_and_error_line() {
        let mut app = app("For(A,1,2\nDisp A");
        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.interpreter.sink().warnings().len(), 1);

        let mut app = self::app("Disp 1\nEnd");
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.error_line, Some(2));
        assert_eq!(app.interpreter.sink().errors().len(), 1);
    }

    #[test]
    fn test_runtime_abort_marks_loop_line() {
        let big = format!("1{}", "0".repeat(308));
        let mut app = app(&format!("Disp 1\nFor(B,{big},{big},{big}\nDisp 7\nEnd"));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.error_line, Some(2));
        assert_eq!(app.interpreter.sink().get_output(), vec!["1", "7"]);
    }

    #[test]
    fn test_bad_initial_value_marks_no_line() {
        let mut app = app("\n\nDisp 1");
        app.initial_value = "inf".to_string();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.error_line, None);
        assert!(app.failed);
        assert_eq!(app.interpreter.sink().errors().len(), 1);
        assert!(app.status_message.contains("non-finite"));
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app("");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Terminal);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Variables);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
