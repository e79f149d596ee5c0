//! Host-side recorders of interpreter state
//!
//! [`MockTerminal`] collects everything the interpreter says and
//! [`VariablePanel`] mirrors every variable write. The TUI renders from both,
//! and tests assert on them.

use crate::interpreter::constants::VARIABLE_COUNT;
use crate::interpreter::sink::MessageSink;
use crate::memory::variables::{Var, VariableObserver};

/// What produced a terminal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Output,
    Warning,
    Error,
}

/// A line of terminal output
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalLine {
    pub text: String,
    pub kind: LineKind,
}

/// Mock terminal capturing `Disp` output, warnings and errors in order
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub lines: Vec<TerminalLine>,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal { lines: Vec::new() }
    }

    fn push(&mut self, text: &str, kind: LineKind) {
        self.lines.push(TerminalLine {
            text: text.to_string(),
            kind,
        });
    }

    /// Only the `Disp` lines
    pub fn get_output(&self) -> Vec<String> {
        self.lines_of(LineKind::Output)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines_of(LineKind::Warning)
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines_of(LineKind::Error)
    }

    fn lines_of(&self, kind: LineKind) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl MessageSink for MockTerminal {
    fn on_message(&mut self, text: &str) {
        self.push(text, LineKind::Output);
    }

    fn on_warning(&mut self, text: &str) {
        self.push(text, LineKind::Warning);
    }

    fn on_fatal_error(&mut self, text: &str) {
        self.push(text, LineKind::Error);
    }
}

/// Mirror of the variable store, fed through [`VariableObserver`]
#[derive(Debug, Clone)]
pub struct VariablePanel {
    values: [f64; VARIABLE_COUNT],
    changed: [bool; VARIABLE_COUNT],
    writes: u64,
}

impl VariablePanel {
    pub fn new() -> Self {
        VariablePanel {
            values: [0.0; VARIABLE_COUNT],
            changed: [false; VARIABLE_COUNT],
            writes: 0,
        }
    }

    /// Forget which variables changed and the write count; values stay.
    pub fn begin_run(&mut self) {
        self.changed = [false; VARIABLE_COUNT];
        self.writes = 0;
    }

    pub fn value(&self, var: Var) -> f64 {
        self.values[var.index()]
    }

    /// True if `var` was written with a new value since the last reset
    pub fn changed(&self, var: Var) -> bool {
        self.changed[var.index()]
    }

    /// Number of notifications received since [`begin_run`](Self::begin_run)
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn snapshot(&self) -> [f64; VARIABLE_COUNT] {
        self.values
    }
}

impl Default for VariablePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableObserver for VariablePanel {
    fn on_variable_changed(&mut self, var: Var, value: f64) {
        let slot = var.index();
        if self.values[slot] != value {
            self.changed[slot] = true;
        }
        self.values[slot] = value;
        self.writes += 1;
    }

    /// Zeroing is bookkeeping, not something the program did
    fn on_reset(&mut self) {
        self.changed = [false; VARIABLE_COUNT];
    }
}
