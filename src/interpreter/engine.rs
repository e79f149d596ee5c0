// Execution engine for the calculator language

use crate::interpreter::config::RunOptions;
use crate::interpreter::errors::{FatalError, RuntimeError};
use crate::interpreter::sink::MessageSink;
use crate::memory::format::format_number;
use crate::memory::variables::{Var, VariableObserver, VariableStore};
use crate::parser::ast::*;
use crate::parser::parser::{ParseError, Parser};

/// The interpreter session: variable store plus the two host capabilities.
///
/// One `Interpreter` is meant to live as long as the host; every
/// [`run`](Interpreter::run) starts from a freshly reset store.
pub struct Interpreter<O: VariableObserver, S: MessageSink> {
    /// All 28 variables; notifies the observer on every write
    variables: VariableStore<O>,

    /// Receives Disp output, warnings and fatal errors
    sink: S,

    /// Options of the current (or last) run
    options: RunOptions,

    /// Location of the statement being executed; `None` before the first one
    current_location: Option<SourceLocation>,
}

impl<O: VariableObserver, S: MessageSink> Interpreter<O, S> {
    pub fn new(observer: O, sink: S) -> Self {
        Interpreter {
            variables: VariableStore::new(observer),
            sink,
            options: RunOptions::default(),
            current_location: None,
        }
    }

    /// Reset the store, seed `Ans`, parse `source` and execute it.
    ///
    /// A fatal error is reported to the sink before being returned. Output
    /// produced before a runtime error stays with the sink.
    #[tracing::instrument(level = "debug", skip_all, fields(initial_value = initial_value, warnings = options.warnings))]
    pub fn run(
        &mut self,
        source: &str,
        initial_value: f64,
        options: &RunOptions,
    ) -> Result<(), FatalError> {
        self.options = *options;
        self.current_location = None;

        let result = self.parse_and_execute(source, initial_value);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "run aborted");
            self.sink.on_fatal_error(&e.to_string());
        }
        result
    }

    fn parse_and_execute(&mut self, source: &str, initial_value: f64) -> Result<(), FatalError> {
        self.variables.reset();
        self.variables.set(Var::Ans, initial_value)?;

        let program = self.parse(source)?;
        self.execute(&program)?;
        Ok(())
    }

    /// Parse `source` with the current options, forwarding warnings if enabled.
    pub fn parse(&mut self, source: &str) -> Result<Program, ParseError> {
        let mut parser = Parser::with_timeout(source, self.options.parse_timeout);
        let result = parser.parse_program();
        if self.options.warnings {
            for warning in parser.take_warnings() {
                self.sink.on_warning(&warning.to_string());
            }
        }
        result
    }

    /// Execute a block against the current variable state
    pub fn execute(&mut self, block: &Block) -> Result<(), RuntimeError> {
        for stmt in &block.statements {
            self.execute_statement(stmt)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Statement) -> Result<(), RuntimeError> {
        self.current_location = Some(stmt.location());

        match stmt {
            Statement::For(for_loop) => self.execute_for(for_loop),
            Statement::Disp { value, .. } => {
                let n = self.resolve(*value);
                self.sink.on_message(&format_number(n));
                Ok(())
            }
        }
    }

    /// Resolve a literal or variable reference to its current number
    pub(crate) fn resolve(&self, value: Value) -> f64 {
        match value {
            Value::Literal(n) => n,
            Value::Reference(var) => self.variables.get(var),
        }
    }

    pub(crate) fn variables_mut(&mut self) -> &mut VariableStore<O> {
        &mut self.variables
    }

    pub(crate) fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn variables(&self) -> &VariableStore<O> {
        &self.variables
    }

    pub fn observer(&self) -> &O {
        self.variables.observer()
    }

    pub fn observer_mut(&mut self) -> &mut O {
        self.variables.observer_mut()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Where execution is, or stopped. `None` if no statement has run yet.
    pub fn current_location(&self) -> Option<SourceLocation> {
        self.current_location
    }

    pub(crate) fn set_current_location(&mut self, location: SourceLocation) {
        self.current_location = Some(location);
    }
}
