//! `For(` loop execution
//!
//! The loop follows the calculator's rules: the direction of
//! the comparison depends on the sign of the step, the end value is
//! inclusive, and `end` and `step` are re-read on every check so the body can
//! move them.
//!
//! Each activation arms its own watchdog. When it expires the loop just stops
//! at the next condition check; no error and no warning.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::sink::MessageSink;
use crate::memory::variables::VariableObserver;
use crate::parser::ast::ForLoop;
use std::time::Instant;

impl<O: VariableObserver, S: MessageSink> Interpreter<O, S> {
    /// Executes `For(iterator, start, end, step)` and its body.
    pub(crate) fn execute_for(&mut self, for_loop: &ForLoop) -> Result<(), RuntimeError> {
        let start = self.resolve(for_loop.start);
        self.variables_mut().set(for_loop.iterator, start)?;

        // A timeout too large to represent means no watchdog at all
        let deadline = Instant::now().checked_add(self.options().loop_timeout);
        let mut iterations: u64 = 0;

        while self.loop_condition(for_loop) {
            if deadline.is_some_and(|d| Instant::now() > d) {
                tracing::debug!(
                    iterator = %for_loop.iterator,
                    line = for_loop.location.line,
                    iterations,
                    "loop watchdog expired"
                );
                return Ok(());
            }

            self.execute(&for_loop.body)?;

            // The header owns the iterator write, not the last body statement
            self.set_current_location(for_loop.location);
            let next = self.variables().get(for_loop.iterator) + self.resolve(for_loop.step);
            self.variables_mut().set(for_loop.iterator, next)?;
            iterations += 1;
            tracing::trace!(iterator = %for_loop.iterator, value = next, "loop step");
        }

        Ok(())
    }

    /// Negative step counts down to `end`, anything else counts up to it.
    fn loop_condition(&self, for_loop: &ForLoop) -> bool {
        let step = self.resolve(for_loop.step);
        let current = self.variables().get(for_loop.iterator);
        let end = self.resolve(for_loop.end);
        (step < 0.0 && current >= end) || (step >= 0.0 && current <= end)
    }
}
