//! Character cursor over the source text
//!
//! The language is small enough that the parser reads characters directly
//! instead of a token stream. [`Cursor`] keeps the line/column position, the
//! "start of logical line" flag that decides where `For(`, `End` and `Disp`
//! may appear, and the parse watchdog. Every read of the source goes through
//! [`Cursor::line`], so every read checks the watchdog.

use super::ast::SourceLocation;
use super::parser::{ParseError, ParseErrorKind};
use std::time::{Duration, Instant};

fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Position in the source plus the parse deadline
pub struct Cursor {
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
    start_of_line: bool,
    /// `None` when the timeout is too large to represent
    deadline: Option<Instant>,
}

impl Cursor {
    /// Create a cursor at the start of `source`; the watchdog starts now.
    pub fn new(source: &str, timeout: Duration) -> Self {
        Self {
            lines: source.split('\n').map(|l| l.chars().collect()).collect(),
            line: 0,
            column: 0,
            start_of_line: true,
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Current 1-based location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line + 1, self.column + 1)
    }

    pub fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.location())
    }

    /// True right after a newline or a `:` separator
    pub fn is_start_of_line(&self) -> bool {
        self.start_of_line
    }

    /// Mark the cursor as starting a new logical line (after `:`)
    pub fn begin_logical_line(&mut self) {
        self.start_of_line = true;
    }

    /// The current line, or `None` past the last line
    fn line(&self) -> Result<Option<&[char]>, ParseError> {
        if self.deadline.is_some_and(|d| Instant::now() > d) {
            return Err(self.error(
                ParseErrorKind::ParseTimeout,
                "Parsing took too long. Please report this.",
            ));
        }
        Ok(self.lines.get(self.line).map(|l| l.as_slice()))
    }

    /// The character under the cursor, `None` at end of line or source
    pub fn current_char(&self) -> Result<Option<char>, ParseError> {
        Ok(self.line()?.and_then(|l| l.get(self.column).copied()))
    }

    /// What is left of the current line from the cursor on
    pub fn rest_of_line(&self) -> Result<&[char], ParseError> {
        Ok(match self.line()? {
            Some(l) if self.column < l.len() => &l[self.column..],
            _ => &[],
        })
    }

    pub fn advance(&mut self) {
        self.column += 1;
        self.start_of_line = false;
    }

    pub fn advance_line(&mut self) {
        self.line += 1;
        self.column = 0;
        self.start_of_line = true;
    }

    /// True at or past the end of the current line (and at end of source)
    pub fn at_end_of_line(&self) -> Result<bool, ParseError> {
        Ok(match self.line()? {
            Some(l) => self.column >= l.len(),
            None => true,
        })
    }

    pub fn at_end_of_source(&self) -> Result<bool, ParseError> {
        Ok(self.line()?.is_none())
    }

    /// Non-consuming lookahead on the current line
    pub fn peek_starts_with(&self, text: &str) -> Result<bool, ParseError> {
        let rest = self.rest_of_line()?;
        let want: Vec<char> = text.chars().collect();
        Ok(rest.len() >= want.len() && rest[..want.len()] == want[..])
    }

    /// Consume exactly `text`, then any whitespace after it on the same line.
    pub fn consume_exact(&mut self, text: &str) -> Result<(), ParseError> {
        for want in text.chars() {
            if self.current_char()? != Some(want) {
                return Err(self.error(
                    ParseErrorKind::UnexpectedToken,
                    format!("Expected to see {}", text),
                ));
            }
            self.advance();
        }
        self.skip_inline_whitespace()?;
        Ok(())
    }

    /// Skip whitespace without leaving the line. Returns true if any was skipped.
    ///
    /// Leading indentation does not count as content: the start-of-line flag
    /// survives.
    pub fn skip_inline_whitespace(&mut self) -> Result<bool, ParseError> {
        let start_of_line = self.start_of_line;
        let mut skipped = false;
        while let Some(c) = self.current_char()? {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
            skipped = true;
        }
        self.start_of_line = start_of_line;
        Ok(skipped)
    }

    /// Skip whitespace and blank lines. Returns true if anything was skipped.
    pub fn skip_whitespace_across_lines(&mut self) -> Result<bool, ParseError> {
        let mut skipped = false;
        loop {
            skipped |= self.skip_inline_whitespace()?;
            if self.at_end_of_source()? || !self.at_end_of_line()? {
                return Ok(skipped);
            }
            self.advance_line();
            skipped = true;
        }
    }

    /// Skip whitespace and `//` comment lines. Returns true if a comment was skipped.
    pub fn skip_comments(&mut self) -> Result<bool, ParseError> {
        let mut skipped = false;
        self.skip_whitespace_across_lines()?;
        while !self.at_end_of_source()? && self.peek_starts_with("//")? {
            skipped = true;
            self.advance_line();
            self.skip_whitespace_across_lines()?;
        }
        Ok(skipped)
    }
}
