use crate::interpreter::constants::PARSE_TIMEOUT;
use crate::memory::variables::Var;
use crate::parser::ast::*;
use crate::parser::lexer::Cursor;
use std::fmt;
use std::time::Duration;

/// What kind of syntax error stopped the parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken,
    ExpectedValue,
    InvalidIterator,
    UnbalancedEnd,
    ParseTimeout,
}

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            kind,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SyntaxError while parsing at {}:{}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// A non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warning during parsing at {}:{}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

/// Result of looking for the next statement
enum Next {
    Statement(Statement),
    End(SourceLocation),
    EndOfSource,
}

/// Recursive descent parser for the calculator language
pub struct Parser {
    cursor: Cursor,
    /// Number of `For(` bodies currently open
    depth: usize,
    warned_unclosed: bool,
    warnings: Vec<ParseWarning>,
}

impl Parser {
    /// Create a parser with the default two second watchdog.
    pub fn new(source: &str) -> Self {
        Self::with_timeout(source, PARSE_TIMEOUT)
    }

    /// Create a parser whose watchdog fires `timeout` after this call.
    pub fn with_timeout(source: &str, timeout: Duration) -> Self {
        Self {
            cursor: Cursor::new(source, timeout),
            depth: 0,
            warned_unclosed: false,
            warnings: Vec::new(),
        }
    }

    /// Parse the whole source into the top-level block
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let program = self.parse_block()?;
        tracing::debug!(
            statements = program.len(),
            warnings = self.warnings.len(),
            "parsed program"
        );
        Ok(program)
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ParseWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Collect statements until `End` or end of source.
    ///
    /// At the top level `depth` is zero, so an `End` there has nothing to
    /// close. Running out of source inside a loop body closes it implicitly;
    /// only the innermost such block reports it.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut statements = Vec::new();
        loop {
            match self.next_statement()? {
                Next::Statement(statement) => statements.push(statement),
                Next::End(location) => {
                    if self.depth == 0 {
                        return Err(ParseError::new(
                            ParseErrorKind::UnbalancedEnd,
                            "Too many End statements!",
                            location,
                        ));
                    }
                    self.depth -= 1;
                    return Ok(Block::new(statements));
                }
                Next::EndOfSource => {
                    if self.depth > 0 {
                        if !self.warned_unclosed {
                            self.warn(format!(
                                "Not enough End statements: {} unclosed block(s).",
                                self.depth
                            ));
                            self.warned_unclosed = true;
                        }
                        self.depth -= 1;
                    }
                    return Ok(Block::new(statements));
                }
            }
        }
    }

    /// Skip separators, blank lines and comments, then parse one statement.
    fn next_statement(&mut self) -> Result<Next, ParseError> {
        loop {
            let mut skipped = false;
            if self.cursor.at_end_of_source()? {
                return Ok(Next::EndOfSource);
            }
            while self.cursor.at_end_of_line()? {
                self.cursor.advance_line();
                if self.cursor.at_end_of_source()? {
                    return Ok(Next::EndOfSource);
                }
                skipped = true;
            }
            self.cursor.skip_inline_whitespace()?;
            if self.cursor.peek_starts_with(":")? {
                self.cursor.consume_exact(":")?;
                self.cursor.begin_logical_line();
                skipped = true;
            }
            skipped |= self.cursor.skip_comments()?;
            if !skipped {
                break;
            }
        }
        if self.cursor.at_end_of_source()? {
            return Ok(Next::EndOfSource);
        }

        let location = self.cursor.location();
        if self.cursor.peek_starts_with("For(")? {
            self.expect_start_of_line("Unexpected for-loop")?;
            return Ok(Next::Statement(self.parse_for(location)?));
        }
        if self.cursor.peek_starts_with("Disp ")? {
            self.expect_start_of_line("Unexpected Disp statement")?;
            return Ok(Next::Statement(self.parse_disp(location)?));
        }
        if self.cursor.peek_starts_with("End")? {
            self.expect_start_of_line("Unexpected End statement")?;
            self.cursor.consume_exact("End")?;
            return Ok(Next::End(location));
        }
        Err(self.cursor.error(
            ParseErrorKind::UnexpectedToken,
            "Expected to see For(, Disp or End.",
        ))
    }

    fn warn(&mut self, message: String) {
        let warning = ParseWarning {
            message,
            location: self.cursor.location(),
        };
        tracing::debug!(%warning, "parse warning");
        self.warnings.push(warning);
    }

    fn expect_start_of_line(&self, message: &str) -> Result<(), ParseError> {
        if self.cursor.is_start_of_line() {
            Ok(())
        } else {
            Err(self.cursor.error(ParseErrorKind::UnexpectedToken, message))
        }
    }

    /// Parse `For(iterator,start,end[,step][)]` and its body
    fn parse_for(&mut self, location: SourceLocation) -> Result<Statement, ParseError> {
        self.cursor.consume_exact("For(")?;

        let iterator = match self.parse_reference()? {
            Some(Var::Ans) => {
                return Err(self.cursor.error(
                    ParseErrorKind::InvalidIterator,
                    "You cannot use Ans as the iterator in a for-loop",
                ))
            }
            Some(var) => var,
            None => {
                return Err(self
                    .cursor
                    .error(ParseErrorKind::ExpectedValue, "Expected to see a variable name."))
            }
        };

        self.cursor.skip_inline_whitespace()?;
        self.cursor.consume_exact(",")?;
        let start = self.parse_value()?;

        self.cursor.skip_inline_whitespace()?;
        self.cursor.consume_exact(",")?;
        let end = self.parse_value()?;
        self.cursor.skip_inline_whitespace()?;

        let step = if self.cursor.peek_starts_with(",")? {
            self.cursor.consume_exact(",")?;
            let step = self.parse_value()?;
            self.cursor.skip_inline_whitespace()?;
            step
        } else {
            Value::Literal(1.0)
        };

        // The closing parenthesis is optional, as on the calculator
        if self.cursor.peek_starts_with(")")? {
            self.cursor.consume_exact(")")?;
        }

        self.depth += 1;
        let body = self.parse_block()?;

        Ok(Statement::For(ForLoop {
            iterator,
            start,
            end,
            step,
            body,
            location,
        }))
    }

    fn parse_disp(&mut self, location: SourceLocation) -> Result<Statement, ParseError> {
        self.cursor.consume_exact("Disp ")?;
        let value = self.parse_value()?;
        Ok(Statement::Disp { value, location })
    }

    /// A numeric literal or a variable reference
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        if let Some(n) = self.parse_literal()? {
            return Ok(Value::Literal(n));
        }
        if let Some(var) = self.parse_reference()? {
            return Ok(Value::Reference(var));
        }
        Err(self.cursor.error(
            ParseErrorKind::ExpectedValue,
            "Expected to see a numeric literal or a variable name.",
        ))
    }

    /// `~?(digits(.digits)?|.digits)`, where `~` negates
    fn parse_literal(&mut self) -> Result<Option<f64>, ParseError> {
        let text = {
            let rest = self.cursor.rest_of_line()?;
            let digits_from = |from: usize| {
                rest[from..]
                    .iter()
                    .take_while(|c| c.is_ascii_digit())
                    .count()
            };

            let mut len = usize::from(rest.first() == Some(&'~'));
            let integer = digits_from(len);
            len += integer;
            if rest.get(len) == Some(&'.') {
                let fraction = digits_from(len + 1);
                if fraction > 0 {
                    len += 1 + fraction;
                } else if integer == 0 {
                    return Ok(None);
                }
            } else if integer == 0 {
                return Ok(None);
            }
            rest[..len].iter().collect::<String>()
        };

        self.cursor.consume_exact(&text)?;
        text.replace('~', "-").parse::<f64>().map(Some).map_err(|_| {
            self.cursor.error(
                ParseErrorKind::ExpectedValue,
                format!("Invalid numeric literal: {}", text),
            )
        })
    }

    /// Longest variable name at the cursor, if any
    fn parse_reference(&mut self) -> Result<Option<Var>, ParseError> {
        let mut found: Option<Var> = None;
        for var in Var::ALL {
            if self.cursor.peek_starts_with(var.name())?
                && found.map_or(true, |f| var.name().len() > f.name().len())
            {
                found = Some(var);
            }
        }
        if let Some(var) = found {
            self.cursor.consume_exact(var.name())?;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source).parse_program()
    }

    fn disp(value: Value, line: usize, column: usize) -> Statement {
        Statement::Disp {
            value,
            location: SourceLocation::new(line, column),
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_disp_literals() {
        let program = parse("Disp 1\nDisp ~2.5\nDisp .75\nDisp ~.5").unwrap();
        assert_eq!(
            program.statements,
            vec![
                disp(Value::Literal(1.0), 1, 1),
                disp(Value::Literal(-2.5), 2, 1),
                disp(Value::Literal(0.75), 3, 1),
                disp(Value::Literal(-0.5), 4, 1),
            ]
        );
    }

    #[test]
    fn test_reference_longest_match() {
        let program = parse("Disp Ans\nDisp A\nDisp theta\nDisp T").unwrap();
        assert_eq!(
            program.statements,
            vec![
                disp(Value::Reference(Var::Ans), 1, 1),
                disp(Value::Reference(Var::A), 2, 1),
                disp(Value::Reference(Var::Theta), 3, 1),
                disp(Value::Reference(Var::T), 4, 1),
            ]
        );
    }

    #[test]
    fn test_for_loop_with_default_step() {
        let program = parse("For(A,1,5\nDisp A\nEnd").unwrap();
        assert_eq!(
            program.statements,
            vec![Statement::For(ForLoop {
                iterator: Var::A,
                start: Value::Literal(1.0),
                end: Value::Literal(5.0),
                step: Value::Literal(1.0),
                body: Block::new(vec![disp(Value::Reference(Var::A), 2, 1)]),
                location: SourceLocation::new(1, 1),
            })]
        );
    }

    #[test]
    fn test_for_loop_with_step_and_paren() {
        let program = parse("For(B, 10 , Ans , ~2 )\nEnd").unwrap();
        match &program.statements[0] {
            Statement::For(f) => {
                assert_eq!(f.iterator, Var::B);
                assert_eq!(f.start, Value::Literal(10.0));
                assert_eq!(f.end, Value::Reference(Var::Ans));
                assert_eq!(f.step, Value::Literal(-2.0));
                assert!(f.body.is_empty());
            }
            other => panic!("expected for-loop, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_loops() {
        let program = parse("For(A,1,2\nFor(B,1,2\nDisp B\nEnd\nDisp A\nEnd\nDisp 0").unwrap();
        assert_eq!(program.len(), 2);
        let Statement::For(outer) = &program.statements[0] else {
            panic!("expected for-loop");
        };
        assert_eq!(outer.body.len(), 2);
        assert!(matches!(outer.body.statements[0], Statement::For(_)));
        assert_eq!(program.statements[1], disp(Value::Literal(0.0), 7, 1));
    }

    #[test]
    fn test_separator_starts_logical_line() {
        let program = parse("For(A,1,3:Disp A:End:Disp 9").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.statements[1], disp(Value::Literal(9.0), 1, 22));
    }

    #[test]
    fn test_comments_are_skipped() {
        let program = parse("// header\nDisp 1 // trailing\n\n// more\n//\nDisp 2").unwrap();
        assert_eq!(
            program.statements,
            vec![disp(Value::Literal(1.0), 2, 1), disp(Value::Literal(2.0), 6, 1)]
        );
    }

    #[test]
    fn test_indented_statements() {
        let program = parse("For(A,1,2\n    Disp A\nEnd").unwrap();
        let Statement::For(f) = &program.statements[0] else {
            panic!("expected for-loop");
        };
        assert_eq!(f.body.statements, vec![disp(Value::Reference(Var::A), 2, 5)]);
    }

    #[test]
    fn test_ans_iterator_rejected() {
        let err = parse("For(Ans,1,5\nEnd").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidIterator);
        assert_eq!(err.location.line, 1);
    }

    #[test]
    fn test_unbalanced_end() {
        let err = parse("End").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnbalancedEnd);
        assert_eq!(err.location, SourceLocation::new(1, 1));

        let err = parse("For(A,1,2\nEnd\nEnd").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnbalancedEnd);
        assert_eq!(err.location, SourceLocation::new(3, 1));
    }

    #[test]
    fn test_missing_end_warns_once() {
        let mut parser = Parser::new("For(A,1,3\nFor(B,1,3\nDisp A");
        let program = parser.parse_program().unwrap();
        assert_eq!(program.len(), 1);
        assert_eq!(parser.warnings().len(), 1);
        assert_eq!(
            parser.warnings()[0].message,
            "Not enough End statements: 2 unclosed block(s)."
        );
    }

    #[test]
    fn test_balanced_source_has_no_warnings() {
        let mut parser = Parser::new("For(A,1,3\nEnd");
        parser.parse_program().unwrap();
        assert!(parser.warnings().is_empty());
    }

    #[test]
    fn test_statement_mid_line_rejected() {
        let err = parse("Disp 1 Disp 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.location, SourceLocation::new(1, 8));

        let err = parse("Disp 1 End").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);

        let err = parse("Disp 1 For(A,1,2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_unknown_statement_rejected() {
        let err = parse("Disp 1\nA").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.location, SourceLocation::new(2, 1));
    }

    #[test]
    fn test_expected_value() {
        let err = parse("Disp x").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedValue);
        assert_eq!(err.location, SourceLocation::new(1, 6));

        let err = parse("For(A,\nEnd").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedValue);

        let err = parse("For(1,2,3").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedValue);
    }

    #[test]
    fn test_missing_comma() {
        let err = parse("For(A 1,2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.message, "Expected to see ,");
    }

    #[test]
    fn test_parse_timeout() {
        let mut parser = Parser::with_timeout("Disp 1", Duration::ZERO);
        std::thread::sleep(Duration::from_millis(5));
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ParseTimeout);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let source = "For(A,1,3\nFor(B,A,~1,~1):Disp B\nEnd\nDisp theta";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_error_display() {
        let err = parse("End").unwrap_err();
        assert_eq!(
            err.to_string(),
            "SyntaxError while parsing at 1:1: Too many End statements!"
        );
    }
}
