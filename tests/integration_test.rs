// Integration tests for the interpreter

use pretty_assertions::assert_eq;
use std::time::Duration;
use tifor::interpreter::config::RunOptions;
use tifor::interpreter::engine::Interpreter;
use tifor::interpreter::errors::{FatalError, RuntimeError};
use tifor::memory::variables::Var;
use tifor::parser::parser::{ParseErrorKind, Parser};
use tifor::snapshot::{MockTerminal, VariablePanel};

type TestInterpreter = Interpreter<VariablePanel, MockTerminal>;

fn interpreter() -> TestInterpreter {
    Interpreter::new(VariablePanel::new(), MockTerminal::new())
}

fn run_with(source: &str, initial_value: f64, options: &RunOptions) -> (TestInterpreter, Result<(), FatalError>) {
    let mut interp = interpreter();
    let result = interp.run(source, initial_value, options);
    (interp, result)
}

fn run(source: &str) -> TestInterpreter {
    let (interp, result) = run_with(source, 0.0, &RunOptions::default());
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    interp
}

fn parse_error_kind(source: &str) -> ParseErrorKind {
    match Parser::new(source).parse_program() {
        Ok(program) => panic!("expected a parse error, got {:?}", program),
        Err(e) => e.kind,
    }
}

#[test]
fn test_empty_program_only_seeds_ans() {
    let (interp, result) = run_with("", 42.0, &RunOptions::default());
    assert!(result.is_ok());
    assert!(interp.sink().lines.is_empty());
    for var in Var::ALL {
        let expected = if var == Var::Ans { 42.0 } else { 0.0 };
        assert_eq!(interp.variables().get(var), expected, "{}", var);
    }
}

#[test]
fn test_count_up() {
    let interp = run("For(A,1,5\nDisp A\nEnd");
    assert_eq!(interp.sink().get_output(), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(interp.variables().get(Var::A), 6.0);
}

#[test]
fn test_count_down() {
    let interp = run("For(A,5,1,~1\nDisp A\nEnd");
    assert_eq!(interp.sink().get_output(), vec!["5", "4", "3", "2", "1"]);
    assert_eq!(interp.variables().get(Var::A), 0.0);
}

#[test]
fn test_ans_iterator_rejected() {
    assert_eq!(parse_error_kind("For(Ans,1,5\nEnd"), ParseErrorKind::InvalidIterator);
}

#[test]
fn test_lone_end_rejected() {
    assert_eq!(parse_error_kind("End"), ParseErrorKind::UnbalancedEnd);
}

#[test]
fn test_parse_error_runs_nothing() {
    let (interp, result) = run_with("Disp 1\nDisp 2\nEnd", 0.0, &RunOptions::default());
    assert!(matches!(result, Err(FatalError::Parse(_))));
    assert!(interp.sink().get_output().is_empty());
    assert_eq!(interp.sink().errors().len(), 1);
}

#[test]
fn test_missing_end_closed_at_end_of_source() {
    let source = "For(A,1,3\nDisp A";

    let (quiet, result) = run_with(source, 0.0, &RunOptions::default());
    assert!(result.is_ok());
    assert_eq!(quiet.sink().get_output(), vec!["1", "2", "3"]);
    assert!(quiet.sink().warnings().is_empty());

    let (loud, result) = run_with(source, 0.0, &RunOptions::default().with_warnings(true));
    assert!(result.is_ok());
    assert_eq!(loud.sink().get_output(), vec!["1", "2", "3"]);
    assert_eq!(loud.sink().warnings().len(), 1);
    assert!(loud.sink().warnings()[0].starts_with("Warning during parsing at 3:1:"));
}

#[test]
fn test_overflow_aborts_and_stops_output() {
    let big = format!("1{}", "0".repeat(308));
    let source = format!("Disp 0\nFor(B,{big},{big},{big}\nDisp B\nEnd\nDisp 9");
    let (interp, result) = run_with(&source, 0.0, &RunOptions::default());

    match result {
        Err(FatalError::Runtime(RuntimeError::NonFinite { var, value })) => {
            assert_eq!(var, Var::B);
            assert!(value.is_infinite());
        }
        other => panic!("expected a non-finite abort, got {:?}", other),
    }
    assert_eq!(interp.sink().get_output(), vec!["0", "1e+308"]);
    assert_eq!(
        interp.sink().errors(),
        vec!["Aborted: variable B became non-finite"]
    );
}

#[test]
fn test_literal_too_large_aborts() {
    let huge = "9".repeat(400);
    let (interp, result) = run_with(&format!("For(C,{huge},1\nEnd"), 0.0, &RunOptions::default());
    assert!(matches!(
        result,
        Err(FatalError::Runtime(RuntimeError::NonFinite { var: Var::C, .. }))
    ));
    assert_eq!(interp.variables().get(Var::C), 0.0);
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "// sum\nFor(A,1,3:For(B,A,3\nDisp B\nEnd\nEnd\nDisp theta";
    let first = Parser::new(source).parse_program().unwrap();
    let second = Parser::new(source).parse_program().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rerun_is_deterministic() {
    let source = "For(A,1,3\nFor(B,A,3\nDisp B\nEnd\nEnd\nDisp Ans";
    let mut interp = interpreter();
    interp.run(source, 2.0, &RunOptions::default()).unwrap();
    let first = interp.sink().get_output();
    let first_values = *interp.variables().values();

    interp.sink_mut().clear();
    interp.run(source, 2.0, &RunOptions::default()).unwrap();
    assert_eq!(interp.sink().get_output(), first);
    assert_eq!(*interp.variables().values(), first_values);
    assert_eq!(first, vec!["1", "2", "3", "2", "3", "3", "2"]);
}

#[test]
fn test_body_extends_end_bound() {
    // The body bumps E from 3 to 6 on the first pass, so A runs past 3
    let interp = run("For(E,2,2\nEnd\nFor(A,1,E\nFor(E,5,5\nEnd\nDisp A\nEnd");
    assert_eq!(interp.sink().get_output(), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_separators_and_comments() {
    let source = "// header\n  For(I,1,2):Disp I:End\n\n// trailer";
    let interp = run(source);
    assert_eq!(interp.sink().get_output(), vec!["1", "2"]);
}

#[test]
fn test_loop_watchdog_is_silent() {
    let options = RunOptions::default()
        .with_warnings(true)
        .with_loop_timeout(Duration::from_millis(30));
    let (interp, result) = run_with("For(A,1,2,0\nEnd\nDisp A", 0.0, &options);
    assert!(result.is_ok());
    assert_eq!(interp.sink().get_output(), vec!["1"]);
    assert!(interp.sink().warnings().is_empty());
    assert!(interp.sink().errors().is_empty());
}

#[test]
fn test_each_loop_gets_its_own_watchdog() {
    let options = RunOptions::default().with_loop_timeout(Duration::from_millis(20));
    let (interp, result) = run_with(
        "For(A,1,2,0\nEnd\nFor(B,1,2,0\nEnd\nFor(C,1,3\nEnd\nDisp C",
        0.0,
        &options,
    );
    assert!(result.is_ok());
    assert_eq!(interp.sink().get_output(), vec!["4"]);
}

#[test]
fn test_number_formatting_in_output() {
    let interp = run("Disp .1\nDisp ~0\nDisp 1000000000000000000000\nDisp .0000001\nDisp 12.50");
    assert_eq!(
        interp.sink().get_output(),
        vec!["0.1", "0", "1e+21", "1e-7", "12.5"]
    );
}
