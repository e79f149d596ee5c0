//! Fatal error types
//!
//! [`RuntimeError`] covers everything that can stop a run after parsing
//! succeeded. [`FatalError`] is what [`Interpreter::run`] hands back: either
//! the parse failed or execution did. Both halt immediately; nothing is
//! retried.
//!
//! [`Interpreter::run`]: crate::interpreter::engine::Interpreter::run

use crate::memory::variables::Var;
use crate::parser::parser::ParseError;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A write would have stored infinity or NaN
    NonFinite { var: Var, value: f64 },

    /// A by-name lookup used a name outside the fixed set
    UnknownVariable { name: String },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::NonFinite { var, .. } => {
                write!(f, "Aborted: variable {} became non-finite", var)
            }
            RuntimeError::UnknownVariable { name } => {
                write!(f, "Unknown variable '{}'", name)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Why a run stopped early
#[derive(Debug, Clone, PartialEq)]
pub enum FatalError {
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::Parse(e) => write!(f, "{}", e),
            FatalError::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FatalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FatalError::Parse(e) => Some(e),
            FatalError::Runtime(e) => Some(e),
        }
    }
}

impl From<ParseError> for FatalError {
    fn from(err: ParseError) -> Self {
        FatalError::Parse(err)
    }
}

impl From<RuntimeError> for FatalError {
    fn from(err: RuntimeError) -> Self {
        FatalError::Runtime(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_message_names_variable() {
        let err = RuntimeError::NonFinite {
            var: Var::Theta,
            value: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "Aborted: variable theta became non-finite");
    }

    #[test]
    fn test_fatal_error_wraps_runtime() {
        let fatal: FatalError = RuntimeError::UnknownVariable { name: "xy".into() }.into();
        assert_eq!(fatal.to_string(), "Unknown variable 'xy'");
        assert!(std::error::Error::source(&fatal).is_some());
    }
}
