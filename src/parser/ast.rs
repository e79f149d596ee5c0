//! Statement tree produced by the parser
//!
//! The tree is built once per run and never mutated afterwards. `End` has no
//! node of its own: the parser treats it as the signal that closes the block it
//! is collecting.

use crate::memory::variables::Var;

/// Source location (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A literal number or a reference to one of the fixed variables.
///
/// References are resolved only when the statement holding them executes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Literal(f64),
    Reference(Var),
}

/// An ordered run of statements, executed top to bottom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// `For(iterator, start, end[, step])` followed by its body.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub iterator: Var,
    pub start: Value,
    pub end: Value,
    /// Literal `1` when the header omits it
    pub step: Value,
    pub body: Block,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    For(ForLoop),
    Disp {
        value: Value,
        location: SourceLocation,
    },
}

impl Statement {
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::For(for_loop) => for_loop.location,
            Statement::Disp { location, .. } => *location,
        }
    }
}

/// A parsed program: the top-level block.
pub type Program = Block;
