//! Source parser
//!
//! Turns program text into a [`ast::Program`]:
//! - [`lexer`]: the character [`lexer::Cursor`] with the parse watchdog
//! - [`parser`]: recursive descent over statements
//! - [`ast`]: the tree the interpreter executes
//!
//! # Language
//!
//! One statement per logical line; `:` starts a new logical line within a
//! physical one. Statements are `For(var,start,end[,step][)]`, `Disp value`
//! and `End`. Lines starting with `//` are comments. A value is a numeric
//! literal (`~` is the negative sign) or one of the 28 variable names.

pub mod ast;
pub mod lexer;
pub mod parser;
