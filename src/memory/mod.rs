//! Variable memory for the interpreter
//!
//! - [`variables`]: the closed [`Var`](variables::Var) set, the
//!   [`VariableStore`](variables::VariableStore) holding their values, and the
//!   [`VariableObserver`](variables::VariableObserver) capability notified on
//!   every write
//! - [`format`]: how numbers are rendered when displayed
//!
//! There is no heap and no scoping: every variable is global to the run and
//! always holds a finite `f64`.

pub mod format;
pub mod variables;

pub use format::format_number;
pub use variables::{Var, VariableObserver, VariableStore};
