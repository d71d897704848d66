//! Error types for the core crate.
//!
//! Infeasibility discovered during rewriting is *not* an error: it propagates
//! as a `false` node so the caller can report an unsatisfiable model. The
//! variants here cover genuine misuse of the API surface, typically a bug in
//! an earlier pass.

use thiserror::Error;

/// Errors raised by the expression model and its passes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A referenced variable has no symbol-table entry.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// A variable was declared twice.
    #[error("variable `{0}` is already declared")]
    DuplicateVariable(String),

    /// A boolean was required where an integer expression was found.
    #[error("expression is not boolean: {0}")]
    NotBoolean(String),

    /// An integer was required where a boolean expression was found.
    #[error("expression is not integer: {0}")]
    NotInteger(String),

    /// An evaluation was attempted on a variable with no assigned value.
    #[error("no value assigned to variable `{0}`")]
    Unassigned(String),
}

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;
