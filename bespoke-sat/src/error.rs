//! Error types for the encoder crate.
//!
//! As in the core crate, infeasibility is not an error: an unsatisfiable
//! constraint encodes to an empty clause. The variants here are fatal to the
//! caller and indicate a bug in an earlier pass or an input the clause-based
//! backend cannot express.

use thiserror::Error;

/// Errors raised while encoding constraints to clauses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A referenced variable has no symbol-table entry.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// A variable's domain is too large for a per-value encoding.
    #[error("domain of `{0}` is too large to encode")]
    UnboundedDomain(String),

    /// A comparison side contains a non-linear sub-expression.
    #[error("expression is not linear: {0}")]
    NonLinear(String),

    /// The constraint shape has no clause encoding.
    #[error("cannot encode constraint: {0}")]
    Unsupported(String),
}

/// Result alias used throughout the encoder crate.
pub type Result<T> = std::result::Result<T, EncodeError>;
