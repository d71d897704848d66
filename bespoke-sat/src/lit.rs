//! SAT variables and literals.
//!
//! Variables are 1-based `u32` indices; a literal is the signed DIMACS form,
//! positive for the variable itself and negative for its negation. The two
//! constant sentinels [`Lit::TRUE`] and [`Lit::FALSE`] let encoding routines
//! return "always satisfied" and "never satisfied" through the same type;
//! the clause emitter strips them before anything reaches a sink.

use std::fmt;
use std::ops::Neg;

/// A Boolean variable index, 1-based.
pub type Var = u32;

/// A non-zero signed literal over a [`Var`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// The always-true sentinel. Not a real variable.
    pub const TRUE: Lit = Lit(i32::MAX);

    /// The always-false sentinel, the negation of [`Lit::TRUE`].
    pub const FALSE: Lit = Lit(-i32::MAX);

    /// Positive literal of `var`.
    ///
    /// # Panics
    ///
    /// Panics when `var` is zero or collides with the sentinel index.
    #[must_use]
    pub fn positive(var: Var) -> Self {
        assert!(var > 0 && var < i32::MAX as Var, "invalid variable index");
        Self(var as i32)
    }

    /// Negative literal of `var`.
    #[must_use]
    pub fn negative(var: Var) -> Self {
        -Self::positive(var)
    }

    /// The underlying variable.
    #[must_use]
    pub fn var(self) -> Var {
        self.0.unsigned_abs()
    }

    /// Whether this is the positive occurrence.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether this is one of the two constant sentinels.
    #[must_use]
    pub fn is_const(self) -> bool {
        self == Lit::TRUE || self == Lit::FALSE
    }

    /// The signed DIMACS code.
    #[must_use]
    pub fn code(self) -> i32 {
        self.0
    }
}

impl Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Lit::TRUE {
            write!(f, "T")
        } else if *self == Lit::FALSE {
            write!(f, "F")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
