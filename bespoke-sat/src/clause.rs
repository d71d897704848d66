//! Clause sinks.
//!
//! The encoder hands finished clauses to a [`ClauseSink`]; the in-memory
//! [`CnfBuffer`] is the default consumer and what the test suites inspect.
//! Sinks receive clauses with the constant sentinels already stripped: a
//! clause containing [`crate::Lit::TRUE`] is dropped before reaching the
//! sink, and [`crate::Lit::FALSE`] occurrences are removed. An empty clause
//! therefore only ever arrives for genuinely unsatisfiable input.

use crate::lit::{Lit, Var};

/// Consumer of encoded clauses.
pub trait ClauseSink {
    /// Record one clause (a disjunction of literals).
    fn add_clause(&mut self, lits: &[Lit]);
}

/// An in-memory clause store.
#[derive(Debug, Clone, Default)]
pub struct CnfBuffer {
    clauses: Vec<Vec<Lit>>,
    max_var: Var,
    unsat: bool,
}

impl CnfBuffer {
    /// Empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded clauses, in emission order.
    #[must_use]
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// Number of recorded clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether no clause has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Largest variable index seen in any clause.
    #[must_use]
    pub fn max_var(&self) -> Var {
        self.max_var
    }

    /// Whether an empty clause was recorded (immediate unsatisfiability).
    #[must_use]
    pub fn is_unsat(&self) -> bool {
        self.unsat
    }
}

impl ClauseSink for CnfBuffer {
    fn add_clause(&mut self, lits: &[Lit]) {
        if lits.is_empty() {
            self.unsat = true;
        }
        for &l in lits {
            debug_assert!(!l.is_const(), "sentinels must be stripped before the sink");
            self.max_var = self.max_var.max(l.var());
        }
        self.clauses.push(lits.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_clauses_and_tracks_variables() {
        let mut buf = CnfBuffer::new();
        buf.add_clause(&[Lit::positive(1), Lit::negative(4)]);
        buf.add_clause(&[Lit::positive(2)]);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.max_var(), 4);
        assert!(!buf.is_unsat());
    }

    #[test]
    fn empty_clause_flags_unsat() {
        let mut buf = CnfBuffer::new();
        buf.add_clause(&[]);
        assert!(buf.is_unsat());
        assert_eq!(buf.len(), 1);
    }
}
