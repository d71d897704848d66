//! At-most-one and exactly-one clause families.
//!
//! Five interchangeable encodings of "at most one of these literals is
//! true", selected by [`AmoStyle`] in the encoder configuration. Each family
//! is independently sound and complete for the cardinality property: an
//! assignment with at most one true literal extends to the auxiliaries, an
//! assignment with two or more true literals falsifies some clause.
//! `exactly-one` is the configured at-most-one family plus the single
//! at-least-one clause.

use super::SatEncoder;
use crate::clause::ClauseSink;
use crate::lit::Lit;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

/// Clause family used for at-most-one constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmoStyle {
    /// One binary clause per literal pair. No auxiliaries, quadratic.
    Pairwise,
    /// Sequential register chain (ladder). Linear, n-1 auxiliaries.
    Ladder,
    /// Grouped with a commander literal per group, recursing on the
    /// commanders.
    Commander,
    /// Grid placement with row and column selectors (product encoding).
    Product,
    /// Balanced binary split with one selector per half.
    Tree,
}

impl<'a, S: ClauseSink> SatEncoder<'a, S> {
    /// Encode "at most one of `lits`" with the configured family, prefixing
    /// `guard` to every clause.
    pub fn encode_at_most_one(&mut self, lits: &[Lit], guard: &[Lit]) {
        if lits.len() < 2 {
            return;
        }
        debug!(family = ?self.config.amo, lits = lits.len(), "encoding at-most-one");
        match self.config.amo {
            AmoStyle::Pairwise => self.amo_pairwise(lits, guard),
            AmoStyle::Ladder => self.amo_ladder(lits, guard),
            AmoStyle::Commander => self.amo_commander(lits, guard),
            AmoStyle::Product => self.amo_product(lits, guard),
            AmoStyle::Tree => self.amo_tree(lits, guard),
        }
    }

    /// Encode "exactly one of `lits`": the at-most-one family plus the
    /// at-least-one clause.
    pub fn encode_exactly_one(&mut self, lits: &[Lit], guard: &[Lit]) {
        self.encode_at_most_one(lits, guard);
        self.emit_with(guard, lits);
    }

    fn amo_pairwise(&mut self, lits: &[Lit], guard: &[Lit]) {
        for i in 0..lits.len() {
            for j in i + 1..lits.len() {
                self.emit_with(guard, &[-lits[i], -lits[j]]);
            }
        }
    }

    fn amo_ladder(&mut self, lits: &[Lit], guard: &[Lit]) {
        let n = lits.len();
        if n <= 2 {
            return self.amo_pairwise(lits, guard);
        }
        // regs[i] commits "one of lits[..=i] is already true".
        let regs: Vec<Lit> = (0..n - 1)
            .map(|_| {
                self.stats.aux_vars += 1;
                Lit::positive(self.new_sat_var())
            })
            .collect();
        self.emit_with(guard, &[-lits[0], regs[0]]);
        for i in 1..n - 1 {
            self.emit_with(guard, &[-lits[i], regs[i]]);
            self.emit_with(guard, &[-regs[i - 1], regs[i]]);
            self.emit_with(guard, &[-lits[i], -regs[i - 1]]);
        }
        self.emit_with(guard, &[-lits[n - 1], -regs[n - 2]]);
    }

    fn amo_commander(&mut self, lits: &[Lit], guard: &[Lit]) {
        let group = self.config.commander_group.max(2);
        if lits.len() <= group + 1 {
            return self.amo_pairwise(lits, guard);
        }
        let mut commanders: SmallVec<[Lit; 8]> = SmallVec::new();
        for chunk in lits.chunks(group) {
            self.amo_pairwise(chunk, guard);
            self.stats.aux_vars += 1;
            let c = Lit::positive(self.new_sat_var());
            for &l in chunk {
                self.emit_with(guard, &[-l, c]);
            }
            commanders.push(c);
        }
        self.amo_commander(&commanders, guard);
    }

    fn amo_product(&mut self, lits: &[Lit], guard: &[Lit]) {
        let n = lits.len();
        if n <= 3 {
            return self.amo_pairwise(lits, guard);
        }
        let cols = (1..).find(|c| c * c >= n).expect("n is positive");
        let rows = n.div_ceil(cols);
        let row_sel: Vec<Lit> = (0..rows)
            .map(|_| {
                self.stats.aux_vars += 1;
                Lit::positive(self.new_sat_var())
            })
            .collect();
        let col_sel: Vec<Lit> = (0..cols)
            .map(|_| {
                self.stats.aux_vars += 1;
                Lit::positive(self.new_sat_var())
            })
            .collect();
        for (k, &l) in lits.iter().enumerate() {
            self.emit_with(guard, &[-l, row_sel[k / cols]]);
            self.emit_with(guard, &[-l, col_sel[k % cols]]);
        }
        self.amo_pairwise(&row_sel, guard);
        self.amo_pairwise(&col_sel, guard);
    }

    fn amo_tree(&mut self, lits: &[Lit], guard: &[Lit]) {
        if lits.len() <= 3 {
            return self.amo_pairwise(lits, guard);
        }
        let (left, right) = lits.split_at(lits.len() / 2);
        self.stats.aux_vars += 2;
        let a = Lit::positive(self.new_sat_var());
        let b = Lit::positive(self.new_sat_var());
        for &l in left {
            self.emit_with(guard, &[-l, a]);
        }
        for &l in right {
            self.emit_with(guard, &[-l, b]);
        }
        self.emit_with(guard, &[-a, -b]);
        self.amo_tree(left, guard);
        self.amo_tree(right, guard);
    }
}
