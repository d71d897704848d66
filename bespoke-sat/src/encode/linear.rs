//! Order encoding of weighted linear inequalities.
//!
//! A [`LinearLe`] is the normal form `sum(coeff_i * var_i) <= bound`. The
//! clause generator enumerates, cheapest branching factor first, every
//! combination of per-term values whose prefix leaves the remaining terms a
//! feasible completion, and closes each surviving combination with a single
//! order literal on the final (widest) term. Combinations that can no longer
//! be satisfied are cut off with a shorter clause; combinations that cannot
//! be violated produce clauses containing a constant-true literal, which the
//! emitter drops.
//!
//! `>=` delegates to `<=` with negated weights and bound; `=` is both
//! inclusive bounds; reification runs the generator once per implication
//! direction with the auxiliary (or its negation) as a guard.

use super::{MAX_DOMAIN_VALUES, SatEncoder};
use crate::clause::ClauseSink;
use crate::error::{EncodeError, Result};
use crate::lit::Lit;
use bespoke_core::ast::{Expr, ExprKind};
use bespoke_core::range::RangeList;
use smallvec::SmallVec;
use tracing::debug;

/// One weighted variable of a linear constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinTerm {
    /// Integer coefficient, never zero.
    pub coeff: i64,
    /// Model variable name.
    pub var: String,
}

/// A linear inequality `sum(coeff_i * var_i) <= bound` over model variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearLe {
    /// Weighted variable terms, duplicates merged.
    pub terms: Vec<LinTerm>,
    /// Inclusive upper bound.
    pub bound: i64,
}

fn accumulate(
    e: &Expr,
    coeff: i64,
    terms: &mut Vec<LinTerm>,
    constant: &mut i64,
) -> Result<()> {
    match e.kind() {
        ExprKind::Int(v) => {
            *constant = constant.saturating_add(coeff.saturating_mul(*v));
            Ok(())
        }
        ExprKind::Var(n) => {
            terms.push(LinTerm {
                coeff,
                var: n.clone(),
            });
            Ok(())
        }
        ExprKind::Neg(a) => accumulate(a, coeff.saturating_neg(), terms, constant),
        ExprKind::Sum(ts) => {
            for t in ts {
                accumulate(&t.expr, coeff.saturating_mul(t.coeff), terms, constant)?;
            }
            Ok(())
        }
        _ => Err(EncodeError::NonLinear(e.to_string())),
    }
}

impl LinearLe {
    /// Extract the normal form of `lhs <= rhs`, moving every variable term
    /// to the left and every constant to the bound. Duplicate variables are
    /// merged; zero coefficients are dropped.
    pub fn from_le(lhs: &Expr, rhs: &Expr) -> Result<Self> {
        let mut terms = Vec::new();
        let mut constant = 0i64;
        accumulate(lhs, 1, &mut terms, &mut constant)?;
        accumulate(rhs, -1, &mut terms, &mut constant)?;
        let mut merged: Vec<LinTerm> = Vec::with_capacity(terms.len());
        for t in terms {
            match merged.iter_mut().find(|m| m.var == t.var) {
                Some(m) => m.coeff = m.coeff.saturating_add(t.coeff),
                None => merged.push(t),
            }
        }
        merged.retain(|t| t.coeff != 0);
        Ok(Self {
            terms: merged,
            bound: constant.saturating_neg(),
        })
    }

    /// The `<=` rendition of `sum >= bound`: all weights and the bound
    /// negated.
    #[must_use]
    pub fn at_least(&self) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| LinTerm {
                    coeff: t.coeff.saturating_neg(),
                    var: t.var.clone(),
                })
                .collect(),
            bound: self.bound.saturating_neg(),
        }
    }

    /// `sum <= bound - 1`.
    #[must_use]
    pub fn strict(&self) -> Self {
        Self {
            terms: self.terms.clone(),
            bound: self.bound.saturating_sub(1),
        }
    }

    /// The complement `sum >= bound + 1` in `<=` form; `self` and its
    /// negation partition all assignments.
    #[must_use]
    pub fn negation(&self) -> Self {
        let mut n = self.at_least();
        n.bound = n.bound.saturating_sub(1);
        n
    }
}

struct TermInfo {
    coeff: i64,
    var: String,
    /// Reachable values of `coeff * var`, possibly coarsened to the hull.
    values: RangeList,
}

impl<'a, S: ClauseSink> SatEncoder<'a, S> {
    /// Encode `lin` under `guard` literals prefixed to every clause.
    pub fn encode_le(&mut self, lin: &LinearLe, guard: &[Lit]) -> Result<()> {
        let mut infos: Vec<TermInfo> = Vec::with_capacity(lin.terms.len());
        for t in &lin.terms {
            let domain = self
                .symbols
                .domain(&t.var)
                .ok_or_else(|| EncodeError::UnknownVariable(t.var.clone()))?;
            if domain.size() > MAX_DOMAIN_VALUES {
                return Err(EncodeError::UnboundedDomain(t.var.clone()));
            }
            let mut values = domain.scale(t.coeff);
            if values.interval_count() > self.config.max_intervals {
                values = values.hull();
                self.stats.coarsened += 1;
            }
            if values.is_empty() {
                // A term over an empty domain can take no value at all.
                self.emit(guard);
                return Ok(());
            }
            infos.push(TermInfo {
                coeff: t.coeff,
                var: t.var.clone(),
                values,
            });
        }
        if infos.is_empty() {
            if lin.bound < 0 {
                self.emit(guard);
            }
            return Ok(());
        }
        // Cheapest branching factor first; the widest term is closed with a
        // single order literal at the end of each combination.
        infos.sort_by(|a, b| {
            a.values
                .size()
                .cmp(&b.values.size())
                .then_with(|| a.var.cmp(&b.var))
        });
        let n = infos.len();
        let mut min_rest = vec![0i64; n + 1];
        let mut max_rest = vec![0i64; n + 1];
        for i in (0..n).rev() {
            min_rest[i] =
                min_rest[i + 1].saturating_add(infos[i].values.lb().expect("non-empty"));
            max_rest[i] =
                max_rest[i + 1].saturating_add(infos[i].values.ub().expect("non-empty"));
        }
        debug!(terms = n, bound = lin.bound, "order-encoding linear constraint");
        let mut clause: SmallVec<[Lit; 8]> = SmallVec::from_slice(guard);
        self.le_combinations(&infos, &min_rest, &max_rest, 0, lin.bound, &mut clause)
    }

    fn le_combinations(
        &mut self,
        infos: &[TermInfo],
        min_rest: &[i64],
        max_rest: &[i64],
        i: usize,
        slack: i64,
        clause: &mut SmallVec<[Lit; 8]>,
    ) -> Result<()> {
        if max_rest[i] <= slack {
            // Every completion satisfies the bound; nothing to forbid.
            return Ok(());
        }
        let t = &infos[i];
        if i == infos.len() - 1 {
            let lit = self.lit_le_scaled(t.coeff, &t.var, slack)?;
            clause.push(lit);
            self.emit(clause.as_slice());
            clause.pop();
            return Ok(());
        }
        for v in t.values.iter() {
            let lit = self.lit_le_scaled(t.coeff, &t.var, v.saturating_sub(1))?;
            if v.saturating_add(min_rest[i + 1]) > slack {
                // No completion from here on; forbid reaching this value.
                clause.push(lit);
                self.emit(clause.as_slice());
                clause.pop();
                break;
            }
            clause.push(lit);
            self.le_combinations(
                infos,
                min_rest,
                max_rest,
                i + 1,
                slack.saturating_sub(v),
                clause,
            )?;
            clause.pop();
        }
        Ok(())
    }

    /// Encode `sum = bound` as the conjunction of both inclusive bounds.
    pub fn encode_eq_linear(&mut self, lin: &LinearLe, guard: &[Lit]) -> Result<()> {
        self.encode_le(lin, guard)?;
        self.encode_le(&lin.at_least(), guard)
    }

    /// Encode the biconditional `aux <-> (sum <= bound)`: the generator runs
    /// once per implication direction with the auxiliary as a guard.
    pub fn encode_le_reified(&mut self, lin: &LinearLe, aux: Lit) -> Result<()> {
        self.encode_le(lin, &[-aux])?;
        self.encode_le(&lin.negation(), &[aux])
    }
}
