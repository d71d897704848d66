//! Sound value-range computation.
//!
//! `bounds` answers "which values can this subtree possibly take". The
//! answer must never be too tight; it may be loose. Boolean-valued nodes
//! report `[0, 1]`, variables report their declared domain, and weighted
//! sums combine scaled child ranges with saturating arithmetic. Exact
//! interval tracking through a sum is capped; past the cap the running set
//! is coarsened to its hull, which stays sound.

use super::{Expr, ExprKind};
use crate::range::RangeList;
use crate::symbols::SymbolTable;

/// Interval-count cap on the running set while summing; beyond it the set is
/// coarsened to its hull.
const SUM_INTERVAL_LIMIT: usize = 64;

impl Expr {
    /// The provable value range of this subtree.
    ///
    /// An undeclared variable yields the full representable range, which is
    /// sound; an empty result means the subtree can take no value at all
    /// (some variable has an empty domain).
    #[must_use]
    pub fn bounds(&self, symbols: &SymbolTable) -> RangeList {
        match self.kind() {
            ExprKind::Int(v) => RangeList::point(*v),
            ExprKind::True => RangeList::point(1),
            ExprKind::False => RangeList::point(0),
            ExprKind::Var(n) => match symbols.domain(n) {
                Some(d) => d.clone(),
                None => RangeList::full(),
            },
            ExprKind::Neg(a) => a.bounds(symbols).negate(),
            ExprKind::Sum(ts) => {
                let mut acc = RangeList::point(0);
                for t in ts {
                    let child = t.expr.bounds(symbols).scale(t.coeff);
                    acc = acc.sum(&child);
                    if acc.interval_count() > SUM_INTERVAL_LIMIT {
                        acc = acc.hull();
                    }
                    if acc.is_empty() {
                        return acc;
                    }
                }
                acc
            }
            ExprKind::Product(cs) => {
                let mut lo = 1i64;
                let mut hi = 1i64;
                for c in cs {
                    let b = c.bounds(symbols);
                    let (clo, chi) = match (b.lb(), b.ub()) {
                        (Some(l), Some(u)) => (l, u),
                        _ => return RangeList::empty(),
                    };
                    let cands = [
                        lo.saturating_mul(clo),
                        lo.saturating_mul(chi),
                        hi.saturating_mul(clo),
                        hi.saturating_mul(chi),
                    ];
                    lo = cands.iter().copied().min().unwrap_or(0);
                    hi = cands.iter().copied().max().unwrap_or(0);
                }
                RangeList::interval(lo, hi)
            }
            ExprKind::Not(_)
            | ExprKind::And(_)
            | ExprKind::Or(_)
            | ExprKind::Xor(_)
            | ExprKind::Iff(..)
            | ExprKind::Eq(..)
            | ExprKind::Le(..)
            | ExprKind::Preserved(_) => RangeList::bool_domain(),
        }
    }
}
