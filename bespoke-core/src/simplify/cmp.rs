//! Rules for equality and ordering comparisons.
//!
//! Besides constant folding, these rules exploit the interval-set bounds of
//! each side: provably disjoint value ranges fold an equality to `false`
//! without touching the variables, and a weighted sum compared against a
//! constant can be divided through by the coefficient GCD, detecting
//! infeasibility purely syntactically when the constant is not divisible.

use super::{Rewrite, SimplifyContext};
use crate::ast::{Expr, ExprKind, SumTerm};
use num_integer::Integer;

/// Floor division (rounds toward negative infinity).
pub(super) fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }
}

/// View an expression as weighted-sum terms without reallocating leaves.
fn into_terms(e: Expr) -> Vec<SumTerm> {
    if matches!(e.kind(), ExprKind::Sum(_)) {
        if let ExprKind::Sum(ts) = e.into_kind() {
            return ts;
        }
        unreachable!()
    }
    if matches!(e.kind(), ExprKind::Neg(_)) {
        if let ExprKind::Neg(x) = e.into_kind() {
            return vec![SumTerm::new(-1, *x)];
        }
        unreachable!()
    }
    vec![SumTerm::new(1, e)]
}

/// `a - b` as an unflattened weighted sum.
fn difference(a: Expr, b: Expr) -> Expr {
    let mut ts = into_terms(a);
    ts.extend(
        into_terms(b)
            .into_iter()
            .map(|t| SumTerm::new(t.coeff.saturating_neg(), t.expr)),
    );
    Expr::sum(ts)
}

/// Split off the constant term of a sum, if present.
fn split_constant(terms: Vec<SumTerm>) -> (Vec<SumTerm>, i64) {
    let mut constant = 0i64;
    let mut rest = Vec::with_capacity(terms.len());
    for t in terms {
        if let Some(v) = t.expr.as_int() {
            constant = constant.saturating_add(t.coeff.saturating_mul(v));
        } else {
            rest.push(t);
        }
    }
    (rest, constant)
}

fn coefficient_gcd(terms: &[SumTerm]) -> i64 {
    let mut g = 0i64;
    for t in terms {
        g = g.gcd(&t.coeff);
    }
    g
}

fn divide_terms(terms: Vec<SumTerm>, g: i64) -> Vec<SumTerm> {
    terms
        .into_iter()
        .map(|t| SumTerm::new(t.coeff / g, t.expr))
        .collect()
}

pub(super) fn simplify_eq(a: Expr, b: Expr, cx: &mut SimplifyContext<'_>) -> Rewrite {
    if a == b {
        return Rewrite::Changed(Expr::truth(true));
    }
    if let (Some(x), Some(y)) = (a.as_int(), b.as_int()) {
        return Rewrite::Changed(Expr::truth(x == y));
    }
    // Equality of truth values is a biconditional.
    if a.is_boolean(cx.symbols) && b.is_boolean(cx.symbols) {
        return Rewrite::Changed(Expr::iff(a, b));
    }

    // Sign normalization through unary negation.
    if matches!(a.kind(), ExprKind::Neg(_)) && matches!(b.kind(), ExprKind::Neg(_)) {
        if let (ExprKind::Neg(x), ExprKind::Neg(y)) = (a.into_kind(), b.into_kind()) {
            return Rewrite::Changed(Expr::eq(*x, *y));
        }
        unreachable!()
    }
    if matches!(a.kind(), ExprKind::Neg(_)) && b.as_int().is_some() {
        let c = b.as_int().expect("checked");
        if let ExprKind::Neg(x) = a.into_kind() {
            return Rewrite::Changed(Expr::eq(*x, Expr::int(c.saturating_neg())));
        }
        unreachable!()
    }
    if a.as_int().is_some() && matches!(b.kind(), ExprKind::Neg(_)) {
        let c = a.as_int().expect("checked");
        if let ExprKind::Neg(x) = b.into_kind() {
            return Rewrite::Changed(Expr::eq(*x, Expr::int(c.saturating_neg())));
        }
        unreachable!()
    }

    // Canonical orientation: constant on the right.
    if a.as_int().is_some() && b.as_int().is_none() {
        return Rewrite::Changed(Expr::eq(b, a));
    }

    // Provably disjoint value ranges. With a constant right-hand side this
    // doubles as the domain-membership check for a bare variable.
    let ba = a.bounds(cx.symbols);
    let bb = b.bounds(cx.symbols);
    if ba.intersect(&bb).is_empty() {
        return Rewrite::Changed(Expr::truth(false));
    }

    // A boolean variable compared to 0/1 folds to a literal.
    if let (ExprKind::Var(n), Some(v)) = (a.kind(), b.as_int()) {
        if cx.symbols.is_bool(n) {
            if v == 1 {
                return Rewrite::Changed(a);
            }
            if v == 0 {
                return Rewrite::Changed(Expr::not(a));
            }
        }
    }

    // Two weighted sums: move everything to the left.
    if matches!(a.kind(), ExprKind::Sum(_)) && matches!(b.kind(), ExprKind::Sum(_)) {
        return Rewrite::Changed(Expr::eq(difference(a, b), Expr::int(0)));
    }

    // Weighted sum against a constant: strip its constant term, then factor
    // out the coefficient GCD.
    if matches!(a.kind(), ExprKind::Sum(_)) && b.as_int().is_some() {
        let k = b.as_int().expect("checked");
        if let ExprKind::Sum(terms) = a.into_kind() {
            let (rest, constant) = split_constant(terms);
            if constant != 0 {
                return Rewrite::Changed(Expr::eq(
                    Expr::sum(rest),
                    Expr::int(k.saturating_sub(constant)),
                ));
            }
            let g = coefficient_gcd(&rest);
            if g > 1 {
                if k % g != 0 {
                    return Rewrite::Changed(Expr::truth(false));
                }
                return Rewrite::Changed(Expr::eq(
                    Expr::sum(divide_terms(rest, g)),
                    Expr::int(k / g),
                ));
            }
            return Rewrite::Unchanged(Expr::eq(Expr::sum(rest), Expr::int(k)));
        }
        unreachable!()
    }

    Rewrite::Unchanged(Expr::eq(a, b))
}

pub(super) fn simplify_le(a: Expr, b: Expr, cx: &mut SimplifyContext<'_>) -> Rewrite {
    if let (Some(x), Some(y)) = (a.as_int(), b.as_int()) {
        return Rewrite::Changed(Expr::truth(x <= y));
    }
    if a == b {
        return Rewrite::Changed(Expr::truth(true));
    }

    let ba = a.bounds(cx.symbols);
    let bb = b.bounds(cx.symbols);
    match (ba.lb(), ba.ub(), bb.lb(), bb.ub()) {
        // A side with an empty range can take no value at all.
        (None, ..) | (_, _, None, _) => return Rewrite::Changed(Expr::truth(false)),
        (Some(alo), Some(ahi), Some(blo), Some(bhi)) => {
            if ahi <= blo {
                return Rewrite::Changed(Expr::truth(true));
            }
            if alo > bhi {
                return Rewrite::Changed(Expr::truth(false));
            }
        }
        _ => unreachable!("lb and ub are both present or both absent"),
    }

    // Canonical shape: weighted sum on the left, constant on the right.
    if b.as_int().is_none() {
        return Rewrite::Changed(Expr::le(difference(a, b), Expr::int(0)));
    }
    if matches!(a.kind(), ExprKind::Sum(_)) {
        let k = b.as_int().expect("checked");
        if let ExprKind::Sum(terms) = a.into_kind() {
            let (rest, constant) = split_constant(terms);
            if constant != 0 {
                return Rewrite::Changed(Expr::le(
                    Expr::sum(rest),
                    Expr::int(k.saturating_sub(constant)),
                ));
            }
            let g = coefficient_gcd(&rest);
            if g > 1 {
                return Rewrite::Changed(Expr::le(
                    Expr::sum(divide_terms(rest, g)),
                    Expr::int(floor_div(k, g)),
                ));
            }
            return Rewrite::Unchanged(Expr::le(Expr::sum(rest), Expr::int(k)));
        }
        unreachable!()
    }

    Rewrite::Unchanged(Expr::le(a, b))
}
