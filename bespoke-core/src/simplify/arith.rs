//! Rules for weighted sums, products and unary negation.
//!
//! The weighted-sum rule is the workhorse: it flattens nested sums by
//! multiplying coefficients through, absorbs negations into signs, folds
//! constants into at most one term, sorts children into hash-canonical
//! order, and merges duplicate children by summing their weights. All
//! coefficient arithmetic saturates.

use super::Rewrite;
use crate::ast::{Expr, ExprKind, SumTerm};

pub(super) fn simplify_sum(terms: Vec<SumTerm>) -> Rewrite {
    let original = terms.clone();

    // Flatten nested sums and absorb unary negations.
    let mut flat: Vec<SumTerm> = Vec::with_capacity(terms.len());
    for t in terms {
        if matches!(t.expr.kind(), ExprKind::Sum(_)) {
            if let ExprKind::Sum(inner) = t.expr.into_kind() {
                for it in inner {
                    flat.push(SumTerm::new(t.coeff.saturating_mul(it.coeff), it.expr));
                }
            }
            continue;
        }
        if matches!(t.expr.kind(), ExprKind::Neg(_)) {
            if let ExprKind::Neg(x) = t.expr.into_kind() {
                flat.push(SumTerm::new(t.coeff.saturating_neg(), *x));
            }
            continue;
        }
        flat.push(t);
    }

    // Fold constants; drop zero coefficients.
    let mut constant = 0i64;
    let mut kept: Vec<SumTerm> = Vec::with_capacity(flat.len());
    for t in flat {
        if t.coeff == 0 {
            continue;
        }
        if let Some(v) = t.expr.as_int() {
            constant = constant.saturating_add(t.coeff.saturating_mul(v));
        } else {
            kept.push(t);
        }
    }

    // Hash-canonical order (stable: ties keep insertion order), then merge
    // duplicate children by summing weights.
    kept.sort_by_key(|t| t.expr.structural_hash());
    let mut merged: Vec<SumTerm> = Vec::with_capacity(kept.len());
    for t in kept {
        if let Some(m) = merged.iter_mut().find(|m| m.expr == t.expr) {
            m.coeff = m.coeff.saturating_add(t.coeff);
        } else {
            merged.push(t);
        }
    }
    merged.retain(|t| t.coeff != 0);

    let out = if merged.is_empty() {
        Expr::int(constant)
    } else {
        let mut ts = merged;
        if constant != 0 {
            ts.push(SumTerm::new(1, Expr::int(constant)));
        }
        if ts.len() == 1 {
            let t = ts.pop().expect("len checked");
            match t.coeff {
                1 => t.expr,
                -1 => Expr::neg(t.expr),
                _ => Expr::sum(vec![t]),
            }
        } else {
            Expr::sum(ts)
        }
    };

    if out == Expr::sum(original) {
        Rewrite::Unchanged(out)
    } else {
        Rewrite::Changed(out)
    }
}

pub(super) fn simplify_product(children: Vec<Expr>) -> Rewrite {
    let original = children.clone();

    let mut flat: Vec<Expr> = Vec::with_capacity(children.len());
    for c in children {
        if matches!(c.kind(), ExprKind::Product(_)) {
            if let ExprKind::Product(inner) = c.into_kind() {
                flat.extend(inner);
            }
            continue;
        }
        flat.push(c);
    }

    // Fold constants and absorb negation signs.
    let mut constant = 1i64;
    let mut kept: Vec<Expr> = Vec::with_capacity(flat.len());
    for c in flat {
        if let Some(v) = c.as_int() {
            constant = constant.saturating_mul(v);
            continue;
        }
        if matches!(c.kind(), ExprKind::Neg(_)) {
            if let ExprKind::Neg(x) = c.into_kind() {
                constant = constant.saturating_neg();
                kept.push(*x);
            }
            continue;
        }
        kept.push(c);
    }

    if constant == 0 {
        return Rewrite::Changed(Expr::int(0));
    }

    kept.sort_by_key(Expr::structural_hash);

    let out = if kept.is_empty() {
        Expr::int(constant)
    } else if constant == 1 {
        if kept.len() == 1 {
            kept.into_iter().next().expect("len checked")
        } else {
            Expr::product(kept)
        }
    } else if kept.len() == 1 {
        // A constant times one factor is a weighted-sum term.
        Expr::sum(vec![SumTerm::new(
            constant,
            kept.into_iter().next().expect("len checked"),
        )])
    } else {
        // Invariant: at most one constant factor, kept in front.
        let mut cs = vec![Expr::int(constant)];
        cs.extend(kept);
        Expr::product(cs)
    };

    if out == Expr::product(original) {
        Rewrite::Unchanged(out)
    } else {
        Rewrite::Changed(out)
    }
}

pub(super) fn simplify_neg(child: Expr) -> Rewrite {
    if let Some(v) = child.as_int() {
        return Rewrite::Changed(Expr::int(v.saturating_neg()));
    }
    if matches!(child.kind(), ExprKind::Neg(_)) {
        if let ExprKind::Neg(x) = child.into_kind() {
            return Rewrite::Changed(*x);
        }
        unreachable!()
    }
    if matches!(child.kind(), ExprKind::Sum(_)) {
        if let ExprKind::Sum(ts) = child.into_kind() {
            return Rewrite::Changed(Expr::sum(
                ts.into_iter()
                    .map(|t| SumTerm::new(t.coeff.saturating_neg(), t.expr))
                    .collect(),
            ));
        }
        unreachable!()
    }
    Rewrite::Unchanged(Expr::neg(child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Category;

    fn x() -> Expr {
        Expr::var("x", Category::Decision)
    }

    fn y() -> Expr {
        Expr::var("y", Category::Decision)
    }

    #[test]
    fn sum_flattens_with_coefficient_multiplication() {
        let inner = Expr::sum(vec![SumTerm::new(3, x()), SumTerm::new(1, Expr::int(2))]);
        let r = simplify_sum(vec![SumTerm::new(2, inner), SumTerm::new(1, y())]);
        let out = r.into_expr();
        // 2*(3x + 2) + y = 6x + y + 4
        if let ExprKind::Sum(ts) = out.kind() {
            assert_eq!(ts.len(), 3);
            assert!(ts.iter().any(|t| t.coeff == 6 && t.expr == x()));
            assert!(ts.iter().any(|t| t.coeff == 1 && t.expr == y()));
            assert_eq!(ts.last().unwrap().expr, Expr::int(4));
        } else {
            panic!("expected a sum, got {out}");
        }
    }

    #[test]
    fn sum_absorbs_negation_children() {
        let r = simplify_sum(vec![SumTerm::new(2, Expr::neg(x())), SumTerm::new(1, y())]);
        let out = r.into_expr();
        if let ExprKind::Sum(ts) = out.kind() {
            assert!(ts.iter().any(|t| t.coeff == -2 && t.expr == x()));
        } else {
            panic!("expected a sum, got {out}");
        }
    }

    #[test]
    fn sum_merges_duplicates_and_drops_zero() {
        // 2x + 3x = 5x
        let r = simplify_sum(vec![SumTerm::new(2, x()), SumTerm::new(3, x())]);
        assert_eq!(r, Rewrite::Changed(Expr::sum(vec![SumTerm::new(5, x())])));
        // 2x - 2x + y = y
        let r = simplify_sum(vec![
            SumTerm::new(2, x()),
            SumTerm::new(-2, x()),
            SumTerm::new(1, y()),
        ]);
        assert_eq!(r, Rewrite::Changed(y()));
    }

    #[test]
    fn sum_collapse_cases() {
        assert_eq!(simplify_sum(vec![]), Rewrite::Changed(Expr::int(0)));
        assert_eq!(
            simplify_sum(vec![SumTerm::new(1, x())]),
            Rewrite::Changed(x())
        );
        assert_eq!(
            simplify_sum(vec![SumTerm::new(-1, x())]),
            Rewrite::Changed(Expr::neg(x()))
        );
        // A lone weighted term is already canonical.
        assert_eq!(
            simplify_sum(vec![SumTerm::new(2, x())]),
            Rewrite::Unchanged(Expr::sum(vec![SumTerm::new(2, x())]))
        );
    }

    #[test]
    fn sum_keeps_at_most_one_constant() {
        let r = simplify_sum(vec![
            SumTerm::new(1, Expr::int(2)),
            SumTerm::new(1, x()),
            SumTerm::new(3, Expr::int(1)),
        ]);
        let out = r.into_expr();
        if let ExprKind::Sum(ts) = out.kind() {
            let consts: Vec<_> = ts.iter().filter(|t| t.expr.as_int().is_some()).collect();
            assert_eq!(consts.len(), 1);
            assert_eq!(consts[0].expr.as_int(), Some(5));
        } else {
            panic!("expected a sum, got {out}");
        }
    }

    #[test]
    fn product_constant_zero_annihilates() {
        let r = simplify_product(vec![x(), Expr::int(0), y()]);
        assert_eq!(r, Rewrite::Changed(Expr::int(0)));
    }

    #[test]
    fn product_with_single_factor_becomes_weighted_term() {
        let r = simplify_product(vec![Expr::int(3), x()]);
        assert_eq!(
            r,
            Rewrite::Changed(Expr::sum(vec![SumTerm::new(3, x())]))
        );
    }

    #[test]
    fn product_collapse_cases() {
        assert_eq!(simplify_product(vec![]), Rewrite::Changed(Expr::int(1)));
        assert_eq!(simplify_product(vec![x()]), Rewrite::Changed(x()));
        let r = simplify_product(vec![Expr::neg(x()), y()]);
        // Sign moves into the constant; -1 * x * y stays a product with the
        // constant in front.
        let out = r.into_expr();
        if let ExprKind::Product(cs) = out.kind() {
            assert_eq!(cs[0], Expr::int(-1));
            assert_eq!(cs.len(), 3);
        } else {
            panic!("expected a product, got {out}");
        }
    }

    #[test]
    fn neg_folds_and_cancels() {
        assert_eq!(
            simplify_neg(Expr::int(7)),
            Rewrite::Changed(Expr::int(-7))
        );
        assert_eq!(simplify_neg(Expr::neg(x())), Rewrite::Changed(x()));
        assert_eq!(
            simplify_neg(Expr::sum(vec![SumTerm::new(2, x())])),
            Rewrite::Changed(Expr::sum(vec![SumTerm::new(-2, x())]))
        );
        assert_eq!(simplify_neg(x()), Rewrite::Unchanged(Expr::neg(x())));
    }
}
