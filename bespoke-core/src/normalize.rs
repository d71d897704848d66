//! Canonical child ordering for associative-commutative operators.
//!
//! Two independent canonical forms are supported:
//!
//! - [`CanonicalOrder::Hash`] sorts children by memoized structural hash.
//!   Fast, and makes semantically identical subtrees syntactically identical
//!   for hash-keyed deduplication.
//! - [`CanonicalOrder::Lexical`] sorts children by canonical printed form.
//!   Independent of the hash implementation, for output that must reproduce
//!   across runs and versions.
//!
//! Both sorts are stable, so ties keep insertion order and normalizing twice
//! is the identity.

use crate::ast::{Expr, ExprKind, SumTerm};
use serde::{Deserialize, Serialize};

/// Which canonical child order to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanonicalOrder {
    /// Order children by structural hash.
    Hash,
    /// Order children by canonical printed form.
    Lexical,
}

fn sort_exprs(mut cs: Vec<Expr>, order: CanonicalOrder) -> Vec<Expr> {
    match order {
        CanonicalOrder::Hash => cs.sort_by_key(Expr::structural_hash),
        CanonicalOrder::Lexical => cs.sort_by_cached_key(|e| e.to_string()),
    }
    cs
}

fn sort_terms(mut ts: Vec<SumTerm>, order: CanonicalOrder) -> Vec<SumTerm> {
    match order {
        CanonicalOrder::Hash => ts.sort_by_key(|t| (t.expr.structural_hash(), t.coeff)),
        CanonicalOrder::Lexical => ts.sort_by_cached_key(|t| (t.expr.to_string(), t.coeff)),
    }
    ts
}

/// Recursively order the children of every associative-commutative node.
#[must_use]
pub fn normalize(expr: Expr, order: CanonicalOrder) -> Expr {
    let e = expr.map_children(&mut |c| normalize(c, order));
    match e.kind() {
        ExprKind::And(_)
        | ExprKind::Or(_)
        | ExprKind::Xor(_)
        | ExprKind::Product(_)
        | ExprKind::Sum(_) => match e.into_kind() {
            ExprKind::And(cs) => Expr::and(sort_exprs(cs, order)),
            ExprKind::Or(cs) => Expr::or(sort_exprs(cs, order)),
            ExprKind::Xor(cs) => Expr::xor(sort_exprs(cs, order)),
            ExprKind::Product(cs) => Expr::product(sort_exprs(cs, order)),
            ExprKind::Sum(ts) => Expr::sum(sort_terms(ts, order)),
            _ => unreachable!("kind checked above"),
        },
        _ => e,
    }
}
