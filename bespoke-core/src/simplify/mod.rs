//! Bottom-up simplification to a fixpoint.
//!
//! Each node kind has one rewrite rule. A rule either leaves the node alone
//! or returns a semantically equal, strictly more canonical replacement; no
//! rule applies to its own output. The engine runs bottom-up sweeps over the
//! tree until a whole sweep changes nothing. Applying the engine twice
//! yields byte-identical output.
//!
//! A rule never errors on type-correct input. Folding to `false` — from a
//! constant, a complementary pair, disjoint bounds or a GCD mismatch — is a
//! legitimate outcome that propagates upward so the caller can report an
//! unsatisfiable model.

mod arith;
mod boolean;
mod cmp;

use crate::ast::{Expr, ExprKind};
use crate::symbols::SymbolTable;
use tracing::{debug, warn};

/// Outcome of one rule application on an owned node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// The node was replaced.
    Changed(Expr),
    /// The node is already in normal form for its kind.
    Unchanged(Expr),
}

impl Rewrite {
    /// The resulting expression, either way.
    #[must_use]
    pub fn into_expr(self) -> Expr {
        match self {
            Rewrite::Changed(e) | Rewrite::Unchanged(e) => e,
        }
    }

    /// Whether the rule replaced the node.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Rewrite::Changed(_))
    }
}

/// Tunables threaded through every rule invocation. No global state.
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Dominance mode: a conjunction that discovers a `false` child keeps
    /// the `false` together with its `Preserved` children instead of
    /// collapsing outright. Caller-specific behavior, off by default.
    pub dominance: bool,
    /// Upper bound on fixpoint sweeps; a warning is logged if it is hit.
    pub max_rounds: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            dominance: false,
            max_rounds: 64,
        }
    }
}

/// Counters accumulated across one context's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SimplifyStats {
    /// Completed sweeps that changed something.
    pub rounds: u64,
    /// Rule applications that replaced a node.
    pub rules_applied: u64,
    /// Replacements that produced the constant `false`.
    pub infeasible_folds: u64,
}

/// Per-run simplification state: symbol table access, options, counters.
#[derive(Debug)]
pub struct SimplifyContext<'a> {
    /// Variable domains and categories.
    pub symbols: &'a SymbolTable,
    /// Behavior switches.
    pub options: SimplifyOptions,
    /// Counters.
    pub stats: SimplifyStats,
}

impl<'a> SimplifyContext<'a> {
    /// Context with default options.
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            options: SimplifyOptions::default(),
            stats: SimplifyStats::default(),
        }
    }

    /// Context with explicit options.
    #[must_use]
    pub fn with_options(symbols: &'a SymbolTable, options: SimplifyOptions) -> Self {
        Self {
            symbols,
            options,
            stats: SimplifyStats::default(),
        }
    }
}

/// Simplify `expr` to a fixpoint.
pub fn simplify(mut expr: Expr, cx: &mut SimplifyContext<'_>) -> Expr {
    for round in 0..cx.options.max_rounds {
        match sweep(expr, cx) {
            Rewrite::Changed(e) => {
                cx.stats.rounds += 1;
                expr = e;
            }
            Rewrite::Unchanged(e) => {
                debug!(rounds = round, "simplification reached fixpoint");
                return e;
            }
        }
    }
    warn!(
        max_rounds = cx.options.max_rounds,
        "simplification stopped at round limit before fixpoint"
    );
    expr
}

/// One bottom-up sweep: children first, then this node's rule.
fn sweep(expr: Expr, cx: &mut SimplifyContext<'_>) -> Rewrite {
    if expr.is_leaf() {
        return Rewrite::Unchanged(expr);
    }
    let mut child_changed = false;
    let rebuilt = expr.map_children(&mut |c| match sweep(c, cx) {
        Rewrite::Changed(e) => {
            child_changed = true;
            e
        }
        Rewrite::Unchanged(e) => e,
    });
    match apply_rule(rebuilt, cx) {
        Rewrite::Changed(e) => {
            cx.stats.rules_applied += 1;
            if e.is_false() {
                cx.stats.infeasible_folds += 1;
            }
            Rewrite::Changed(e)
        }
        Rewrite::Unchanged(e) => {
            if child_changed {
                Rewrite::Changed(e)
            } else {
                Rewrite::Unchanged(e)
            }
        }
    }
}

/// Apply the one rule for this node's kind, exactly once.
fn apply_rule(expr: Expr, cx: &mut SimplifyContext<'_>) -> Rewrite {
    if expr.is_leaf() {
        return Rewrite::Unchanged(expr);
    }
    match expr.into_kind() {
        ExprKind::Not(a) => boolean::simplify_not(*a),
        ExprKind::And(cs) => boolean::simplify_and(cs, cx),
        ExprKind::Or(cs) => boolean::simplify_or(cs),
        ExprKind::Xor(cs) => boolean::simplify_xor(cs),
        ExprKind::Iff(a, b) => boolean::simplify_iff(*a, *b),
        ExprKind::Preserved(a) => boolean::simplify_preserved(*a),
        ExprKind::Eq(a, b) => cmp::simplify_eq(*a, *b, cx),
        ExprKind::Le(a, b) => cmp::simplify_le(*a, *b, cx),
        ExprKind::Neg(a) => arith::simplify_neg(*a),
        ExprKind::Sum(ts) => arith::simplify_sum(ts),
        ExprKind::Product(cs) => arith::simplify_product(cs),
        ExprKind::True | ExprKind::False | ExprKind::Int(_) | ExprKind::Var(_) => {
            unreachable!("leaves have no rewrite rules")
        }
    }
}
