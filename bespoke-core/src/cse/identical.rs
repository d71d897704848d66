//! Whole-subexpression elimination.
//!
//! Collects every composite sub-expression occurring at least twice across
//! the normalized constraint set, keyed by structural hash with equality
//! buckets, and repeatedly factors the most profitable one into an auxiliary
//! variable plus a definitional constraint. Re-deriving the occurrence
//! counts after each factoring keeps nested sharing correct: once an inner
//! expression is shared, the outer trees containing its reference can be
//! shared in a later round.

use super::{CseStats, define_auxiliary};
use crate::ast::Expr;
use crate::normalize::{CanonicalOrder, normalize};
use crate::symbols::SymbolTable;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for whole-subexpression elimination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdenticalCseConfig {
    /// Minimum occurrences before a sub-expression is factored.
    pub min_occurrences: usize,
    /// Canonical order applied before matching.
    pub order: CanonicalOrder,
    /// Safety cap on factoring rounds.
    pub max_rounds: usize,
}

impl Default for IdenticalCseConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            order: CanonicalOrder::Hash,
            max_rounds: 10_000,
        }
    }
}

/// One shared sub-expression and how often it occurs.
struct Candidate {
    expr: Expr,
    count: usize,
    size: usize,
}

fn collect_candidates(constraints: &[Expr], min_occurrences: usize) -> Vec<Candidate> {
    let mut buckets: FxHashMap<u64, Vec<(Expr, usize)>> = FxHashMap::default();
    for c in constraints {
        c.visit(&mut |node| {
            if node.is_leaf() {
                return;
            }
            let bucket = buckets.entry(node.structural_hash()).or_default();
            match bucket.iter_mut().find(|(e, _)| e == node) {
                Some((_, n)) => *n += 1,
                None => bucket.push((node.clone(), 1)),
            }
        });
    }
    let mut out: Vec<Candidate> = buckets
        .into_values()
        .flatten()
        .filter(|(_, n)| *n >= min_occurrences)
        .map(|(expr, count)| {
            let size = expr.node_count();
            Candidate { expr, count, size }
        })
        .collect();
    // Deterministic preference: most occurrences, then largest, with the
    // printed form as the final tiebreak.
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(b.size.cmp(&a.size))
            .then_with(|| a.expr.to_string().cmp(&b.expr.to_string()))
    });
    out
}

fn replace_all(e: Expr, target: &Expr, replacement: &Expr, replaced: &mut u64) -> Expr {
    if e == *target {
        *replaced += 1;
        return replacement.clone();
    }
    e.map_children(&mut |c| replace_all(c, target, replacement, replaced))
}

/// Factor shared sub-expressions out of `constraints`, appending one
/// definitional constraint per introduced auxiliary.
pub fn eliminate_identical(
    constraints: Vec<Expr>,
    symbols: &mut SymbolTable,
    config: &IdenticalCseConfig,
) -> (Vec<Expr>, CseStats) {
    let mut stats = CseStats::default();
    let mut work: Vec<Expr> = constraints
        .into_iter()
        .map(|c| normalize(c, config.order))
        .collect();

    for _ in 0..config.max_rounds {
        stats.rounds += 1;
        let candidates = collect_candidates(&work, config.min_occurrences);
        let Some(best) = candidates.into_iter().next() else {
            return (work, stats);
        };

        let (aux, def) = define_auxiliary(&best.expr, symbols);
        debug!(
            target = %best.expr,
            occurrences = best.count,
            size = best.size,
            aux = %aux,
            "factoring shared sub-expression"
        );
        let mut replaced = 0u64;
        work = work
            .into_iter()
            .map(|c| replace_all(c, &best.expr, &aux, &mut replaced))
            .collect();
        work.push(def);
        stats.aux_introduced += 1;
        stats.occurrences_replaced += replaced;
    }
    warn!(
        max_rounds = config.max_rounds,
        "subexpression elimination stopped at round limit"
    );
    (work, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Assignment, Category, ExprKind, SumTerm, Value, eval};
    use crate::range::RangeList;

    fn table() -> SymbolTable {
        let mut s = SymbolTable::new();
        s.declare("x", RangeList::interval(0, 2), Category::Decision)
            .unwrap();
        s.declare("y", RangeList::interval(0, 2), Category::Decision)
            .unwrap();
        s.declare_bool("p", Category::Decision).unwrap();
        s
    }

    /// All assignments over every declared variable satisfying every
    /// constraint, projected onto the named variables.
    fn solutions(
        constraints: &[Expr],
        symbols: &SymbolTable,
        project: &[&str],
    ) -> Vec<Vec<i64>> {
        let vars: Vec<_> = symbols.iter().cloned().collect();
        let mut out = Vec::new();
        let mut asg = Assignment::new();
        enumerate(&vars, 0, &mut asg, constraints, symbols, project, &mut out);
        out.sort();
        out.dedup();
        out
    }

    fn enumerate(
        vars: &[crate::symbols::VarInfo],
        i: usize,
        asg: &mut Assignment,
        constraints: &[Expr],
        symbols: &SymbolTable,
        project: &[&str],
        out: &mut Vec<Vec<i64>>,
    ) {
        if i == vars.len() {
            let ok = constraints.iter().all(|c| {
                matches!(eval(c, asg, symbols), Ok(Value::Bool(true)))
            });
            if ok {
                out.push(project.iter().map(|n| asg.get(n).unwrap()).collect());
            }
            return;
        }
        for v in vars[i].domain.iter() {
            asg.set(vars[i].name.clone(), v);
            enumerate(vars, i + 1, asg, constraints, symbols, project, out);
        }
    }

    #[test]
    fn shared_subexpression_is_factored_once() {
        let mut s = table();
        let x = s.reference("x").unwrap();
        let y = s.reference("y").unwrap();
        let shared = Expr::sum(vec![SumTerm::new(1, x.clone()), SumTerm::new(1, y.clone())]);
        let c1 = Expr::le(shared.clone(), Expr::int(3));
        let c2 = Expr::eq(shared.clone(), Expr::int(2));
        let (out, stats) =
            eliminate_identical(vec![c1, c2], &mut s, &IdenticalCseConfig::default());

        assert_eq!(stats.aux_introduced, 1);
        assert_eq!(stats.occurrences_replaced, 2);
        assert_eq!(out.len(), 3);
        // Both original constraints now reference the auxiliary.
        for c in &out[..2] {
            match c.kind() {
                ExprKind::Le(a, _) | ExprKind::Eq(a, _) => {
                    assert!(a.as_var().is_some_and(|n| n.starts_with("#aux")));
                }
                other => panic!("unexpected constraint shape: {other:?}"),
            }
        }
    }

    #[test]
    fn solution_set_is_preserved() {
        let mut s = table();
        let x = s.reference("x").unwrap();
        let y = s.reference("y").unwrap();
        let p = s.reference("p").unwrap();
        let shared = Expr::sum(vec![SumTerm::new(1, x.clone()), SumTerm::new(1, y.clone())]);
        let original = vec![
            Expr::or(vec![p.clone(), Expr::le(shared.clone(), Expr::int(2))]),
            Expr::eq(shared.clone(), Expr::int(2)),
        ];

        let before = solutions(&original, &s, &["x", "y", "p"]);
        let (rewritten, _) =
            eliminate_identical(original, &mut s, &IdenticalCseConfig::default());
        let after = solutions(&rewritten, &s, &["x", "y", "p"]);
        assert_eq!(before, after);
        assert!(!before.is_empty());
    }

    #[test]
    fn no_sharing_means_no_change() {
        let mut s = table();
        let x = s.reference("x").unwrap();
        let y = s.reference("y").unwrap();
        let c1 = Expr::le(x.clone(), y.clone());
        let c2 = Expr::eq(x, Expr::int(1));
        let (out, stats) = eliminate_identical(
            vec![c1.clone(), c2.clone()],
            &mut s,
            &IdenticalCseConfig::default(),
        );
        assert_eq!(stats.aux_introduced, 0);
        assert_eq!(out, vec![c1, c2]);
    }

    #[test]
    fn auxiliaries_stay_out_of_user_listing() {
        let mut s = table();
        let x = s.reference("x").unwrap();
        let shared = Expr::sum(vec![SumTerm::new(2, x.clone()), SumTerm::new(1, Expr::int(1))]);
        let cs = vec![
            Expr::le(shared.clone(), Expr::int(4)),
            Expr::eq(shared, Expr::int(3)),
        ];
        let users_before: Vec<String> =
            s.user_vars().map(|i| i.name.clone()).collect();
        let _ = eliminate_identical(cs, &mut s, &IdenticalCseConfig::default());
        let users_after: Vec<String> = s.user_vars().map(|i| i.name.clone()).collect();
        assert_eq!(users_before, users_after);
    }
}
