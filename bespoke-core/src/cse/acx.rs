//! Associative-commutative factoring.
//!
//! Where [`super::identical`] matches whole subtrees, this engine factors
//! shared *sub-multisets of children* out of several occurrences of one
//! associative-commutative operator. Two disjunctions `or(a, b, c)` and
//! `or(a, b, d)` share no whole subtree, but both contain the pair `{a, b}`;
//! factoring it into an auxiliary `t` rewrites them to `or(c, t)` and
//! `or(d, t)` plus the definition `iff(t, or(a, b))`.
//!
//! Candidate subsets come from pairwise multiset intersection of same-kind
//! occurrences, are ranked by total children eliminated, and are applied
//! greedily one at a time. Candidates are re-derived from the rewritten
//! constraint set after every application, so a factoring can never act on a
//! children list that an earlier factoring already changed.

use super::{CseStats, define_auxiliary};
use crate::ast::{Expr, ExprKind, SumTerm};
use crate::symbols::SymbolTable;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The associative-commutative operator a factoring pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcKind {
    /// Conjunction children.
    And,
    /// Disjunction children.
    Or,
    /// Exclusive-or children.
    Xor,
    /// Weighted-sum terms, matched as (coefficient, child) pairs.
    Sum,
    /// Product factors.
    Product,
}

/// Configuration for associative-commutative factoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcCseConfig {
    /// Operator kind whose occurrences are factored.
    pub kind: AcKind,
    /// Minimum number of shared children worth factoring.
    pub min_subset: usize,
    /// Minimum number of occurrences sharing the subset.
    pub min_occurrences: usize,
    /// Safety cap on factoring rounds.
    pub max_rounds: usize,
}

impl AcCseConfig {
    /// Defaults for one target kind.
    #[must_use]
    pub fn for_kind(kind: AcKind) -> Self {
        Self {
            kind,
            min_subset: 2,
            min_occurrences: 2,
            max_rounds: 10_000,
        }
    }
}

/// One child of an occurrence: coefficient and expression. The coefficient
/// is 1 for every kind except `Sum`.
type Elem = (i64, Expr);

fn elems_of(kind: AcKind, e: &Expr) -> Option<Vec<Elem>> {
    match (kind, e.kind()) {
        (AcKind::And, ExprKind::And(cs))
        | (AcKind::Or, ExprKind::Or(cs))
        | (AcKind::Xor, ExprKind::Xor(cs))
        | (AcKind::Product, ExprKind::Product(cs)) => {
            Some(cs.iter().map(|c| (1, c.clone())).collect())
        }
        (AcKind::Sum, ExprKind::Sum(ts)) => {
            Some(ts.iter().map(|t| (t.coeff, t.expr.clone())).collect())
        }
        _ => None,
    }
}

/// Rebuild an occurrence (or a definition body) from elements. A single
/// unweighted element unwraps rather than producing a one-child node.
fn build(kind: AcKind, elems: Vec<Elem>) -> Expr {
    if elems.len() == 1 && elems[0].0 == 1 {
        return elems.into_iter().next().expect("len checked").1;
    }
    match kind {
        AcKind::And => Expr::and(elems.into_iter().map(|(_, e)| e).collect()),
        AcKind::Or => Expr::or(elems.into_iter().map(|(_, e)| e).collect()),
        AcKind::Xor => Expr::xor(elems.into_iter().map(|(_, e)| e).collect()),
        AcKind::Product => Expr::product(elems.into_iter().map(|(_, e)| e).collect()),
        AcKind::Sum => Expr::sum(
            elems
                .into_iter()
                .map(|(c, e)| SumTerm::new(c, e))
                .collect(),
        ),
    }
}

fn intersect_multiset(a: &[Elem], b: &[Elem]) -> Vec<Elem> {
    let mut used = vec![false; b.len()];
    let mut out = Vec::new();
    for (c, e) in a {
        if let Some(i) = b
            .iter()
            .enumerate()
            .position(|(i, (bc, be))| !used[i] && bc == c && be == e)
        {
            used[i] = true;
            out.push((*c, e.clone()));
        }
    }
    out
}

fn contains_multiset(sup: &[Elem], sub: &[Elem]) -> bool {
    let mut used = vec![false; sup.len()];
    sub.iter().all(|(c, e)| {
        match sup
            .iter()
            .enumerate()
            .position(|(i, (sc, se))| !used[i] && sc == c && se == e)
        {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

/// Remove one copy of each subset element.
fn remove_subset(elems: Vec<Elem>, subset: &[Elem]) -> Vec<Elem> {
    let mut used = vec![false; subset.len()];
    let mut out = Vec::with_capacity(elems.len().saturating_sub(subset.len()));
    'next: for (c, e) in elems {
        for (i, (sc, se)) in subset.iter().enumerate() {
            if !used[i] && *sc == c && *se == e {
                used[i] = true;
                continue 'next;
            }
        }
        out.push((c, e));
    }
    out
}

fn elems_key(elems: &[Elem]) -> String {
    let parts: Vec<String> = elems.iter().map(|(c, e)| format!("{c}*{e}")).collect();
    parts.join(", ")
}

struct Candidate {
    elems: Vec<Elem>,
    key: String,
    count: usize,
}

impl Candidate {
    /// Children removed across all containing occurrences, net of the one
    /// auxiliary reference each occurrence gains.
    fn eliminated(&self) -> usize {
        self.count * (self.elems.len() - 1)
    }
}

fn collect_occurrences(constraints: &[Expr], kind: AcKind) -> Vec<Vec<Elem>> {
    let mut out = Vec::new();
    for c in constraints {
        c.visit(&mut |node| {
            if let Some(elems) = elems_of(kind, node) {
                out.push(elems);
            }
        });
    }
    out
}

fn best_candidate(occurrences: &[Vec<Elem>], config: &AcCseConfig) -> Option<Candidate> {
    let mut seen: FxHashMap<String, Vec<Elem>> = FxHashMap::default();
    for i in 0..occurrences.len() {
        for j in i + 1..occurrences.len() {
            let mut inter = intersect_multiset(&occurrences[i], &occurrences[j]);
            if inter.len() < config.min_subset {
                continue;
            }
            inter.sort_by_cached_key(|(c, e)| (e.to_string(), *c));
            let key = elems_key(&inter);
            seen.entry(key).or_insert(inter);
        }
    }
    let mut candidates: Vec<Candidate> = seen
        .into_iter()
        .map(|(key, elems)| {
            let count = occurrences
                .iter()
                .filter(|o| contains_multiset(o, &elems))
                .count();
            Candidate { elems, key, count }
        })
        .filter(|c| c.count >= config.min_occurrences)
        .collect();
    candidates.sort_by(|a, b| {
        b.eliminated()
            .cmp(&a.eliminated())
            .then(b.elems.len().cmp(&a.elems.len()))
            .then_with(|| a.key.cmp(&b.key))
    });
    candidates.into_iter().next()
}

fn rewrite_tree(
    e: Expr,
    kind: AcKind,
    subset: &[Elem],
    aux: &Expr,
    replaced: &mut u64,
) -> Expr {
    let e = e.map_children(&mut |c| rewrite_tree(c, kind, subset, aux, replaced));
    if let Some(elems) = elems_of(kind, &e) {
        if contains_multiset(&elems, subset) {
            *replaced += 1;
            let mut residue = remove_subset(elems, subset);
            residue.push((1, aux.clone()));
            return build(kind, residue);
        }
    }
    e
}

/// Factor shared child sub-multisets of one operator kind out of
/// `constraints`, appending one definitional constraint per auxiliary.
pub fn eliminate_ac(
    constraints: Vec<Expr>,
    symbols: &mut SymbolTable,
    config: &AcCseConfig,
) -> (Vec<Expr>, CseStats) {
    let mut stats = CseStats::default();
    let mut work = constraints;

    for _ in 0..config.max_rounds {
        stats.rounds += 1;
        let occurrences = collect_occurrences(&work, config.kind);
        let Some(best) = best_candidate(&occurrences, config) else {
            return (work, stats);
        };

        let shared = build(config.kind, best.elems.clone());
        let (aux, def) = define_auxiliary(&shared, symbols);
        debug!(
            shared = %shared,
            occurrences = best.count,
            eliminated = best.eliminated(),
            aux = %aux,
            "factoring shared child subset"
        );
        let mut replaced = 0u64;
        work = work
            .into_iter()
            .map(|c| rewrite_tree(c, config.kind, &best.elems, &aux, &mut replaced))
            .collect();
        work.push(def);
        stats.aux_introduced += 1;
        stats.occurrences_replaced += replaced;
    }
    warn!(
        max_rounds = config.max_rounds,
        "associative-commutative factoring stopped at round limit"
    );
    (work, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Assignment, Category, Value, eval};
    use crate::range::RangeList;

    fn table() -> SymbolTable {
        let mut s = SymbolTable::new();
        for n in ["a", "b", "c", "d"] {
            s.declare_bool(n, Category::Decision).unwrap();
        }
        s.declare("x", RangeList::interval(0, 2), Category::Decision)
            .unwrap();
        s.declare("y", RangeList::interval(0, 2), Category::Decision)
            .unwrap();
        s.declare("z", RangeList::interval(0, 2), Category::Decision)
            .unwrap();
        s
    }

    fn solutions(constraints: &[Expr], symbols: &SymbolTable, project: &[&str]) -> Vec<Vec<i64>> {
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
            let ok = constraints
                .iter()
                .all(|c| matches!(eval(c, asg, symbols), Ok(Value::Bool(true))));
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
    fn shared_pair_is_factored_out_of_disjunctions() {
        let mut s = table();
        let a = s.reference("a").unwrap();
        let b = s.reference("b").unwrap();
        let c = s.reference("c").unwrap();
        let d = s.reference("d").unwrap();
        let c1 = Expr::or(vec![a.clone(), b.clone(), c.clone()]);
        let c2 = Expr::or(vec![a.clone(), b.clone(), d.clone()]);
        let (out, stats) = eliminate_ac(
            vec![c1, c2],
            &mut s,
            &AcCseConfig::for_kind(AcKind::Or),
        );

        assert_eq!(stats.aux_introduced, 1);
        assert_eq!(stats.occurrences_replaced, 2);
        assert_eq!(out.len(), 3);
        let aux = s.reference("#aux_0").unwrap();
        assert_eq!(out[0], Expr::or(vec![c, aux.clone()]));
        assert_eq!(out[1], Expr::or(vec![d, aux.clone()]));
        assert_eq!(out[2], Expr::iff(aux, Expr::or(vec![a, b])));
    }

    #[test]
    fn sum_terms_factor_as_weighted_pairs() {
        let mut s = table();
        let x = s.reference("x").unwrap();
        let y = s.reference("y").unwrap();
        let z = s.reference("z").unwrap();
        let shared = |e: &Expr| vec![SumTerm::new(2, x.clone()), SumTerm::new(1, e.clone())];
        let c1 = Expr::le(
            Expr::sum({
                let mut ts = shared(&y);
                ts.push(SumTerm::new(1, z.clone()));
                ts
            }),
            Expr::int(5),
        );
        let c2 = Expr::eq(Expr::sum(shared(&y)), Expr::int(3));
        let (out, stats) = eliminate_ac(
            vec![c1, c2],
            &mut s,
            &AcCseConfig::for_kind(AcKind::Sum),
        );

        assert_eq!(stats.aux_introduced, 1);
        let aux = s.reference("#aux_0").unwrap();
        // First constraint keeps its unique term plus the auxiliary; the
        // second collapses to the auxiliary alone.
        assert_eq!(
            out[0],
            Expr::le(
                Expr::sum(vec![SumTerm::new(1, z), SumTerm::new(1, aux.clone())]),
                Expr::int(5)
            )
        );
        assert_eq!(out[1], Expr::eq(aux.clone(), Expr::int(3)));
        assert_eq!(
            out[2],
            Expr::eq(
                aux,
                Expr::sum(vec![SumTerm::new(2, x), SumTerm::new(1, y)])
            )
        );
    }

    #[test]
    fn solution_set_is_preserved() {
        let mut s = table();
        let a = s.reference("a").unwrap();
        let b = s.reference("b").unwrap();
        let c = s.reference("c").unwrap();
        let d = s.reference("d").unwrap();
        let original = vec![
            Expr::or(vec![a.clone(), b.clone(), c.clone()]),
            Expr::or(vec![a.clone(), b.clone(), d.clone()]),
            Expr::or(vec![c, d]),
        ];
        let before = solutions(&original, &s, &["a", "b", "c", "d"]);
        let (rewritten, stats) =
            eliminate_ac(original, &mut s, &AcCseConfig::for_kind(AcKind::Or));
        assert!(stats.aux_introduced >= 1);
        let after = solutions(&rewritten, &s, &["a", "b", "c", "d"]);
        assert_eq!(before, after);
        assert!(!before.is_empty());
    }

    #[test]
    fn subset_shared_three_ways_counts_every_occurrence() {
        let mut s = table();
        let a = s.reference("a").unwrap();
        let b = s.reference("b").unwrap();
        let c = s.reference("c").unwrap();
        let d = s.reference("d").unwrap();
        // {a, b} is the only shared subset, present in all three.
        let cs = vec![
            Expr::or(vec![a.clone(), b.clone(), c.clone()]),
            Expr::or(vec![a.clone(), b.clone(), d.clone()]),
            Expr::or(vec![a.clone(), b.clone(), Expr::not(d.clone())]),
        ];
        let (out, stats) = eliminate_ac(cs, &mut s, &AcCseConfig::for_kind(AcKind::Or));
        assert_eq!(stats.aux_introduced, 1);
        assert_eq!(stats.occurrences_replaced, 3);
        let def = out
            .iter()
            .find(|e| matches!(e.kind(), ExprKind::Iff(lhs, _) if lhs.as_var() == Some("#aux_0")))
            .expect("definitional constraint present");
        match def.kind() {
            ExprKind::Iff(_, body) => assert_eq!(**body, Expr::or(vec![a, b])),
            _ => unreachable!(),
        }
    }

    #[test]
    fn unshared_occurrences_are_untouched() {
        let mut s = table();
        let a = s.reference("a").unwrap();
        let b = s.reference("b").unwrap();
        let c = s.reference("c").unwrap();
        let d = s.reference("d").unwrap();
        let cs = vec![Expr::or(vec![a, b]), Expr::or(vec![c, d])];
        let (out, stats) = eliminate_ac(
            cs.clone(),
            &mut s,
            &AcCseConfig::for_kind(AcKind::Or),
        );
        assert_eq!(stats.aux_introduced, 0);
        assert_eq!(out, cs);
    }

    #[test]
    fn nested_occurrences_participate() {
        let mut s = table();
        let a = s.reference("a").unwrap();
        let b = s.reference("b").unwrap();
        let c = s.reference("c").unwrap();
        let d = s.reference("d").unwrap();
        // One occurrence is nested under a conjunction.
        let cs = vec![
            Expr::and(vec![Expr::or(vec![a.clone(), b.clone(), c.clone()]), d.clone()]),
            Expr::or(vec![a.clone(), b.clone(), d]),
        ];
        let (_, stats) = eliminate_ac(cs, &mut s, &AcCseConfig::for_kind(AcKind::Or));
        assert_eq!(stats.aux_introduced, 1);
        assert_eq!(stats.occurrences_replaced, 2);
    }
}
