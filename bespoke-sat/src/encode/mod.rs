//! Clause encoding of simplified constraints.
//!
//! [`SatEncoder`] walks a simplified, normalized constraint and appends
//! clauses to a [`ClauseSink`]. Finite-domain variables get an *order
//! encoding* (one literal per non-final domain value, `[x <= v]`, tied
//! together by monotonicity clauses); *direct* literals `[x = v]` are created
//! on demand and channelled to the order literals. The heavy lifting for
//! weighted sums lives in [`linear`], the cardinality clause families in
//! [`amo`], and equality of variable views in [`direct`].
//!
//! Every encoding routine takes a `guard` slice: literals prefixed to each
//! emitted clause. An empty guard encodes the constraint outright; a guard
//! of `[-aux]` encodes `aux -> constraint`, which is how disjunctive context
//! and reification are threaded through without special cases.

pub mod amo;
pub mod direct;
pub mod linear;

pub use amo::AmoStyle;
pub use direct::View;
pub use linear::{LinTerm, LinearLe};

use crate::clause::ClauseSink;
use crate::error::{EncodeError, Result};
use crate::lit::{Lit, Var};
use bespoke_core::ast::{Expr, ExprKind};
use bespoke_core::symbols::SymbolTable;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

/// Hard cap on per-value encodings; a domain larger than this cannot get one
/// literal per value and is reported as effectively unbounded.
pub(crate) const MAX_DOMAIN_VALUES: u64 = 1 << 20;

/// Floor division (rounds toward negative infinity), saturating at the
/// `i64` extremes.
pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    let (a, b) = (i128::from(a), i128::from(b));
    let q = a / b;
    let r = a % b;
    let q = if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q };
    q.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Ceiling division (rounds toward positive infinity), saturating at the
/// `i64` extremes.
pub(crate) fn ceil_div(a: i64, b: i64) -> i64 {
    let (a, b) = (i128::from(a), i128::from(b));
    let q = a / b;
    let r = a % b;
    let q = if r != 0 && (r < 0) == (b < 0) { q + 1 } else { q };
    q.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Tunables for clause generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Clause family for at-most-one / exactly-one constraints.
    pub amo: AmoStyle,
    /// Interval-count cap on the value sets fed to the linear enumeration;
    /// past it a set is coarsened to its hull (termination over precision).
    pub max_intervals: usize,
    /// Group size of the commander encoding.
    pub commander_group: usize,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            amo: AmoStyle::Pairwise,
            max_intervals: 32,
            commander_group: 3,
        }
    }
}

/// Counters accumulated over one encoder's lifetime.
#[derive(Debug, Clone, Default)]
pub struct EncodeStats {
    /// SAT variables allocated (order, direct and auxiliary).
    pub sat_vars: u64,
    /// Auxiliary variables among them (selectors, registers, commanders).
    pub aux_vars: u64,
    /// Clauses handed to the sink.
    pub clauses: u64,
    /// Clauses dropped because a constant-true literal satisfied them.
    pub clauses_dropped: u64,
    /// Value sets coarsened to their hull.
    pub coarsened: u64,
}

/// Order encoding of one model variable: `lits[i]` holds `[x <= values[i]]`
/// for every non-final domain value.
struct OrderEncoding {
    values: Vec<i64>,
    lits: Vec<Lit>,
}

/// Encoder from simplified constraints to clauses over a sink.
pub struct SatEncoder<'a, S: ClauseSink> {
    symbols: &'a SymbolTable,
    sink: &'a mut S,
    config: EncodeConfig,
    stats: EncodeStats,
    next_var: Var,
    order: FxHashMap<String, OrderEncoding>,
    direct: FxHashMap<(String, i64), Lit>,
}

impl<'a, S: ClauseSink> SatEncoder<'a, S> {
    /// Encoder with default configuration.
    pub fn new(symbols: &'a SymbolTable, sink: &'a mut S) -> Self {
        Self::with_config(symbols, sink, EncodeConfig::default())
    }

    /// Encoder with explicit configuration.
    pub fn with_config(symbols: &'a SymbolTable, sink: &'a mut S, config: EncodeConfig) -> Self {
        Self {
            symbols,
            sink,
            config,
            stats: EncodeStats::default(),
            next_var: 1,
            order: FxHashMap::default(),
            direct: FxHashMap::default(),
        }
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> &EncodeStats {
        &self.stats
    }

    /// Read access to the clause sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &*self.sink
    }

    /// Number of SAT variables allocated so far.
    #[must_use]
    pub fn num_vars(&self) -> Var {
        self.next_var - 1
    }

    /// The order encoding of `name`, if it has been created: the sorted
    /// domain values paired with the `[x <= v]` literals (one per non-final
    /// value).
    #[must_use]
    pub fn order_encoding(&self, name: &str) -> Option<(&[i64], &[Lit])> {
        self.order
            .get(name)
            .map(|e| (e.values.as_slice(), e.lits.as_slice()))
    }

    pub(crate) fn new_sat_var(&mut self) -> Var {
        let v = self.next_var;
        self.next_var += 1;
        self.stats.sat_vars += 1;
        v
    }

    /// A positive literal over a freshly allocated SAT variable, for
    /// caller-managed reification.
    pub fn fresh_lit(&mut self) -> Lit {
        self.stats.aux_vars += 1;
        Lit::positive(self.new_sat_var())
    }

    /// Forward one clause to the sink, stripping constant literals first.
    /// A clause satisfied by `TRUE` (or by a complementary literal pair) is
    /// dropped; `FALSE` occurrences and duplicates are removed.
    pub(crate) fn emit(&mut self, lits: &[Lit]) {
        let mut out: SmallVec<[Lit; 8]> = SmallVec::new();
        for &l in lits {
            if l == Lit::TRUE {
                self.stats.clauses_dropped += 1;
                return;
            }
            if l == Lit::FALSE || out.contains(&l) {
                continue;
            }
            if out.contains(&-l) {
                self.stats.clauses_dropped += 1;
                return;
            }
            out.push(l);
        }
        self.stats.clauses += 1;
        self.sink.add_clause(&out);
    }

    pub(crate) fn emit_with(&mut self, guard: &[Lit], rest: &[Lit]) {
        let mut v: SmallVec<[Lit; 8]> = SmallVec::from_slice(guard);
        v.extend_from_slice(rest);
        self.emit(&v);
    }

    fn ensure_order(&mut self, name: &str) -> Result<()> {
        if self.order.contains_key(name) {
            return Ok(());
        }
        let domain = self
            .symbols
            .domain(name)
            .ok_or_else(|| EncodeError::UnknownVariable(name.to_string()))?;
        if domain.size() > MAX_DOMAIN_VALUES {
            return Err(EncodeError::UnboundedDomain(name.to_string()));
        }
        let values: Vec<i64> = domain.iter().collect();
        let mut lits = Vec::new();
        for _ in 1..values.len() {
            lits.push(Lit::positive(self.new_sat_var()));
        }
        // Monotonicity: [x <= v_i] implies [x <= v_{i+1}].
        for i in 1..lits.len() {
            let (a, b) = (lits[i - 1], lits[i]);
            self.emit(&[-a, b]);
        }
        if values.is_empty() {
            // No value exists for this variable at all.
            self.emit(&[]);
        }
        debug!(var = name, values = values.len(), "order-encoded variable");
        self.order.insert(name.to_string(), OrderEncoding { values, lits });
        Ok(())
    }

    /// The literal `[x <= bound]`, snapping `bound` down to the greatest
    /// domain value on holes; constant outside the domain hull.
    pub fn lit_le(&mut self, name: &str, bound: i64) -> Result<Lit> {
        self.ensure_order(name)?;
        let enc = &self.order[name];
        let Some(&first) = enc.values.first() else {
            return Ok(Lit::FALSE);
        };
        let &last = enc.values.last().expect("non-empty");
        if bound < first {
            return Ok(Lit::FALSE);
        }
        if bound >= last {
            return Ok(Lit::TRUE);
        }
        let idx = match enc.values.binary_search(&bound) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Ok(enc.lits[idx])
    }

    /// The literal for `coeff * x <= bound`, dividing the bound through by
    /// the coefficient with the comparison direction flipped when it is
    /// negative.
    pub fn lit_le_scaled(&mut self, coeff: i64, name: &str, bound: i64) -> Result<Lit> {
        if coeff == 0 {
            return Ok(if bound >= 0 { Lit::TRUE } else { Lit::FALSE });
        }
        if coeff > 0 {
            self.lit_le(name, floor_div(bound, coeff))
        } else {
            // coeff*x <= bound  <=>  x >= ceil(bound / coeff)
            let t = ceil_div(bound, coeff);
            Ok(-(self.lit_le(name, t.saturating_sub(1))?))
        }
    }

    /// The literal `[x = value]`: constant off-domain, an order literal (or
    /// its negation) at the domain edges, and a channelled direct literal in
    /// between.
    pub fn lit_eq(&mut self, name: &str, value: i64) -> Result<Lit> {
        self.ensure_order(name)?;
        let (idx, n) = {
            let enc = &self.order[name];
            match enc.values.binary_search(&value) {
                Err(_) => return Ok(Lit::FALSE),
                Ok(i) => (i, enc.values.len()),
            }
        };
        if n == 1 {
            return Ok(Lit::TRUE);
        }
        if idx == 0 {
            return Ok(self.order[name].lits[0]);
        }
        if idx == n - 1 {
            return Ok(-self.order[name].lits[n - 2]);
        }
        if let Some(&d) = self.direct.get(&(name.to_string(), value)) {
            return Ok(d);
        }
        let le_here = self.order[name].lits[idx];
        let le_prev = self.order[name].lits[idx - 1];
        let d = Lit::positive(self.new_sat_var());
        // Channelling: d <-> [x <= v] and not [x <= prev(v)].
        self.emit(&[-d, le_here]);
        self.emit(&[-d, -le_prev]);
        self.emit(&[d, -le_here, le_prev]);
        self.direct.insert((name.to_string(), value), d);
        Ok(d)
    }

    /// The SAT literal of a boolean model variable (`x = 1`).
    pub fn bool_lit(&mut self, name: &str) -> Result<Lit> {
        if !self.symbols.is_bool(name) {
            return Err(EncodeError::Unsupported(format!(
                "variable `{name}` is not boolean"
            )));
        }
        Ok(-(self.lit_le(name, 0)?))
    }

    /// Encode one top-level constraint.
    pub fn encode(&mut self, constraint: &Expr) -> Result<()> {
        self.encode_guarded(constraint, &[])
    }

    fn encode_guarded(&mut self, e: &Expr, guard: &[Lit]) -> Result<()> {
        match e.kind() {
            ExprKind::True => Ok(()),
            ExprKind::False => {
                self.emit(guard);
                Ok(())
            }
            ExprKind::Var(n) => {
                let l = self.bool_lit(n)?;
                self.emit_with(guard, &[l]);
                Ok(())
            }
            ExprKind::Preserved(a) => self.encode_guarded(a, guard),
            ExprKind::Not(inner) => self.encode_negated(inner, guard),
            ExprKind::And(cs) => {
                for c in cs {
                    self.encode_guarded(c, guard)?;
                }
                Ok(())
            }
            ExprKind::Or(cs) => {
                let mut lits: SmallVec<[Lit; 8]> = SmallVec::new();
                for c in cs {
                    lits.push(self.disjunct_literal(c)?);
                }
                self.emit_with(guard, &lits);
                Ok(())
            }
            ExprKind::Xor(cs) => self.encode_xor(cs, false, guard),
            ExprKind::Iff(a, b) => {
                let la = self.reify(a)?;
                let lb = self.reify(b)?;
                self.emit_with(guard, &[-la, lb]);
                self.emit_with(guard, &[la, -lb]);
                Ok(())
            }
            ExprKind::Le(a, b) => {
                if let Some(lits) = self.unit_weight_bool_sum(a, b)? {
                    self.encode_at_most_one(&lits, guard);
                    return Ok(());
                }
                let lin = LinearLe::from_le(a, b)?;
                self.encode_le(&lin, guard)
            }
            ExprKind::Eq(a, b) => {
                if let Some(lits) = self.unit_weight_bool_sum(a, b)? {
                    self.encode_exactly_one(&lits, guard);
                    return Ok(());
                }
                if let (Some(va), Some(vb)) = (View::of_expr(a), View::of_expr(b)) {
                    return self.encode_eq_views(&va, &vb, guard);
                }
                let lin = LinearLe::from_le(a, b)?;
                self.encode_eq_linear(&lin, guard)
            }
            ExprKind::Int(_) | ExprKind::Neg(_) | ExprKind::Sum(_) | ExprKind::Product(_) => {
                Err(EncodeError::Unsupported(format!(
                    "non-boolean constraint {e}"
                )))
            }
        }
    }

    fn encode_negated(&mut self, inner: &Expr, guard: &[Lit]) -> Result<()> {
        match inner.kind() {
            ExprKind::Var(n) => {
                let l = self.bool_lit(n)?;
                self.emit_with(guard, &[-l]);
                Ok(())
            }
            ExprKind::Eq(a, b) => {
                if let (Some(va), Some(vb)) = (View::of_expr(a), View::of_expr(b)) {
                    return self.encode_ne_views(&va, &vb, guard);
                }
                // a != b: strictly below or strictly above, one selector each.
                let lin = LinearLe::from_le(a, b)?;
                let below = lin.strict();
                let above = lin.negation();
                let b1 = Lit::positive(self.new_sat_var());
                let b2 = Lit::positive(self.new_sat_var());
                self.stats.aux_vars += 2;
                self.encode_le(&below, &[-b1])?;
                self.encode_le(&above, &[-b2])?;
                self.emit_with(guard, &[b1, b2]);
                Ok(())
            }
            ExprKind::Xor(cs) => self.encode_xor(cs, true, guard),
            _ if inner.is_negatable() => {
                let neg = inner.clone().negated();
                self.encode_guarded(&neg, guard)
            }
            _ => Err(EncodeError::Unsupported(format!("not({inner})"))),
        }
    }

    /// Literal standing for one disjunct: direct for variable literals and
    /// constants, a Tseitin selector implying the disjunct otherwise.
    fn disjunct_literal(&mut self, e: &Expr) -> Result<Lit> {
        match e.kind() {
            ExprKind::True => Ok(Lit::TRUE),
            ExprKind::False => Ok(Lit::FALSE),
            ExprKind::Var(n) => self.bool_lit(n),
            ExprKind::Not(inner) => {
                if let ExprKind::Var(n) = inner.kind() {
                    return Ok(-(self.bool_lit(n)?));
                }
                let b = Lit::positive(self.new_sat_var());
                self.stats.aux_vars += 1;
                self.encode_guarded(e, &[-b])?;
                Ok(b)
            }
            _ => {
                let b = Lit::positive(self.new_sat_var());
                self.stats.aux_vars += 1;
                self.encode_guarded(e, &[-b])?;
                Ok(b)
            }
        }
    }

    /// A literal equivalent to the boolean expression: both implication
    /// directions are encoded, so the result can appear under either
    /// polarity.
    pub fn reify(&mut self, e: &Expr) -> Result<Lit> {
        match e.kind() {
            ExprKind::True => Ok(Lit::TRUE),
            ExprKind::False => Ok(Lit::FALSE),
            ExprKind::Var(n) => self.bool_lit(n),
            ExprKind::Not(inner) if matches!(inner.kind(), ExprKind::Var(_)) => {
                let ExprKind::Var(n) = inner.kind() else {
                    unreachable!("guard matched a variable")
                };
                Ok(-(self.bool_lit(n)?))
            }
            _ => {
                if !e.is_boolean(self.symbols) {
                    return Err(EncodeError::Unsupported(format!(
                        "cannot reify non-boolean {e}"
                    )));
                }
                let b = Lit::positive(self.new_sat_var());
                self.stats.aux_vars += 1;
                self.encode_guarded(e, &[-b])?;
                let neg = if e.is_negatable() {
                    e.clone().negated()
                } else {
                    Expr::not(e.clone())
                };
                self.encode_guarded(&neg, &[b])?;
                Ok(b)
            }
        }
    }

    /// Parity chain over the reified children. With `negate` the required
    /// parity flips (this is how `not(xor(..))` is consumed directly).
    fn encode_xor(&mut self, cs: &[Expr], negate: bool, guard: &[Lit]) -> Result<()> {
        let mut target = !negate;
        let mut lits: Vec<Lit> = Vec::with_capacity(cs.len());
        for c in cs {
            lits.push(self.reify(c)?);
        }
        lits.retain(|&l| {
            if l == Lit::TRUE {
                target = !target;
                false
            } else {
                l != Lit::FALSE
            }
        });
        if lits.is_empty() {
            // xor of nothing is false
            if target {
                self.emit(guard);
            }
            return Ok(());
        }
        let mut cur = lits[0];
        for &l in &lits[1..] {
            let next = Lit::positive(self.new_sat_var());
            self.stats.aux_vars += 1;
            // next <-> cur xor l
            self.emit(&[-next, cur, l]);
            self.emit(&[-next, -cur, -l]);
            self.emit(&[next, -cur, l]);
            self.emit(&[next, cur, -l]);
            cur = next;
        }
        self.emit_with(guard, &[if target { cur } else { -cur }]);
        Ok(())
    }

    /// Recognize `sum(1*b1, .., 1*bn) (<=|=) 1` over boolean variables, the
    /// shape the cardinality clause families handle.
    fn unit_weight_bool_sum(&mut self, a: &Expr, b: &Expr) -> Result<Option<Vec<Lit>>> {
        if b.as_int() != Some(1) {
            return Ok(None);
        }
        let ExprKind::Sum(ts) = a.kind() else {
            return Ok(None);
        };
        if ts.len() < 2 {
            return Ok(None);
        }
        let all_unit_bools = ts.iter().all(|t| {
            t.coeff == 1
                && t.expr
                    .as_var()
                    .is_some_and(|n| self.symbols.is_bool(n))
        });
        if !all_unit_bools {
            return Ok(None);
        }
        let mut lits = Vec::with_capacity(ts.len());
        for t in ts {
            lits.push(self.bool_lit(t.expr.as_var().expect("checked"))?);
        }
        Ok(Some(lits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::CnfBuffer;
    use bespoke_core::ast::Category;
    use bespoke_core::range::RangeList;

    fn table() -> SymbolTable {
        let mut s = SymbolTable::new();
        s.declare("x", RangeList::interval(0, 3), Category::Decision)
            .unwrap();
        s.declare("h", RangeList::from_intervals([(1, 2), (8, 9)]), Category::Decision)
            .unwrap();
        s.declare_bool("p", Category::Decision).unwrap();
        s.declare_bool("q", Category::Decision).unwrap();
        s
    }

    #[test]
    fn division_helpers_round_correctly() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(-7, 2), -3);
        assert_eq!(ceil_div(-7, -2), 4);
        assert_eq!(floor_div(-7, -2), 3);
    }

    #[test]
    fn order_encoding_allocates_one_literal_per_threshold() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        let l = enc.lit_le("x", 1).unwrap();
        assert!(!l.is_const());
        let (values, lits) = enc.order_encoding("x").unwrap();
        assert_eq!(values, &[0, 1, 2, 3]);
        assert_eq!(lits.len(), 3);
        // Two monotonicity clauses for four values.
        assert_eq!(enc.sink().len(), 2);
    }

    #[test]
    fn lit_le_is_constant_outside_the_hull_and_snaps_on_holes() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        assert_eq!(enc.lit_le("h", 0).unwrap(), Lit::FALSE);
        assert_eq!(enc.lit_le("h", 9).unwrap(), Lit::TRUE);
        assert_eq!(enc.lit_le("h", 42).unwrap(), Lit::TRUE);
        // 5 sits in the hole of {1..2, 8..9}; [h <= 5] is [h <= 2].
        assert_eq!(enc.lit_le("h", 5).unwrap(), enc.lit_le("h", 2).unwrap());
    }

    #[test]
    fn lit_le_scaled_flips_direction_on_negative_coefficients() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        // 2x <= 5  <=>  x <= 2
        assert_eq!(
            enc.lit_le_scaled(2, "x", 5).unwrap(),
            enc.lit_le("x", 2).unwrap()
        );
        // -2x <= -5  <=>  x >= 3  <=>  not (x <= 2)
        assert_eq!(
            enc.lit_le_scaled(-2, "x", -5).unwrap(),
            -(enc.lit_le("x", 2).unwrap())
        );
        // 0x <= b is constant
        assert_eq!(enc.lit_le_scaled(0, "x", 0).unwrap(), Lit::TRUE);
        assert_eq!(enc.lit_le_scaled(0, "x", -1).unwrap(), Lit::FALSE);
    }

    #[test]
    fn lit_eq_uses_edges_and_channels_interior_values() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        assert_eq!(enc.lit_eq("x", 7).unwrap(), Lit::FALSE);
        let at_min = enc.lit_eq("x", 0).unwrap();
        assert_eq!(at_min, enc.lit_le("x", 0).unwrap());
        let at_max = enc.lit_eq("x", 3).unwrap();
        assert_eq!(at_max, -(enc.lit_le("x", 2).unwrap()));
        let before = enc.sink().len();
        let mid = enc.lit_eq("x", 1).unwrap();
        assert!(!mid.is_const());
        // Three channelling clauses, created once.
        assert_eq!(enc.sink().len(), before + 3);
        assert_eq!(enc.lit_eq("x", 1).unwrap(), mid);
        assert_eq!(enc.sink().len(), before + 3);
    }

    #[test]
    fn emit_strips_constants_and_drops_satisfied_clauses() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        let p = enc.bool_lit("p").unwrap();
        enc.emit(&[p, Lit::TRUE]);
        assert_eq!(enc.sink().len(), 0);
        enc.emit(&[p, -p]);
        assert_eq!(enc.sink().len(), 0);
        assert_eq!(enc.stats().clauses_dropped, 2);
        enc.emit(&[p, Lit::FALSE, p]);
        assert_eq!(enc.sink().clauses().last().unwrap().as_slice(), &[p]);
    }

    #[test]
    fn unit_constraints_become_unit_clauses() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        let p = s.reference("p").unwrap();
        enc.encode(&p).unwrap();
        enc.encode(&Expr::not(s.reference("q").unwrap())).unwrap();
        let units: Vec<_> = buf
            .clauses()
            .iter()
            .filter(|c| c.len() == 1)
            .cloned()
            .collect();
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn false_constraint_emits_the_empty_clause() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        enc.encode(&Expr::truth(false)).unwrap();
        assert!(buf.is_unsat());
    }

    #[test]
    fn unknown_variable_is_fatal() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        assert_eq!(
            enc.lit_le("ghost", 0),
            Err(EncodeError::UnknownVariable("ghost".to_string()))
        );
    }

    #[test]
    fn non_boolean_constraint_is_unsupported() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        let x = s.reference("x").unwrap();
        assert!(matches!(
            enc.encode(&x),
            Err(EncodeError::Unsupported(_))
        ));
    }
}
