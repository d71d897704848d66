//! Direct-encoded equality of variable views.
//!
//! A [`View`] is a scaled and shifted reading `scale * var + offset` of one
//! finite-domain variable. Equality of two views is encoded value by value:
//! for every value either side can take, taking it forces the other side to
//! match. The clause count is quadratic in the domain sizes, which is why
//! the dispatcher only routes view-shaped equalities here and sends general
//! linear equalities through the order encoding instead.

use super::{MAX_DOMAIN_VALUES, SatEncoder};
use crate::clause::ClauseSink;
use crate::error::{EncodeError, Result};
use crate::lit::Lit;
use bespoke_core::ast::{Expr, ExprKind};
use bespoke_core::range::RangeList;
use bespoke_core::symbols::SymbolTable;

/// A scaled and shifted reading `scale * var + offset` of a model variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Model variable name.
    pub var: String,
    /// Multiplier, never zero.
    pub scale: i64,
    /// Additive offset.
    pub offset: i64,
}

impl View {
    /// The identity view of a variable.
    #[must_use]
    pub fn of_var(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            scale: 1,
            offset: 0,
        }
    }

    /// Recognize a view-shaped expression: a bare reference, its arithmetic
    /// negation, or a one-variable weighted sum with an optional constant.
    #[must_use]
    pub fn of_expr(e: &Expr) -> Option<Self> {
        match e.kind() {
            ExprKind::Var(n) => Some(Self::of_var(n.clone())),
            ExprKind::Neg(a) => a.as_var().map(|n| Self {
                var: n.to_string(),
                scale: -1,
                offset: 0,
            }),
            ExprKind::Sum(ts) => {
                let mut scaled: Option<(i64, &str)> = None;
                let mut offset = 0i64;
                for t in ts {
                    if let Some(v) = t.expr.as_int() {
                        offset = offset.saturating_add(t.coeff.saturating_mul(v));
                    } else if let Some(n) = t.expr.as_var() {
                        if scaled.is_some() {
                            return None;
                        }
                        scaled = Some((t.coeff, n));
                    } else {
                        return None;
                    }
                }
                let (scale, var) = scaled?;
                if scale == 0 {
                    return None;
                }
                Some(Self {
                    var: var.to_string(),
                    scale,
                    offset,
                })
            }
            _ => None,
        }
    }

    /// Values the view can take.
    fn values(&self, symbols: &SymbolTable) -> Result<RangeList> {
        let domain = symbols
            .domain(&self.var)
            .ok_or_else(|| EncodeError::UnknownVariable(self.var.clone()))?;
        if domain.size() > MAX_DOMAIN_VALUES {
            return Err(EncodeError::UnboundedDomain(self.var.clone()));
        }
        Ok(domain.scale(self.scale).shift(self.offset))
    }
}

impl<'a, S: ClauseSink> SatEncoder<'a, S> {
    /// The literal for "this view takes `value`"; constant false when the
    /// underlying variable cannot produce it.
    pub fn view_eq_lit(&mut self, view: &View, value: i64) -> Result<Lit> {
        let Some(num) = value.checked_sub(view.offset) else {
            return Ok(Lit::FALSE);
        };
        if num.checked_rem(view.scale) != Some(0) {
            return Ok(Lit::FALSE);
        }
        let Some(quotient) = num.checked_div(view.scale) else {
            return Ok(Lit::FALSE);
        };
        self.lit_eq(&view.var, quotient)
    }

    /// Encode `a = b` value by value: for each value either view can take,
    /// taking it forces the other view to match.
    pub fn encode_eq_views(&mut self, a: &View, b: &View, guard: &[Lit]) -> Result<()> {
        let va = a.values(self.symbols)?;
        let vb = b.values(self.symbols)?;
        for v in va.iter() {
            let la = self.view_eq_lit(a, v)?;
            let lb = self.view_eq_lit(b, v)?;
            self.emit_with(guard, &[-la, lb]);
        }
        for v in vb.iter() {
            let lb = self.view_eq_lit(b, v)?;
            let la = self.view_eq_lit(a, v)?;
            self.emit_with(guard, &[-lb, la]);
        }
        Ok(())
    }

    /// Encode the biconditional `aux <-> (a = b)`: the forward direction
    /// guards the value clauses with the negated auxiliary, the backward
    /// direction forces the auxiliary whenever both views agree.
    pub fn encode_eq_views_reified(&mut self, a: &View, b: &View, aux: Lit) -> Result<()> {
        self.encode_eq_views(a, b, &[-aux])?;
        let shared = a.values(self.symbols)?.intersect(&b.values(self.symbols)?);
        for v in shared.iter() {
            let la = self.view_eq_lit(a, v)?;
            let lb = self.view_eq_lit(b, v)?;
            self.emit(&[-la, -lb, aux]);
        }
        Ok(())
    }

    /// Encode `a != b`: no shared value may be taken by both views.
    pub fn encode_ne_views(&mut self, a: &View, b: &View, guard: &[Lit]) -> Result<()> {
        let shared = a.values(self.symbols)?.intersect(&b.values(self.symbols)?);
        for v in shared.iter() {
            let la = self.view_eq_lit(a, v)?;
            let lb = self.view_eq_lit(b, v)?;
            self.emit_with(guard, &[-la, -lb]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::CnfBuffer;
    use bespoke_core::ast::{Category, SumTerm};

    fn table() -> SymbolTable {
        let mut s = SymbolTable::new();
        s.declare("x", RangeList::interval(0, 3), Category::Decision)
            .unwrap();
        s.declare("y", RangeList::interval(0, 3), Category::Decision)
            .unwrap();
        s.declare("w", RangeList::interval(-1, 2), Category::Decision)
            .unwrap();
        s
    }

    fn sat_masks(buf: &CnfBuffer) -> Vec<u64> {
        let n = buf.max_var();
        let mut out = Vec::new();
        for mask in 0u64..(1u64 << n) {
            let holds = |l: Lit| {
                let bit = (mask >> (l.var() - 1)) & 1 == 1;
                if l.is_positive() { bit } else { !bit }
            };
            if buf.clauses().iter().all(|c| c.iter().any(|&l| holds(l))) {
                out.push(mask);
            }
        }
        out
    }

    fn decode<S: ClauseSink>(enc: &SatEncoder<'_, S>, mask: u64, name: &str) -> i64 {
        let (values, lits) = enc.order_encoding(name).expect("encoded");
        for (i, &l) in lits.iter().enumerate() {
            let bit = (mask >> (l.var() - 1)) & 1 == 1;
            let le = if l.is_positive() { bit } else { !bit };
            if le {
                return values[i];
            }
        }
        *values.last().expect("non-empty domain")
    }

    fn solutions<S: ClauseSink>(
        enc: &SatEncoder<'_, S>,
        buf: &CnfBuffer,
        names: &[&str],
    ) -> Vec<Vec<i64>> {
        let mut out: Vec<Vec<i64>> = sat_masks(buf)
            .into_iter()
            .map(|m| names.iter().map(|n| decode(enc, m, n)).collect())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    #[test]
    fn view_recognition_covers_the_canonical_shapes() {
        let s = table();
        let x = s.reference("x").unwrap();
        assert_eq!(View::of_expr(&x), Some(View::of_var("x")));
        assert_eq!(
            View::of_expr(&Expr::neg(x.clone())),
            Some(View {
                var: "x".to_string(),
                scale: -1,
                offset: 0
            })
        );
        let shifted = Expr::sum(vec![
            SumTerm::new(2, x.clone()),
            SumTerm::new(1, Expr::int(-3)),
        ]);
        assert_eq!(
            View::of_expr(&shifted),
            Some(View {
                var: "x".to_string(),
                scale: 2,
                offset: -3
            })
        );
        let y = s.reference("y").unwrap();
        let two_vars = Expr::sum(vec![SumTerm::new(1, x), SumTerm::new(1, y)]);
        assert_eq!(View::of_expr(&two_vars), None);
    }

    #[test]
    fn plain_equality_matches_brute_force() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        enc.encode_eq_views(&View::of_var("x"), &View::of_var("y"), &[])
            .unwrap();
        let got = solutions(&enc, enc.sink(), &["x", "y"]);
        let want: Vec<Vec<i64>> = (0..=3).map(|v| vec![v, v]).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn scaled_shifted_views_stay_correct() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        // 2x - 3 = y + ... with y read through a negating view: 2x - 3 = -w
        let a = View {
            var: "x".to_string(),
            scale: 2,
            offset: -3,
        };
        let b = View {
            var: "w".to_string(),
            scale: -1,
            offset: 0,
        };
        enc.encode_eq_views(&a, &b, &[]).unwrap();
        let got = solutions(&enc, enc.sink(), &["x", "w"]);
        let mut want = Vec::new();
        for x in 0..=3 {
            for w in -1..=2 {
                if 2 * x - 3 == -w {
                    want.push(vec![x, w]);
                }
            }
        }
        want.sort();
        assert_eq!(got, want);
        assert!(!got.is_empty());
    }

    #[test]
    fn disequality_matches_brute_force() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        enc.encode_ne_views(&View::of_var("x"), &View::of_var("y"), &[])
            .unwrap();
        let got = solutions(&enc, enc.sink(), &["x", "y"]);
        let mut want = Vec::new();
        for x in 0..=3 {
            for y in 0..=3 {
                if x != y {
                    want.push(vec![x, y]);
                }
            }
        }
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn reified_equality_tracks_the_truth_value() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        let aux = Lit::positive(enc.new_sat_var());
        enc.encode_eq_views_reified(&View::of_var("x"), &View::of_var("y"), aux)
            .unwrap();
        for mask in sat_masks(enc.sink()) {
            let x = decode(&enc, mask, "x");
            let y = decode(&enc, mask, "y");
            let a = (mask >> (aux.var() - 1)) & 1 == 1;
            assert_eq!(a, x == y);
        }
        // Projection is unconstrained: all 16 pairs appear.
        assert_eq!(solutions(&enc, enc.sink(), &["x", "y"]).len(), 16);
    }

    #[test]
    fn disjoint_views_are_plainly_infeasible() {
        let s = table();
        let mut buf = CnfBuffer::new();
        let mut enc = SatEncoder::new(&s, &mut buf);
        // 4x and 4y + 2 share no value; every [4x = v] is forbidden.
        let a = View {
            var: "x".to_string(),
            scale: 4,
            offset: 0,
        };
        let b = View {
            var: "y".to_string(),
            scale: 4,
            offset: 2,
        };
        enc.encode_eq_views(&a, &b, &[]).unwrap();
        assert!(sat_masks(&buf).is_empty());
    }
}
