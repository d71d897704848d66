//! Canonical printed form.
//!
//! Unambiguous prefix notation, used for diagnostics and as the sort key of
//! the lexical canonical order. The text is stable across runs and across
//! hash implementations.

use super::{Expr, ExprKind};
use std::fmt;

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, children: &[Expr]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::True => write!(f, "true"),
            ExprKind::False => write!(f, "false"),
            ExprKind::Int(v) => write!(f, "{v}"),
            ExprKind::Var(n) => write!(f, "{n}"),
            ExprKind::Not(a) => write!(f, "not({a})"),
            ExprKind::Neg(a) => write!(f, "neg({a})"),
            ExprKind::Preserved(a) => write!(f, "preserved({a})"),
            ExprKind::And(cs) => write_list(f, "and", cs),
            ExprKind::Or(cs) => write_list(f, "or", cs),
            ExprKind::Xor(cs) => write_list(f, "xor", cs),
            ExprKind::Product(cs) => write_list(f, "product", cs),
            ExprKind::Iff(a, b) => write!(f, "iff({a}, {b})"),
            ExprKind::Eq(a, b) => write!(f, "eq({a}, {b})"),
            ExprKind::Le(a, b) => write!(f, "le({a}, {b})"),
            ExprKind::Sum(ts) => {
                write!(f, "sum(")?;
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}*{}", t.coeff, t.expr)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Category, Expr, SumTerm};

    #[test]
    fn prefix_form_is_unambiguous() {
        let x = Expr::var("x", Category::Decision);
        let e = Expr::le(
            Expr::sum(vec![
                SumTerm::new(2, x.clone()),
                SumTerm::new(-1, Expr::var("y", Category::Decision)),
            ]),
            Expr::int(5),
        );
        assert_eq!(e.to_string(), "le(sum(2*x, -1*y), 5)");
        assert_eq!(Expr::not(x).to_string(), "not(x)");
    }

    #[test]
    fn equal_expressions_print_identically() {
        let a = Expr::and(vec![Expr::truth(true), Expr::int(1)]);
        let b = Expr::and(vec![Expr::truth(true), Expr::int(1)]);
        assert_eq!(a.to_string(), b.to_string());
    }
}
