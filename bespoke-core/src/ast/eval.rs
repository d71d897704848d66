//! Exhaustive-assignment evaluation.
//!
//! Used by the test suites to check that rewrites preserve the solution set
//! on small synthetic domains. Nothing in the compilation path evaluates.

use super::{Expr, ExprKind};
use crate::error::{Error, Result};
use crate::symbols::SymbolTable;
use rustc_hash::FxHashMap;

/// A ground value: either a truth value or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Truth value.
    Bool(bool),
    /// Integer value.
    Int(i64),
}

impl Value {
    /// The truth value, or a type error.
    pub fn as_bool(self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Int(v) => Err(Error::NotBoolean(v.to_string())),
        }
    }

    /// The value as an integer; truth values coerce to 0/1.
    #[must_use]
    pub fn as_int_lenient(self) -> i64 {
        match self {
            Value::Bool(b) => i64::from(b),
            Value::Int(v) => v,
        }
    }
}

/// A total assignment of integer values to variable names. Boolean
/// variables take 0 or 1.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    values: FxHashMap<String, i64>,
}

impl Assignment {
    /// Empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    /// Look up a binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }
}

impl FromIterator<(String, i64)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Evaluate `expr` under `asg`.
///
/// Integer/boolean coercion is lenient in arithmetic positions (truth values
/// count as 0/1) so that pre-simplification trees remain evaluable; boolean
/// connectives still require boolean children.
pub fn eval(expr: &Expr, asg: &Assignment, symbols: &SymbolTable) -> Result<Value> {
    match expr.kind() {
        ExprKind::True => Ok(Value::Bool(true)),
        ExprKind::False => Ok(Value::Bool(false)),
        ExprKind::Int(v) => Ok(Value::Int(*v)),
        ExprKind::Var(n) => {
            let v = asg.get(n).ok_or_else(|| Error::Unassigned(n.clone()))?;
            if symbols.is_bool(n) {
                Ok(Value::Bool(v != 0))
            } else {
                Ok(Value::Int(v))
            }
        }
        ExprKind::Not(a) => Ok(Value::Bool(!eval(a, asg, symbols)?.as_bool()?)),
        ExprKind::And(cs) => {
            let mut acc = true;
            for c in cs {
                acc &= eval(c, asg, symbols)?.as_bool()?;
            }
            Ok(Value::Bool(acc))
        }
        ExprKind::Or(cs) => {
            let mut acc = false;
            for c in cs {
                acc |= eval(c, asg, symbols)?.as_bool()?;
            }
            Ok(Value::Bool(acc))
        }
        ExprKind::Xor(cs) => {
            let mut acc = false;
            for c in cs {
                acc ^= eval(c, asg, symbols)?.as_bool()?;
            }
            Ok(Value::Bool(acc))
        }
        ExprKind::Iff(a, b) => Ok(Value::Bool(
            eval(a, asg, symbols)?.as_bool()? == eval(b, asg, symbols)?.as_bool()?,
        )),
        ExprKind::Eq(a, b) => {
            let va = eval(a, asg, symbols)?;
            let vb = eval(b, asg, symbols)?;
            Ok(Value::Bool(va.as_int_lenient() == vb.as_int_lenient()))
        }
        ExprKind::Le(a, b) => {
            let va = eval(a, asg, symbols)?;
            let vb = eval(b, asg, symbols)?;
            Ok(Value::Bool(va.as_int_lenient() <= vb.as_int_lenient()))
        }
        ExprKind::Neg(a) => Ok(Value::Int(
            eval(a, asg, symbols)?.as_int_lenient().saturating_neg(),
        )),
        ExprKind::Sum(ts) => {
            let mut acc = 0i64;
            for t in ts {
                let v = eval(&t.expr, asg, symbols)?.as_int_lenient();
                acc = acc.saturating_add(t.coeff.saturating_mul(v));
            }
            Ok(Value::Int(acc))
        }
        ExprKind::Product(cs) => {
            let mut acc = 1i64;
            for c in cs {
                acc = acc.saturating_mul(eval(c, asg, symbols)?.as_int_lenient());
            }
            Ok(Value::Int(acc))
        }
        ExprKind::Preserved(a) => eval(a, asg, symbols),
    }
}
