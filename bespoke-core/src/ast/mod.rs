//! Expression node model.
//!
//! Constraints are owned trees of [`Expr`] nodes. Ownership is the
//! single-parent invariant: a child moved into a parent cannot be attached
//! anywhere else without an explicit [`Clone`], and detaching is an ordinary
//! move. Rewrites allocate replacement nodes, so the structural hash and the
//! category of a node are computed once at construction and never need
//! invalidation.
//!
//! The kind set is a closed enum; every pass pattern-matches exhaustively,
//! so adding a kind is a compile error at each rule site until it is handled.

mod bounds;
mod eval;
mod print;

pub use eval::{Assignment, Value, eval};

use crate::symbols::SymbolTable;
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// How far a subtree can be evaluated, ordered from fully known to unknown.
///
/// A composite node's category is the maximum over its children; constant
/// folding is only sound on operands with category [`Category::Constant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Literal constants and expressions built only from them.
    Constant,
    /// Known once parameter values are substituted.
    Parameter,
    /// Bound by an enclosing quantifier.
    QuantifierBound,
    /// A decision variable of the model.
    Decision,
    /// A generated auxiliary variable.
    Auxiliary,
    /// Referenced but never declared.
    Undeclared,
}

/// One term of a weighted sum: `coeff * expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumTerm {
    /// Integer weight applied to the child.
    pub coeff: i64,
    /// The weighted child expression.
    pub expr: Expr,
}

impl SumTerm {
    /// Create a weighted term.
    #[must_use]
    pub fn new(coeff: i64, expr: Expr) -> Self {
        Self { coeff, expr }
    }
}

/// The operator or leaf variant of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// Boolean constant true.
    True,
    /// Boolean constant false.
    False,
    /// Integer constant.
    Int(i64),
    /// Reference to a named variable.
    Var(String),
    /// Logical negation.
    Not(Box<Expr>),
    /// N-ary conjunction (associative-commutative, kept flattened).
    And(Vec<Expr>),
    /// N-ary disjunction (associative-commutative, kept flattened).
    Or(Vec<Expr>),
    /// N-ary exclusive or (associative-commutative, kept flattened).
    Xor(Vec<Expr>),
    /// Logical biconditional.
    Iff(Box<Expr>, Box<Expr>),
    /// Equality over integers or booleans.
    Eq(Box<Expr>, Box<Expr>),
    /// Non-strict integer comparison `lhs <= rhs`.
    Le(Box<Expr>, Box<Expr>),
    /// Unary arithmetic negation.
    Neg(Box<Expr>),
    /// Weighted sum with a coefficient per child.
    Sum(Vec<SumTerm>),
    /// N-ary product (associative-commutative, kept flattened).
    Product(Vec<Expr>),
    /// Boolean wrapper marking a constraint as non-eliminable when a sibling
    /// folds to false under the dominance simplification mode.
    Preserved(Box<Expr>),
}

/// Truth-value correlation between a boolean node and one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Child truth increases parent truth.
    Pos,
    /// Child truth decreases parent truth.
    Neg,
    /// Both directions matter (equivalences, parities).
    Mixed,
}

/// An immutable expression node with memoized structural hash and category.
#[derive(Clone)]
pub struct Expr {
    kind: ExprKind,
    hash: u64,
    category: Category,
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

fn kind_tag(kind: &ExprKind) -> u8 {
    match kind {
        ExprKind::True => 0,
        ExprKind::False => 1,
        ExprKind::Int(_) => 2,
        ExprKind::Var(_) => 3,
        ExprKind::Not(_) => 4,
        ExprKind::And(_) => 5,
        ExprKind::Or(_) => 6,
        ExprKind::Xor(_) => 7,
        ExprKind::Iff(..) => 8,
        ExprKind::Eq(..) => 9,
        ExprKind::Le(..) => 10,
        ExprKind::Neg(_) => 11,
        ExprKind::Sum(_) => 12,
        ExprKind::Product(_) => 13,
        ExprKind::Preserved(_) => 14,
    }
}

fn digest(kind: &ExprKind) -> u64 {
    let mut h = FxHasher::default();
    h.write_u8(kind_tag(kind));
    match kind {
        ExprKind::True | ExprKind::False => {}
        ExprKind::Int(v) => h.write_i64(*v),
        ExprKind::Var(name) => h.write(name.as_bytes()),
        ExprKind::Not(a) | ExprKind::Neg(a) | ExprKind::Preserved(a) => h.write_u64(a.hash),
        ExprKind::And(cs) | ExprKind::Or(cs) | ExprKind::Xor(cs) | ExprKind::Product(cs) => {
            h.write_usize(cs.len());
            for c in cs {
                h.write_u64(c.hash);
            }
        }
        ExprKind::Iff(a, b) | ExprKind::Eq(a, b) | ExprKind::Le(a, b) => {
            h.write_u64(a.hash);
            h.write_u64(b.hash);
        }
        ExprKind::Sum(ts) => {
            h.write_usize(ts.len());
            for t in ts {
                h.write_i64(t.coeff);
                h.write_u64(t.expr.hash);
            }
        }
    }
    h.finish()
}

fn fold_category(kind: &ExprKind) -> Category {
    let mut cat = Category::Constant;
    let mut join = |c: Category| {
        if c > cat {
            cat = c;
        }
    };
    match kind {
        ExprKind::True | ExprKind::False | ExprKind::Int(_) | ExprKind::Var(_) => {}
        ExprKind::Not(a) | ExprKind::Neg(a) | ExprKind::Preserved(a) => join(a.category),
        ExprKind::And(cs) | ExprKind::Or(cs) | ExprKind::Xor(cs) | ExprKind::Product(cs) => {
            for c in cs {
                join(c.category);
            }
        }
        ExprKind::Iff(a, b) | ExprKind::Eq(a, b) | ExprKind::Le(a, b) => {
            join(a.category);
            join(b.category);
        }
        ExprKind::Sum(ts) => {
            for t in ts {
                join(t.expr.category);
            }
        }
    }
    cat
}

impl Expr {
    fn make(kind: ExprKind) -> Self {
        debug_assert!(
            !matches!(kind, ExprKind::Var(_)),
            "variable references carry an explicit category"
        );
        let hash = digest(&kind);
        let category = fold_category(&kind);
        Self {
            kind,
            hash,
            category,
        }
    }

    /// Boolean constant.
    #[must_use]
    pub fn truth(b: bool) -> Self {
        Self::make(if b { ExprKind::True } else { ExprKind::False })
    }

    /// Integer constant.
    #[must_use]
    pub fn int(v: i64) -> Self {
        Self::make(ExprKind::Int(v))
    }

    /// Variable reference. Prefer [`SymbolTable::reference`], which fills in
    /// the declared category.
    #[must_use]
    pub fn var(name: impl Into<String>, category: Category) -> Self {
        let kind = ExprKind::Var(name.into());
        let hash = digest(&kind);
        Self {
            kind,
            hash,
            category,
        }
    }

    /// Logical negation.
    #[must_use]
    pub fn not(a: Expr) -> Self {
        Self::make(ExprKind::Not(Box::new(a)))
    }

    /// N-ary conjunction.
    #[must_use]
    pub fn and(children: Vec<Expr>) -> Self {
        Self::make(ExprKind::And(children))
    }

    /// N-ary disjunction.
    #[must_use]
    pub fn or(children: Vec<Expr>) -> Self {
        Self::make(ExprKind::Or(children))
    }

    /// N-ary exclusive or.
    #[must_use]
    pub fn xor(children: Vec<Expr>) -> Self {
        Self::make(ExprKind::Xor(children))
    }

    /// Biconditional.
    #[must_use]
    pub fn iff(a: Expr, b: Expr) -> Self {
        Self::make(ExprKind::Iff(Box::new(a), Box::new(b)))
    }

    /// Equality.
    #[must_use]
    pub fn eq(a: Expr, b: Expr) -> Self {
        Self::make(ExprKind::Eq(Box::new(a), Box::new(b)))
    }

    /// Non-strict comparison `a <= b`.
    #[must_use]
    pub fn le(a: Expr, b: Expr) -> Self {
        Self::make(ExprKind::Le(Box::new(a), Box::new(b)))
    }

    /// Unary arithmetic negation.
    #[must_use]
    pub fn neg(a: Expr) -> Self {
        Self::make(ExprKind::Neg(Box::new(a)))
    }

    /// Weighted sum.
    #[must_use]
    pub fn sum(terms: Vec<SumTerm>) -> Self {
        Self::make(ExprKind::Sum(terms))
    }

    /// N-ary product.
    #[must_use]
    pub fn product(children: Vec<Expr>) -> Self {
        Self::make(ExprKind::Product(children))
    }

    /// Non-eliminable marker for the dominance simplification mode.
    #[must_use]
    pub fn preserved(a: Expr) -> Self {
        Self::make(ExprKind::Preserved(Box::new(a)))
    }

    /// The operator or leaf variant.
    #[must_use]
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Consume the node, yielding its kind (and thereby its children).
    #[must_use]
    pub fn into_kind(self) -> ExprKind {
        self.kind
    }

    /// Memoized structural hash over kind, payloads and children.
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// Evaluatability category (maximum over the subtree).
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// True for nodes without children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::True | ExprKind::False | ExprKind::Int(_) | ExprKind::Var(_)
        )
    }

    /// True when this node is the constant `true`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self.kind, ExprKind::True)
    }

    /// True when this node is the constant `false`.
    #[must_use]
    pub fn is_false(&self) -> bool {
        matches!(self.kind, ExprKind::False)
    }

    /// The integer constant payload, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            ExprKind::Int(v) => Some(v),
            _ => None,
        }
    }

    /// The referenced variable name, if this is a reference.
    #[must_use]
    pub fn as_var(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Var(n) => Some(n),
            _ => None,
        }
    }

    /// Whether the node denotes a truth value. Variable references consult
    /// the symbol table.
    #[must_use]
    pub fn is_boolean(&self, symbols: &SymbolTable) -> bool {
        match &self.kind {
            ExprKind::True
            | ExprKind::False
            | ExprKind::Not(_)
            | ExprKind::And(_)
            | ExprKind::Or(_)
            | ExprKind::Xor(_)
            | ExprKind::Iff(..)
            | ExprKind::Eq(..)
            | ExprKind::Le(..)
            | ExprKind::Preserved(_) => true,
            ExprKind::Var(n) => symbols.is_bool(n),
            ExprKind::Int(_) | ExprKind::Neg(_) | ExprKind::Sum(_) | ExprKind::Product(_) => false,
        }
    }

    /// Visit this node and every descendant, parents before children.
    pub fn visit(&self, f: &mut dyn FnMut(&Expr)) {
        f(self);
        match &self.kind {
            ExprKind::True | ExprKind::False | ExprKind::Int(_) | ExprKind::Var(_) => {}
            ExprKind::Not(a) | ExprKind::Neg(a) | ExprKind::Preserved(a) => a.visit(f),
            ExprKind::And(cs) | ExprKind::Or(cs) | ExprKind::Xor(cs) | ExprKind::Product(cs) => {
                for c in cs {
                    c.visit(f);
                }
            }
            ExprKind::Iff(a, b) | ExprKind::Eq(a, b) | ExprKind::Le(a, b) => {
                a.visit(f);
                b.visit(f);
            }
            ExprKind::Sum(ts) => {
                for t in ts {
                    t.expr.visit(f);
                }
            }
        }
    }

    /// Number of nodes in the subtree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut n = 0usize;
        self.visit(&mut |_| n += 1);
        n
    }

    /// Rebuild this node with every direct child passed through `f`.
    /// Leaves are returned unchanged.
    #[must_use]
    pub fn map_children(self, f: &mut dyn FnMut(Expr) -> Expr) -> Expr {
        if self.is_leaf() {
            return self;
        }
        match self.kind {
            ExprKind::Not(a) => Expr::not(f(*a)),
            ExprKind::Neg(a) => Expr::neg(f(*a)),
            ExprKind::Preserved(a) => Expr::preserved(f(*a)),
            ExprKind::And(cs) => Expr::and(cs.into_iter().map(&mut *f).collect()),
            ExprKind::Or(cs) => Expr::or(cs.into_iter().map(&mut *f).collect()),
            ExprKind::Xor(cs) => Expr::xor(cs.into_iter().map(&mut *f).collect()),
            ExprKind::Product(cs) => Expr::product(cs.into_iter().map(&mut *f).collect()),
            ExprKind::Iff(a, b) => {
                let a = f(*a);
                let b = f(*b);
                Expr::iff(a, b)
            }
            ExprKind::Eq(a, b) => {
                let a = f(*a);
                let b = f(*b);
                Expr::eq(a, b)
            }
            ExprKind::Le(a, b) => {
                let a = f(*a);
                let b = f(*b);
                Expr::le(a, b)
            }
            ExprKind::Sum(ts) => Expr::sum(
                ts.into_iter()
                    .map(|t| SumTerm::new(t.coeff, f(t.expr)))
                    .collect(),
            ),
            ExprKind::True | ExprKind::False | ExprKind::Int(_) | ExprKind::Var(_) => {
                unreachable!("leaves handled above")
            }
        }
    }

    /// Whether the node's kind has a connective-level negation, letting
    /// `not(self)` be rewritten without an auxiliary wrapper.
    ///
    /// `Eq` and `Xor` are deliberately not negatable: `Not` over them is a
    /// normal form the encoder consumes directly.
    #[must_use]
    pub fn is_negatable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::True
                | ExprKind::False
                | ExprKind::Not(_)
                | ExprKind::And(_)
                | ExprKind::Or(_)
                | ExprKind::Iff(..)
                | ExprKind::Le(..)
                | ExprKind::Preserved(_)
        )
    }

    /// The logical negation of this boolean expression, pushed through the
    /// connective where [`Expr::is_negatable`] holds and wrapped in `Not`
    /// otherwise.
    #[must_use]
    pub fn negated(self) -> Expr {
        if !self.is_negatable() {
            return Expr::not(self);
        }
        match self.kind {
            ExprKind::True => Expr::truth(false),
            ExprKind::False => Expr::truth(true),
            ExprKind::Not(a) => *a,
            ExprKind::And(cs) => Expr::or(cs.into_iter().map(Expr::negated).collect()),
            ExprKind::Or(cs) => Expr::and(cs.into_iter().map(Expr::negated).collect()),
            ExprKind::Iff(a, b) => Expr::xor(vec![*a, *b]),
            // not (a <= b)  <=>  b + 1 <= a
            ExprKind::Le(a, b) => Expr::le(
                Expr::sum(vec![SumTerm::new(1, *b), SumTerm::new(1, Expr::int(1))]),
                *a,
            ),
            ExprKind::Preserved(a) => Expr::preserved(a.negated()),
            _ => unreachable!("is_negatable covers the kinds above"),
        }
    }

    /// Truth-value correlation between this boolean node and its children.
    #[must_use]
    pub fn child_polarity(&self) -> Polarity {
        match self.kind {
            ExprKind::Not(_) => Polarity::Neg,
            ExprKind::Xor(_) | ExprKind::Iff(..) | ExprKind::Eq(..) => Polarity::Mixed,
            _ => Polarity::Pos,
        }
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
