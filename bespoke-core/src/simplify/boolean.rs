//! Rules for the boolean connectives.

use super::{Rewrite, SimplifyContext};
use crate::ast::{Expr, ExprKind};

/// Flatten one nesting level of the same kind.
fn flatten(children: Vec<Expr>, is_same: fn(&ExprKind) -> bool) -> Vec<Expr> {
    let mut flat = Vec::with_capacity(children.len());
    for c in children {
        if is_same(c.kind()) {
            match c.into_kind() {
                ExprKind::And(inner) | ExprKind::Or(inner) | ExprKind::Xor(inner) => {
                    flat.extend(inner);
                }
                _ => unreachable!("is_same matched a non-variadic kind"),
            }
        } else {
            flat.push(c);
        }
    }
    flat
}

/// Drop duplicates by structural equality, keeping first occurrences.
fn dedup(children: Vec<Expr>) -> Vec<Expr> {
    let mut uniq: Vec<Expr> = Vec::with_capacity(children.len());
    for c in children {
        if !uniq.contains(&c) {
            uniq.push(c);
        }
    }
    uniq
}

/// Whether some child's connective negation is also a child.
fn has_complementary_pair(children: &[Expr]) -> bool {
    for (i, c) in children.iter().enumerate() {
        let neg = c.clone().negated();
        if children
            .iter()
            .enumerate()
            .any(|(j, d)| i != j && *d == neg)
        {
            return true;
        }
    }
    false
}

pub(super) fn simplify_and(children: Vec<Expr>, cx: &mut SimplifyContext<'_>) -> Rewrite {
    let original = children.clone();
    let flat = flatten(children, |k| matches!(k, ExprKind::And(_)));

    let mut saw_false = false;
    let mut kept = Vec::with_capacity(flat.len());
    for c in flat {
        if c.is_true() {
            continue;
        }
        if c.is_false() {
            saw_false = true;
            continue;
        }
        kept.push(c);
    }
    let uniq = dedup(kept);
    if !saw_false && has_complementary_pair(&uniq) {
        saw_false = true;
    }

    let survivors = if saw_false {
        if !cx.options.dominance {
            return Rewrite::Changed(Expr::truth(false));
        }
        // Dominance carve-out: keep the contradiction together with the
        // non-eliminable constraints instead of collapsing the conjunction.
        let mut keep = vec![Expr::truth(false)];
        keep.extend(
            uniq.into_iter()
                .filter(|c| matches!(c.kind(), ExprKind::Preserved(_))),
        );
        keep
    } else {
        uniq
    };

    let out = match survivors.len() {
        0 => Expr::truth(true),
        1 => survivors.into_iter().next().expect("len checked"),
        _ => Expr::and(survivors),
    };
    finish(out, Expr::and(original))
}

pub(super) fn simplify_or(children: Vec<Expr>) -> Rewrite {
    let original = children.clone();
    let flat = flatten(children, |k| matches!(k, ExprKind::Or(_)));

    let mut kept = Vec::with_capacity(flat.len());
    for c in flat {
        if c.is_false() {
            continue;
        }
        if c.is_true() {
            return Rewrite::Changed(Expr::truth(true));
        }
        kept.push(c);
    }
    let uniq = dedup(kept);
    if has_complementary_pair(&uniq) {
        return Rewrite::Changed(Expr::truth(true));
    }

    let out = match uniq.len() {
        0 => Expr::truth(false),
        1 => uniq.into_iter().next().expect("len checked"),
        _ => Expr::or(uniq),
    };
    finish(out, Expr::or(original))
}

pub(super) fn simplify_not(child: Expr) -> Rewrite {
    if child.is_negatable() {
        Rewrite::Changed(child.negated())
    } else {
        Rewrite::Unchanged(Expr::not(child))
    }
}

pub(super) fn simplify_xor(children: Vec<Expr>) -> Rewrite {
    let original = children.clone();
    let flat = flatten(children, |k| matches!(k, ExprKind::Xor(_)));

    // Constants and direct negations fold into a parity bit.
    let mut parity = false;
    let mut kept = Vec::with_capacity(flat.len());
    for c in flat {
        if c.is_true() {
            parity = !parity;
            continue;
        }
        if c.is_false() {
            continue;
        }
        if matches!(c.kind(), ExprKind::Not(_)) {
            parity = !parity;
            if let ExprKind::Not(inner) = c.into_kind() {
                kept.push(*inner);
            }
            continue;
        }
        kept.push(c);
    }

    // Identical pairs cancel.
    let mut uniq: Vec<Expr> = Vec::with_capacity(kept.len());
    for c in kept {
        if let Some(pos) = uniq.iter().position(|u| *u == c) {
            uniq.remove(pos);
        } else {
            uniq.push(c);
        }
    }

    let out = match uniq.len() {
        0 => Expr::truth(parity),
        1 => {
            let e = uniq.into_iter().next().expect("len checked");
            if parity { Expr::not(e) } else { e }
        }
        _ => {
            let x = Expr::xor(uniq);
            if parity { Expr::not(x) } else { x }
        }
    };
    finish(out, Expr::xor(original))
}

pub(super) fn simplify_iff(a: Expr, b: Expr) -> Rewrite {
    if a == b {
        return Rewrite::Changed(Expr::truth(true));
    }
    if a.is_true() {
        return Rewrite::Changed(b);
    }
    if a.is_false() {
        return Rewrite::Changed(b.negated());
    }
    if b.is_true() {
        return Rewrite::Changed(a);
    }
    if b.is_false() {
        return Rewrite::Changed(a.negated());
    }
    if b == a.clone().negated() {
        return Rewrite::Changed(Expr::truth(false));
    }
    Rewrite::Unchanged(Expr::iff(a, b))
}

pub(super) fn simplify_preserved(child: Expr) -> Rewrite {
    if child.is_true() || child.is_false() {
        return Rewrite::Changed(child);
    }
    Rewrite::Unchanged(Expr::preserved(child))
}

/// Compare against the original node to decide `Changed` faithfully; a rule
/// must report `Unchanged` on its own output.
fn finish(out: Expr, original: Expr) -> Rewrite {
    if out == original {
        Rewrite::Unchanged(out)
    } else {
        Rewrite::Changed(out)
    }
}
