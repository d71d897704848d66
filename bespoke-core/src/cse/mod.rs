//! Common-subexpression elimination over a constraint set.
//!
//! Two engines share the auxiliary-definition machinery here:
//!
//! - [`identical`] replaces whole sub-expressions that occur at least twice
//!   with a fresh auxiliary variable and a definitional constraint.
//! - [`acx`] factors shared child *sub-multisets* out of multiple occurrences
//!   of one associative-commutative operator.
//!
//! Neither engine changes the solution set projected onto user variables:
//! every auxiliary is definitionally tied to the expression it replaces and
//! stays out of the user-facing variable listing.

pub mod acx;
pub mod identical;

pub use acx::{AcCseConfig, AcKind, eliminate_ac};
pub use identical::{IdenticalCseConfig, eliminate_identical};

use crate::ast::Expr;
use crate::symbols::SymbolTable;

/// Counters reported by either engine.
#[derive(Debug, Clone, Default)]
pub struct CseStats {
    /// Auxiliary variables introduced.
    pub aux_introduced: u64,
    /// Occurrences rewritten to reference an auxiliary.
    pub occurrences_replaced: u64,
    /// Candidate-selection rounds performed.
    pub rounds: u64,
}

/// Allocate an auxiliary for `expr` and return the reference together with
/// the definitional constraint tying them.
///
/// Boolean expressions get a boolean auxiliary and a biconditional; integer
/// expressions get a domain covering the expression's bounds (the hull, a
/// sound over-approximation) and an equality.
fn define_auxiliary(expr: &Expr, symbols: &mut SymbolTable) -> (Expr, Expr) {
    let origin = expr.to_string();
    if expr.is_boolean(symbols) {
        let name = symbols.new_auxiliary_bool(origin);
        let aux = symbols.reference(&name).expect("auxiliary just declared");
        let def = Expr::iff(aux.clone(), expr.clone());
        (aux, def)
    } else {
        let domain = expr.bounds(symbols).hull();
        let name = symbols.new_auxiliary(domain, origin);
        let aux = symbols.reference(&name).expect("auxiliary just declared");
        let def = Expr::eq(aux.clone(), expr.clone());
        (aux, def)
    }
}
