//! bespoke-core - Expression Model and Rewriting for the Constraint Flattener
//!
//! This crate provides the shared expression graph of the constraint-model
//! flattener and the passes that operate on it:
//! - Owned [`ast::Expr`] trees with memoized structural hashes
//! - Exact interval-set arithmetic with saturating bounds ([`range::RangeList`])
//! - Bottom-up simplification to a fixpoint ([`simplify`])
//! - Canonical child ordering and common-subexpression elimination
//!   ([`normalize`], [`cse`])
//! - The symbol-table boundary consulted for domains and categories
//!   ([`symbols::SymbolTable`])
//!
//! # Examples
//!
//! ## Building and simplifying a constraint
//!
//! ```
//! use bespoke_core::ast::{Category, Expr, SumTerm};
//! use bespoke_core::range::RangeList;
//! use bespoke_core::simplify::{SimplifyContext, simplify};
//! use bespoke_core::symbols::SymbolTable;
//!
//! let mut symbols = SymbolTable::new();
//! symbols
//!     .declare("x", RangeList::interval(0, 3), Category::Decision)
//!     .unwrap();
//! let x = symbols.reference("x").unwrap();
//!
//! // 2x + 3x = 10  simplifies through 5x = 10 to x = 2.
//! let c = Expr::eq(
//!     Expr::sum(vec![SumTerm::new(2, x.clone()), SumTerm::new(3, x)]),
//!     Expr::int(10),
//! );
//! let mut cx = SimplifyContext::new(&symbols);
//! let out = simplify(c, &mut cx);
//! assert_eq!(out.to_string(), "eq(x, 2)");
//! ```
//!
//! ## Factoring shared sub-expressions
//!
//! ```
//! use bespoke_core::ast::{Category, Expr, SumTerm};
//! use bespoke_core::cse::{IdenticalCseConfig, eliminate_identical};
//! use bespoke_core::range::RangeList;
//! use bespoke_core::symbols::SymbolTable;
//!
//! let mut symbols = SymbolTable::new();
//! symbols
//!     .declare("x", RangeList::interval(0, 9), Category::Decision)
//!     .unwrap();
//! symbols
//!     .declare("y", RangeList::interval(0, 9), Category::Decision)
//!     .unwrap();
//! let x = symbols.reference("x").unwrap();
//! let y = symbols.reference("y").unwrap();
//!
//! let shared = Expr::sum(vec![SumTerm::new(1, x), SumTerm::new(1, y)]);
//! let constraints = vec![
//!     Expr::le(shared.clone(), Expr::int(7)),
//!     Expr::eq(shared, Expr::int(4)),
//! ];
//! let (rewritten, stats) =
//!     eliminate_identical(constraints, &mut symbols, &IdenticalCseConfig::default());
//! assert_eq!(stats.aux_introduced, 1);
//! assert_eq!(rewritten.len(), 3); // two rewritten constraints + one definition
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ast;
pub mod cse;
pub mod error;
pub mod normalize;
pub mod range;
pub mod simplify;
pub mod symbols;

pub use ast::{Category, Expr, ExprKind, Polarity, SumTerm};
pub use error::{Error, Result};
pub use normalize::{CanonicalOrder, normalize};
pub use range::RangeList;
pub use simplify::{SimplifyContext, SimplifyOptions, SimplifyStats, simplify};
pub use symbols::{SymbolTable, VarInfo};
