//! bespoke-sat - Clause Encodings for the Constraint Flattener
//!
//! This crate turns simplified, normalized constraints from `bespoke-core`
//! into CNF clauses:
//! - Order and direct encodings of finite-domain variables ([`encode`])
//! - Order encoding of weighted linear inequalities with reification
//! - At-most-one / exactly-one clause families ([`encode::amo`])
//! - Direct-encoded equality of scaled variable views ([`encode::direct`])
//! - The clause-sink boundary and an in-memory CNF buffer ([`clause`])
//!
//! # Examples
//!
//! ```
//! use bespoke_core::ast::{Category, Expr, SumTerm};
//! use bespoke_core::range::RangeList;
//! use bespoke_core::symbols::SymbolTable;
//! use bespoke_sat::{CnfBuffer, SatEncoder};
//!
//! let mut symbols = SymbolTable::new();
//! symbols
//!     .declare("x", RangeList::interval(0, 3), Category::Decision)
//!     .unwrap();
//! symbols
//!     .declare("y", RangeList::interval(0, 3), Category::Decision)
//!     .unwrap();
//! let x = symbols.reference("x").unwrap();
//! let y = symbols.reference("y").unwrap();
//!
//! // x + y <= 5 over the order encoding of x and y.
//! let c = Expr::le(
//!     Expr::sum(vec![SumTerm::new(1, x), SumTerm::new(1, y)]),
//!     Expr::int(5),
//! );
//! let mut cnf = CnfBuffer::new();
//! let mut encoder = SatEncoder::new(&symbols, &mut cnf);
//! encoder.encode(&c).unwrap();
//! assert!(!cnf.is_unsat());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod clause;
pub mod encode;
pub mod error;
pub mod lit;

pub use clause::{ClauseSink, CnfBuffer};
pub use encode::{AmoStyle, EncodeConfig, EncodeStats, LinTerm, LinearLe, SatEncoder, View};
pub use error::{EncodeError, Result};
pub use lit::{Lit, Var};
