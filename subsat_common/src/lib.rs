//! Shared propositional-logic primitives for the subsat workspace.
//!
//! This crate provides the literal/clause types, the boolean formula tree,
//! and the Tseitin CNF compiler used by both the solver and the subgraph
//! encoder.

mod clause;
mod cnf;
mod formula;
mod lit;

pub use crate::clause::Clause;
pub use crate::cnf::{ClauseRejected, ClauseSink, CnfBuffer};
pub use crate::formula::Formula;
pub use crate::lit::{Lit, Var};
