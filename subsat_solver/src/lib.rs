//! A small incremental SAT engine with a decision-time inference hook.
//!
//! The engine exposes the capability surface the subgraph encoder consumes:
//! variable allocation, clause addition that fails when a clause is
//! immediately contradictory, budgeted assumption-aware solving, model
//! readback, and registration of a single [`InferenceHook`] that can force
//! additional literals whenever the trail grows.
//!
//! Search is plain chronological-backtracking DPLL over two-watched-literal
//! unit propagation. Clause learning and restart policy are deliberately
//! out of scope; the encodings this engine serves get their pruning power
//! from the hook, not from learned clauses.

mod assignment;
mod hook;
mod solver;

pub use crate::assignment::{Assignment, Value};
pub use crate::hook::InferenceHook;
pub use crate::solver::{Outcome, Solver, Stats};
