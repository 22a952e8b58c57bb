//! Subgraph isomorphism by SAT.
//!
//! The matching problem is compiled into a correspondence-variable matrix:
//! one boolean per (pattern vertex, target vertex) pair, row clauses making
//! every pattern vertex take some compatible image, and per-edge clauses
//! making every pattern edge land on a compatible target edge. Injectivity
//! is not encoded as clauses at all: a propagation oracle registered with
//! the solver forces the rest of a row and column false the moment a
//! correspondence variable becomes true.
//!
//! Entry points mirror the questions callers ask:
//!
//! - [`decide_subisomorphic`] — is the pattern embeddable at all?
//! - [`find_subisomorphism`] — one embedding, if any.
//! - [`enumerate_subisomorphisms`] — all distinct embeddings, lazily.
//! - [`count_subisomorphisms`] — how many distinct embeddings exist.
//! - [`verify_mapping`] — re-validate a claimed mapping independently.
//!
//! Graphs are `petgraph` digraphs; vertex and edge weights are opaque to
//! the matcher, which constrains pairs only through [`MatchRules`].

mod compat;
mod embedding;
mod enumerate;
mod error;
mod matcher;
mod oracle;
mod rules;
mod table;
mod verify;

pub use subsat_common::Lit;

pub use crate::compat::degrees_compatible;
pub use crate::embedding::{Embedding, MapView};
pub use crate::enumerate::Embeddings;
pub use crate::error::MatchError;
pub use crate::matcher::{MatchOutcome, SatMatcher};
pub use crate::rules::{ColourPair, EdgeCompat, MatchRules, NodeCompat};

use petgraph::graph::DiGraph;

/// Decide whether some subgraph of `target` is isomorphic to `pattern`
/// under `rules`.
///
/// `None` means a solver budget ran out before the question was answered;
/// it must not be read as "no".
pub fn decide_subisomorphic<'a, N, E>(
    pattern: &'a DiGraph<N, E>,
    target: &'a DiGraph<N, E>,
    rules: &MatchRules<'a, N, E>,
) -> Option<bool> {
    match find_subisomorphism(pattern, target, rules) {
        MatchOutcome::Found(_) => Some(true),
        MatchOutcome::NoMatch => Some(false),
        MatchOutcome::Inconclusive => None,
    }
}

/// Find one embedding of `pattern` into `target`, if any.
pub fn find_subisomorphism<'a, N, E>(
    pattern: &'a DiGraph<N, E>,
    target: &'a DiGraph<N, E>,
    rules: &MatchRules<'a, N, E>,
) -> MatchOutcome {
    let mut matcher = SatMatcher::new(pattern, target, *rules);
    match matcher.solve() {
        Ok(outcome) => outcome,
        // A construction error is an authoritative proof of absence.
        Err(_) => MatchOutcome::NoMatch,
    }
}

/// Stream every distinct embedding of `pattern` into `target`.
///
/// Each element costs one solve plus one blocking clause; the stream is
/// finite and cannot be restarted.
pub fn enumerate_subisomorphisms<'a, N, E>(
    pattern: &'a DiGraph<N, E>,
    target: &'a DiGraph<N, E>,
    rules: &MatchRules<'a, N, E>,
) -> Embeddings<'a, N, E> {
    Embeddings::new(SatMatcher::new(pattern, target, *rules))
}

/// Count the distinct embeddings of `pattern` into `target`.
///
/// An infeasible instance counts zero. Under a budget the count can fall
/// short; use [`enumerate_subisomorphisms`] and
/// [`Embeddings::is_exhaustive`] when that distinction matters.
pub fn count_subisomorphisms<'a, N, E>(
    pattern: &'a DiGraph<N, E>,
    target: &'a DiGraph<N, E>,
    rules: &MatchRules<'a, N, E>,
) -> usize {
    enumerate_subisomorphisms(pattern, target, rules).count()
}

/// Check a claimed mapping against `rules`, independently of any solver.
///
/// Accepts either direction of the mapping; see [`MapView`].
pub fn verify_mapping<'a, N, E>(
    pattern: &'a DiGraph<N, E>,
    target: &'a DiGraph<N, E>,
    rules: &MatchRules<'a, N, E>,
    map: MapView<'_>,
) -> bool {
    verify::check_mapping(pattern, target, rules, map)
}
