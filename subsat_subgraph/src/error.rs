//! Error types for encoder sessions.
//!
//! Construction errors are authoritative: a session that failed to encode
//! has proved that no embedding exists, and the stored error is returned by
//! every later operation without re-attempting solver work.

use subsat_common::ClauseRejected;
use thiserror::Error;

/// Errors raised by [`SatMatcher`](crate::SatMatcher) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A pattern vertex has no colour/predicate-compatible target vertex;
    /// no embedding can exist.
    #[error("pattern vertex {pattern} has no compatible target vertex")]
    NoVertexCandidate { pattern: usize },

    /// A pattern edge has no compatible target edge; no embedding can exist.
    #[error("pattern edge {pattern_edge} has no compatible target edge")]
    NoEdgeCandidate { pattern_edge: usize },

    /// The solver refused a clause as contradictory while the encoding was
    /// being built; the instance is unsatisfiable by construction.
    #[error("encoding infeasible: {0}")]
    ClauseRejected(#[from] ClauseRejected),

    /// A caller-supplied map view has the wrong number of entries. Checked
    /// eagerly on every call; never stored on the session.
    #[error("map has {got} entries, expected {expected}")]
    MapLength { expected: usize, got: usize },
}

impl MatchError {
    /// True for errors that constitute an authoritative "no embedding
    /// exists", as opposed to bad arguments.
    pub fn is_infeasible(&self) -> bool {
        !matches!(self, MatchError::MapLength { .. })
    }
}
