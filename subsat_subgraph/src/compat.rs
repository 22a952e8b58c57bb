use petgraph::Direction::{Incoming, Outgoing};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use crate::rules::MatchRules;

/// Check whether a pattern vertex may map to a target vertex under the
/// rules' vertex colours and node predicate.
pub(crate) fn vertices_compatible<N, E>(
    pattern: &DiGraph<N, E>,
    target: &DiGraph<N, E>,
    rules: &MatchRules<'_, N, E>,
    p: NodeIndex,
    t: NodeIndex,
) -> bool {
    if let Some(colours) = &rules.vertex_colours {
        if colours.pattern[p.index()] != colours.target[t.index()] {
            return false;
        }
    }
    if let Some(compat) = rules.node_compat {
        if !compat(pattern, target, p, t) {
            return false;
        }
    }
    true
}

/// Check whether a pattern edge may map to a target edge under the rules'
/// edge colours and edge predicate. Endpoint compatibility is checked
/// separately with [`vertices_compatible`].
pub(crate) fn edges_compatible<N, E>(
    pattern: &DiGraph<N, E>,
    target: &DiGraph<N, E>,
    rules: &MatchRules<'_, N, E>,
    pe: EdgeIndex,
    te: EdgeIndex,
) -> bool {
    if let Some(colours) = &rules.edge_colours {
        if colours.pattern[pe.index()] != colours.target[te.index()] {
            return false;
        }
    }
    if let Some(compat) = rules.edge_compat {
        if !compat(pattern, target, pe, te) {
            return false;
        }
    }
    true
}

/// Stock node predicate: a pattern vertex cannot map to a target vertex of
/// strictly smaller in- or out-degree, since every pattern edge at the
/// vertex needs a distinct target edge.
///
/// Useful as `MatchRules::with_node_compat(&degrees_compatible)` to prune
/// the variable matrix before the solver ever runs.
pub fn degrees_compatible<N, E>(
    pattern: &DiGraph<N, E>,
    target: &DiGraph<N, E>,
    p: NodeIndex,
    t: NodeIndex,
) -> bool {
    pattern.neighbors_directed(p, Incoming).count() <= target.neighbors_directed(t, Incoming).count()
        && pattern.neighbors_directed(p, Outgoing).count()
            <= target.neighbors_directed(t, Outgoing).count()
}
