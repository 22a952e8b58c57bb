use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

/// Vertex compatibility predicate: `(pattern graph, target graph, pattern
/// vertex, target vertex)`. Anything the predicate needs beyond the graphs
/// is captured by the closure itself.
pub type NodeCompat<N, E> = dyn Fn(&DiGraph<N, E>, &DiGraph<N, E>, NodeIndex, NodeIndex) -> bool;

/// Edge compatibility predicate: `(pattern graph, target graph, pattern
/// edge, target edge)`.
pub type EdgeCompat<N, E> = dyn Fn(&DiGraph<N, E>, &DiGraph<N, E>, EdgeIndex, EdgeIndex) -> bool;

/// A pair of integer colourings, indexed by vertex or edge index. Colours
/// constrain matching only when both sides are supplied.
#[derive(Clone, Copy, Debug)]
pub struct ColourPair<'a> {
    pub pattern: &'a [i32],
    pub target: &'a [i32],
}

/// Everything that constrains which target items a pattern item may map to,
/// plus the solver budgets applied to each solve call.
///
/// The default rules accept any vertex pair and any edge pair and solve
/// without budgets.
pub struct MatchRules<'a, N, E> {
    pub vertex_colours: Option<ColourPair<'a>>,
    pub edge_colours: Option<ColourPair<'a>>,
    pub node_compat: Option<&'a NodeCompat<N, E>>,
    pub edge_compat: Option<&'a EdgeCompat<N, E>>,
    /// Conflicts one solve may spend before reporting inconclusive.
    pub conflict_budget: Option<u64>,
    /// Propagations one solve may spend before reporting inconclusive.
    pub propagation_budget: Option<u64>,
}

impl<N, E> MatchRules<'_, N, E> {
    pub fn new() -> Self {
        MatchRules {
            vertex_colours: None,
            edge_colours: None,
            node_compat: None,
            edge_compat: None,
            conflict_budget: None,
            propagation_budget: None,
        }
    }
}

impl<'a, N, E> MatchRules<'a, N, E> {
    pub fn with_vertex_colours(mut self, pattern: &'a [i32], target: &'a [i32]) -> Self {
        self.vertex_colours = Some(ColourPair { pattern, target });
        self
    }

    pub fn with_edge_colours(mut self, pattern: &'a [i32], target: &'a [i32]) -> Self {
        self.edge_colours = Some(ColourPair { pattern, target });
        self
    }

    pub fn with_node_compat(mut self, compat: &'a NodeCompat<N, E>) -> Self {
        self.node_compat = Some(compat);
        self
    }

    pub fn with_edge_compat(mut self, compat: &'a EdgeCompat<N, E>) -> Self {
        self.edge_compat = Some(compat);
        self
    }

    pub fn with_conflict_budget(mut self, budget: u64) -> Self {
        self.conflict_budget = Some(budget);
        self
    }

    pub fn with_propagation_budget(mut self, budget: u64) -> Self {
        self.propagation_budget = Some(budget);
        self
    }
}

impl<N, E> Default for MatchRules<'_, N, E> {
    fn default() -> Self {
        MatchRules::new()
    }
}

impl<N, E> Clone for MatchRules<'_, N, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, E> Copy for MatchRules<'_, N, E> {}

impl<N, E> std::fmt::Debug for MatchRules<'_, N, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchRules")
            .field("vertex_colours", &self.vertex_colours)
            .field("edge_colours", &self.edge_colours)
            .field("node_compat", &self.node_compat.map(|_| ".."))
            .field("edge_compat", &self.edge_compat.map(|_| ".."))
            .field("conflict_budget", &self.conflict_budget)
            .field("propagation_budget", &self.propagation_budget)
            .finish()
    }
}
