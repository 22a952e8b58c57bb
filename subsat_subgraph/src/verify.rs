use petgraph::graph::{DiGraph, NodeIndex};

use crate::compat::{edges_compatible, vertices_compatible};
use crate::embedding::MapView;
use crate::rules::MatchRules;

/// Re-validate a claimed mapping against the original compatibility rules,
/// independently of the encoding that produced it.
///
/// The mapping must be total over the pattern vertices, injective into the
/// target vertices, colour/predicate compatible on every mapped vertex,
/// and must carry every pattern edge onto an existing compatible target
/// edge. No side effects; the search never consults this.
pub(crate) fn check_mapping<N, E>(
    pattern: &DiGraph<N, E>,
    target: &DiGraph<N, E>,
    rules: &MatchRules<'_, N, E>,
    map: MapView<'_>,
) -> bool {
    let Some(forward) = derive_forward(pattern, target, map) else {
        return false;
    };

    // Totality, injectivity, and per-vertex compatibility.
    let mut seen = vec![false; target.node_count()];
    for (p, image) in forward.iter().enumerate() {
        let Some(t) = *image else {
            return false;
        };
        if t.index() >= target.node_count() || seen[t.index()] {
            return false;
        }
        seen[t.index()] = true;

        if !vertices_compatible(pattern, target, rules, NodeIndex::new(p), t) {
            return false;
        }
    }

    // Every pattern edge must land on a compatible target edge.
    for pe in pattern.edge_indices() {
        let (pf, pt) = pattern.edge_endpoints(pe).expect("pattern edge");
        let (tf, tt) = (forward[pf.index()].unwrap(), forward[pt.index()].unwrap());

        let Some(te) = target.find_edge(tf, tt) else {
            return false;
        };
        if !edges_compatible(pattern, target, rules, pe, te) {
            return false;
        }
    }

    true
}

/// Reconstruct the total pattern -> target map from either view. `None`
/// when the view has the wrong length or (for an inverse view) two target
/// vertices claim the same pattern vertex.
fn derive_forward<N, E>(
    pattern: &DiGraph<N, E>,
    target: &DiGraph<N, E>,
    map: MapView<'_>,
) -> Option<Vec<Option<NodeIndex>>> {
    match map {
        MapView::Forward(forward) => {
            (forward.len() == pattern.node_count()).then(|| forward.to_vec())
        }
        MapView::Inverse(inverse) => {
            if inverse.len() != target.node_count() {
                return None;
            }
            let mut forward: Vec<Option<NodeIndex>> = vec![None; pattern.node_count()];
            for (t, slot) in inverse.iter().enumerate() {
                if let Some(p) = *slot {
                    if p.index() >= pattern.node_count() || forward[p.index()].is_some() {
                        return None;
                    }
                    forward[p.index()] = Some(NodeIndex::new(t));
                }
            }
            Some(forward)
        }
    }
}
