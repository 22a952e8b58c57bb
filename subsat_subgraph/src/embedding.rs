use std::fmt;

use petgraph::graph::NodeIndex;

use crate::table::VarTable;

/// One subgraph embedding: a bijection from pattern vertices onto a subset
/// of target vertices, held in both directions.
///
/// `None` entries mean "unmapped": every pattern slot of a produced
/// embedding is `Some`, while target slots outside the image stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Embedding {
    /// Pattern vertex -> target vertex.
    forward: Vec<Option<NodeIndex>>,
    /// Target vertex -> pattern vertex.
    inverse: Vec<Option<NodeIndex>>,
}

/// Exactly one direction of an embedding, as supplied to blocking and
/// verification. The enum replaces a pair of optional maps of which
/// exactly one had to be present.
#[derive(Clone, Copy, Debug)]
pub enum MapView<'a> {
    /// Pattern vertex -> target vertex.
    Forward(&'a [Option<NodeIndex>]),
    /// Target vertex -> pattern vertex.
    Inverse(&'a [Option<NodeIndex>]),
}

impl Embedding {
    /// Read the (unique, by the bijection invariant) true entry of every
    /// matrix row out of a satisfying model.
    pub(crate) fn from_model(table: &VarTable, model: &[bool]) -> Self {
        let mut forward: Vec<Option<NodeIndex>> = vec![None; table.pattern_count()];
        let mut inverse: Vec<Option<NodeIndex>> = vec![None; table.target_count()];

        for pattern in 0..table.pattern_count() {
            for target in 0..table.target_count() {
                if model[table.lit(pattern, target, false).var() as usize] {
                    debug_assert!(forward[pattern].is_none(), "two images in matrix row");
                    debug_assert!(inverse[target].is_none(), "two pattern vertices share a target");
                    forward[pattern] = Some(NodeIndex::new(target));
                    inverse[target] = Some(NodeIndex::new(pattern));
                }
            }
        }

        Embedding { forward, inverse }
    }

    pub fn forward(&self) -> &[Option<NodeIndex>] {
        &self.forward
    }

    pub fn inverse(&self) -> &[Option<NodeIndex>] {
        &self.inverse
    }

    /// Target vertex the pattern vertex maps to.
    pub fn target_of(&self, pattern: NodeIndex) -> Option<NodeIndex> {
        self.forward.get(pattern.index()).copied().flatten()
    }

    /// Pattern vertex mapped onto the target vertex, if any.
    pub fn pattern_of(&self, target: NodeIndex) -> Option<NodeIndex> {
        self.inverse.get(target.index()).copied().flatten()
    }

    /// Mapped pairs in pattern-vertex order.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.forward
            .iter()
            .enumerate()
            .filter_map(|(p, t)| t.map(|t| (NodeIndex::new(p), t)))
    }

    #[contracts::debug_ensures(ret == self.forward.iter().flatten().count())]
    pub fn len(&self) -> usize {
        self.inverse.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_forward(&self) -> MapView<'_> {
        MapView::Forward(&self.forward)
    }

    pub fn as_inverse(&self) -> MapView<'_> {
        MapView::Inverse(&self.inverse)
    }
}

impl fmt::Display for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (p, t)) in self.pairs().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", p.index(), t.index())?;
        }
        write!(f, "}}")
    }
}
