use tracing::trace;

use crate::embedding::Embedding;
use crate::matcher::{MatchOutcome, SatMatcher};
use crate::verify::check_mapping;

/// Lazy stream of distinct embeddings.
///
/// Each `next` runs one solve on the owned session and, on success, blocks
/// the found mapping before handing it out, so no mapping is ever yielded
/// twice. The walk is finite and not restartable; once it ends it stays
/// ended. When a solver budget cuts the walk short the remaining embeddings
/// are simply never produced — check [`is_exhaustive`](Self::is_exhaustive)
/// to tell the two endings apart.
pub struct Embeddings<'a, N, E> {
    matcher: SatMatcher<'a, N, E>,
    finished: bool,
    conclusive: bool,
}

impl<'a, N, E> Embeddings<'a, N, E> {
    pub(crate) fn new(matcher: SatMatcher<'a, N, E>) -> Self {
        Embeddings {
            matcher,
            finished: false,
            conclusive: true,
        }
    }

    /// False when the walk ended because a budget ran out rather than
    /// because every embedding was produced.
    pub fn is_exhaustive(&self) -> bool {
        self.conclusive
    }
}

impl<N, E> Iterator for Embeddings<'_, N, E> {
    type Item = Embedding;

    fn next(&mut self) -> Option<Embedding> {
        if self.finished {
            return None;
        }

        match self.matcher.solve() {
            Ok(MatchOutcome::Found(embedding)) => {
                debug_assert!(
                    check_mapping(
                        self.matcher.pattern(),
                        self.matcher.target(),
                        self.matcher.rules(),
                        embedding.as_forward(),
                    ),
                    "solver produced a mapping the verifier rejects: {embedding}"
                );
                trace!(%embedding, "found embedding");

                if self.matcher.block(embedding.as_forward()).is_err() {
                    // Everything is excluded now; the next solve could only
                    // repeat this mapping.
                    self.finished = true;
                }
                Some(embedding)
            }
            Ok(MatchOutcome::NoMatch) => {
                self.finished = true;
                None
            }
            Ok(MatchOutcome::Inconclusive) => {
                self.finished = true;
                self.conclusive = false;
                None
            }
            Err(_) => {
                self.finished = true;
                None
            }
        }
    }
}
