use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use subsat_common::{Formula, Lit};
use subsat_solver::{Outcome, Solver, Stats};
use tracing::debug;

use crate::compat::{edges_compatible, vertices_compatible};
use crate::embedding::{Embedding, MapView};
use crate::error::MatchError;
use crate::oracle::BijectionOracle;
use crate::rules::MatchRules;
use crate::table::VarTable;

/// Result of one solve call on a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A satisfying embedding was found.
    Found(Embedding),
    /// No embedding exists (beyond any already blocked).
    NoMatch,
    /// A solver budget ran out; the question is unanswered.
    Inconclusive,
}

impl MatchOutcome {
    pub fn found(&self) -> bool {
        matches!(self, MatchOutcome::Found(_))
    }

    pub fn into_embedding(self) -> Option<Embedding> {
        match self {
            MatchOutcome::Found(embedding) => Some(embedding),
            _ => None,
        }
    }
}

/// An encoder session: one (pattern, target, rules) triple compiled into
/// one exclusively-owned solver.
///
/// Construction encodes the whole instance and never solves. Clauses only
/// accumulate afterwards (solve results and blocking clauses), so repeated
/// [`solve`](SatMatcher::solve)/[`block`](SatMatcher::block) cycles
/// enumerate distinct embeddings. A construction failure is sticky: every
/// later call returns the stored error without touching the solver.
pub struct SatMatcher<'a, N, E> {
    pattern: &'a DiGraph<N, E>,
    target: &'a DiGraph<N, E>,
    rules: MatchRules<'a, N, E>,
    table: VarTable,
    solver: Solver,
    status: Result<(), MatchError>,
}

impl<'a, N, E> SatMatcher<'a, N, E> {
    /// Encode `pattern`-into-`target` under `rules`.
    ///
    /// Cost is one compatibility check per vertex pair plus one per edge
    /// pair; the dominant cost of the whole pipeline when predicates do
    /// little pruning.
    ///
    /// # Panics
    ///
    /// Panics when a colour slice in `rules` is shorter than the vertex or
    /// edge domain it colours.
    pub fn new(
        pattern: &'a DiGraph<N, E>,
        target: &'a DiGraph<N, E>,
        rules: MatchRules<'a, N, E>,
    ) -> Self {
        if let Some(colours) = &rules.vertex_colours {
            assert!(colours.pattern.len() >= pattern.node_count());
            assert!(colours.target.len() >= target.node_count());
        }
        if let Some(colours) = &rules.edge_colours {
            assert!(colours.pattern.len() >= pattern.edge_count());
            assert!(colours.target.len() >= target.edge_count());
        }

        let table = VarTable::new(pattern.node_count(), target.node_count());
        let mut solver = Solver::new();
        solver.new_vars(table.var_count());
        solver.set_hook(Box::new(BijectionOracle::new(table)));

        let mut matcher = SatMatcher {
            pattern,
            target,
            rules,
            table,
            solver,
            status: Ok(()),
        };
        matcher.status = matcher.encode();
        if let Err(error) = &matcher.status {
            debug!(%error, "construction proved the instance infeasible");
        }
        matcher
    }

    fn encode(&mut self) -> Result<(), MatchError> {
        self.encode_vertices()?;
        self.encode_edges()?;
        debug!(
            pattern_vertices = self.pattern.node_count(),
            target_vertices = self.target.node_count(),
            pattern_edges = self.pattern.edge_count(),
            clauses = self.solver.num_clauses(),
            "session encoded"
        );
        Ok(())
    }

    /// Row clauses: every pattern vertex takes at least one compatible
    /// target vertex; incompatible pairs are pinned false up front so no
    /// later clause can revive them.
    fn encode_vertices(&mut self) -> Result<(), MatchError> {
        for p in self.pattern.node_indices() {
            let mut row: Vec<Lit> = Vec::with_capacity(self.target.node_count());
            for t in self.target.node_indices() {
                if vertices_compatible(self.pattern, self.target, &self.rules, p, t) {
                    row.push(self.table.lit(p.index(), t.index(), false));
                } else {
                    self.solver
                        .add_clause(&[self.table.lit(p.index(), t.index(), true)])?;
                }
            }
            if row.is_empty() {
                return Err(MatchError::NoVertexCandidate { pattern: p.index() });
            }
            self.solver.add_clause(&row)?;
        }
        Ok(())
    }

    /// Edge clauses: for every pattern edge, some compatible target edge
    /// carries both endpoints. The disjunction of endpoint-pair
    /// conjunctions is compiled straight into the solver and its
    /// representative asserted.
    fn encode_edges(&mut self) -> Result<(), MatchError> {
        for pe in self.pattern.edge_indices() {
            let (pf, pt) = self
                .pattern
                .edge_endpoints(pe)
                .expect("edge index from the pattern graph");

            let mut alternatives = Formula::or();
            for te in self.target.edge_indices() {
                let (tf, tt) = self
                    .target
                    .edge_endpoints(te)
                    .expect("edge index from the target graph");

                if !vertices_compatible(self.pattern, self.target, &self.rules, pf, tf)
                    || !vertices_compatible(self.pattern, self.target, &self.rules, pt, tt)
                    || !edges_compatible(self.pattern, self.target, &self.rules, pe, te)
                {
                    continue;
                }

                let mut both = Formula::and();
                both.push(self.table.lit(pf.index(), tf.index(), false));
                both.push(self.table.lit(pt.index(), tt.index(), false));
                alternatives.push(both);
            }

            if alternatives.is_empty() {
                return Err(MatchError::NoEdgeCandidate {
                    pattern_edge: pe.index(),
                });
            }
            let representative = alternatives.export_cnf(&mut self.solver)?;
            self.solver.add_clause(&[representative])?;
        }
        Ok(())
    }

    /// One budgeted solve. Returns the stored construction error, if any,
    /// without touching the solver.
    pub fn solve(&mut self) -> Result<MatchOutcome, MatchError> {
        self.solve_with(&[])
    }

    /// One budgeted solve under assumption literals (see
    /// [`mapping_lit`](SatMatcher::mapping_lit)).
    pub fn solve_with(&mut self, assumptions: &[Lit]) -> Result<MatchOutcome, MatchError> {
        self.status.clone()?;

        self.solver.set_conflict_budget(self.rules.conflict_budget);
        self.solver
            .set_propagation_budget(self.rules.propagation_budget);

        match self.solver.solve(assumptions) {
            Outcome::Sat => Ok(MatchOutcome::Found(Embedding::from_model(
                &self.table,
                self.solver.model(),
            ))),
            Outcome::Unsat => Ok(MatchOutcome::NoMatch),
            Outcome::Unknown => Ok(MatchOutcome::Inconclusive),
        }
    }

    /// Forbid the solver from producing the given total mapping again.
    ///
    /// The blocking clause is the disjunction of the negations of every
    /// mapping literal the view implies. Rejection means the mapping (and
    /// everything else) is already excluded, which ends an enumeration.
    pub fn block(&mut self, map: MapView<'_>) -> Result<(), MatchError> {
        self.status.clone()?;

        let blocking: Vec<Lit> = match map {
            MapView::Forward(forward) => {
                self.expect_len(forward.len(), self.pattern.node_count())?;
                forward
                    .iter()
                    .enumerate()
                    .filter_map(|(p, t)| t.map(|t| self.table.lit(p, t.index(), true)))
                    .collect()
            }
            MapView::Inverse(inverse) => {
                self.expect_len(inverse.len(), self.target.node_count())?;
                inverse
                    .iter()
                    .enumerate()
                    .filter_map(|(t, p)| p.map(|p| self.table.lit(p.index(), t, true)))
                    .collect()
            }
        };

        debug!(clause = %blocking.iter().map(|l| l.to_string()).join(" | "), "blocking mapping");
        self.solver.add_clause(&blocking)?;
        Ok(())
    }

    /// The positive correspondence literal for "pattern vertex `p` maps to
    /// target vertex `t`", for use with
    /// [`solve_with`](SatMatcher::solve_with).
    pub fn mapping_lit(&self, p: NodeIndex, t: NodeIndex) -> Lit {
        self.table.lit(p.index(), t.index(), false)
    }

    /// The sticky construction status of this session.
    pub fn status(&self) -> Result<(), &MatchError> {
        self.status.as_ref().map(|_| ())
    }

    /// Counters of the underlying solver.
    pub fn solver_stats(&self) -> Stats {
        self.solver.stats()
    }

    pub(crate) fn pattern(&self) -> &'a DiGraph<N, E> {
        self.pattern
    }

    pub(crate) fn target(&self) -> &'a DiGraph<N, E> {
        self.target
    }

    pub(crate) fn rules(&self) -> &MatchRules<'a, N, E> {
        &self.rules
    }

    fn expect_len(&self, got: usize, expected: usize) -> Result<(), MatchError> {
        if got == expected {
            Ok(())
        } else {
            Err(MatchError::MapLength { expected, got })
        }
    }
}
