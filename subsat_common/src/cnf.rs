use thiserror::Error;

use crate::clause::Clause;
use crate::formula::Formula;
use crate::lit::{Lit, Var};

/// The sink refused a clause because it is unsatisfiable under its current
/// assignment. Callers treat this as "encoding infeasible", not as a crash.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("clause rejected: unsatisfiable under the current assignment")]
pub struct ClauseRejected;

/// Destination for compiled CNF clauses.
///
/// Implemented by the in-memory [`CnfBuffer`] (which never rejects) and by
/// live solvers (which reject clauses that are immediately contradictory).
pub trait ClauseSink {
    /// Allocate a variable unused by any clause seen so far.
    fn fresh_var(&mut self) -> Var;

    fn add_clause(&mut self, lits: &[Lit]) -> Result<(), ClauseRejected>;
}

/// A [`ClauseSink`] that accumulates clauses into a plain vector.
#[derive(Clone, Debug, Default)]
pub struct CnfBuffer {
    clauses: Vec<Clause>,
    next_var: Var,
}

impl CnfBuffer {
    /// Buffer whose fresh variables start at `first_fresh`.
    pub fn starting_at(first_fresh: Var) -> Self {
        CnfBuffer {
            clauses: Vec::new(),
            next_var: first_fresh,
        }
    }

    /// Buffer whose fresh variables do not collide with any variable of
    /// `formula`.
    pub fn for_formula(formula: &Formula) -> Self {
        Self::starting_at(formula.max_var().map_or(0, |v| v + 1))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// The accumulated clauses as a CNF-shaped formula: a conjunction of
    /// disjunctions.
    pub fn into_formula(self) -> Formula {
        let mut cnf = Formula::and();
        for clause in self.clauses {
            let mut or = Formula::or();
            for &lit in clause.lits() {
                or.push(lit);
            }
            cnf.push(or);
        }
        cnf
    }
}

impl ClauseSink for CnfBuffer {
    fn fresh_var(&mut self) -> Var {
        let var = self.next_var;
        self.next_var += 1;
        var
    }

    fn add_clause(&mut self, lits: &[Lit]) -> Result<(), ClauseRejected> {
        self.clauses.push(lits.iter().copied().collect());
        Ok(())
    }
}

impl Formula {
    /// Bottom-up Tseitin transformation.
    ///
    /// Every `And`/`Or` node receives a fresh representative variable and
    /// clauses enforcing `representative ⇔ node`; the literal returned
    /// represents the whole tree and is equisatisfiable with it. The caller
    /// decides what to do with the representative (typically assert it with
    /// a unit clause).
    ///
    /// Fails only when the sink rejects a clause, which a live solver does
    /// when the clause is contradictory at its current assignment level.
    pub fn export_cnf(&self, sink: &mut dyn ClauseSink) -> Result<Lit, ClauseRejected> {
        match self {
            Formula::Lit(lit) => Ok(*lit),
            Formula::And(children) => {
                let reps = export_children(children, sink)?;
                let rep = Lit::positive(sink.fresh_var());
                // rep -> r_i for each child, and (r_1 & .. & r_n) -> rep.
                let mut long = Vec::with_capacity(reps.len() + 1);
                long.push(rep);
                for &r in &reps {
                    sink.add_clause(&[!rep, r])?;
                    long.push(!r);
                }
                sink.add_clause(&long)?;
                Ok(rep)
            }
            Formula::Or(children) => {
                let reps = export_children(children, sink)?;
                let rep = Lit::positive(sink.fresh_var());
                // r_i -> rep for each child, and rep -> (r_1 | .. | r_n).
                let mut long = Vec::with_capacity(reps.len() + 1);
                long.push(!rep);
                for &r in &reps {
                    sink.add_clause(&[rep, !r])?;
                    long.push(r);
                }
                sink.add_clause(&long)?;
                Ok(rep)
            }
        }
    }
}

fn export_children(
    children: &[Formula],
    sink: &mut dyn ClauseSink,
) -> Result<Vec<Lit>, ClauseRejected> {
    children.iter().map(|c| c.export_cnf(sink)).collect()
}
