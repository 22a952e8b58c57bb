use subsat_common::{ClauseRejected, ClauseSink, Lit, Var};
use tracing::{debug, trace};

use crate::assignment::{Assignment, Value};
use crate::hook::InferenceHook;

/// Result of a [`Solver::solve`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Sat,
    Unsat,
    /// A conflict or propagation budget ran out before the search finished.
    /// Not authoritative: the instance may still be satisfiable or not.
    Unknown,
}

/// Lifetime search counters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub solves: u64,
    pub decisions: u64,
    pub conflicts: u64,
    pub propagations: u64,
}

#[derive(Clone, Copy, Debug)]
struct Branch {
    lit: Lit,
    flipped: bool,
}

/// Incremental SAT engine.
///
/// Clauses are append-only; the clause database is never simplified between
/// solves, so a session can alternate `solve` and `add_clause` freely.
pub struct Solver {
    clauses: Vec<Vec<Lit>>,
    /// Per-literal watch lists; `watches[l.index()]` holds the clauses in
    /// which `l` is one of the two watched literals.
    watches: Vec<Vec<u32>>,
    assigns: Assignment,
    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    branches: Vec<Branch>,
    qhead: usize,
    hook_head: usize,
    ok: bool,
    hook: Option<Box<dyn InferenceHook>>,
    conflict_budget: Option<u64>,
    propagation_budget: Option<u64>,
    stats: Stats,
    model: Vec<bool>,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            clauses: Vec::new(),
            watches: Vec::new(),
            assigns: Assignment::default(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            branches: Vec::new(),
            qhead: 0,
            hook_head: 0,
            ok: true,
            hook: None,
            conflict_budget: None,
            propagation_budget: None,
            stats: Stats::default(),
            model: Vec::new(),
        }
    }

    pub fn new_var(&mut self) -> Var {
        let var = self.assigns.len() as Var;
        self.assigns.grow();
        self.watches.push(Vec::new());
        self.watches.push(Vec::new());
        var
    }

    /// Allocate variables until at least `count` exist.
    pub fn new_vars(&mut self, count: usize) {
        while self.num_vars() < count {
            self.new_var();
        }
    }

    pub fn num_vars(&self) -> usize {
        self.assigns.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Register the inference hook. The engine supports exactly one; a
    /// second registration replaces the first.
    pub fn set_hook(&mut self, hook: Box<dyn InferenceHook>) {
        self.hook = Some(hook);
    }

    /// Bound the number of conflicts a single solve may spend before
    /// returning [`Outcome::Unknown`]. `None` means unbounded.
    pub fn set_conflict_budget(&mut self, budget: Option<u64>) {
        self.conflict_budget = budget;
    }

    /// Bound the number of propagations a single solve may spend before
    /// returning [`Outcome::Unknown`]. `None` means unbounded.
    pub fn set_propagation_budget(&mut self, budget: Option<u64>) {
        self.propagation_budget = budget;
    }

    /// Truth value of `var` in the model of the most recent satisfiable
    /// solve.
    pub fn model_value(&self, var: Var) -> bool {
        self.model[var as usize]
    }

    pub fn model(&self) -> &[bool] {
        &self.model
    }

    /// Add a clause, simplified against the level-0 assignment.
    ///
    /// Returns [`ClauseRejected`] when the clause is unsatisfiable under
    /// the current assignment (or the database already is); the solver is
    /// then in a permanently unsatisfiable state.
    pub fn add_clause(&mut self, lits: &[Lit]) -> Result<(), ClauseRejected> {
        debug_assert_eq!(self.decision_level(), 0);
        if !self.ok {
            return Err(ClauseRejected);
        }

        let mut sorted: Vec<Lit> = lits.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut kept: Vec<Lit> = Vec::with_capacity(sorted.len());
        for &lit in &sorted {
            debug_assert!((lit.var() as usize) < self.num_vars());
            match self.assigns.lit_value(lit) {
                Value::True => return Ok(()),
                Value::False => continue,
                Value::Unassigned => {
                    // Sorted order puts a complementary pair next to each
                    // other; such a clause is a tautology.
                    if kept.last().is_some_and(|p| p.var() == lit.var()) {
                        return Ok(());
                    }
                    kept.push(lit);
                }
            }
        }

        match kept.len() {
            0 => {
                self.ok = false;
                Err(ClauseRejected)
            }
            1 => {
                self.enqueue(kept[0]);
                if self.propagate_fixpoint().is_some() {
                    self.ok = false;
                    return Err(ClauseRejected);
                }
                Ok(())
            }
            _ => {
                let index = self.clauses.len() as u32;
                self.watches[kept[0].index()].push(index);
                self.watches[kept[1].index()].push(index);
                self.clauses.push(kept);
                Ok(())
            }
        }
    }

    /// Budgeted, assumption-aware solve.
    ///
    /// Assumptions are placed as the outermost decisions; search never
    /// backtracks past them. After the call the solver is back at level 0
    /// and more clauses may be added.
    pub fn solve(&mut self, assumptions: &[Lit]) -> Outcome {
        self.stats.solves += 1;
        if !self.ok {
            return Outcome::Unsat;
        }
        debug_assert_eq!(self.decision_level(), 0);

        let conflicts_before = self.stats.conflicts;
        let propagations_before = self.stats.propagations;
        let outcome = self.search(assumptions, conflicts_before, propagations_before);
        self.cancel_until(0);

        debug!(
            ?outcome,
            conflicts = self.stats.conflicts - conflicts_before,
            propagations = self.stats.propagations - propagations_before,
            vars = self.num_vars(),
            clauses = self.clauses.len(),
            "solve finished"
        );
        outcome
    }

    fn search(
        &mut self,
        assumptions: &[Lit],
        conflicts_before: u64,
        propagations_before: u64,
    ) -> Outcome {
        if self.propagate_fixpoint().is_some() {
            self.ok = false;
            return Outcome::Unsat;
        }

        for &assumption in assumptions {
            debug_assert!((assumption.var() as usize) < self.num_vars());
            match self.assigns.lit_value(assumption) {
                Value::True => continue,
                Value::False => return Outcome::Unsat,
                Value::Unassigned => {
                    self.push_level(assumption, true);
                    if self.propagate_fixpoint().is_some() {
                        return Outcome::Unsat;
                    }
                }
            }
        }
        let root_level = self.decision_level();

        loop {
            if self.propagations_exhausted(propagations_before) {
                return Outcome::Unknown;
            }
            let Some(var) = self.next_unassigned() else {
                self.model = self.assigns.snapshot();
                return Outcome::Sat;
            };
            self.push_level(Lit::negative(var), false);

            while self.propagate_fixpoint().is_some() {
                self.stats.conflicts += 1;
                trace!(level = self.decision_level(), "conflict");
                if self.conflicts_exhausted(conflicts_before)
                    || self.propagations_exhausted(propagations_before)
                {
                    return Outcome::Unknown;
                }

                // Chronological backtracking: undo levels until one still
                // has an untried polarity, then flip it.
                loop {
                    if self.decision_level() <= root_level {
                        return Outcome::Unsat;
                    }
                    let branch = *self.branches.last().expect("level without branch");
                    self.cancel_level();
                    if !branch.flipped {
                        self.push_level(!branch.lit, true);
                        break;
                    }
                }
            }
        }
    }

    /// Unit propagation plus hook inference, run to fixpoint.
    ///
    /// Returns `Some(())` on conflict.
    fn propagate_fixpoint(&mut self) -> Option<()> {
        loop {
            if self.propagate_watches().is_some() {
                return Some(());
            }

            if self.hook_head == self.trail.len() {
                return None;
            }
            self.hook_head += 1;
            let mut inferred = Vec::new();
            if let Some(hook) = &self.hook {
                hook.on_assign(&self.assigns, &self.trail[..self.hook_head], &mut inferred);
            }
            for lit in inferred {
                match self.assigns.lit_value(lit) {
                    Value::True => {}
                    Value::False => {
                        self.qhead = self.trail.len();
                        self.hook_head = self.trail.len();
                        return Some(());
                    }
                    Value::Unassigned => self.enqueue(lit),
                }
            }
        }
    }

    /// Standard two-watched-literal propagation. The propagation counter
    /// advances once per trail entry processed.
    fn propagate_watches(&mut self) -> Option<()> {
        while self.qhead < self.trail.len() {
            let propagated = self.trail[self.qhead];
            self.qhead += 1;
            self.stats.propagations += 1;

            let false_lit = !propagated;
            let mut watchers = std::mem::take(&mut self.watches[false_lit.index()]);
            let mut conflict = false;
            let mut i = 0;

            'watchers: while i < watchers.len() {
                let ci = watchers[i] as usize;
                if self.clauses[ci][0] == false_lit {
                    self.clauses[ci].swap(0, 1);
                }
                debug_assert_eq!(self.clauses[ci][1], false_lit);

                let first = self.clauses[ci][0];
                if self.assigns.lit_value(first) == Value::True {
                    i += 1;
                    continue;
                }

                for k in 2..self.clauses[ci].len() {
                    let candidate = self.clauses[ci][k];
                    if self.assigns.lit_value(candidate) != Value::False {
                        self.clauses[ci].swap(1, k);
                        self.watches[candidate.index()].push(watchers[i]);
                        watchers.swap_remove(i);
                        continue 'watchers;
                    }
                }

                if self.assigns.lit_value(first) == Value::False {
                    conflict = true;
                    break;
                }
                self.enqueue(first);
                i += 1;
            }

            self.watches[false_lit.index()] = watchers;
            if conflict {
                self.qhead = self.trail.len();
                self.hook_head = self.trail.len();
                return Some(());
            }
        }
        None
    }

    fn enqueue(&mut self, lit: Lit) {
        debug_assert_eq!(self.assigns.lit_value(lit), Value::Unassigned);
        self.assigns.set(lit.var(), !lit.is_negated());
        self.trail.push(lit);
    }

    fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }

    fn push_level(&mut self, lit: Lit, flipped: bool) {
        self.stats.decisions += 1;
        self.trail_lim.push(self.trail.len());
        self.branches.push(Branch { lit, flipped });
        self.enqueue(lit);
    }

    fn cancel_level(&mut self) {
        let start = self.trail_lim.pop().expect("no level to cancel");
        for &lit in &self.trail[start..] {
            self.assigns.unset(lit.var());
        }
        self.trail.truncate(start);
        self.qhead = start;
        self.hook_head = start;
        self.branches.pop();
    }

    fn cancel_until(&mut self, level: usize) {
        while self.decision_level() > level {
            self.cancel_level();
        }
    }

    fn next_unassigned(&self) -> Option<Var> {
        (0..self.num_vars() as Var).find(|&v| self.assigns.value(v) == Value::Unassigned)
    }

    fn conflicts_exhausted(&self, before: u64) -> bool {
        self.conflict_budget
            .is_some_and(|b| self.stats.conflicts - before > b)
    }

    fn propagations_exhausted(&self, before: u64) -> bool {
        self.propagation_budget
            .is_some_and(|b| self.stats.propagations - before > b)
    }
}

impl ClauseSink for Solver {
    fn fresh_var(&mut self) -> Var {
        self.new_var()
    }

    fn add_clause(&mut self, lits: &[Lit]) -> Result<(), ClauseRejected> {
        Solver::add_clause(self, lits)
    }
}
