use subsat_common::{Lit, Var};

/// A correspondence literal in vertex coordinates: pattern vertex
/// `pattern` mapped (or not) to target vertex `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MapLit {
    pub pattern: usize,
    pub target: usize,
    pub negated: bool,
}

/// Bijective translation between correspondence literals and solver
/// literals over the `pattern_count x target_count` variable matrix.
///
/// Variable `pattern * target_count + target` is true iff the pattern
/// vertex maps to the target vertex. The two counts are frozen for the
/// lifetime of the session; indices outside them are programmer errors.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VarTable {
    pattern_count: usize,
    target_count: usize,
}

impl VarTable {
    pub(crate) fn new(pattern_count: usize, target_count: usize) -> Self {
        VarTable {
            pattern_count,
            target_count,
        }
    }

    pub(crate) fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub(crate) fn target_count(&self) -> usize {
        self.target_count
    }

    /// Size of the correspondence variable space.
    pub(crate) fn var_count(&self) -> usize {
        self.pattern_count * self.target_count
    }

    /// Whether `var` is a correspondence variable (as opposed to an
    /// auxiliary variable introduced by CNF compilation).
    pub(crate) fn contains(&self, var: Var) -> bool {
        (var as usize) < self.var_count()
    }

    #[contracts::debug_requires(pattern < self.pattern_count, "pattern vertex out of range")]
    #[contracts::debug_requires(target < self.target_count, "target vertex out of range")]
    pub(crate) fn lit(&self, pattern: usize, target: usize, negated: bool) -> Lit {
        Lit::new((pattern * self.target_count + target) as Var, negated)
    }

    #[contracts::debug_requires(self.contains(lit.var()), "not a correspondence variable")]
    pub(crate) fn map_lit(&self, lit: Lit) -> MapLit {
        let var = lit.var() as usize;
        MapLit {
            pattern: var / self.target_count,
            target: var % self.target_count,
            negated: lit.is_negated(),
        }
    }
}
