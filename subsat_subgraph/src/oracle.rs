use subsat_common::Lit;
use subsat_solver::{Assignment, InferenceHook, Value};

use crate::table::VarTable;

/// Inference hook enforcing that the correspondence matrix stays a partial
/// bijection.
///
/// Whenever a correspondence variable `M[p, t]` becomes true, every other
/// variable in row `p` and column `t` is forced false. Returning these as
/// inferred literals lets the solver unit-propagate the exclusions at the
/// moment they become relevant, instead of carrying the quadratic set of
/// pairwise at-most-one clauses in the database.
///
/// The oracle owns nothing but the matrix shape; the solver hands in the
/// assignment and trail on every call and receives the exclusion list back.
pub(crate) struct BijectionOracle {
    table: VarTable,
}

impl BijectionOracle {
    pub(crate) fn new(table: VarTable) -> Self {
        BijectionOracle { table }
    }
}

impl InferenceHook for BijectionOracle {
    fn on_assign(&self, assigns: &Assignment, trail: &[Lit], inferred: &mut Vec<Lit>) {
        let Some(&newest) = trail.last() else {
            return;
        };
        if newest.is_negated() || !self.table.contains(newest.var()) {
            return;
        }
        debug_assert_eq!(assigns.lit_value(newest), Value::True);

        let decided = self.table.map_lit(newest);
        for target in 0..self.table.target_count() {
            if target != decided.target {
                inferred.push(self.table.lit(decided.pattern, target, true));
            }
        }
        for pattern in 0..self.table.pattern_count() {
            if pattern != decided.pattern {
                inferred.push(self.table.lit(pattern, decided.target, true));
            }
        }
    }
}
