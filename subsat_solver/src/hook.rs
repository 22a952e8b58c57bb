use subsat_common::Lit;

use crate::assignment::Assignment;

/// Decision-time inference callback.
///
/// The solver invokes the hook once for every literal appended to the
/// trail, decisions and propagated units alike, before search continues.
/// The hook receives the current assignment and the trail up to and
/// including the newest entry, and pushes any literals it can force onto
/// `inferred`; the solver unit-propagates them immediately.
///
/// The hook must not attempt to re-enter the solver: it runs synchronously
/// inside the propagation loop and communicates only through `inferred`.
pub trait InferenceHook {
    fn on_assign(&self, assigns: &Assignment, trail: &[Lit], inferred: &mut Vec<Lit>);
}
