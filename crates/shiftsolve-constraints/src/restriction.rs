//! Restriction: a worker may never be assigned a shift type it restricts.

use std::collections::HashSet;

use shiftsolve_core::adapter::SolverAdapter;
use shiftsolve_core::domain::ConstraintSpec;
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState};

pub struct RestrictionConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> RestrictionConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        RestrictionConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

impl<A: SolverAdapter> Constraint<A> for RestrictionConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "restriction"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }
        let valid_shift_ids: HashSet<&str> = ctx.shift_types.iter().map(|s| s.id.as_str()).collect();

        for worker in ctx.workers {
            for restricted_id in worker.restricted() {
                if !valid_shift_ids.contains(restricted_id.as_str()) {
                    continue;
                }
                for period in 0..ctx.num_periods {
                    let var = registry.assignment_var(&worker.id, period, restricted_id)?;
                    adapter.add_eq(&[(var, 1)], 0);
                    self.state.bump(1);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn blocks_restricted_shift_every_period() {
        let workers = vec![worker_with_restriction("W1", &["night"])];
        let shifts = vec![shift("day", 1, false), shift("night", 1, false)];
        let mut adapter = RecordingAdapter::default();
        let registry = VariableRegistry::build(&mut adapter, &workers, &shifts, 3);
        let ctx = ctx(&workers, &shifts, 3);

        let baseline = adapter.eqs.len();
        let mut c: RestrictionConstraint<DummyVar> = RestrictionConstraint::new(ConstraintSpec::default());
        Constraint::<RecordingAdapter>::apply(&mut c, &mut adapter, &registry, &ctx).unwrap();

        let added = &adapter.eqs[baseline..];
        assert_eq!(added.len(), 3);
        for (terms, rhs) in added {
            assert_eq!(terms.len(), 1);
            assert_eq!(*rhs, 0);
        }
    }

    #[test]
    fn ignores_unknown_restricted_shift_id() {
        let workers = vec![worker_with_restriction("W1", &["doesnotexist"])];
        let shifts = vec![shift("day", 1, false)];
        let mut adapter = RecordingAdapter::default();
        let registry = VariableRegistry::build(&mut adapter, &workers, &shifts, 2);
        let ctx = ctx(&workers, &shifts, 2);
        let baseline = adapter.eqs.len();

        let mut c: RestrictionConstraint<DummyVar> = RestrictionConstraint::new(ConstraintSpec::default());
        Constraint::<RecordingAdapter>::apply(&mut c, &mut adapter, &registry, &ctx).unwrap();
        assert_eq!(adapter.eqs.len(), baseline);
    }
}
