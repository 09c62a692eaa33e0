//! Coverage: each (period, shift-type) gets exactly `workers_required` assignees.

use shiftsolve_core::adapter::SolverAdapter;
use shiftsolve_core::domain::ConstraintSpec;
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState};

pub struct CoverageConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> CoverageConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        CoverageConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

impl<A: SolverAdapter> Constraint<A> for CoverageConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "coverage"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }
        for period in 0..ctx.num_periods {
            for shift_type in ctx.shift_types {
                let terms: Vec<(A::Var, i64)> = ctx
                    .workers
                    .iter()
                    .map(|w| registry.assignment_var(&w.id, period, &shift_type.id).map(|v| (v, 1)))
                    .collect::<Result<_>>()?;
                adapter.add_eq(&terms, shift_type.workers_required as i64);
                self.state.bump(1);
            }
        }
        Ok(())
    }
}
