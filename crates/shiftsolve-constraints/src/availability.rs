//! Availability: Unavailable records zero out assignment variables on every
//! period they overlap.

use shiftsolve_core::adapter::SolverAdapter;
use shiftsolve_core::domain::{AvailabilityKind, ConstraintSpec};
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState};

pub struct AvailabilityConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> AvailabilityConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        AvailabilityConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

fn periods_overlap(avail_start: chrono::NaiveDate, avail_end: chrono::NaiveDate, period_start: chrono::NaiveDate, period_end: chrono::NaiveDate) -> bool {
    avail_start <= period_end && avail_end >= period_start
}

impl<A: SolverAdapter> Constraint<A> for AvailabilityConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "availability"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }
        let valid_worker_ids: std::collections::HashSet<&str> = ctx.workers.iter().map(|w| w.id.as_str()).collect();

        for availability in ctx.availabilities {
            if !valid_worker_ids.contains(availability.worker_id.as_str()) {
                continue;
            }
            if availability.kind != AvailabilityKind::Unavailable {
                continue;
            }
            for period in 0..ctx.num_periods {
                let (period_start, period_end) = ctx.period_dates[period];
                if !periods_overlap(availability.start, availability.end, period_start, period_end) {
                    continue;
                }
                match &availability.shift_type_id {
                    Some(shift_id) => {
                        let var = registry.assignment_var(&availability.worker_id, period, shift_id)?;
                        adapter.add_eq(&[(var, 1)], 0);
                        self.state.bump(1);
                    }
                    None => {
                        for shift_type in ctx.shift_types {
                            let var = registry.assignment_var(&availability.worker_id, period, &shift_type.id)?;
                            adapter.add_eq(&[(var, 1)], 0);
                            self.state.bump(1);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
