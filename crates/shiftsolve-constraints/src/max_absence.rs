//! Max-absence: identical structure to frequency, with a longer default
//! window — penalizes a worker going too long without any assignment of
//! a target shift type.

use shiftsolve_core::adapter::{Lit, SolverAdapter};
use shiftsolve_core::domain::ConstraintSpec;
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState, ViolationKind};

const DEFAULT_MAX_PERIODS_ABSENT: u32 = 8;

pub struct MaxAbsenceConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> MaxAbsenceConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        MaxAbsenceConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

impl<A: SolverAdapter> Constraint<A> for MaxAbsenceConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "max_absence"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }

        let max_periods_absent = self
            .state
            .spec
            .get_param("max_periods_absent")
            .and_then(|p| p.as_positive_int())
            .unwrap_or(DEFAULT_MAX_PERIODS_ABSENT);
        let target_ids = self.state.spec.get_param("shift_types").and_then(|p| p.as_str_list());

        let window_size = max_periods_absent as usize + 1;
        if window_size > ctx.num_periods {
            return Ok(());
        }

        let filtered: Vec<&str> = match target_ids {
            Some(ids) => ctx.shift_types.iter().map(|s| s.id.as_str()).filter(|id| ids.iter().any(|t| t == id)).collect(),
            None => ctx.shift_types.iter().map(|s| s.id.as_str()).collect(),
        };
        if filtered.is_empty() {
            return Ok(());
        }

        let mut viol_vars = Vec::new();

        for worker in ctx.workers {
            for &shift_id in &filtered {
                for window_start in 0..=(ctx.num_periods - window_size) {
                    let window_assignments: Vec<A::Var> = (window_start..window_start + window_size)
                        .filter_map(|p| registry.assignment_var(&worker.id, p, shift_id).ok())
                        .collect();
                    if window_assignments.is_empty() {
                        continue;
                    }

                    let has_assignment = adapter.new_bool_var(&format!("abs_has_{}_{}_w{}", worker.id, shift_id, window_start));
                    let terms: Vec<(A::Var, i64)> = window_assignments.iter().map(|&v| (v, 1)).collect();
                    adapter.add_ge_reified(&terms, 1, Lit::pos(has_assignment));
                    adapter.add_eq_reified(&terms, 0, Lit::neg(has_assignment));

                    let violation_name = format!("abs_viol_{}_{}_w{}", worker.id, shift_id, window_start);
                    let violation_var = adapter.new_bool_var(&violation_name);
                    adapter.add_eq(&[(violation_var, 1), (has_assignment, 1)], 1);

                    self.state.bump(3);
                    self.state.record_violation(violation_name, violation_var, ViolationKind::Violation);
                    viol_vars.push(violation_var);
                }
            }
        }

        if !viol_vars.is_empty() {
            let total_var = adapter.new_int_var(0, viol_vars.len() as i64, "max_absence_total_violations");
            let terms: Vec<(A::Var, i64)> = viol_vars.iter().map(|&v| (v, 1)).collect();
            let mut eq_terms = terms;
            eq_terms.push((total_var, -1));
            adapter.add_eq(&eq_terms, 0);
            self.state.record_violation("total", total_var, ViolationKind::Auxiliary);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn default_window_is_nine_periods() {
        let workers = workers(&["W1"]);
        let shifts = vec![shift("day", 1, false)];
        let mut adapter = RecordingAdapter::default();
        let registry = VariableRegistry::build(&mut adapter, &workers, &shifts, 9);
        let ctx = ctx(&workers, &shifts, 9);

        let mut c: MaxAbsenceConstraint<DummyVar> = MaxAbsenceConstraint::new(ConstraintSpec::default());
        Constraint::<RecordingAdapter>::apply(&mut c, &mut adapter, &registry, &ctx).unwrap();

        let viol_count = c.state.violations().iter().filter(|(k, _)| k.starts_with("abs_viol_")).count();
        assert_eq!(viol_count, 1);
    }

    #[test]
    fn shorter_than_window_is_noop() {
        let workers = workers(&["W1"]);
        let shifts = vec![shift("day", 1, false)];
        let mut adapter = RecordingAdapter::default();
        let registry = VariableRegistry::build(&mut adapter, &workers, &shifts, 4);
        let ctx = ctx(&workers, &shifts, 4);

        let mut c: MaxAbsenceConstraint<DummyVar> = MaxAbsenceConstraint::new(ConstraintSpec::default());
        Constraint::<RecordingAdapter>::apply(&mut c, &mut adapter, &registry, &ctx).unwrap();
        assert!(c.state.violations().is_empty());
    }
}
