//! Frequency: penalizes sliding windows with no assignment of a target
//! shift type, i.e. workers going too long without working that shift.

use shiftsolve_core::adapter::{Lit, SolverAdapter};
use shiftsolve_core::domain::ConstraintSpec;
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState, ViolationKind};

const DEFAULT_MAX_PERIODS_BETWEEN: u32 = 4;

pub struct FrequencyConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> FrequencyConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        FrequencyConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

impl<A: SolverAdapter> Constraint<A> for FrequencyConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "frequency"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }

        let max_periods_between = self
            .state
            .spec
            .get_param("max_periods_between")
            .and_then(|p| p.as_positive_int())
            .unwrap_or(DEFAULT_MAX_PERIODS_BETWEEN);
        let target_ids = self.state.spec.get_param("shift_types").and_then(|p| p.as_str_list());

        let window_size = max_periods_between as usize + 1;
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

                    let has_assignment = adapter.new_bool_var(&format!("freq_has_{}_{}_w{}", worker.id, shift_id, window_start));
                    let terms: Vec<(A::Var, i64)> = window_assignments.iter().map(|&v| (v, 1)).collect();
                    adapter.add_ge_reified(&terms, 1, Lit::pos(has_assignment));
                    adapter.add_eq_reified(&terms, 0, Lit::neg(has_assignment));

                    let violation_name = format!("freq_viol_{}_{}_w{}", worker.id, shift_id, window_start);
                    let violation_var = adapter.new_bool_var(&violation_name);
                    adapter.add_eq(&[(violation_var, 1), (has_assignment, 1)], 1);

                    self.state.bump(3);
                    self.state.record_violation(violation_name, violation_var, ViolationKind::Violation);
                    viol_vars.push(violation_var);
                }
            }
        }

        if !viol_vars.is_empty() {
            let total_var = adapter.new_int_var(0, viol_vars.len() as i64, "frequency_total_violations");
            let terms: Vec<(A::Var, i64)> = viol_vars.iter().map(|&v| (v, 1)).collect();
            let mut eq_terms = terms;
            eq_terms.push((total_var, -1));
            adapter.add_eq(&eq_terms, 0);
            self.state.record_violation("total", total_var, ViolationKind::Auxiliary);
        }

        Ok(())
    }
}
