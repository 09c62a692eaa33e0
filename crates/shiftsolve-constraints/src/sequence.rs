//! Sequence: penalizes a worker being assigned the same category in two
//! consecutive periods.

use std::collections::BTreeMap;

use shiftsolve_core::adapter::{Lit, SolverAdapter};
use shiftsolve_core::domain::ConstraintSpec;
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState, ViolationKind};

pub struct SequenceConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> SequenceConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        SequenceConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

impl<A: SolverAdapter> Constraint<A> for SequenceConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "sequence"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }
        if ctx.num_periods < 2 {
            return Ok(());
        }

        let target_categories = self.state.spec.get_param("categories").and_then(|p| p.as_str_list());

        let mut shifts_by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for st in ctx.shift_types {
            if target_categories.map(|cats| cats.iter().any(|c| c == &st.category)).unwrap_or(true) {
                shifts_by_category.entry(st.category.as_str()).or_default().push(st.id.as_str());
            }
        }
        if shifts_by_category.is_empty() {
            return Ok(());
        }

        let mut viol_vars = Vec::new();

        for worker in ctx.workers {
            for (category, shift_ids) in &shifts_by_category {
                for period in 0..ctx.num_periods - 1 {
                    let next_period = period + 1;
                    let current_vars: Vec<A::Var> = shift_ids.iter().filter_map(|&s| registry.assignment_var(&worker.id, period, s).ok()).collect();
                    let next_vars: Vec<A::Var> = shift_ids.iter().filter_map(|&s| registry.assignment_var(&worker.id, next_period, s).ok()).collect();
                    if current_vars.is_empty() || next_vars.is_empty() {
                        continue;
                    }

                    let assigned_current = adapter.new_bool_var(&format!("seq_curr_{}_{}_p{}", worker.id, category, period));
                    let current_terms: Vec<(A::Var, i64)> = current_vars.iter().map(|&v| (v, 1)).collect();
                    adapter.add_ge_reified(&current_terms, 1, Lit::pos(assigned_current));
                    adapter.add_eq_reified(&current_terms, 0, Lit::neg(assigned_current));

                    let assigned_next = adapter.new_bool_var(&format!("seq_next_{}_{}_p{}", worker.id, category, next_period));
                    let next_terms: Vec<(A::Var, i64)> = next_vars.iter().map(|&v| (v, 1)).collect();
                    adapter.add_ge_reified(&next_terms, 1, Lit::pos(assigned_next));
                    adapter.add_eq_reified(&next_terms, 0, Lit::neg(assigned_next));

                    let violation_name = format!("seq_viol_{}_{}_p{}", worker.id, category, period);
                    let violation_var = adapter.new_bool_var(&violation_name);
                    adapter.add_bool_and_reified(&[Lit::pos(assigned_current), Lit::pos(assigned_next)], Lit::pos(violation_var));
                    adapter.add_bool_or_reified(&[Lit::neg(assigned_current), Lit::neg(assigned_next)], Lit::neg(violation_var));

                    self.state.bump(6);
                    self.state.record_violation(violation_name, violation_var, ViolationKind::Violation);
                    viol_vars.push(violation_var);
                }
            }
        }

        if !viol_vars.is_empty() {
            let total_var = adapter.new_int_var(0, viol_vars.len() as i64, "sequence_total_violations");
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
    fn single_period_is_noop() {
        let workers = workers(&["W1"]);
        let shifts = vec![shift("day", 1, false)];
        let mut adapter = RecordingAdapter::default();
        let registry = VariableRegistry::build(&mut adapter, &workers, &shifts, 1);
        let ctx = ctx(&workers, &shifts, 1);

        let mut c: SequenceConstraint<DummyVar> = SequenceConstraint::new(ConstraintSpec::default());
        Constraint::<RecordingAdapter>::apply(&mut c, &mut adapter, &registry, &ctx).unwrap();
        assert!(c.state.violations().is_empty());
    }

    #[test]
    fn emits_one_violation_per_adjacent_pair() {
        let workers = workers(&["W1"]);
        let shifts = vec![shift("day", 1, false)];
        let mut adapter = RecordingAdapter::default();
        let registry = VariableRegistry::build(&mut adapter, &workers, &shifts, 4);
        let ctx = ctx(&workers, &shifts, 4);

        let mut c: SequenceConstraint<DummyVar> = SequenceConstraint::new(ConstraintSpec::default());
        Constraint::<RecordingAdapter>::apply(&mut c, &mut adapter, &registry, &ctx).unwrap();

        let viol_count = c.state.violations().iter().filter(|(k, _)| k.starts_with("seq_viol_")).count();
        assert_eq!(viol_count, 3);
        assert_eq!(adapter.bool_and_reified.len(), 3);
        assert_eq!(adapter.bool_or_reified.len(), 3);
    }
}
