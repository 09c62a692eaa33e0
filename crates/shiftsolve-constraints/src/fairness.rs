//! Fairness: minimizes the spread of undesirable-shift load across workers.

use std::collections::BTreeSet;

use shiftsolve_core::adapter::SolverAdapter;
use shiftsolve_core::domain::ConstraintSpec;
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

use crate::base::{Constraint, ConstraintContext, ConstraintState, ViolationKind};

pub struct FairnessConstraint<V> {
    state: ConstraintState<V>,
}

impl<V: Copy> FairnessConstraint<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        FairnessConstraint {
            state: ConstraintState::new(spec),
        }
    }
}

impl<A: SolverAdapter> Constraint<A> for FairnessConstraint<A::Var> {
    fn id(&self) -> &'static str {
        "fairness"
    }

    fn state(&self) -> &ConstraintState<A::Var> {
        &self.state
    }

    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()> {
        if !self.state.is_enabled() {
            return Ok(());
        }
        if ctx.workers.len() < 2 {
            return Ok(());
        }

        let categories = self.state.spec.get_param("categories").and_then(|p| p.as_str_list());

        let undesirable_shift_ids: BTreeSet<&str> = match categories {
            Some(cats) => ctx
                .shift_types
                .iter()
                .filter(|st| cats.iter().any(|c| c == &st.category))
                .map(|st| st.id.as_str())
                .collect(),
            None => ctx.shift_types.iter().filter(|st| st.is_undesirable).map(|st| st.id.as_str()).collect(),
        };

        if undesirable_shift_ids.is_empty() {
            return Ok(());
        }

        let mut worker_totals: Vec<A::Var> = Vec::new();

        if categories.is_some() {
            for worker in ctx.workers {
                let terms: Vec<(A::Var, i64)> = (0..ctx.num_periods)
                    .flat_map(|p| undesirable_shift_ids.iter().map(move |s| (p, *s)))
                    .filter_map(|(p, s)| registry.assignment_var(&worker.id, p, s).ok().map(|v| (v, 1)))
                    .collect();
                if terms.is_empty() {
                    continue;
                }
                let total_var = adapter.new_int_var(0, terms.len() as i64, &format!("fairness_total_{}", worker.id));
                let mut eq_terms = terms;
                eq_terms.push((total_var, -1));
                adapter.add_eq(&eq_terms, 0);
                self.state.bump(1);
                worker_totals.push(total_var);
            }
        } else {
            for worker in ctx.workers {
                if let Ok(total_var) = registry.undesirable_total_var(&worker.id) {
                    worker_totals.push(total_var);
                }
            }
        }

        if worker_totals.len() < 2 {
            return Ok(());
        }

        let max_possible = ctx.num_periods as i64 * undesirable_shift_ids.len() as i64;

        let max_undesirable = adapter.new_int_var(0, max_possible, "fairness_max_undesirable");
        for &total in &worker_totals {
            adapter.add_ge(&[(max_undesirable, 1), (total, -1)], 0);
        }
        adapter.add_max_equality(max_undesirable, &worker_totals);
        self.state.bump(worker_totals.len() + 1);

        let min_undesirable = adapter.new_int_var(0, max_possible, "fairness_min_undesirable");
        for &total in &worker_totals {
            adapter.add_ge(&[(total, 1), (min_undesirable, -1)], 0);
        }
        adapter.add_min_equality(min_undesirable, &worker_totals);
        self.state.bump(worker_totals.len() + 1);

        let spread = adapter.new_int_var(0, max_possible, "fairness_spread");
        adapter.add_eq(&[(spread, 1), (max_undesirable, -1), (min_undesirable, 1)], 0);
        self.state.bump(1);

        self.state.record_violation("spread", spread, ViolationKind::ObjectiveTarget);
        self.state.record_violation("max_undesirable", max_undesirable, ViolationKind::Auxiliary);
        self.state.record_violation("min_undesirable", min_undesirable, ViolationKind::Auxiliary);

        Ok(())
    }
}
