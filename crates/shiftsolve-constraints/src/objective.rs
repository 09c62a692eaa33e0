//! Compiles the weighted-sum minimization objective from every applied
//! soft constraint's violation variables (§4.4).

use std::collections::BTreeMap;

use shiftsolve_core::adapter::SolverAdapter;

use crate::base::{Constraint, ViolationKind};

/// One term contributed to the objective by a single violation variable.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveTerm<V> {
    pub constraint_id: &'static str,
    pub variable: V,
    pub base_weight: u32,
    pub priority_multiplier: u32,
}

impl<V> ObjectiveTerm<V> {
    pub fn effective_weight(&self) -> i64 {
        self.base_weight as i64 * self.priority_multiplier as i64
    }
}

#[derive(Debug, Default)]
pub struct ObjectiveCompiler<V> {
    terms: Vec<ObjectiveTerm<V>>,
}

impl<V: Copy> ObjectiveCompiler<V> {
    pub fn new() -> Self {
        ObjectiveCompiler { terms: Vec::new() }
    }

    /// Walks `constraints` in order, collecting terms from every soft
    /// constraint's non-Auxiliary violation variables, then installs the
    /// minimization objective on `adapter` if any terms were collected.
    pub fn compile<A: SolverAdapter<Var = V>>(&mut self, adapter: &mut A, constraints: &[Box<dyn Constraint<A>>]) {
        self.terms.clear();

        for constraint in constraints {
            if constraint.is_hard() {
                continue;
            }
            let base_weight = constraint.weight();
            let state = constraint.state();

            for (name, (var, kind)) in state.violations() {
                match kind {
                    ViolationKind::Auxiliary => continue,
                    ViolationKind::ObjectiveTarget => {
                        self.terms.push(ObjectiveTerm {
                            constraint_id: constraint.id(),
                            variable: *var,
                            base_weight,
                            priority_multiplier: 1,
                        });
                    }
                    ViolationKind::Violation => {
                        let priority = state.priorities().get(name).copied().unwrap_or_else(|| extract_priority(name));
                        self.terms.push(ObjectiveTerm {
                            constraint_id: constraint.id(),
                            variable: *var,
                            base_weight,
                            priority_multiplier: priority,
                        });
                    }
                }
            }
        }

        if self.terms.is_empty() {
            return;
        }

        let objective: Vec<(V, i64)> = self.terms.iter().map(|t| (t.variable, t.effective_weight())).collect();
        adapter.minimize(&objective);
    }

    pub fn breakdown_by_constraint(&self) -> BTreeMap<&'static str, Vec<ObjectiveTerm<V>>> {
        let mut out: BTreeMap<&'static str, Vec<ObjectiveTerm<V>>> = BTreeMap::new();
        for term in &self.terms {
            out.entry(term.constraint_id).or_default().push(*term);
        }
        out
    }

    pub fn total_weight_by_constraint(&self) -> BTreeMap<&'static str, i64> {
        let mut out: BTreeMap<&'static str, i64> = BTreeMap::new();
        for term in &self.terms {
            *out.entry(term.constraint_id).or_insert(0) += term.effective_weight();
        }
        out
    }

    pub fn terms(&self) -> &[ObjectiveTerm<V>] {
        &self.terms
    }
}

/// Legacy compatibility shim: a trailing `_prioN` suffix on a violation
/// variable's name sets its priority multiplier when no explicit entry
/// exists in the constraint's `priorities()` map.
fn extract_priority(name: &str) -> u32 {
    if let Some(idx) = name.rfind("_prio") {
        let digits = &name[idx + 5..];
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = digits.parse() {
                return n;
            }
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trailing_priority_suffix() {
        assert_eq!(extract_priority("freq_viol_W1_day_w0_prio3"), 3);
        assert_eq!(extract_priority("freq_viol_W1_day_w0"), 1);
        assert_eq!(extract_priority("weird_prio"), 1);
    }
}
