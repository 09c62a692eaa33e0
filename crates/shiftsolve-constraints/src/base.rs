//! Shared state and the capability every constraint generator exposes.

use std::collections::BTreeMap;

use shiftsolve_core::adapter::SolverAdapter;
use shiftsolve_core::domain::{Availability, ConstraintSpec, ShiftType, Worker};
use shiftsolve_core::error::Result;
use shiftsolve_core::registry::VariableRegistry;

/// How a violation variable participates in the objective (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Standard violation indicator; contributes `weight × priority`.
    Violation,
    /// Already a magnitude (e.g. a spread); contributes `weight × 1`.
    ObjectiveTarget,
    /// Helper variable, never appears in the objective.
    Auxiliary,
}

/// Everything supplied to a constraint's `apply()` beyond the model and
/// registry: the input records it may need to filter against.
pub struct ConstraintContext<'a> {
    pub workers: &'a [Worker],
    pub shift_types: &'a [ShiftType],
    pub num_periods: usize,
    pub period_dates: &'a [(chrono::NaiveDate, chrono::NaiveDate)],
    pub availabilities: &'a [Availability],
}

/// Bookkeeping common to every constraint, mirroring the Python
/// `BaseConstraint`: tracked violation variables, their kind, per-variable
/// priority overrides, and a running count of emitted model constraints.
#[derive(Debug, Clone)]
pub struct ConstraintState<V> {
    pub spec: ConstraintSpec,
    violations: BTreeMap<String, (V, ViolationKind)>,
    priorities: BTreeMap<String, u32>,
    constraint_count: usize,
}

impl<V: Copy> ConstraintState<V> {
    pub fn new(spec: ConstraintSpec) -> Self {
        ConstraintState {
            spec,
            violations: BTreeMap::new(),
            priorities: BTreeMap::new(),
            constraint_count: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.spec.enabled
    }

    pub fn is_hard(&self) -> bool {
        self.spec.is_hard
    }

    pub fn weight(&self) -> u32 {
        self.spec.weight
    }

    pub fn record_violation(&mut self, name: impl Into<String>, var: V, kind: ViolationKind) {
        self.violations.insert(name.into(), (var, kind));
    }

    pub fn record_priority(&mut self, name: impl Into<String>, priority: u32) {
        self.priorities.insert(name.into(), priority);
    }

    pub fn bump(&mut self, n: usize) {
        self.constraint_count += n;
    }

    pub fn violations(&self) -> &BTreeMap<String, (V, ViolationKind)> {
        &self.violations
    }

    pub fn priorities(&self) -> &BTreeMap<String, u32> {
        &self.priorities
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_count
    }
}

/// A constraint generator: owns its configuration and, once applied, its
/// violation variables.
pub trait Constraint<A: SolverAdapter> {
    /// Stable identifier matching the keys used in configuration.
    fn id(&self) -> &'static str;

    fn state(&self) -> &ConstraintState<A::Var>;

    /// Adds this constraint's model constraints (and, if soft, its
    /// reified violation variables) against `registry`. A no-op when
    /// disabled or when its inputs are degenerate (§4.3).
    fn apply(&mut self, adapter: &mut A, registry: &VariableRegistry<A::Var>, ctx: &ConstraintContext) -> Result<()>;

    fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }
    fn is_hard(&self) -> bool {
        self.state().is_hard()
    }
    fn weight(&self) -> u32 {
        self.state().weight()
    }
}

/// Built-in default `ConstraintSpec` for a constraint id, used when the
/// configuration omits it. Coverage/restriction/availability default hard;
/// the remaining soft constraints default soft — matching each Python
/// constructor's own default rather than the generic `ConstraintSpec::default()`.
pub fn default_spec_for(constraint_id: &str) -> ConstraintSpec {
    let is_hard = !matches!(
        constraint_id,
        "fairness" | "frequency" | "max_absence" | "sequence"
    );
    ConstraintSpec {
        is_hard,
        ..ConstraintSpec::default()
    }
}
