//! The abstract capability through which the driver talks to an underlying
//! CP-SAT-style solver backend.
//!
//! This crate never implements an actual CP-SAT solver (§1's non-goals);
//! it only defines the primitive vocabulary a backend must support:
//! boolean/integer variables, linear equality/inequality, max/min
//! equality, reified implications, and a minimization objective. A
//! concrete backend lives in `shiftsolve-solver`.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::AtomicBool;

/// A variable handle. Backends define their own concrete type; the core
/// and constraint layers only ever move these around by value.
pub trait VarHandle: Copy + Eq + Hash + Debug {}
impl<T: Copy + Eq + Hash + Debug> VarHandle for T {}

/// A boolean literal: a variable, or its logical negation.
///
/// Mirrors the `.only_enforce_if(var)` / `.only_enforce_if(var.negated())`
/// pattern used by CP-SAT style solvers for reified constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lit<V> {
    pub var: V,
    pub negated: bool,
}

impl<V: VarHandle> Lit<V> {
    pub fn pos(var: V) -> Self {
        Lit { var, negated: false }
    }
    pub fn neg(var: V) -> Self {
        Lit { var, negated: true }
    }
}

/// Terminal status a solve can end in. Only `Optimal` and `Feasible` carry
/// a usable solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    Optimal,
    Feasible,
    Infeasible,
    ModelInvalid,
    Unknown,
}

impl TerminalStatus {
    pub fn has_solution(self) -> bool {
        matches!(self, TerminalStatus::Optimal | TerminalStatus::Feasible)
    }

    pub fn name(self) -> &'static str {
        match self {
            TerminalStatus::Optimal => "OPTIMAL",
            TerminalStatus::Feasible => "FEASIBLE",
            TerminalStatus::Infeasible => "INFEASIBLE",
            TerminalStatus::ModelInvalid => "MODEL_INVALID",
            TerminalStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Driver-level parameters handed to the adapter at solve time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveParams {
    pub time_limit_seconds: u64,
    pub num_workers: u32,
    pub relative_gap: f64,
    pub log_search_progress: bool,
}

impl Default for SolveParams {
    fn default() -> Self {
        SolveParams {
            time_limit_seconds: 60,
            num_workers: 8,
            relative_gap: 0.0,
            log_search_progress: true,
        }
    }
}

/// One incumbent-solution progress report, already throttled by the
/// driver before it reaches user code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub solutions_found: u64,
    pub objective_value: f64,
    pub best_bound: f64,
    pub gap_percent: f64,
    pub wall_time: f64,
}

impl ProgressReport {
    pub fn gap_percent(objective_value: f64, best_bound: f64) -> f64 {
        let gap = (objective_value - best_bound).abs() / objective_value.abs().max(1.0) * 100.0;
        (gap * 100.0).round() / 100.0
    }
}

/// An accessor over one concrete solution returned by the adapter.
pub trait SolutionView<V: VarHandle> {
    fn value_of(&self, var: V) -> i64;
    fn objective_value(&self) -> f64;
    fn best_bound(&self) -> f64;
    fn wall_time(&self) -> f64;
}

/// The abstract CP-SAT-style backend capability.
pub trait SolverAdapter {
    type Var: VarHandle;
    type Solution: SolutionView<Self::Var>;

    fn new_bool_var(&mut self, name: &str) -> Self::Var;
    fn new_int_var(&mut self, lo: i64, hi: i64, name: &str) -> Self::Var;

    /// `sum(coef * var) == rhs`
    fn add_eq(&mut self, terms: &[(Self::Var, i64)], rhs: i64);
    /// `sum(coef * var) >= rhs`
    fn add_ge(&mut self, terms: &[(Self::Var, i64)], rhs: i64);

    /// `sum(coef * var) >= rhs`, enforced only when `condition` holds.
    fn add_ge_reified(&mut self, terms: &[(Self::Var, i64)], rhs: i64, condition: Lit<Self::Var>);
    /// `sum(coef * var) == rhs`, enforced only when `condition` holds.
    fn add_eq_reified(&mut self, terms: &[(Self::Var, i64)], rhs: i64, condition: Lit<Self::Var>);

    /// `target == max(vars)`
    fn add_max_equality(&mut self, target: Self::Var, vars: &[Self::Var]);
    /// `target == min(vars)`
    fn add_min_equality(&mut self, target: Self::Var, vars: &[Self::Var]);

    /// `AND(literals)`, enforced only when `condition` holds.
    fn add_bool_and_reified(&mut self, literals: &[Lit<Self::Var>], condition: Lit<Self::Var>);
    /// `OR(literals)`, enforced only when `condition` holds.
    fn add_bool_or_reified(&mut self, literals: &[Lit<Self::Var>], condition: Lit<Self::Var>);

    fn minimize(&mut self, terms: &[(Self::Var, i64)]);

    /// Runs the solver. `cancel` is polled between incumbent solutions;
    /// `on_progress` is called (already throttled) for each one found.
    fn solve(
        &mut self,
        params: &SolveParams,
        cancel: &AtomicBool,
        on_progress: &mut dyn FnMut(ProgressReport),
    ) -> (TerminalStatus, Option<Self::Solution>);
}
