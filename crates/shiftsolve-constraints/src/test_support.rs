//! Test-only recording adapter and domain fixtures shared by every
//! constraint's unit tests.
#![cfg(test)]

use std::sync::atomic::AtomicBool;

use chrono::NaiveDate;
use shiftsolve_core::adapter::{Lit, ProgressReport, SolutionView, SolveParams, SolverAdapter, TerminalStatus};
use shiftsolve_core::domain::{ShiftType, Worker};

use crate::base::ConstraintContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DummyVar(pub u32);

pub struct DummySolution;
impl SolutionView<DummyVar> for DummySolution {
    fn value_of(&self, _var: DummyVar) -> i64 {
        0
    }
    fn objective_value(&self) -> f64 {
        0.0
    }
    fn best_bound(&self) -> f64 {
        0.0
    }
    fn wall_time(&self) -> f64 {
        0.0
    }
}

/// An adapter that never solves; it just records every constraint call so
/// tests can assert on shape and multiplicity.
#[derive(Default)]
pub struct RecordingAdapter {
    next_id: u32,
    pub eqs: Vec<(Vec<(DummyVar, i64)>, i64)>,
    pub ges: Vec<(Vec<(DummyVar, i64)>, i64)>,
    pub ge_reified: Vec<(Vec<(DummyVar, i64)>, i64, Lit<DummyVar>)>,
    pub eq_reified: Vec<(Vec<(DummyVar, i64)>, i64, Lit<DummyVar>)>,
    pub max_eq: Vec<(DummyVar, Vec<DummyVar>)>,
    pub min_eq: Vec<(DummyVar, Vec<DummyVar>)>,
    pub bool_and_reified: Vec<(Vec<Lit<DummyVar>>, Lit<DummyVar>)>,
    pub bool_or_reified: Vec<(Vec<Lit<DummyVar>>, Lit<DummyVar>)>,
    pub minimize_terms: Option<Vec<(DummyVar, i64)>>,
}

impl SolverAdapter for RecordingAdapter {
    type Var = DummyVar;
    type Solution = DummySolution;

    fn new_bool_var(&mut self, _name: &str) -> Self::Var {
        self.next_id += 1;
        DummyVar(self.next_id)
    }
    fn new_int_var(&mut self, _lo: i64, _hi: i64, _name: &str) -> Self::Var {
        self.next_id += 1;
        DummyVar(self.next_id)
    }
    fn add_eq(&mut self, terms: &[(Self::Var, i64)], rhs: i64) {
        self.eqs.push((terms.to_vec(), rhs));
    }
    fn add_ge(&mut self, terms: &[(Self::Var, i64)], rhs: i64) {
        self.ges.push((terms.to_vec(), rhs));
    }
    fn add_ge_reified(&mut self, terms: &[(Self::Var, i64)], rhs: i64, condition: Lit<Self::Var>) {
        self.ge_reified.push((terms.to_vec(), rhs, condition));
    }
    fn add_eq_reified(&mut self, terms: &[(Self::Var, i64)], rhs: i64, condition: Lit<Self::Var>) {
        self.eq_reified.push((terms.to_vec(), rhs, condition));
    }
    fn add_max_equality(&mut self, target: Self::Var, vars: &[Self::Var]) {
        self.max_eq.push((target, vars.to_vec()));
    }
    fn add_min_equality(&mut self, target: Self::Var, vars: &[Self::Var]) {
        self.min_eq.push((target, vars.to_vec()));
    }
    fn add_bool_and_reified(&mut self, literals: &[Lit<Self::Var>], condition: Lit<Self::Var>) {
        self.bool_and_reified.push((literals.to_vec(), condition));
    }
    fn add_bool_or_reified(&mut self, literals: &[Lit<Self::Var>], condition: Lit<Self::Var>) {
        self.bool_or_reified.push((literals.to_vec(), condition));
    }
    fn minimize(&mut self, terms: &[(Self::Var, i64)]) {
        self.minimize_terms = Some(terms.to_vec());
    }
    fn solve(
        &mut self,
        _params: &SolveParams,
        _cancel: &AtomicBool,
        _on_progress: &mut dyn FnMut(ProgressReport),
    ) -> (TerminalStatus, Option<Self::Solution>) {
        (TerminalStatus::Unknown, None)
    }
}

pub fn workers(ids: &[&str]) -> Vec<Worker> {
    ids.iter().map(|id| Worker::new(*id, *id, None, [], []).unwrap()).collect()
}

pub fn worker_with_restriction(id: &str, restricted: &[&str]) -> Worker {
    Worker::new(id, id, None, restricted.iter().map(|s| s.to_string()), []).unwrap()
}

pub fn shift(id: &str, workers_required: u32, undesirable: bool) -> ShiftType {
    ShiftType::new(
        id,
        id,
        "cat",
        chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        chrono::NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        8.0,
        undesirable,
        workers_required,
        None,
    )
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ctx<'a>(workers: &'a [Worker], shift_types: &'a [ShiftType], num_periods: usize) -> ConstraintContext<'a> {
    ConstraintContext {
        workers,
        shift_types,
        num_periods,
        period_dates: &[],
        availabilities: &[],
    }
}

pub fn ctx_full<'a>(
    workers: &'a [Worker],
    shift_types: &'a [ShiftType],
    num_periods: usize,
    period_dates: &'a [(NaiveDate, NaiveDate)],
    availabilities: &'a [shiftsolve_core::domain::Availability],
) -> ConstraintContext<'a> {
    ConstraintContext {
        workers,
        shift_types,
        num_periods,
        period_dates,
        availabilities,
    }
}
