//! A small exact branch-and-bound / constraint-propagation solver.
//!
//! This is the reference [`SolverAdapter`] shipped in this crate because no
//! CP-SAT binding is part of the dependency surface and providing one is an
//! explicit non-goal. It implements bounds-consistency propagation for the
//! primitive constraint set and an exhaustive branch-and-bound search for
//! the minimization objective. It is sized for the scenarios this crate's
//! tests and demo drive, not for large scheduling instances.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use shiftsolve_core::adapter::{Lit, ProgressReport, SolutionView, SolveParams, SolverAdapter, TerminalStatus};

/// A variable handle into a [`ReferenceAdapter`]'s flat domain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefVar(usize);

#[derive(Debug, Clone)]
enum Cons {
    Eq(Vec<(RefVar, i64)>, i64),
    Ge(Vec<(RefVar, i64)>, i64),
    EqReified(Vec<(RefVar, i64)>, i64, Lit<RefVar>),
    GeReified(Vec<(RefVar, i64)>, i64, Lit<RefVar>),
    MaxEq(RefVar, Vec<RefVar>),
    MinEq(RefVar, Vec<RefVar>),
    BoolAndReified(Vec<Lit<RefVar>>, Lit<RefVar>),
    BoolOrReified(Vec<Lit<RefVar>>, Lit<RefVar>),
}

/// The reference backend. Collects the model through [`SolverAdapter`] and
/// solves it when [`SolverAdapter::solve`] is called.
#[derive(Debug, Default)]
pub struct ReferenceAdapter {
    lo: Vec<i64>,
    hi: Vec<i64>,
    names: Vec<String>,
    constraints: Vec<Cons>,
    objective: Vec<(RefVar, i64)>,
}

/// A solved assignment returned by [`ReferenceAdapter::solve`].
#[derive(Debug, Clone)]
pub struct ReferenceSolution {
    values: Vec<i64>,
    objective_value: f64,
    best_bound: f64,
    wall_time: f64,
}

impl SolutionView<RefVar> for ReferenceSolution {
    fn value_of(&self, var: RefVar) -> i64 {
        self.values[var.0]
    }
    fn objective_value(&self) -> f64 {
        self.objective_value
    }
    fn best_bound(&self) -> f64 {
        self.best_bound
    }
    fn wall_time(&self) -> f64 {
        self.wall_time
    }
}

impl ReferenceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var_name(&self, var: RefVar) -> &str {
        &self.names[var.0]
    }

    fn new_var(&mut self, lo: i64, hi: i64, name: &str) -> RefVar {
        self.lo.push(lo);
        self.hi.push(hi);
        self.names.push(name.to_string());
        RefVar(self.lo.len() - 1)
    }
}

impl SolverAdapter for ReferenceAdapter {
    type Var = RefVar;
    type Solution = ReferenceSolution;

    fn new_bool_var(&mut self, name: &str) -> Self::Var {
        self.new_var(0, 1, name)
    }

    fn new_int_var(&mut self, lo: i64, hi: i64, name: &str) -> Self::Var {
        self.new_var(lo, hi, name)
    }

    fn add_eq(&mut self, terms: &[(Self::Var, i64)], rhs: i64) {
        self.constraints.push(Cons::Eq(terms.to_vec(), rhs));
    }

    fn add_ge(&mut self, terms: &[(Self::Var, i64)], rhs: i64) {
        self.constraints.push(Cons::Ge(terms.to_vec(), rhs));
    }

    fn add_ge_reified(&mut self, terms: &[(Self::Var, i64)], rhs: i64, condition: Lit<Self::Var>) {
        self.constraints.push(Cons::GeReified(terms.to_vec(), rhs, condition));
    }

    fn add_eq_reified(&mut self, terms: &[(Self::Var, i64)], rhs: i64, condition: Lit<Self::Var>) {
        self.constraints.push(Cons::EqReified(terms.to_vec(), rhs, condition));
    }

    fn add_max_equality(&mut self, target: Self::Var, vars: &[Self::Var]) {
        self.constraints.push(Cons::MaxEq(target, vars.to_vec()));
    }

    fn add_min_equality(&mut self, target: Self::Var, vars: &[Self::Var]) {
        self.constraints.push(Cons::MinEq(target, vars.to_vec()));
    }

    fn add_bool_and_reified(&mut self, literals: &[Lit<Self::Var>], condition: Lit<Self::Var>) {
        self.constraints.push(Cons::BoolAndReified(literals.to_vec(), condition));
    }

    fn add_bool_or_reified(&mut self, literals: &[Lit<Self::Var>], condition: Lit<Self::Var>) {
        self.constraints.push(Cons::BoolOrReified(literals.to_vec(), condition));
    }

    fn minimize(&mut self, terms: &[(Self::Var, i64)]) {
        self.objective = terms.to_vec();
    }

    fn solve(
        &mut self,
        params: &SolveParams,
        cancel: &AtomicBool,
        on_progress: &mut dyn FnMut(ProgressReport),
    ) -> (TerminalStatus, Option<Self::Solution>) {
        let n = self.lo.len();
        let mut search = Search {
            constraints: &self.constraints,
            objective: &self.objective,
            start: Instant::now(),
            deadline_secs: params.time_limit_seconds as f64,
            cancel,
            on_progress,
            best: None,
            solutions_found: 0,
            node_count: 0,
            timed_out_or_cancelled: false,
        };

        let mut lo = self.lo.clone();
        let mut hi = self.hi.clone();
        let exhaustive = if propagate_to_fixpoint(&mut lo, &mut hi, &self.constraints).is_ok() {
            search.search(&mut lo, &mut hi, n)
        } else {
            true
        };

        let wall_time = search.start.elapsed().as_secs_f64();
        match search.best {
            Some((values, objective_value)) => {
                let status = if exhaustive && !search.timed_out_or_cancelled {
                    TerminalStatus::Optimal
                } else {
                    TerminalStatus::Feasible
                };
                (
                    status,
                    Some(ReferenceSolution {
                        values,
                        objective_value,
                        best_bound: objective_value,
                        wall_time,
                    }),
                )
            }
            None => {
                let status = if exhaustive && !search.timed_out_or_cancelled {
                    TerminalStatus::Infeasible
                } else {
                    TerminalStatus::Unknown
                };
                (status, None)
            }
        }
    }
}

struct Search<'a> {
    constraints: &'a [Cons],
    objective: &'a [(RefVar, i64)],
    start: Instant,
    deadline_secs: f64,
    cancel: &'a AtomicBool,
    on_progress: &'a mut dyn FnMut(ProgressReport),
    best: Option<(Vec<i64>, f64)>,
    solutions_found: u64,
    node_count: u64,
    timed_out_or_cancelled: bool,
}

impl<'a> Search<'a> {
    /// Returns `true` if the search space was fully explored (no timeout,
    /// no cancellation).
    fn search(&mut self, lo: &mut [i64], hi: &mut [i64], n: usize) -> bool {
        self.node_count += 1;
        if (self.node_count == 1 || self.node_count % 256 == 0) && self.should_stop() {
            self.timed_out_or_cancelled = true;
            return false;
        }

        if let Some((_, best_obj)) = &self.best {
            if lower_bound(self.objective, lo, hi) >= *best_obj {
                return true;
            }
        }

        match next_branch_var(lo, hi, n) {
            None => {
                self.record_leaf(lo, hi);
                true
            }
            Some(v) => {
                let (orig_lo, orig_hi) = (lo[v], hi[v]);
                for value in orig_lo..=orig_hi {
                    let mut branch_lo = lo.to_vec();
                    let mut branch_hi = hi.to_vec();
                    branch_lo[v] = value;
                    branch_hi[v] = value;
                    let exhaustive = if propagate_to_fixpoint(&mut branch_lo, &mut branch_hi, self.constraints).is_ok() {
                        self.search(&mut branch_lo, &mut branch_hi, n)
                    } else {
                        true
                    };
                    if !exhaustive {
                        return false;
                    }
                }
                true
            }
        }
    }

    fn should_stop(&self) -> bool {
        if self.cancel.load(Ordering::SeqCst) {
            return true;
        }
        self.deadline_secs > 0.0 && self.start.elapsed().as_secs_f64() >= self.deadline_secs
    }

    fn record_leaf(&mut self, lo: &[i64], hi: &[i64]) {
        if !validate_all(self.constraints, lo, hi) {
            return;
        }
        let objective_value: i64 = self.objective.iter().map(|(v, c)| c * lo[v.0]).sum();
        let objective_value = objective_value as f64;
        let is_improvement = match &self.best {
            Some((_, best)) => objective_value < *best,
            None => true,
        };
        if is_improvement {
            self.solutions_found += 1;
            self.best = Some((lo.to_vec(), objective_value));
            let wall_time = self.start.elapsed().as_secs_f64();
            (self.on_progress)(ProgressReport {
                solutions_found: self.solutions_found,
                objective_value,
                best_bound: objective_value,
                gap_percent: ProgressReport::gap_percent(objective_value, objective_value),
                wall_time,
            });
        }
    }
}

fn next_branch_var(lo: &[i64], hi: &[i64], n: usize) -> Option<usize> {
    (0..n)
        .filter(|&i| lo[i] != hi[i])
        .min_by_key(|&i| hi[i] - lo[i])
}

fn lower_bound(objective: &[(RefVar, i64)], lo: &[i64], hi: &[i64]) -> f64 {
    let bound: i64 = objective
        .iter()
        .map(|(v, c)| if *c >= 0 { c * lo[v.0] } else { c * hi[v.0] })
        .sum();
    bound as f64
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) == (b < 0) {
        q + 1
    } else {
        q
    }
}

fn term_bounds(c: i64, lo: i64, hi: i64) -> (i64, i64) {
    if c >= 0 {
        (c * lo, c * hi)
    } else {
        (c * hi, c * lo)
    }
}

/// Narrows `lo[i]..hi[i]` for each term of a linear constraint `sum == rhs`
/// (`is_eq = true`) or `sum >= rhs` (`is_eq = false`), returning `Err(())` on
/// a domain wipeout.
fn propagate_linear(terms: &[(RefVar, i64)], rhs: i64, is_eq: bool, lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    let mut changed = false;
    let bounds: Vec<(i64, i64)> = terms.iter().map(|(v, c)| term_bounds(*c, lo[v.0], hi[v.0])).collect();
    let total_min: i64 = bounds.iter().map(|(mn, _)| mn).sum();
    let total_max: i64 = bounds.iter().map(|(_, mx)| mx).sum();

    for (i, (v, c)) in terms.iter().enumerate() {
        if *c == 0 {
            continue;
        }
        let (term_min, term_max) = bounds[i];
        let other_min = total_min - term_min;
        let other_max = total_max - term_max;

        let low = rhs - other_max;
        let (mut new_lo, mut new_hi) = (lo[v.0], hi[v.0]);
        if is_eq {
            let high = rhs - other_min;
            let (cand_lo, cand_hi) = if *c > 0 {
                (ceil_div(low, *c), floor_div(high, *c))
            } else {
                (ceil_div(high, *c), floor_div(low, *c))
            };
            new_lo = new_lo.max(cand_lo);
            new_hi = new_hi.min(cand_hi);
        } else if *c > 0 {
            new_lo = new_lo.max(ceil_div(low, *c));
        } else {
            new_hi = new_hi.min(floor_div(low, *c));
        }

        if new_lo > lo[v.0] {
            lo[v.0] = new_lo;
            changed = true;
        }
        if new_hi < hi[v.0] {
            hi[v.0] = new_hi;
            changed = true;
        }
        if lo[v.0] > hi[v.0] {
            return Err(());
        }
    }
    Ok(changed)
}

fn force_true(v: RefVar, negated: bool, lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    let value = if negated { 0 } else { 1 };
    let changed = lo[v.0] != value || hi[v.0] != value;
    if lo[v.0] > value || hi[v.0] < value {
        return Err(());
    }
    lo[v.0] = value;
    hi[v.0] = value;
    Ok(changed)
}

fn lit_value(lit: Lit<RefVar>, lo: &[i64], hi: &[i64]) -> Option<bool> {
    if lo[lit.var.0] != hi[lit.var.0] {
        return None;
    }
    let raw = lo[lit.var.0] == 1;
    Some(if lit.negated { !raw } else { raw })
}

fn propagate_and_reified(lits: &[Lit<RefVar>], cond: Lit<RefVar>, lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    match lit_value(cond, lo, hi) {
        Some(true) => {
            let mut changed = false;
            for lit in lits {
                changed |= force_true(lit.var, lit.negated, lo, hi)?;
            }
            Ok(changed)
        }
        Some(false) => {
            let mut undetermined = None;
            let mut any_false = false;
            for (i, lit) in lits.iter().enumerate() {
                match lit_value(*lit, lo, hi) {
                    Some(false) => any_false = true,
                    Some(true) => {}
                    None => {
                        if undetermined.is_some() {
                            return Ok(false);
                        }
                        undetermined = Some(i);
                    }
                }
            }
            if any_false {
                return Ok(false);
            }
            match undetermined {
                None => Err(()),
                Some(i) => {
                    let lit = lits[i];
                    force_true(lit.var, !lit.negated, lo, hi)
                }
            }
        }
        None => Ok(false),
    }
}

fn propagate_or_reified(lits: &[Lit<RefVar>], cond: Lit<RefVar>, lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    match lit_value(cond, lo, hi) {
        Some(false) => {
            let mut changed = false;
            for lit in lits {
                changed |= force_true(lit.var, !lit.negated, lo, hi)?;
            }
            Ok(changed)
        }
        Some(true) => {
            let mut undetermined = None;
            let mut any_true = false;
            for (i, lit) in lits.iter().enumerate() {
                match lit_value(*lit, lo, hi) {
                    Some(true) => any_true = true,
                    Some(false) => {}
                    None => {
                        if undetermined.is_some() {
                            return Ok(false);
                        }
                        undetermined = Some(i);
                    }
                }
            }
            if any_true {
                return Ok(false);
            }
            match undetermined {
                None => Err(()),
                Some(i) => {
                    let lit = lits[i];
                    force_true(lit.var, lit.negated, lo, hi)
                }
            }
        }
        None => Ok(false),
    }
}

fn propagate_max_eq(target: RefVar, vars: &[RefVar], lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    let mut changed = false;
    let max_lo = vars.iter().map(|v| lo[v.0]).max().unwrap_or(i64::MIN);
    let max_hi = vars.iter().map(|v| hi[v.0]).max().unwrap_or(i64::MAX);
    if lo[target.0] < max_lo {
        lo[target.0] = max_lo;
        changed = true;
    }
    if hi[target.0] > max_hi {
        hi[target.0] = max_hi;
        changed = true;
    }
    if lo[target.0] > hi[target.0] {
        return Err(());
    }
    for v in vars {
        if hi[v.0] > hi[target.0] {
            hi[v.0] = hi[target.0];
            changed = true;
        }
        if lo[v.0] > hi[v.0] {
            return Err(());
        }
    }
    Ok(changed)
}

fn propagate_min_eq(target: RefVar, vars: &[RefVar], lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    let mut changed = false;
    let min_lo = vars.iter().map(|v| lo[v.0]).min().unwrap_or(i64::MIN);
    let min_hi = vars.iter().map(|v| hi[v.0]).min().unwrap_or(i64::MAX);
    if lo[target.0] < min_lo {
        lo[target.0] = min_lo;
        changed = true;
    }
    if hi[target.0] > min_hi {
        hi[target.0] = min_hi;
        changed = true;
    }
    if lo[target.0] > hi[target.0] {
        return Err(());
    }
    for v in vars {
        if lo[v.0] < lo[target.0] {
            lo[v.0] = lo[target.0];
            changed = true;
        }
        if lo[v.0] > hi[v.0] {
            return Err(());
        }
    }
    Ok(changed)
}

fn propagate_once(cons: &Cons, lo: &mut [i64], hi: &mut [i64]) -> Result<bool, ()> {
    match cons {
        Cons::Eq(terms, rhs) => propagate_linear(terms, *rhs, true, lo, hi),
        Cons::Ge(terms, rhs) => propagate_linear(terms, *rhs, false, lo, hi),
        Cons::EqReified(terms, rhs, cond) => match lit_value(*cond, lo, hi) {
            Some(true) => propagate_linear(terms, *rhs, true, lo, hi),
            _ => Ok(false),
        },
        Cons::GeReified(terms, rhs, cond) => match lit_value(*cond, lo, hi) {
            Some(true) => propagate_linear(terms, *rhs, false, lo, hi),
            _ => Ok(false),
        },
        Cons::MaxEq(target, vars) => propagate_max_eq(*target, vars, lo, hi),
        Cons::MinEq(target, vars) => propagate_min_eq(*target, vars, lo, hi),
        Cons::BoolAndReified(lits, cond) => propagate_and_reified(lits, *cond, lo, hi),
        Cons::BoolOrReified(lits, cond) => propagate_or_reified(lits, *cond, lo, hi),
    }
}

fn propagate_to_fixpoint(lo: &mut [i64], hi: &mut [i64], constraints: &[Cons]) -> Result<(), ()> {
    loop {
        let mut changed = false;
        for cons in constraints {
            if propagate_once(cons, lo, hi)? {
                changed = true;
            }
        }
        if !changed {
            return Ok(());
        }
    }
}

fn validate_all(constraints: &[Cons], lo: &[i64], hi: &[i64]) -> bool {
    let value = |v: &RefVar| lo[v.0];
    let sum = |terms: &[(RefVar, i64)]| -> i64 { terms.iter().map(|(v, c)| c * value(v)).sum() };
    let _ = hi;
    constraints.iter().all(|cons| match cons {
        Cons::Eq(terms, rhs) => sum(terms) == *rhs,
        Cons::Ge(terms, rhs) => sum(terms) >= *rhs,
        Cons::EqReified(terms, rhs, cond) => {
            let raw = value(&cond.var) == 1;
            let holds = if cond.negated { !raw } else { raw };
            !holds || sum(terms) == *rhs
        }
        Cons::GeReified(terms, rhs, cond) => {
            let raw = value(&cond.var) == 1;
            let holds = if cond.negated { !raw } else { raw };
            !holds || sum(terms) >= *rhs
        }
        Cons::MaxEq(target, vars) => value(target) == vars.iter().map(value).max().unwrap_or(i64::MIN),
        Cons::MinEq(target, vars) => value(target) == vars.iter().map(value).min().unwrap_or(i64::MAX),
        Cons::BoolAndReified(lits, cond) => {
            let raw = value(&cond.var) == 1;
            let cond_holds = if cond.negated { !raw } else { raw };
            let and_holds = lits.iter().all(|l| {
                let r = value(&l.var) == 1;
                if l.negated {
                    !r
                } else {
                    r
                }
            });
            cond_holds == and_holds
        }
        Cons::BoolOrReified(lits, cond) => {
            let raw = value(&cond.var) == 1;
            let cond_holds = if cond.negated { !raw } else { raw };
            let or_holds = lits.iter().any(|l| {
                let r = value(&l.var) == 1;
                if l.negated {
                    !r
                } else {
                    r
                }
            });
            cond_holds == or_holds
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn solves_a_simple_equality() {
        let mut adapter = ReferenceAdapter::new();
        let a = adapter.new_bool_var("a");
        let b = adapter.new_bool_var("b");
        adapter.add_eq(&[(a, 1), (b, 1)], 1);

        let cancel = AtomicBool::new(false);
        let mut progress = Vec::new();
        let (status, solution) = adapter.solve(&SolveParams::default(), &cancel, &mut |p| progress.push(p));

        assert_eq!(status, TerminalStatus::Optimal);
        let solution = solution.unwrap();
        assert_eq!(solution.value_of(a) + solution.value_of(b), 1);
    }

    #[test]
    fn detects_infeasibility() {
        let mut adapter = ReferenceAdapter::new();
        let a = adapter.new_bool_var("a");
        adapter.add_eq(&[(a, 1)], 1);
        adapter.add_eq(&[(a, 1)], 0);

        let cancel = AtomicBool::new(false);
        let (status, solution) = adapter.solve(&SolveParams::default(), &cancel, &mut |_| {});

        assert_eq!(status, TerminalStatus::Infeasible);
        assert!(solution.is_none());
    }

    #[test]
    fn minimizes_objective() {
        let mut adapter = ReferenceAdapter::new();
        let a = adapter.new_bool_var("a");
        let b = adapter.new_bool_var("b");
        adapter.add_ge(&[(a, 1), (b, 1)], 1);
        adapter.minimize(&[(a, 1), (b, 1)]);

        let cancel = AtomicBool::new(false);
        let (status, solution) = adapter.solve(&SolveParams::default(), &cancel, &mut |_| {});

        assert_eq!(status, TerminalStatus::Optimal);
        let solution = solution.unwrap();
        assert_eq!(solution.value_of(a) + solution.value_of(b), 1);
    }

    #[test]
    fn reified_ge_only_enforced_when_condition_true() {
        let mut adapter = ReferenceAdapter::new();
        let cond = adapter.new_bool_var("cond");
        let x = adapter.new_bool_var("x");
        adapter.add_eq(&[(cond, 1)], 0);
        adapter.add_ge_reified(&[(x, 1)], 1, Lit::pos(cond));
        adapter.minimize(&[(x, 1)]);

        let cancel = AtomicBool::new(false);
        let (status, solution) = adapter.solve(&SolveParams::default(), &cancel, &mut |_| {});

        assert_eq!(status, TerminalStatus::Optimal);
        assert_eq!(solution.unwrap().value_of(x), 0);
    }

    #[test]
    fn max_equality_tracks_the_largest_variable() {
        let mut adapter = ReferenceAdapter::new();
        let a = adapter.new_int_var(0, 3, "a");
        let b = adapter.new_int_var(0, 3, "b");
        let m = adapter.new_int_var(0, 3, "m");
        adapter.add_eq(&[(a, 1)], 2);
        adapter.add_eq(&[(b, 1)], 1);
        adapter.add_max_equality(m, &[a, b]);

        let cancel = AtomicBool::new(false);
        let (status, solution) = adapter.solve(&SolveParams::default(), &cancel, &mut |_| {});

        assert_eq!(status, TerminalStatus::Optimal);
        assert_eq!(solution.unwrap().value_of(m), 2);
    }

    #[test]
    fn cancellation_yields_no_solution_without_progress() {
        let mut adapter = ReferenceAdapter::new();
        let a = adapter.new_bool_var("a");
        adapter.add_eq(&[(a, 1)], 1);

        let cancel = AtomicBool::new(true);
        let (status, _) = adapter.solve(&SolveParams::default(), &cancel, &mut |_| {
            panic!("no progress should be observed after cancellation");
        });
        assert_eq!(status, TerminalStatus::Unknown);
    }
}
