//! The variable registry: the single owner of every decision variable for
//! one solve.
//!
//! Identifiers are interned to dense packed indices at construction time so
//! that constraint emission — the hot path — never re-hashes a string key;
//! only the id-based accessors used at the edges of constraint code pay a
//! map lookup.

use std::collections::HashMap;

use crate::adapter::SolverAdapter;
use crate::domain::{ShiftType, Worker};
use crate::error::{Result, ShiftSolverError};

/// Owns the three populations of decision variables described in §4.2:
/// `assignment`, `shift_counts`, and `undesirable_totals`.
#[derive(Debug, Clone)]
pub struct VariableRegistry<V> {
    num_workers: usize,
    num_periods: usize,
    num_shift_types: usize,

    worker_ids: Vec<String>,
    worker_index: HashMap<String, usize>,
    shift_type_ids: Vec<String>,
    shift_type_index: HashMap<String, usize>,

    /// Flat, packed `[worker_ix, period_ix, shift_type_ix]` table.
    assignment: Vec<V>,
    /// Flat, packed `[worker_ix, shift_type_ix]` table.
    shift_counts: Vec<V>,
    /// One per worker.
    undesirable_totals: Vec<V>,
}

impl<V: Copy> VariableRegistry<V> {
    /// Builds the registry, allocating every variable via `adapter` in
    /// deterministic (worker, period, shift-type) order.
    pub fn build<A>(adapter: &mut A, workers: &[Worker], shift_types: &[ShiftType], num_periods: usize) -> Self
    where
        A: SolverAdapter<Var = V>,
    {
        let num_workers = workers.len();
        let num_shift_types = shift_types.len();

        let worker_ids: Vec<String> = workers.iter().map(|w| w.id.clone()).collect();
        let worker_index: HashMap<String, usize> =
            worker_ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        let shift_type_ids: Vec<String> = shift_types.iter().map(|s| s.id.clone()).collect();
        let shift_type_index: HashMap<String, usize> =
            shift_type_ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();

        let mut assignment = Vec::with_capacity(num_workers * num_periods * num_shift_types);
        for (w, worker_id) in worker_ids.iter().enumerate() {
            for p in 0..num_periods {
                for (s, shift_id) in shift_type_ids.iter().enumerate() {
                    let _ = (w, s);
                    let name = format!("assign_{worker_id}_{p}_{shift_id}");
                    assignment.push(adapter.new_bool_var(&name));
                }
            }
        }

        let mut shift_counts = Vec::with_capacity(num_workers * num_shift_types);
        for worker_id in &worker_ids {
            for shift_id in &shift_type_ids {
                let name = format!("count_{worker_id}_{shift_id}");
                shift_counts.push(adapter.new_int_var(0, num_periods as i64, &name));
            }
        }
        for (w, worker_id) in worker_ids.iter().enumerate() {
            for (s, shift_id) in shift_type_ids.iter().enumerate() {
                let _ = (worker_id, shift_id);
                let terms: Vec<(V, i64)> = (0..num_periods)
                    .map(|p| (assignment[Self::assignment_ix_raw(p, num_periods, num_shift_types, w, s)], 1))
                    .collect();
                let count_var = shift_counts[w * num_shift_types + s];
                let mut eq_terms = terms;
                eq_terms.push((count_var, -1));
                adapter.add_eq(&eq_terms, 0);
            }
        }

        let undesirable_shift_ixs: Vec<usize> = shift_types
            .iter()
            .enumerate()
            .filter(|(_, st)| st.is_undesirable)
            .map(|(i, _)| i)
            .collect();
        let mut undesirable_totals = Vec::with_capacity(num_workers);
        for (w, worker_id) in worker_ids.iter().enumerate() {
            let name = format!("undesirable_total_{worker_id}");
            let total_var = adapter.new_int_var(0, num_periods as i64 * undesirable_shift_ixs.len().max(1) as i64, &name);
            let mut terms: Vec<(V, i64)> = undesirable_shift_ixs
                .iter()
                .map(|&s| (shift_counts[w * num_shift_types + s], 1))
                .collect();
            terms.push((total_var, -1));
            adapter.add_eq(&terms, 0);
            undesirable_totals.push(total_var);
        }

        VariableRegistry {
            num_workers,
            num_periods,
            num_shift_types,
            worker_ids,
            worker_index,
            shift_type_ids,
            shift_type_index,
            assignment,
            shift_counts,
            undesirable_totals,
        }
    }

    fn assignment_ix_raw(p: usize, num_periods: usize, num_shift_types: usize, w: usize, s: usize) -> usize {
        let _ = num_periods;
        w * num_periods * num_shift_types + p * num_shift_types + s
    }

    fn assignment_ix(&self, w: usize, p: usize, s: usize) -> usize {
        w * self.num_periods * self.num_shift_types + p * self.num_shift_types + s
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
    pub fn num_periods(&self) -> usize {
        self.num_periods
    }
    pub fn num_shift_types(&self) -> usize {
        self.num_shift_types
    }
    pub fn worker_ids(&self) -> &[String] {
        &self.worker_ids
    }
    pub fn shift_type_ids(&self) -> &[String] {
        &self.shift_type_ids
    }

    fn worker_ix(&self, worker_id: &str) -> Option<usize> {
        self.worker_index.get(worker_id).copied()
    }
    fn shift_type_ix(&self, shift_type_id: &str) -> Option<usize> {
        self.shift_type_index.get(shift_type_id).copied()
    }

    /// Fast path for constraints that already hold packed indices.
    pub fn assignment_var_ix(&self, w: usize, p: usize, s: usize) -> Option<V> {
        if w >= self.num_workers || p >= self.num_periods || s >= self.num_shift_types {
            return None;
        }
        Some(self.assignment[self.assignment_ix(w, p, s)])
    }

    pub fn assignment_var(&self, worker_id: &str, period: usize, shift_type_id: &str) -> Result<V> {
        let w = self.worker_ix(worker_id);
        let s = self.shift_type_ix(shift_type_id);
        match (w, s) {
            (Some(w), Some(s)) if period < self.num_periods => {
                Ok(self.assignment[self.assignment_ix(w, period, s)])
            }
            _ => Err(ShiftSolverError::MissingVariable {
                worker_id: worker_id.to_string(),
                period,
                shift_type_id: shift_type_id.to_string(),
            }),
        }
    }

    pub fn shift_count_var(&self, worker_id: &str, shift_type_id: &str) -> Result<V> {
        let w = self.worker_ix(worker_id);
        let s = self.shift_type_ix(shift_type_id);
        match (w, s) {
            (Some(w), Some(s)) => Ok(self.shift_counts[w * self.num_shift_types + s]),
            _ => Err(ShiftSolverError::MissingVariable {
                worker_id: worker_id.to_string(),
                period: 0,
                shift_type_id: shift_type_id.to_string(),
            }),
        }
    }

    pub fn undesirable_total_var(&self, worker_id: &str) -> Result<V> {
        self.worker_ix(worker_id)
            .map(|w| self.undesirable_totals[w])
            .ok_or_else(|| ShiftSolverError::MissingVariable {
                worker_id: worker_id.to_string(),
                period: 0,
                shift_type_id: String::new(),
            })
    }

    /// All assignment variables in insertion (worker, period, shift-type)
    /// order, for deterministic model construction elsewhere.
    pub fn all_assignment_vars(&self) -> impl Iterator<Item = (&str, usize, &str, V)> + '_ {
        (0..self.num_workers).flat_map(move |w| {
            (0..self.num_periods).flat_map(move |p| {
                (0..self.num_shift_types).map(move |s| {
                    (
                        self.worker_ids[w].as_str(),
                        p,
                        self.shift_type_ids[s].as_str(),
                        self.assignment[self.assignment_ix(w, p, s)],
                    )
                })
            })
        })
    }
}
