//! Ties the variable registry, constraint set, objective compiler and an
//! adapter together into the single `solve(inputs, config)` entry point.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use shiftsolve_constraints::{build_constraint, Constraint, ConstraintContext, ObjectiveCompiler, CONSTRAINT_IDS};
use shiftsolve_core::adapter::{ProgressReport, SolutionView, SolveParams, SolverAdapter, TerminalStatus};
use shiftsolve_core::domain::{Availability, ConstraintSpec, PeriodAssignment, Schedule, ShiftInstance, ShiftType, Worker, WorkerRequest};
use shiftsolve_core::registry::VariableRegistry;

use crate::feasibility::{check_feasibility, IssueRecord};

/// Errors raised before a solve can even be attempted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverDriverError {
    #[error("unknown constraint id in configuration: {0}")]
    UnknownConstraintId(String),
    #[error(transparent)]
    Core(#[from] shiftsolve_core::ShiftSolverError),
}

/// Input data for one solve, matching the `inputs` struct of the external
/// interface.
#[derive(Debug, Clone)]
pub struct SolverInputs {
    pub schedule_id: String,
    pub workers: Vec<Worker>,
    pub shift_types: Vec<ShiftType>,
    pub period_dates: Vec<(NaiveDate, NaiveDate)>,
    pub availabilities: Vec<Availability>,
    pub worker_requests: Vec<WorkerRequest>,
}

/// Solve configuration, matching the `config` struct of the external
/// interface.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub constraint_specs: BTreeMap<String, ConstraintSpec>,
    pub time_limit_seconds: u64,
    pub num_workers: u32,
    pub relative_gap: f64,
    pub log_search_progress: bool,
    /// Minimum interval, in seconds, between progress notifications
    /// forwarded to the caller's callback. Defaults to 1.0 per §4.6.
    pub throttle_seconds: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            constraint_specs: BTreeMap::new(),
            time_limit_seconds: 60,
            num_workers: 8,
            relative_gap: 0.0,
            log_search_progress: true,
            throttle_seconds: 1.0,
        }
    }
}

/// The outcome of a solve.
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub success: bool,
    pub status: TerminalStatus,
    pub schedule: Option<Schedule>,
    pub objective_value: Option<f64>,
    pub solve_time_seconds: f64,
    pub feasibility_issues: Option<Vec<IssueRecord>>,
}

/// Validates `config.constraint_specs` against the recognized constraint
/// id set, returning the first unknown id found.
fn validate_constraint_ids(config: &SolverConfig) -> Result<(), SolverDriverError> {
    for id in config.constraint_specs.keys() {
        if !CONSTRAINT_IDS.contains(&id.as_str()) {
            return Err(SolverDriverError::UnknownConstraintId(id.clone()));
        }
    }
    Ok(())
}

fn build_constraints<A: SolverAdapter + 'static>(config: &SolverConfig) -> Vec<Box<dyn Constraint<A>>> {
    CONSTRAINT_IDS
        .iter()
        .map(|id| {
            let spec = config
                .constraint_specs
                .get(*id)
                .cloned()
                .unwrap_or_else(|| shiftsolve_constraints::default_spec_for(id));
            build_constraint::<A>(id, spec).expect("CONSTRAINT_IDS entries are always buildable")
        })
        .collect()
}

fn pick_date(shift_type: &ShiftType, start: NaiveDate, end: NaiveDate) -> Option<NaiveDate> {
    match shift_type.applicable_days() {
        None => Some(start),
        Some(days) => {
            let mut d = start;
            while d <= end {
                if days.contains(&(d.weekday().num_days_from_monday() as u8)) {
                    return Some(d);
                }
                d = d.succ_opt()?;
            }
            None
        }
    }
}

fn extract_schedule<A: SolverAdapter>(
    inputs: &SolverInputs,
    registry: &VariableRegistry<A::Var>,
    solution: &A::Solution,
) -> Result<Schedule, shiftsolve_core::ShiftSolverError> {
    let shift_type_by_id: BTreeMap<&str, &ShiftType> = inputs.shift_types.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut periods: Vec<PeriodAssignment> = (0..inputs.period_dates.len()).map(PeriodAssignment::new).collect();

    for (worker_id, period, shift_type_id, var) in registry.all_assignment_vars() {
        if solution.value_of(var) != 1 {
            continue;
        }
        let shift_type = shift_type_by_id[shift_type_id];
        let (start, end) = inputs.period_dates[period];
        match pick_date(shift_type, start, end) {
            Some(date) => periods[period].push(ShiftInstance {
                shift_type_id: shift_type_id.to_string(),
                period_index: period,
                date,
                worker_id: worker_id.to_string(),
            }),
            None => tracing::warn!(
                worker_id,
                period,
                shift_type_id,
                "solver assigned this shift but applicable_days excludes every date in the period; dropping from schedule"
            ),
        }
    }

    let overall_start = inputs.period_dates.iter().map(|(s, _)| *s).min().unwrap();
    let overall_end = inputs.period_dates.iter().map(|(_, e)| *e).max().unwrap();
    Schedule::new(inputs.schedule_id.clone(), overall_start, overall_end, "custom", periods)
}

/// Runs one solve. `adapter` is the `SolverAdapter` backend to drive;
/// `cancel` is polled cooperatively during the solve.
pub fn solve<A: SolverAdapter + 'static>(
    adapter: &mut A,
    inputs: &SolverInputs,
    config: &SolverConfig,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(ProgressReport),
) -> Result<SolverResult, SolverDriverError> {
    let span = tracing::info_span!("solve", schedule_id = %inputs.schedule_id);
    let _guard = span.enter();

    validate_constraint_ids(config)?;

    let started = Instant::now();
    let num_periods = inputs.period_dates.len();
    let registry = VariableRegistry::build(adapter, &inputs.workers, &inputs.shift_types, num_periods);
    tracing::debug!(
        workers = inputs.workers.len(),
        shift_types = inputs.shift_types.len(),
        periods = num_periods,
        "variable registry built"
    );

    let ctx = ConstraintContext {
        workers: &inputs.workers,
        shift_types: &inputs.shift_types,
        num_periods,
        period_dates: &inputs.period_dates,
        availabilities: &inputs.availabilities,
    };

    let mut constraints = build_constraints::<A>(config);
    for constraint in constraints.iter_mut() {
        constraint.apply(adapter, &registry, &ctx)?;
        tracing::debug!(
            constraint = constraint.id(),
            enabled = constraint.is_enabled(),
            is_hard = constraint.is_hard(),
            weight = constraint.weight(),
            emitted = constraint.state().constraint_count(),
            "constraint applied"
        );
    }

    let mut compiler = ObjectiveCompiler::<A::Var>::new();
    compiler.compile(adapter, &constraints);
    tracing::debug!(terms = compiler.terms().len(), "objective compiled");

    tracing::info!(time_limit_seconds = config.time_limit_seconds, "solve starting");

    let params = SolveParams {
        time_limit_seconds: config.time_limit_seconds,
        num_workers: config.num_workers,
        relative_gap: config.relative_gap,
        log_search_progress: config.log_search_progress,
    };

    let mut last_reported = None::<Instant>;
    let throttle = config.throttle_seconds;
    let (status, solution) = adapter.solve(&params, cancel, &mut |report| {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        let due = match last_reported {
            None => true,
            Some(t) => t.elapsed().as_secs_f64() >= throttle,
        };
        if due {
            last_reported = Some(Instant::now());
            on_progress(report);
        }
    });

    let solve_time_seconds = started.elapsed().as_secs_f64();
    tracing::info!(status = status.name(), solve_time_seconds, "solve finished");

    if !status.has_solution() {
        let feasibility_issues = if status == TerminalStatus::Infeasible {
            Some(check_feasibility(&inputs.workers, &inputs.shift_types, &inputs.period_dates, &inputs.availabilities))
        } else {
            None
        };
        return Ok(SolverResult {
            success: false,
            status,
            schedule: None,
            objective_value: None,
            solve_time_seconds,
            feasibility_issues,
        });
    }

    let solution = solution.expect("has_solution() implies Some");
    let schedule = extract_schedule::<A>(inputs, &registry, &solution)?;

    Ok(SolverResult {
        success: true,
        status,
        schedule: Some(schedule),
        objective_value: Some(solution.objective_value()),
        solve_time_seconds,
        feasibility_issues: None,
    })
}
