//! Shiftsolve - a shift-scheduling constraint solver core.
//!
//! This crate is the public facade: it re-exports the domain model and
//! configuration types other crates need and provides a single
//! convenience entry point, [`solve`], that runs a complete solve against
//! the bundled reference [`SolverAdapter`](shiftsolve_core::adapter::SolverAdapter).
//! Callers who want a different backend should use
//! `shiftsolve_solver::driver::solve` directly with their own adapter.

use std::sync::atomic::AtomicBool;

pub use shiftsolve_core::adapter::{Lit, ProgressReport, SolveParams, SolverAdapter, TerminalStatus};
pub use shiftsolve_core::domain::{
    periods_from_dates, Availability, AvailabilityKind, ConstraintSpec, ParamValue, Period, PeriodAssignment, RequestPolarity,
    Schedule, ShiftInstance, ShiftType, Weekday, Worker, WorkerRequest,
};
pub use shiftsolve_core::error::{Result, ShiftSolverError};

pub use shiftsolve_config::{load_toml_file, load_toml_str, load_yaml_file, load_yaml_str, ConfigError};
pub use shiftsolve_constraints::CONSTRAINT_IDS;
pub use shiftsolve_solver::{
    check_feasibility, console_progress_reporter, IssueKind, IssueRecord, ReferenceAdapter, SolverConfig, SolverDriverError,
    SolverInputs, SolverResult,
};

/// Runs a solve against the bundled reference adapter, using the default
/// console progress sink.
pub fn solve(inputs: &SolverInputs, config: &SolverConfig) -> std::result::Result<SolverResult, SolverDriverError> {
    let mut adapter = ReferenceAdapter::new();
    let cancel = AtomicBool::new(false);
    let reporter = console_progress_reporter(config.log_search_progress);
    shiftsolve_solver::solve(&mut adapter, inputs, config, &cancel, reporter)
}
