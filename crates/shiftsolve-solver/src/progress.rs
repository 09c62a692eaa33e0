//! Default progress sink: prints each throttled incumbent to stderr when
//! `log_search_progress` is set, mirroring the teacher's "print solver
//! lifecycle events" ambient behavior (`solverforge-console`,
//! `solverforge-solver::event`) without pulling in its TUI dependencies.

use shiftsolve_core::adapter::ProgressReport;

/// Builds a progress callback that logs each report through `tracing` and,
/// when `enabled`, also writes a line to stderr.
pub fn console_progress_reporter(enabled: bool) -> impl FnMut(ProgressReport) {
    move |report: ProgressReport| {
        tracing::info!(
            solutions_found = report.solutions_found,
            objective_value = report.objective_value,
            best_bound = report.best_bound,
            gap_percent = report.gap_percent,
            wall_time = report.wall_time,
            "progress"
        );
        if enabled {
            eprintln!(
                "[{:>7.1}s] solution #{:<4} objective={:<10.2} bound={:<10.2} gap={:.2}%",
                report.wall_time, report.solutions_found, report.objective_value, report.best_bound, report.gap_percent
            );
        }
    }
}
