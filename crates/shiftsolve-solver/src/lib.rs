//! Reference [`SolverAdapter`](shiftsolve_core::adapter::SolverAdapter) backend,
//! solver driver and feasibility checker for shiftsolve.

pub mod driver;
pub mod feasibility;
pub mod progress;
pub mod reference;

pub use driver::{solve, SolverConfig, SolverDriverError, SolverInputs, SolverResult};
pub use feasibility::{check_feasibility, IssueKind, IssueRecord};
pub use progress::console_progress_reporter;
pub use reference::ReferenceAdapter;
