//! Error taxonomy for shiftsolve.
//!
//! Each variant corresponds to one of the five error kinds with a distinct
//! recovery policy: [`ShiftSolverError::Invariant`] and
//! [`ShiftSolverError::Configuration`] are fatal before or at construction
//! time; [`ShiftSolverError::MissingVariable`] indicates a logic bug and
//! should abort the solve; [`ShiftSolverError::Solver`] and
//! [`ShiftSolverError::Infeasible`] are reported back through `SolverResult`
//! rather than propagated as an `Err`.

use thiserror::Error;

/// Main error type for shiftsolve operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShiftSolverError {
    /// A domain value failed one of its construction invariants.
    #[error("invariant violated for {entity} ({field}): {message}")]
    Invariant {
        entity: &'static str,
        field: &'static str,
        message: String,
    },

    /// The solve configuration is malformed (unknown constraint id, bad
    /// parameter type, negative weight, non-positive window).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal lookup against the variable registry for a non-existent
    /// triple. Reaching this on well-formed inputs is a logic bug.
    #[error("missing variable for worker={worker_id:?} period={period:?} shift_type={shift_type_id:?}")]
    MissingVariable {
        worker_id: String,
        period: usize,
        shift_type_id: String,
    },

    /// The solver adapter could not be run, or terminated with
    /// ModelInvalid/Unknown.
    #[error("solver error ({status}): {message}")]
    Solver { status: String, message: String },

    /// The solver terminated Infeasible.
    #[error("infeasible: {0} issue(s) found")]
    Infeasible(usize),
}

/// Result type alias for shiftsolve operations.
pub type Result<T> = std::result::Result<T, ShiftSolverError>;

impl ShiftSolverError {
    pub fn invariant(entity: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        ShiftSolverError::Invariant {
            entity,
            field,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ShiftSolverError::Configuration(message.into())
    }
}
