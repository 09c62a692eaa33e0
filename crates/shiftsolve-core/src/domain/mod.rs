//! Immutable value records for the scheduling domain.
//!
//! Every constructor here validates its invariants and returns
//! [`crate::error::ShiftSolverError::Invariant`] on failure rather than
//! panicking — these types are meant to be built from untrusted ingestion
//! data.

mod availability;
mod constraint_spec;
mod period;
mod schedule;
mod shift_type;
mod worker;
mod worker_request;

pub use availability::{Availability, AvailabilityKind};
pub use constraint_spec::{ConstraintSpec, ParamValue};
pub use period::{periods_from_dates, Period};
pub use schedule::{PeriodAssignment, Schedule, ShiftInstance};
pub use shift_type::{ShiftType, Weekday};
pub use worker::Worker;
pub use worker_request::{RequestPolarity, WorkerRequest};
