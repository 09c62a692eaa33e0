//! The pluggable constraint set and objective compiler.
//!
//! Seven built-in constraint generators (coverage, restriction,
//! availability, fairness, frequency, max-absence, sequence), each
//! implementing [`Constraint`], plus [`ObjectiveCompiler`] which walks the
//! applied set and installs a weighted minimization objective.

pub mod availability;
pub mod base;
pub mod coverage;
pub mod fairness;
pub mod frequency;
pub mod max_absence;
pub mod objective;
pub mod restriction;
pub mod sequence;
#[cfg(test)]
mod test_support;

pub use availability::AvailabilityConstraint;
pub use base::{default_spec_for, Constraint, ConstraintContext, ConstraintState, ViolationKind};
pub use coverage::CoverageConstraint;
pub use fairness::FairnessConstraint;
pub use frequency::FrequencyConstraint;
pub use max_absence::MaxAbsenceConstraint;
pub use objective::{ObjectiveCompiler, ObjectiveTerm};
pub use restriction::RestrictionConstraint;
pub use sequence::SequenceConstraint;

/// All recognized constraint identifiers, in the stable order the driver
/// applies them.
pub const CONSTRAINT_IDS: &[&str] = &[
    "coverage",
    "restriction",
    "availability",
    "fairness",
    "frequency",
    "max_absence",
    "sequence",
];

/// Builds one boxed constraint generator for `constraint_id` with the
/// given spec, or `None` for an unrecognized id.
pub fn build_constraint<A: shiftsolve_core::adapter::SolverAdapter + 'static>(
    constraint_id: &str,
    spec: shiftsolve_core::domain::ConstraintSpec,
) -> Option<Box<dyn Constraint<A>>> {
    match constraint_id {
        "coverage" => Some(Box::new(CoverageConstraint::new(spec))),
        "restriction" => Some(Box::new(RestrictionConstraint::new(spec))),
        "availability" => Some(Box::new(AvailabilityConstraint::new(spec))),
        "fairness" => Some(Box::new(FairnessConstraint::new(spec))),
        "frequency" => Some(Box::new(FrequencyConstraint::new(spec))),
        "max_absence" => Some(Box::new(MaxAbsenceConstraint::new(spec))),
        "sequence" => Some(Box::new(SequenceConstraint::new(spec))),
        _ => None,
    }
}
