//! Worker availability records.

use chrono::NaiveDate;

/// The kind of availability a record expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AvailabilityKind {
    Unavailable,
    Available,
    Preferred,
}

/// A worker's availability over a date range, optionally scoped to one
/// shift type instead of all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Availability {
    pub worker_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kind: AvailabilityKind,
    pub shift_type_id: Option<String>,
}

impl Availability {
    pub fn new(
        worker_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        kind: AvailabilityKind,
        shift_type_id: Option<String>,
    ) -> Self {
        Availability {
            worker_id: worker_id.into(),
            start,
            end,
            kind,
            shift_type_id,
        }
    }

    /// Whether this record, if scoped, applies to the given shift type.
    pub fn applies_to_shift(&self, shift_type_id: &str) -> bool {
        match &self.shift_type_id {
            Some(id) => id == shift_type_id,
            None => true,
        }
    }
}
