//! Solver output: a fully populated, internally consistent schedule.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::error::{Result, ShiftSolverError};

/// One concrete occurrence of a shift type, on a specific date, assigned to
/// one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftInstance {
    pub shift_type_id: String,
    pub period_index: usize,
    pub date: NaiveDate,
    pub worker_id: String,
}

/// All shift instances for one period, keyed by the assigned worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodAssignment {
    pub period_index: usize,
    pub assignments: BTreeMap<String, Vec<ShiftInstance>>,
}

impl PeriodAssignment {
    pub fn new(period_index: usize) -> Self {
        PeriodAssignment {
            period_index,
            assignments: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, instance: ShiftInstance) {
        self.assignments
            .entry(instance.worker_id.clone())
            .or_default()
            .push(instance);
    }
}

/// A complete, solved schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    pub id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period_type: String,
    pub periods: Vec<PeriodAssignment>,
}

impl Schedule {
    pub fn new(
        id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        period_type: impl Into<String>,
        periods: Vec<PeriodAssignment>,
    ) -> Result<Self> {
        if end <= start {
            return Err(ShiftSolverError::invariant(
                "Schedule",
                "end",
                "end_date must be strictly after start_date",
            ));
        }
        Ok(Schedule {
            id: id.into(),
            start,
            end,
            period_type: period_type.into(),
            periods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_nonpositive_range() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let err = Schedule::new("s1", d, d, "weekly", vec![]).unwrap_err();
        assert!(matches!(err, ShiftSolverError::Invariant { entity: "Schedule", .. }));
    }

    proptest! {
        #[test]
        fn end_before_or_equal_start_always_rejected(days_back in 0i64..365) {
            let start = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
            let end = start - chrono::Duration::days(days_back);
            let err = Schedule::new("s1", start, end, "weekly", vec![]).unwrap_err();
            let is_invariant = matches!(err, ShiftSolverError::Invariant { entity: "Schedule", .. });
            prop_assert!(is_invariant);
        }
    }
}
