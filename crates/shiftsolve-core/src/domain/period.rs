//! Scheduling periods.

use chrono::NaiveDate;

use crate::error::{Result, ShiftSolverError};

/// A contiguous date range in the schedule horizon, identified by its
/// integer index within the enclosing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period {
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(index: usize, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ShiftSolverError::invariant(
                "Period",
                "end",
                "end date must not precede start date",
            ));
        }
        Ok(Period { index, start, end })
    }

    pub fn overlaps(&self, other_start: NaiveDate, other_end: NaiveDate) -> bool {
        other_start <= self.end && other_end >= self.start
    }
}

/// Builds the ordered, contiguous sequence of periods for a schedule from
/// `(start, end)` date pairs, one per period, in index order.
pub fn periods_from_dates(period_dates: &[(NaiveDate, NaiveDate)]) -> Result<Vec<Period>> {
    period_dates
        .iter()
        .enumerate()
        .map(|(i, (start, end))| Period::new(i, *start, *end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_end_before_start() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let earlier = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert!(Period::new(0, d, earlier).is_err());
    }

    #[test]
    fn overlap_is_inclusive() {
        let s = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let e = NaiveDate::from_ymd_opt(2026, 2, 8).unwrap();
        let p = Period::new(0, s, e).unwrap();
        assert!(p.overlaps(e, e));
        assert!(!p.overlaps(e.succ_opt().unwrap(), e.succ_opt().unwrap()));
    }
}
