//! Shift-type templates.

use std::collections::BTreeSet;

use crate::error::{Result, ShiftSolverError};

/// A weekday, `0` = Monday through `6` = Sunday, matching `chrono`'s
/// `Weekday::num_days_from_monday`.
pub type Weekday = u8;

/// A template describing a recurring shift's time window, duration and
/// staffing requirement.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftType {
    pub id: String,
    pub name: String,
    pub category: String,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub duration_hours: f64,
    pub is_undesirable: bool,
    pub workers_required: u32,
    /// Subset of {0..6}; `None` means the shift applies on every day.
    applicable_days: Option<BTreeSet<Weekday>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_attributes: std::collections::BTreeMap<String, String>,
}

impl ShiftType {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        start_time: chrono::NaiveTime,
        end_time: chrono::NaiveTime,
        duration_hours: f64,
        is_undesirable: bool,
        workers_required: u32,
        applicable_days: Option<BTreeSet<Weekday>>,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ShiftSolverError::invariant("ShiftType", "id", "id cannot be empty"));
        }
        if duration_hours <= 0.0 {
            return Err(ShiftSolverError::invariant(
                "ShiftType",
                "duration_hours",
                "duration_hours must be positive",
            ));
        }
        if workers_required < 1 {
            return Err(ShiftSolverError::invariant(
                "ShiftType",
                "workers_required",
                "workers_required must be at least 1",
            ));
        }
        if let Some(days) = &applicable_days {
            let invalid: Vec<Weekday> = days.iter().copied().filter(|d| *d > 6).collect();
            if !invalid.is_empty() {
                return Err(ShiftSolverError::invariant(
                    "ShiftType",
                    "applicable_days",
                    format!("applicable_days must be 0-6, got: {invalid:?}"),
                ));
            }
        }
        Ok(ShiftType {
            id,
            name: name.into(),
            category: category.into(),
            start_time,
            end_time,
            duration_hours,
            is_undesirable,
            workers_required,
            applicable_days,
            required_attributes: Default::default(),
        })
    }

    pub fn applicable_days(&self) -> Option<&BTreeSet<Weekday>> {
        self.applicable_days.as_ref()
    }

    pub fn applies_on(&self, weekday: Weekday) -> bool {
        match &self.applicable_days {
            None => true,
            Some(days) => days.contains(&weekday),
        }
    }
}

impl PartialEq for ShiftType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.category == other.category
            && self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.duration_hours == other.duration_hours
            && self.is_undesirable == other.is_undesirable
            && self.workers_required == other.workers_required
            && self.applicable_days == other.applicable_days
    }
}
impl Eq for ShiftType {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn rejects_nonpositive_duration() {
        let err = ShiftType::new("s", "Day", "day", t(8), t(16), 0.0, false, 1, None).unwrap_err();
        assert!(matches!(err, ShiftSolverError::Invariant { field: "duration_hours", .. }));
    }

    #[test]
    fn rejects_zero_workers_required() {
        let err = ShiftType::new("s", "Day", "day", t(8), t(16), 8.0, false, 0, None).unwrap_err();
        assert!(matches!(err, ShiftSolverError::Invariant { field: "workers_required", .. }));
    }

    #[test]
    fn rejects_out_of_range_weekday() {
        let err = ShiftType::new("s", "Day", "day", t(8), t(16), 8.0, false, 1, Some([7].into()))
            .unwrap_err();
        assert!(matches!(err, ShiftSolverError::Invariant { field: "applicable_days", .. }));
    }

    proptest! {
        #[test]
        fn nonpositive_duration_always_rejected(duration in -100.0f64..=0.0) {
            let err = ShiftType::new("s", "Day", "day", t(8), t(16), duration, false, 1, None).unwrap_err();
            let is_invariant = matches!(err, ShiftSolverError::Invariant { field: "duration_hours", .. });
            prop_assert!(is_invariant);
        }

        #[test]
        fn zero_workers_required_always_rejected(duration in 0.1f64..24.0) {
            let err = ShiftType::new("s", "Day", "day", t(8), t(16), duration, false, 0, None).unwrap_err();
            let is_invariant = matches!(err, ShiftSolverError::Invariant { field: "workers_required", .. });
            prop_assert!(is_invariant);
        }
    }
}
