//! Pre-solve feasibility analysis, run when the solver terminates Infeasible.
//!
//! Grounded on the two easiest-to-diagnose causes also checked post-hoc by
//! the Python `schedule_validator` coverage and restriction strategies: a
//! shift whose required headcount outnumbers its eligible workers, and a
//! (period, shift) pair left with no eligible worker at all once
//! restrictions and Unavailable records are applied.

use std::collections::HashSet;

use shiftsolve_core::domain::{Availability, AvailabilityKind, ShiftType, Worker};

/// The cause a single feasibility issue was classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// `workers_required` exceeds the number of workers not restricted from
    /// this shift type, so no period could ever satisfy coverage.
    InsufficientHeadcount,
    /// After restriction and Unavailable filtering, zero workers are
    /// eligible for this (period, shift type) pair.
    NoEligibleWorker,
}

/// One diagnosed cause of infeasibility.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IssueRecord {
    pub kind: String,
    pub message: String,
    pub period: Option<usize>,
    pub shift_type_id: Option<String>,
}

fn record(kind: IssueKind, message: String, period: Option<usize>, shift_type_id: Option<String>) -> IssueRecord {
    let kind = match kind {
        IssueKind::InsufficientHeadcount => "insufficient_headcount",
        IssueKind::NoEligibleWorker => "no_eligible_worker",
    };
    IssueRecord {
        kind: kind.to_string(),
        message,
        period,
        shift_type_id,
    }
}

fn unavailable_for(availabilities: &[Availability], worker_id: &str, period_start: chrono::NaiveDate, period_end: chrono::NaiveDate, shift_type_id: &str) -> bool {
    availabilities.iter().any(|a| {
        a.worker_id == worker_id
            && a.kind == AvailabilityKind::Unavailable
            && a.start <= period_end
            && a.end >= period_start
            && a.applies_to_shift(shift_type_id)
    })
}

/// Classifies the likely causes of an Infeasible result.
pub fn check_feasibility(
    workers: &[Worker],
    shift_types: &[ShiftType],
    period_dates: &[(chrono::NaiveDate, chrono::NaiveDate)],
    availabilities: &[Availability],
) -> Vec<IssueRecord> {
    let mut issues = Vec::new();

    for shift_type in shift_types {
        let eligible_overall: HashSet<&str> = workers
            .iter()
            .filter(|w| w.can_work_shift(&shift_type.id))
            .map(|w| w.id.as_str())
            .collect();
        if (eligible_overall.len() as u32) < shift_type.workers_required {
            issues.push(record(
                IssueKind::InsufficientHeadcount,
                format!(
                    "shift '{}' requires {} workers but only {} are not restricted from it",
                    shift_type.name,
                    shift_type.workers_required,
                    eligible_overall.len()
                ),
                None,
                Some(shift_type.id.clone()),
            ));
            continue;
        }

        for (period_index, (start, end)) in period_dates.iter().enumerate() {
            let eligible_this_period = eligible_overall
                .iter()
                .filter(|id| !unavailable_for(availabilities, id, *start, *end, &shift_type.id))
                .count();
            if eligible_this_period == 0 {
                issues.push(record(
                    IssueKind::NoEligibleWorker,
                    format!(
                        "period {period_index}: no worker is eligible for shift '{}' after restriction and availability filtering",
                        shift_type.name
                    ),
                    Some(period_index),
                    Some(shift_type.id.clone()),
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shift(id: &str, workers_required: u32) -> ShiftType {
        ShiftType::new(
            id,
            id,
            "day",
            chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            8.0,
            false,
            workers_required,
            None,
        )
        .unwrap()
    }

    #[test]
    fn flags_insufficient_headcount() {
        let workers = vec![Worker::new("W1", "W1", None, [], []).unwrap()];
        let shifts = vec![shift("s", 2)];
        let periods = [(date(2026, 2, 2), date(2026, 2, 8))];

        let issues = check_feasibility(&workers, &shifts, &periods, &[]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, "insufficient_headcount");
        assert_eq!(issues[0].shift_type_id.as_deref(), Some("s"));
    }

    #[test]
    fn flags_no_eligible_worker_after_availability() {
        let workers = vec![Worker::new("W1", "W1", None, [], []).unwrap()];
        let shifts = vec![shift("s", 1)];
        let periods = [(date(2026, 2, 2), date(2026, 2, 8))];
        let availabilities = vec![Availability::new("W1", date(2026, 2, 2), date(2026, 2, 8), AvailabilityKind::Unavailable, None)];

        let issues = check_feasibility(&workers, &shifts, &periods, &availabilities);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, "no_eligible_worker");
        assert_eq!(issues[0].period, Some(0));
    }

    #[test]
    fn reports_nothing_when_feasible() {
        let workers = vec![Worker::new("W1", "W1", None, [], []).unwrap()];
        let shifts = vec![shift("s", 1)];
        let periods = [(date(2026, 2, 2), date(2026, 2, 8))];

        assert!(check_feasibility(&workers, &shifts, &periods, &[]).is_empty());
    }
}
