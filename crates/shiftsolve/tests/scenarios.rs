//! End-to-end scenarios run against the bundled reference adapter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, NaiveTime};

use shiftsolve::{
    Availability, AvailabilityKind, ConstraintSpec, ShiftType, SolverConfig, SolverInputs, TerminalStatus, Worker,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn weekly_periods(start: NaiveDate, count: i64) -> Vec<(NaiveDate, NaiveDate)> {
    (0..count)
        .map(|week| (start + chrono::Duration::days(week * 7), start + chrono::Duration::days(week * 7 + 6)))
        .collect()
}

#[test]
fn scenario_c_restriction_is_honored() {
    let workers = vec![
        Worker::new("alice", "Alice", None, ["night".to_string()], []).unwrap(),
        Worker::new("bob", "Bob", None, [], []).unwrap(),
    ];
    let shift_types = vec![ShiftType::new("night", "Night", "night", time(22), time(6), 8.0, true, 1, None).unwrap()];
    let period_dates = weekly_periods(date(2026, 3, 2), 1);

    let inputs = SolverInputs {
        schedule_id: "scenario-c".to_string(),
        workers,
        shift_types,
        period_dates,
        availabilities: vec![],
        worker_requests: vec![],
    };
    let config = SolverConfig {
        log_search_progress: false,
        ..SolverConfig::default()
    };

    let result = shiftsolve::solve(&inputs, &config).unwrap();
    assert!(result.success);
    let schedule = result.schedule.unwrap();
    for period in &schedule.periods {
        for (worker_id, instances) in &period.assignments {
            if worker_id == "alice" {
                assert!(instances.iter().all(|i| i.shift_type_id != "night"));
            }
        }
    }
}

#[test]
fn scenario_d_availability_scopes_assignment() {
    let workers = vec![
        Worker::new("alice", "Alice", None, [], []).unwrap(),
        Worker::new("bob", "Bob", None, [], []).unwrap(),
    ];
    let shift_types = vec![ShiftType::new("day", "Day", "day", time(8), time(16), 8.0, false, 1, None).unwrap()];
    let period_dates = weekly_periods(date(2026, 3, 2), 1);
    let (period_start, period_end) = period_dates[0];

    let availabilities = vec![Availability::new(
        "alice",
        period_start,
        period_end,
        AvailabilityKind::Unavailable,
        Some("day".to_string()),
    )];

    let inputs = SolverInputs {
        schedule_id: "scenario-d".to_string(),
        workers,
        shift_types,
        period_dates,
        availabilities,
        worker_requests: vec![],
    };
    let config = SolverConfig {
        log_search_progress: false,
        ..SolverConfig::default()
    };

    let result = shiftsolve::solve(&inputs, &config).unwrap();
    assert!(result.success);
    let schedule = result.schedule.unwrap();
    let assigned: Vec<&str> = schedule.periods[0].assignments.keys().map(|s| s.as_str()).collect();
    assert_eq!(assigned, vec!["bob"]);
}

#[test]
fn scenario_e_fairness_spreads_undesirable_load() {
    let workers = vec![
        Worker::new("alice", "Alice", None, [], []).unwrap(),
        Worker::new("bob", "Bob", None, [], []).unwrap(),
    ];
    let shift_types = vec![ShiftType::new("night", "Night", "night", time(22), time(6), 8.0, true, 1, None).unwrap()];
    let period_dates = weekly_periods(date(2026, 3, 2), 4);

    let inputs = SolverInputs {
        schedule_id: "scenario-e".to_string(),
        workers,
        shift_types,
        period_dates,
        availabilities: vec![],
        worker_requests: vec![],
    };

    let mut specs = BTreeMap::new();
    specs.insert(
        "fairness".to_string(),
        ConstraintSpec {
            weight: 1000,
            is_hard: false,
            ..ConstraintSpec::default()
        },
    );
    let config = SolverConfig {
        constraint_specs: specs,
        log_search_progress: false,
        ..SolverConfig::default()
    };

    let result = shiftsolve::solve(&inputs, &config).unwrap();
    assert!(result.success);
    let schedule = result.schedule.unwrap();

    let mut night_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for period in &schedule.periods {
        for (worker_id, instances) in &period.assignments {
            let nights = instances.iter().filter(|i| i.shift_type_id == "night").count() as u32;
            *night_counts.entry(worker_id.as_str()).or_default() += nights;
        }
    }
    let counts: Vec<u32> = night_counts.values().copied().collect();
    let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
    assert!(spread <= 1, "night shifts should be spread evenly, got {night_counts:?}");
}

#[test]
fn scenario_f_cancellation_yields_no_schedule() {
    let workers = vec![Worker::new("alice", "Alice", None, [], []).unwrap()];
    let shift_types = vec![ShiftType::new("day", "Day", "day", time(8), time(16), 8.0, false, 1, None).unwrap()];
    let period_dates = weekly_periods(date(2026, 3, 2), 1);

    let inputs = SolverInputs {
        schedule_id: "scenario-f".to_string(),
        workers,
        shift_types,
        period_dates,
        availabilities: vec![],
        worker_requests: vec![],
    };
    let config = SolverConfig {
        log_search_progress: false,
        ..SolverConfig::default()
    };

    let mut adapter = shiftsolve::ReferenceAdapter::new();
    let cancel = AtomicBool::new(true);
    cancel.store(true, Ordering::SeqCst);

    let result = shiftsolve_solver::solve(&mut adapter, &inputs, &config, &cancel, |_| {}).unwrap();

    assert!(!result.success);
    assert_eq!(result.status, TerminalStatus::Unknown);
    assert!(result.schedule.is_none());
}
